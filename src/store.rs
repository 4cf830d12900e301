use tracing::{debug, info, warn};

use crate::api::{ApiError, TaskService};
use crate::models::{FilterPatch, Filters, ListQuery, Pagination, Stats, Task, TaskInput};

/// Client-side state container for the dashboard. Owns the current page of
/// tasks, the aggregate stats, the pagination metadata and the active
/// filters; every operation round-trips through the task service, which
/// stays authoritative for all persisted state.
///
/// Mutations patch the local cache from the service's response instead of
/// re-fetching the whole list: one round trip fewer and no list flicker, at
/// the cost of the cached page drifting from server-side sort placement
/// until the next explicit fetch. Stats are re-fetched after every mutation
/// since they are a global aggregate the mutation may have changed.
pub struct TaskStore<S: TaskService> {
    service: S,
    pub tasks: Vec<Task>,
    pub stats: Stats,
    pub pagination: Pagination,
    pub filters: Filters,
    pub loading: bool,
    pub error: Option<String>,
    // Monotonic tag for list requests; responses carrying an older tag are
    // discarded so a slow fetch can never overwrite a newer one.
    fetch_seq: u64,
}

impl<S: TaskService> TaskStore<S> {
    pub fn new(service: S, filters: Filters) -> Self {
        Self {
            service,
            tasks: Vec::new(),
            stats: Stats::default(),
            pagination: Pagination::default(),
            filters,
            loading: false,
            error: None,
            fetch_seq: 0,
        }
    }

    /// Fetch the page described by the current filters, replacing `tasks`
    /// and `pagination` together on success. On failure the stale page stays
    /// visible and `error` carries the message.
    pub fn fetch_tasks(&mut self) {
        let seq = self.begin_fetch();
        let query = self.filters.to_query();
        let result = self.service.list(&query);
        self.apply_list_result(seq, result);
    }

    pub(crate) fn begin_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.loading = true;
        self.error = None;
        self.fetch_seq
    }

    pub(crate) fn apply_list_result(
        &mut self,
        seq: u64,
        result: Result<crate::models::TaskPage, ApiError>,
    ) {
        if seq != self.fetch_seq {
            debug!(seq, latest = self.fetch_seq, "discarding stale list response");
            return;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                debug!(
                    count = page.tasks.len(),
                    page = page.current_page,
                    "task page loaded"
                );
                self.pagination = page.pagination();
                self.tasks = page.tasks;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    /// Refresh the aggregate counts. Stats are supplementary: a failure here
    /// is logged and discarded, never surfaced.
    pub fn fetch_stats(&mut self) {
        match self.service.stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => warn!(error = %e, "failed to fetch stats"),
        }
    }

    /// Create a task and prepend the service's copy to the current page.
    /// The error, when there is one, carries the message to show inline.
    pub fn create(&mut self, input: &TaskInput) -> Result<(), ApiError> {
        let task = self.service.create(input)?;
        info!(id = %task.id, "task created");
        self.tasks.insert(0, task);
        self.fetch_stats();
        Ok(())
    }

    /// Update a task, replacing the cached entry in place. List order is
    /// left alone even if the change would move the task under the active
    /// sort; the next fetch restores server order.
    pub fn update(&mut self, id: &str, input: &TaskInput) -> Result<(), ApiError> {
        let updated = self.service.update(id, input)?;
        info!(id, "task updated");
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = updated;
        }
        self.fetch_stats();
        Ok(())
    }

    /// Delete a task. The cached entry is removed only after the service
    /// confirms, so a failed delete leaves the task visibly present.
    pub fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.service.delete(id)?;
        info!(id, "task deleted");
        self.tasks.retain(|t| t.id != id);
        self.fetch_stats();
        Ok(())
    }

    /// Flip a task's status. The service decides the resulting status; the
    /// cache takes whatever copy it returns rather than flipping locally.
    pub fn toggle(&mut self, id: &str) -> Result<(), ApiError> {
        let toggled = self.service.toggle(id)?;
        debug!(id, status = %toggled.status, "task toggled");
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = toggled;
        }
        self.fetch_stats();
        Ok(())
    }

    /// Merge filter changes, resetting to page 1. Does not fetch: the view
    /// decides when to synchronize.
    pub fn update_filters(&mut self, patch: FilterPatch) {
        self.filters.apply(patch);
    }

    /// Change only the requested page; every other criterion stays put.
    pub fn set_page(&mut self, page: u32) {
        self.filters.page = page;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The query the next fetch would issue. Exposed for request dispatch
    /// that runs outside `fetch_tasks` (quick-add CLI, tests).
    pub fn current_query(&self) -> ListQuery {
        self.filters.to_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FETCH_TASKS_FAILED, MockTaskService};
    use crate::models::{Priority, Status, StatusFilter, TaskPage};
    use chrono::Utc;

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            status: Status::Pending,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    fn page(tasks: Vec<Task>, total_pages: u32) -> TaskPage {
        let total = tasks.len() as u64;
        TaskPage {
            tasks,
            current_page: 1,
            total_pages,
            total_tasks: total,
        }
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
        }
    }

    fn store_with(service: MockTaskService) -> TaskStore<MockTaskService> {
        TaskStore::new(service, Filters::default())
    }

    #[test]
    fn fetch_replaces_tasks_and_pagination_together() {
        let mut service = MockTaskService::new();
        service
            .expect_list()
            .returning(|_| Ok(page(vec![task("a", "one"), task("b", "two")], 3)));
        let mut store = store_with(service);

        store.fetch_tasks();

        assert_eq!(store.tasks.len(), 2);
        assert_eq!(store.pagination.total_pages, 3);
        assert!(!store.loading);
        assert!(store.error.is_none());
    }

    #[test]
    fn fetch_failure_keeps_stale_page_and_sets_message() {
        let mut service = MockTaskService::new();
        service
            .expect_list()
            .returning(|_| Err(ApiError::Failed(FETCH_TASKS_FAILED)));
        let mut store = store_with(service);
        store.tasks = vec![task("a", "stale")];
        store.pagination.total_tasks = 1;

        store.fetch_tasks();

        assert_eq!(store.tasks.len(), 1);
        assert_eq!(store.pagination.total_tasks, 1);
        assert_eq!(store.error.as_deref(), Some("Failed to fetch tasks"));
        assert!(!store.loading);
    }

    #[test]
    fn stale_list_response_is_discarded() {
        let service = MockTaskService::new();
        let mut store = store_with(service);

        let first = store.begin_fetch();
        let second = store.begin_fetch();

        // The older request resolves last-but-one; it must not land.
        store.apply_list_result(first, Ok(page(vec![task("old", "old page")], 1)));
        assert!(store.tasks.is_empty());
        assert!(store.loading);

        store.apply_list_result(second, Ok(page(vec![task("new", "new page")], 1)));
        assert_eq!(store.tasks[0].id, "new");
        assert!(!store.loading);
    }

    #[test]
    fn create_prepends_and_refreshes_stats() {
        let mut service = MockTaskService::new();
        service.expect_create().returning(|_| Ok(task("new", "Ship it")));
        service.expect_stats().times(1).returning(|| {
            Ok(Stats {
                total: 3,
                pending: 2,
                completed: 1,
            })
        });
        let mut store = store_with(service);
        store.tasks = vec![task("a", "existing")];

        store.create(&input("Ship it")).unwrap();

        assert_eq!(store.tasks[0].id, "new");
        assert_eq!(store.tasks.len(), 2);
        assert_eq!(store.stats.total, 3);
    }

    #[test]
    fn failed_create_returns_server_message_and_leaves_cache() {
        let mut service = MockTaskService::new();
        service
            .expect_create()
            .returning(|_| Err(ApiError::Rejected("Title already exists".to_string())));
        service.expect_stats().times(0);
        let mut store = store_with(service);
        store.tasks = vec![task("a", "existing")];

        let err = store.create(&input("dupe")).unwrap_err();

        assert_eq!(err.to_string(), "Title already exists");
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn update_replaces_entry_in_place() {
        let mut service = MockTaskService::new();
        service.expect_update().returning(|id, _| {
            let mut t = task(id, "renamed");
            t.priority = Priority::High;
            Ok(t)
        });
        service.expect_stats().returning(|| Ok(Stats::default()));
        let mut store = store_with(service);
        store.tasks = vec![task("a", "first"), task("b", "second")];

        store.update("b", &input("renamed")).unwrap();

        // Order unchanged, only the matching entry replaced.
        assert_eq!(store.tasks[0].title, "first");
        assert_eq!(store.tasks[1].title, "renamed");
        assert_eq!(store.tasks[1].priority, Priority::High);
    }

    #[test]
    fn delete_removes_entry_only_after_confirmation() {
        let mut service = MockTaskService::new();
        service.expect_delete().returning(|_| Ok(()));
        service.expect_stats().returning(|| Ok(Stats::default()));
        let mut store = store_with(service);
        store.tasks = vec![task("a", "keep"), task("b", "drop")];

        store.delete("b").unwrap();

        assert!(store.tasks.iter().all(|t| t.id != "b"));
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn failed_delete_leaves_task_present() {
        let mut service = MockTaskService::new();
        service
            .expect_delete()
            .returning(|_| Err(ApiError::Rejected("No such task".to_string())));
        service.expect_stats().times(0);
        let mut store = store_with(service);
        store.tasks = vec![task("a", "still here")];

        assert!(store.delete("a").is_err());
        assert_eq!(store.tasks.len(), 1);
    }

    #[test]
    fn toggle_takes_server_copy_and_touches_nothing_else() {
        let mut service = MockTaskService::new();
        service.expect_toggle().returning(|id| {
            let mut t = task(id, "done now");
            t.status = Status::Completed;
            Ok(t)
        });
        service.expect_stats().returning(|| Ok(Stats::default()));
        let mut store = store_with(service);
        store.tasks = vec![task("a", "untouched"), task("b", "pending")];

        store.toggle("b").unwrap();

        assert_eq!(store.tasks[0].title, "untouched");
        assert_eq!(store.tasks[0].status, Status::Pending);
        assert_eq!(store.tasks[1].status, Status::Completed);
    }

    #[test]
    fn stats_failure_is_swallowed() {
        let mut service = MockTaskService::new();
        service
            .expect_stats()
            .returning(|| Err(ApiError::Failed(crate::api::FETCH_STATS_FAILED)));
        let mut store = store_with(service);
        store.stats = Stats {
            total: 7,
            pending: 4,
            completed: 3,
        };

        store.fetch_stats();

        // Previous stats retained, no error raised to the UI.
        assert_eq!(store.stats.total, 7);
        assert!(store.error.is_none());
    }

    #[test]
    fn filter_updates_reset_page_but_set_page_does_not() {
        let service = MockTaskService::new();
        let mut store = store_with(service);
        store.set_page(5);
        assert_eq!(store.filters.page, 5);

        store.update_filters(FilterPatch {
            status: Some(StatusFilter::Pending),
            ..FilterPatch::default()
        });
        assert_eq!(store.filters.page, 1);

        store.set_page(3);
        assert_eq!(store.filters.page, 3);
        assert_eq!(store.filters.status, StatusFilter::Pending);
    }
}
