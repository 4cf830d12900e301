use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Completed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task as the service returns it. The service assigns `id` and
/// `created_at`; the client never fabricates either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub status: Status,
    #[serde(default, with = "date_only")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// A task is overdue iff it has a due date, is not completed, and the
    /// due date is strictly before `today`. Calendar-date comparison: the
    /// service stores due dates at date granularity, so comparing against a
    /// full timestamp would flag tasks due today.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => self.status != Status::Completed && due < today,
            None => false,
        }
    }
}

/// Payload for create and update. No id/status/created_at: identity and
/// timestamps are the service's, and status only changes through toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(with = "date_only", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// Due dates travel as ISO strings that may carry a time component
/// (e.g. "2026-03-01T00:00:00.000Z"). Only the calendar date is meaningful,
/// so the time part is dropped on the way in and never written on the way
/// out.
mod date_only {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.is_empty() => {
                let date_part = s.split('T').next().unwrap_or(&s);
                NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

/// Aggregate counts over the entire collection, independent of the current
/// filter and page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    pub pending: u64,
    pub completed: u64,
}

/// Pagination metadata from the last list response. Overwritten wholesale on
/// every successful fetch, never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_tasks: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_tasks: 0,
        }
    }
}

/// One page of tasks plus its pagination metadata, as returned by the list
/// endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_tasks: u64,
}

impl TaskPage {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_tasks: self.total_tasks,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    /// None for All: the query omits no-op filters entirely.
    pub fn to_status(self) -> Option<Status> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(Status::Pending),
            StatusFilter::Completed => Some(Status::Completed),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityFilter {
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    pub fn to_priority(self) -> Option<Priority> {
        match self {
            PriorityFilter::All => None,
            PriorityFilter::Low => Some(Priority::Low),
            PriorityFilter::Medium => Some(Priority::Medium),
            PriorityFilter::High => Some(Priority::High),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityFilter::All => "all",
            PriorityFilter::Low => "low",
            PriorityFilter::Medium => "medium",
            PriorityFilter::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    CreatedAt,
    DueDate,
    Priority,
}

impl SortBy {
    /// Wire name used in the list query.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::DueDate => "dueDate",
            SortBy::Priority => "priority",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Client-held criteria controlling which page of which subset of tasks is
/// requested, in what order. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            priority: PriorityFilter::All,
            sort_by: SortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            limit: 10,
        }
    }
}

/// A partial filter change. Fields left as None keep their current value.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub priority: Option<PriorityFilter>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl Filters {
    /// Merge a partial change and reset to the first page. Any filter or
    /// sort change can shrink the result set, and showing an out-of-range
    /// page for the new set is worse than jumping back to page 1.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        self.page = 1;
    }

    /// Build the list query, omitting fields at their no-op default
    /// (empty search, status/priority = all).
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            search: if self.search.is_empty() {
                None
            } else {
                Some(self.search.clone())
            },
            status: self.status.to_status(),
            priority: self.priority.to_priority(),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn is_default_view(&self) -> bool {
        self.search.is_empty()
            && self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
    }
}

/// The concrete list request sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    /// Query-string pairs in the shape the service expects.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref search) = self.search {
            params.push(("search", search.clone()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            params.push(("priority", priority.as_str().to_string()));
        }
        params.push(("sortBy", self.sort_by.as_str().to_string()));
        params.push(("sortOrder", self.sort_order.as_str().to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(due: Option<&str>, status: Status) -> Task {
        Task {
            id: "t1".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            priority: Priority::Medium,
            status,
            due_date: due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn filter_change_resets_page() {
        let mut filters = Filters {
            page: 4,
            ..Filters::default()
        };
        filters.apply(FilterPatch {
            status: Some(StatusFilter::Pending),
            ..FilterPatch::default()
        });
        assert_eq!(filters.page, 1);
        assert_eq!(filters.status, StatusFilter::Pending);
    }

    #[test]
    fn filter_patch_keeps_unset_fields() {
        let mut filters = Filters {
            search: "milk".to_string(),
            priority: PriorityFilter::High,
            ..Filters::default()
        };
        filters.apply(FilterPatch {
            sort_by: Some(SortBy::DueDate),
            sort_order: Some(SortOrder::Asc),
            ..FilterPatch::default()
        });
        assert_eq!(filters.search, "milk");
        assert_eq!(filters.priority, PriorityFilter::High);
        assert_eq!(filters.sort_by, SortBy::DueDate);
    }

    #[test]
    fn query_omits_noop_defaults() {
        let filters = Filters::default();
        let params = filters.to_query().to_params();
        let keys: Vec<_> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["sortBy", "sortOrder", "page", "limit"]);
    }

    #[test]
    fn query_includes_active_filters() {
        let filters = Filters {
            search: "report".to_string(),
            status: StatusFilter::Completed,
            priority: PriorityFilter::High,
            ..Filters::default()
        };
        let params = filters.to_query().to_params();
        assert!(params.contains(&("search", "report".to_string())));
        assert!(params.contains(&("status", "completed".to_string())));
        assert!(params.contains(&("priority", "high".to_string())));
    }

    #[test]
    fn overdue_requires_past_due_date_and_pending_status() {
        let today = date("2026-08-24");
        assert!(task(Some("2026-08-23"), Status::Pending).is_overdue(today));
        assert!(!task(Some("2026-08-24"), Status::Pending).is_overdue(today));
        assert!(!task(Some("2026-08-23"), Status::Completed).is_overdue(today));
        assert!(!task(None, Status::Pending).is_overdue(today));
    }

    #[test]
    fn task_deserializes_from_service_json() {
        let json = r#"{
            "_id": "64f1c0",
            "title": "Ship release",
            "description": "cut the tag",
            "priority": "high",
            "status": "pending",
            "dueDate": "2026-09-01T00:00:00.000Z",
            "createdAt": "2026-08-20T10:15:00Z"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "64f1c0");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some(date("2026-09-01")));
    }

    #[test]
    fn task_page_deserializes_with_pagination() {
        let json = r#"{
            "tasks": [],
            "currentPage": 2,
            "totalPages": 5,
            "totalTasks": 43
        }"#;
        let page: TaskPage = serde_json::from_str(json).unwrap();
        let pagination = page.pagination();
        assert_eq!(pagination.current_page, 2);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.total_tasks, 43);
    }

    #[test]
    fn task_input_serializes_camel_case_without_empty_due_date() {
        let input = TaskInput {
            title: "Buy milk".to_string(),
            description: String::new(),
            priority: Priority::Low,
            due_date: None,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["title"], "Buy milk");
        assert!(value.get("dueDate").is_none());

        let input = TaskInput {
            due_date: Some(date("2026-09-01")),
            ..input
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["dueDate"], "2026-09-01");
    }
}
