use ratatui::widgets::ListState;
use std::time::{Duration, Instant};

use crate::api::TaskService;
use crate::config::Config;
use crate::models::{
    FilterPatch, Filters, Priority, PriorityFilter, SortBy, SortOrder, StatusFilter, Task,
    TaskInput,
};
use crate::store::TaskStore;
use crate::tui::widgets::input::Input;
use crate::utils::parse_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Create,
    Search,
    Filter,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Priority,
    DueDate,
}

pub const PRIORITY_OPTIONS: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

/// Sort choices offered by the filter modal, mirroring the service's
/// supported sort keys.
pub const SORT_OPTIONS: [(SortBy, SortOrder, &str); 5] = [
    (SortBy::CreatedAt, SortOrder::Desc, "Newest first"),
    (SortBy::CreatedAt, SortOrder::Asc, "Oldest first"),
    (SortBy::DueDate, SortOrder::Asc, "Due date (soonest)"),
    (SortBy::DueDate, SortOrder::Desc, "Due date (latest)"),
    (SortBy::Priority, SortOrder::Desc, "Priority (high to low)"),
];

pub const STATUS_FILTER_OPTIONS: [StatusFilter; 3] = [
    StatusFilter::All,
    StatusFilter::Pending,
    StatusFilter::Completed,
];

pub const PRIORITY_FILTER_OPTIONS: [PriorityFilter; 4] = [
    PriorityFilter::All,
    PriorityFilter::Low,
    PriorityFilter::Medium,
    PriorityFilter::High,
];

/// Draft state for the create/edit form. Entirely local to the view; the
/// store never sees a draft, only the submitted `TaskInput`.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: FormField,
    pub title: Input,
    pub description: Input,
    pub priority_index: usize,
    pub due_date: Input,
    pub editing_task_id: Option<String>, // None for new tasks
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        Self {
            current_field: FormField::Title,
            title: Input::new(),
            description: Input::new(),
            priority_index: 1, // medium
            due_date: Input::new(),
            editing_task_id: None,
            error: None,
        }
    }

    /// Pre-fill from an existing task for editing. Due dates are already
    /// date-granular in the model, so they round-trip as YYYY-MM-DD.
    pub fn from_task(task: &Task) -> Self {
        Self {
            current_field: FormField::Title,
            title: Input::with_value(task.title.clone()),
            description: Input::with_value(task.description.clone().unwrap_or_default()),
            priority_index: PRIORITY_OPTIONS
                .iter()
                .position(|p| *p == task.priority)
                .unwrap_or(1),
            due_date: Input::with_value(
                task.due_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
            editing_task_id: Some(task.id.clone()),
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Priority,
            FormField::Priority => FormField::DueDate,
            FormField::DueDate => FormField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::DueDate,
            FormField::Description => FormField::Title,
            FormField::Priority => FormField::Description,
            FormField::DueDate => FormField::Priority,
        };
    }

    pub fn cycle_priority(&mut self, forward: bool) {
        let len = PRIORITY_OPTIONS.len();
        self.priority_index = if forward {
            (self.priority_index + 1) % len
        } else {
            (self.priority_index + len - 1) % len
        };
    }

    /// The text input for the current field, if it is a text field.
    pub fn current_input(&mut self) -> Option<&mut Input> {
        match self.current_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Priority => None,
        }
    }

    pub fn priority(&self) -> Priority {
        PRIORITY_OPTIONS[self.priority_index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Status,
    Priority,
    Sort,
    Apply,
    Clear,
    Cancel,
}

/// Draft state for the filter modal. Applied as one `FilterPatch` so a
/// cancelled modal changes nothing.
#[derive(Debug, Clone)]
pub struct FilterForm {
    pub current_field: FilterField,
    pub status_index: usize,
    pub priority_index: usize,
    pub sort_index: usize,
}

impl FilterForm {
    pub fn from_filters(filters: &Filters) -> Self {
        Self {
            current_field: FilterField::Status,
            status_index: STATUS_FILTER_OPTIONS
                .iter()
                .position(|s| *s == filters.status)
                .unwrap_or(0),
            priority_index: PRIORITY_FILTER_OPTIONS
                .iter()
                .position(|p| *p == filters.priority)
                .unwrap_or(0),
            sort_index: SORT_OPTIONS
                .iter()
                .position(|(by, order, _)| *by == filters.sort_by && *order == filters.sort_order)
                .unwrap_or(0),
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FilterField::Status => FilterField::Priority,
            FilterField::Priority => FilterField::Sort,
            FilterField::Sort => FilterField::Apply,
            FilterField::Apply => FilterField::Clear,
            FilterField::Clear => FilterField::Cancel,
            FilterField::Cancel => FilterField::Status,
        };
    }

    pub fn prev_field(&mut self) {
        self.current_field = match self.current_field {
            FilterField::Status => FilterField::Cancel,
            FilterField::Priority => FilterField::Status,
            FilterField::Sort => FilterField::Priority,
            FilterField::Apply => FilterField::Sort,
            FilterField::Clear => FilterField::Apply,
            FilterField::Cancel => FilterField::Clear,
        };
    }

    pub fn cycle_current(&mut self, forward: bool) {
        fn step(index: usize, len: usize, forward: bool) -> usize {
            if forward {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            }
        }
        match self.current_field {
            FilterField::Status => {
                self.status_index = step(self.status_index, STATUS_FILTER_OPTIONS.len(), forward);
            }
            FilterField::Priority => {
                self.priority_index =
                    step(self.priority_index, PRIORITY_FILTER_OPTIONS.len(), forward);
            }
            FilterField::Sort => {
                self.sort_index = step(self.sort_index, SORT_OPTIONS.len(), forward);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    /// Task awaiting delete confirmation; Some keeps the modal open.
    pub delete_confirmation: Option<Task>,
    /// 0 = Cancel, 1 = Delete. Cancel is the default selection.
    pub delete_modal_selection: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

pub struct App<S: TaskService> {
    pub config: Config,
    pub store: TaskStore<S>,

    pub ui: UiState,
    pub form: Option<TaskForm>,
    pub filter_form: Option<FilterForm>,
    pub modals: ModalState,
    pub status: StatusState,
}

impl<S: TaskService> App<S> {
    pub fn new(config: Config, service: S) -> Self {
        let filters = Filters {
            limit: config.page_limit,
            ..Filters::default()
        };
        let mut app = Self {
            config,
            store: TaskStore::new(service, filters),
            ui: UiState::default(),
            form: None,
            filter_form: None,
            modals: ModalState::default(),
            status: StatusState::default(),
        };
        // Initial load; errors land in store.error and render inline
        app.store.fetch_tasks();
        app.store.fetch_stats();
        app.sync_selection();
        app
    }

    // ----- selection -----

    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks.get(self.ui.selected_index)
    }

    pub fn move_selection_up(&mut self) {
        if self.ui.selected_index > 0 {
            self.ui.selected_index -= 1;
        }
        self.sync_selection();
    }

    pub fn move_selection_down(&mut self) {
        if self.ui.selected_index + 1 < self.store.tasks.len() {
            self.ui.selected_index += 1;
        }
        self.sync_selection();
    }

    /// Clamp the selection into the current list and mirror it into the
    /// ratatui list state. Call after anything that changes the task list.
    pub fn sync_selection(&mut self) {
        if self.store.tasks.is_empty() {
            self.ui.selected_index = 0;
            self.ui.list_state.select(None);
        } else {
            if self.ui.selected_index >= self.store.tasks.len() {
                self.ui.selected_index = self.store.tasks.len() - 1;
            }
            self.ui.list_state.select(Some(self.ui.selected_index));
        }
    }

    // ----- task form -----

    pub fn open_create_form(&mut self) {
        self.form = Some(TaskForm::new());
        self.ui.mode = Mode::Create;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(task) = self.selected_task() {
            self.form = Some(TaskForm::from_task(task));
            self.ui.mode = Mode::Create;
        }
    }

    /// Discard the draft entirely; nothing of a cancelled form survives.
    pub fn cancel_form(&mut self) {
        self.form = None;
        self.ui.mode = Mode::View;
    }

    /// Validate and submit the draft. An empty trimmed title never reaches
    /// the store. On failure the form stays open with the entered values
    /// intact and the message shown verbatim.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        form.error = None;

        let title = form.title.value().trim().to_string();
        if title.is_empty() {
            form.error = Some("Task title is required".to_string());
            return;
        }

        let due = form.due_date.value().trim();
        let due_date = if due.is_empty() {
            None
        } else {
            match parse_date(due) {
                Ok(date) => Some(date),
                Err(_) => {
                    form.error = Some("Invalid due date (use YYYY-MM-DD)".to_string());
                    return;
                }
            }
        };

        let input = TaskInput {
            title,
            description: form.description.value().trim().to_string(),
            priority: form.priority(),
            due_date,
        };

        let editing_id = form.editing_task_id.clone();
        let result = match &editing_id {
            Some(id) => self.store.update(id, &input),
            None => self.store.create(&input),
        };

        match result {
            Ok(()) => {
                self.form = None;
                self.ui.mode = Mode::View;
                self.sync_selection();
                let verb = if editing_id.is_some() {
                    "updated"
                } else {
                    "created"
                };
                self.set_status_message(format!("Task {}", verb));
            }
            Err(e) => {
                form.error = Some(e.to_string());
            }
        }
    }

    // ----- delete modal -----

    pub fn open_delete_modal(&mut self) {
        if let Some(task) = self.selected_task().cloned() {
            self.modals.delete_confirmation = Some(task);
            self.modals.delete_modal_selection = 0; // Cancel preselected
        }
    }

    /// Close without any service call; the task stays exactly as it was.
    pub fn cancel_delete(&mut self) {
        self.modals.delete_confirmation = None;
    }

    /// Delete the candidate task. The modal closes only on success; on
    /// failure it stays open so the user can retry or cancel.
    pub fn confirm_delete(&mut self) {
        let Some(task) = self.modals.delete_confirmation.clone() else {
            return;
        };
        match self.store.delete(&task.id) {
            Ok(()) => {
                self.modals.delete_confirmation = None;
                self.sync_selection();
                self.set_status_message("Task deleted".to_string());
            }
            Err(e) => {
                self.set_status_message(e.to_string());
            }
        }
    }

    // ----- list actions -----

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        if let Err(e) = self.store.toggle(&id) {
            self.set_status_message(e.to_string());
        }
    }

    pub fn refresh(&mut self) {
        self.store.fetch_tasks();
        self.store.fetch_stats();
        self.sync_selection();
    }

    // ----- search -----

    pub fn enter_search(&mut self) {
        self.ui.mode = Mode::Search;
    }

    pub fn exit_search(&mut self) {
        self.ui.mode = Mode::View;
    }

    /// Each keystroke is a filter change: page resets to 1 and the list is
    /// re-fetched immediately.
    pub fn push_search_char(&mut self, c: char) {
        let mut search = self.store.filters.search.clone();
        search.push(c);
        self.apply_search(search);
    }

    pub fn pop_search_char(&mut self) {
        let mut search = self.store.filters.search.clone();
        search.pop();
        self.apply_search(search);
    }

    fn apply_search(&mut self, search: String) {
        self.store.update_filters(FilterPatch {
            search: Some(search),
            ..FilterPatch::default()
        });
        self.store.fetch_tasks();
        self.sync_selection();
    }

    // ----- filter modal -----

    pub fn open_filter_form(&mut self) {
        self.filter_form = Some(FilterForm::from_filters(&self.store.filters));
        self.ui.mode = Mode::Filter;
    }

    pub fn cancel_filter_form(&mut self) {
        self.filter_form = None;
        self.ui.mode = Mode::View;
    }

    pub fn apply_filter_form(&mut self) {
        let Some(form) = self.filter_form.take() else {
            return;
        };
        let (sort_by, sort_order, _) = SORT_OPTIONS[form.sort_index];
        self.store.update_filters(FilterPatch {
            status: Some(STATUS_FILTER_OPTIONS[form.status_index]),
            priority: Some(PRIORITY_FILTER_OPTIONS[form.priority_index]),
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            ..FilterPatch::default()
        });
        self.ui.mode = Mode::View;
        self.store.fetch_tasks();
        self.sync_selection();
    }

    /// Back to the default view: no search, no filters, newest first.
    pub fn clear_filters(&mut self) {
        self.filter_form = None;
        self.store.update_filters(FilterPatch {
            search: Some(String::new()),
            status: Some(StatusFilter::All),
            priority: Some(PriorityFilter::All),
            sort_by: Some(SortBy::CreatedAt),
            sort_order: Some(SortOrder::Desc),
        });
        self.ui.mode = Mode::View;
        self.store.fetch_tasks();
        self.sync_selection();
    }

    // ----- pagination -----

    pub fn pagination_visible(&self) -> bool {
        self.store.pagination.total_pages > 1
    }

    pub fn next_page(&mut self) {
        let current = self.store.pagination.current_page;
        if current < self.store.pagination.total_pages {
            self.go_to_page(current + 1);
        }
    }

    pub fn prev_page(&mut self) {
        let current = self.store.pagination.current_page;
        if current > 1 {
            self.go_to_page(current - 1);
        }
    }

    fn go_to_page(&mut self, page: u32) {
        self.store.set_page(page);
        self.store.fetch_tasks();
        self.ui.selected_index = 0;
        self.sync_selection();
    }

    // ----- status bar -----

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn check_status_message_timeout(&mut self) {
        if let Some(time) = self.status.message_time {
            if time.elapsed() >= STATUS_MESSAGE_TIMEOUT {
                self.status.message = None;
                self.status.message_time = None;
            }
        }
    }

    /// One-line summary of the active criteria for the filters box.
    pub fn filter_summary(&self) -> String {
        let filters = &self.store.filters;
        let sort_label = SORT_OPTIONS
            .iter()
            .find(|(by, order, _)| *by == filters.sort_by && *order == filters.sort_order)
            .map(|(_, _, label)| *label)
            .unwrap_or("Newest first");

        let mut parts = Vec::new();
        if !filters.search.is_empty() {
            parts.push(format!("search: \"{}\"", filters.search));
        }
        if filters.status != StatusFilter::All {
            parts.push(format!("status: {}", filters.status.label()));
        }
        if filters.priority != PriorityFilter::All {
            parts.push(format!("priority: {}", filters.priority.label()));
        }
        parts.push(format!("sort: {}", sort_label));
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockTaskService};
    use crate::models::{Status, TaskPage};
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

    fn single_page(tasks: Vec<Task>) -> TaskPage {
        let total = tasks.len() as u64;
        TaskPage {
            tasks,
            current_page: 1,
            total_pages: 1,
            total_tasks: total,
        }
    }

    /// Mock preloaded with the initial fetch the App constructor performs.
    fn service_with_initial(tasks: Vec<Task>) -> MockTaskService {
        let mut service = MockTaskService::new();
        let initial = single_page(tasks);
        service.expect_list().returning(move |_| Ok(initial.clone()));
        service
            .expect_stats()
            .returning(|| Ok(crate::models::Stats::default()));
        service
    }

    fn app_with(service: MockTaskService) -> App<MockTaskService> {
        App::new(Config::default(), service)
    }

    fn type_into(input: &mut Input, text: &str) {
        for c in text.chars() {
            input.insert(c);
        }
    }

    #[test]
    fn empty_title_never_reaches_the_service() {
        let mut service = service_with_initial(vec![]);
        service.expect_create().times(0);
        service.expect_update().times(0);
        let mut app = app_with(service);

        app.open_create_form();
        type_into(&mut app.form.as_mut().unwrap().title, "   ");
        app.submit_form();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Task title is required"));
        assert_eq!(app.ui.mode, Mode::Create);
    }

    #[test]
    fn failed_create_keeps_form_open_with_values_and_verbatim_error() {
        let mut service = service_with_initial(vec![]);
        service
            .expect_create()
            .returning(|_| Err(ApiError::Rejected("Title already exists".to_string())));
        let mut app = app_with(service);

        app.open_create_form();
        {
            let form = app.form.as_mut().unwrap();
            type_into(&mut form.title, "Buy milk");
            type_into(&mut form.description, "two litres");
        }
        app.submit_form();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.error.as_deref(), Some("Title already exists"));
        assert_eq!(form.title.value(), "Buy milk");
        assert_eq!(form.description.value(), "two litres");
        assert_eq!(app.ui.mode, Mode::Create);
    }

    #[test]
    fn successful_create_closes_and_clears_the_form() {
        let mut service = service_with_initial(vec![]);
        service
            .expect_create()
            .returning(|input| Ok(task("new", &input.title)));
        let mut app = app_with(service);

        app.open_create_form();
        type_into(&mut app.form.as_mut().unwrap().title, "Ship release");
        app.submit_form();

        assert!(app.form.is_none());
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.store.tasks[0].title, "Ship release");
    }

    #[test]
    fn edit_form_is_prefilled_from_selected_task() {
        let mut seeded = task("a", "Water plants");
        seeded.priority = Priority::High;
        seeded.due_date = Some(parse_date("2026-09-01").unwrap());
        let service = service_with_initial(vec![seeded]);
        let mut app = app_with(service);

        app.open_edit_form();

        let form = app.form.as_ref().unwrap();
        assert_eq!(form.title.value(), "Water plants");
        assert_eq!(form.due_date.value(), "2026-09-01");
        assert_eq!(form.priority(), Priority::High);
        assert_eq!(form.editing_task_id.as_deref(), Some("a"));
    }

    #[test]
    fn cancelled_delete_modal_makes_no_call_and_keeps_the_task() {
        let mut service = service_with_initial(vec![task("a", "Buy milk")]);
        service.expect_delete().times(0);
        let mut app = app_with(service);

        app.open_delete_modal();
        assert_eq!(
            app.modals
                .delete_confirmation
                .as_ref()
                .map(|t| t.title.as_str()),
            Some("Buy milk")
        );

        app.cancel_delete();

        assert!(app.modals.delete_confirmation.is_none());
        assert_eq!(app.store.tasks.len(), 1);
    }

    #[test]
    fn failed_delete_keeps_the_modal_open() {
        let mut service = service_with_initial(vec![task("a", "Buy milk")]);
        service
            .expect_delete()
            .returning(|_| Err(ApiError::Rejected("No such task".to_string())));
        let mut app = app_with(service);

        app.open_delete_modal();
        app.confirm_delete();

        assert!(app.modals.delete_confirmation.is_some());
        assert_eq!(app.store.tasks.len(), 1);
        assert_eq!(app.status.message.as_deref(), Some("No such task"));
    }

    #[test]
    fn pagination_hidden_on_single_page() {
        let service = service_with_initial(vec![
            task("a", "one"),
            task("b", "two"),
            task("c", "three"),
        ]);
        let app = app_with(service);

        assert_eq!(app.store.pagination.total_pages, 1);
        assert!(!app.pagination_visible());
    }

    #[test]
    fn search_keystrokes_update_filters_and_refetch() {
        let mut service = MockTaskService::new();
        // Initial fetch plus one per keystroke
        service
            .expect_list()
            .times(3)
            .returning(|_| Ok(single_page(vec![])));
        service
            .expect_stats()
            .returning(|| Ok(crate::models::Stats::default()));
        let mut app = app_with(service);

        app.enter_search();
        app.store.set_page(4);
        app.push_search_char('m');
        assert_eq!(app.store.filters.search, "m");
        assert_eq!(app.store.filters.page, 1);

        app.push_search_char('i');
        assert_eq!(app.store.filters.search, "mi");
    }

    #[test]
    fn filter_modal_apply_translates_indices_into_one_patch() {
        let mut service = MockTaskService::new();
        service
            .expect_list()
            .times(2)
            .returning(|_| Ok(single_page(vec![])));
        service
            .expect_stats()
            .returning(|| Ok(crate::models::Stats::default()));
        let mut app = app_with(service);

        app.open_filter_form();
        {
            let form = app.filter_form.as_mut().unwrap();
            form.status_index = 1; // pending
            form.priority_index = 3; // high
            form.sort_index = 2; // due date soonest
        }
        app.apply_filter_form();

        assert_eq!(app.store.filters.status, StatusFilter::Pending);
        assert_eq!(app.store.filters.priority, PriorityFilter::High);
        assert_eq!(app.store.filters.sort_by, SortBy::DueDate);
        assert_eq!(app.store.filters.sort_order, SortOrder::Asc);
        assert_eq!(app.ui.mode, Mode::View);
        assert!(app.filter_form.is_none());
    }

    #[test]
    fn toggle_failure_surfaces_in_status_bar() {
        let mut service = service_with_initial(vec![task("a", "Buy milk")]);
        service
            .expect_toggle()
            .returning(|_| Err(ApiError::Rejected("Task is locked".to_string())));
        let mut app = app_with(service);

        app.toggle_selected();

        assert_eq!(app.status.message.as_deref(), Some("Task is locked"));
        assert_eq!(app.store.tasks[0].status, Status::Pending);
    }

    #[test]
    fn filter_summary_lists_only_active_criteria() {
        let service = service_with_initial(vec![]);
        let mut app = app_with(service);
        assert_eq!(app.filter_summary(), "sort: Newest first");

        app.store.filters.search = "milk".to_string();
        app.store.filters.status = StatusFilter::Pending;
        assert_eq!(
            app.filter_summary(),
            "search: \"milk\" | status: pending | sort: Newest first"
        );
    }
}
