pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod store;
pub mod tui;
pub mod utils;

pub use api::{ApiClient, ApiError, TaskService};
pub use config::Config;
pub use models::{Filters, Pagination, Stats, Task, TaskInput};
pub use store::TaskStore;
pub use utils::Profile;
