pub mod color;
pub mod confirm_delete;
pub mod filter_modal;
pub mod filters_box;
pub mod form;
pub mod header;
pub mod help;
pub mod input;
pub mod pagination;
pub mod stats;
pub mod status_bar;
pub mod task_list;
