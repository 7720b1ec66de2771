//! SQLite repositories
//!
//! Types (TaskRow, etc.) should be imported from `crate::data::types`.

pub mod task;

pub use task::{
    create_task, delete_tasks, get_task, list_tasks, replace_tasks, task_counts, task_range,
    update_task,
};
