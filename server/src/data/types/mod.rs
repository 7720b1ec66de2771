//! Shared data types
//!
//! Row types read from and written to SQLite.

mod task;

pub use task::{NewTask, TaskLabel, TaskPriority, TaskRow, TaskStatus, TaskUpdate};
