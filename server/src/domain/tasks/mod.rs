//! Task domain operations

mod seed;

pub use seed::generate_tasks;
