//! API route handlers

pub mod health;
pub mod revalidate;
pub mod tasks;
