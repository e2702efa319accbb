//! API handlers.

pub mod accounts;
pub mod expenses;
pub mod health;
