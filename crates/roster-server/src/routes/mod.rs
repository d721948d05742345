//! HTTP route handlers.

pub mod courses;
pub mod departments;
pub mod health;
pub mod ledger;
pub mod policy;
pub mod portal;
pub mod prerequisites;
pub mod students;
