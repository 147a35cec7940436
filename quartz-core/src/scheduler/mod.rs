//! Cooperative periodic scheduler
//!
//! Turns successive readings of a wrapping tick counter into elapsed time
//! and fires each registered task once per elapsed period.

pub mod delta;
pub mod dispatch;
pub mod periodic;

pub use delta::compute_delta;
pub use dispatch::{Action, Dispatcher, Task};
pub use periodic::PeriodicTask;
