//! Hardware abstraction traits
//!
//! These traits define the interface between the dispatch loop and the
//! hardware that drives it.

pub mod tick;

pub use tick::{Millis, TickCount, TickSource};
