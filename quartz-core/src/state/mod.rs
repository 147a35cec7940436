//! Startup state machine
//!
//! Bring-up is a fixed sequence of fallible stages. The dispatch loop may
//! only be entered once every stage has passed; any failure ends in the
//! terminal halt state.

pub mod events;
pub mod launch;
pub mod machine;

pub use events::BootEvent;
pub use launch::{launch, BootSequence};
pub use machine::{BootError, BootState};
