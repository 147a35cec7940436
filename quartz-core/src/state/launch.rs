//! Bring-up sequencing
//!
//! Records which stages have passed and decides, once bring-up returns,
//! whether control goes to the dispatch loop or to the halt state.

use super::events::BootEvent;
use super::machine::{BootError, BootState};

/// Progress through the startup state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootSequence {
    state: BootState,
}

impl Default for BootSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl BootSequence {
    /// Start from reset
    pub const fn new() -> Self {
        Self {
            state: BootState::Reset,
        }
    }

    /// Current state
    pub fn state(&self) -> BootState {
        self.state
    }

    /// Record the outcome of one stage
    ///
    /// Applies `event` on success and `Failed` on error, then hands the
    /// result back so stages chain with `?`.
    pub fn advance<T, E>(&mut self, event: BootEvent, result: Result<T, E>) -> Result<T, E>
    where
        E: Copy + Into<BootError>,
    {
        match result {
            Ok(value) => {
                self.state = self.state.transition(event);
                Ok(value)
            }
            Err(e) => {
                self.fail(e.into());
                Err(e)
            }
        }
    }

    /// Record a failure
    pub fn fail(&mut self, error: BootError) {
        self.state = self.state.transition(BootEvent::Failed(error));
    }

    /// Move to `Running` if every stage has passed
    fn enter_loop(&mut self) -> Result<(), BootError> {
        if !self.state.loop_allowed() {
            self.fail(BootError::Incomplete);
            return Err(self.state.error().unwrap_or(BootError::Incomplete));
        }
        self.state = self.state.transition(BootEvent::LoopEntered);
        Ok(())
    }
}

/// Run bring-up, then either the dispatch loop or the halt state
///
/// `run` is only called when `bring_up` succeeded and left the sequence in
/// a state that allows the loop. Otherwise `halt` receives the failure and
/// `run` is never called.
pub fn launch<S, E, R>(
    boot: &mut BootSequence,
    bring_up: impl FnOnce(&mut BootSequence) -> Result<S, E>,
    run: impl FnOnce(S) -> R,
    halt: impl FnOnce(E) -> R,
) -> R
where
    E: From<BootError>,
{
    match bring_up(boot) {
        Ok(system) => match boot.enter_loop() {
            Ok(()) => run(system),
            Err(e) => halt(E::from(e)),
        },
        Err(e) => {
            if !boot.state().is_halted() {
                boot.fail(BootError::Incomplete);
            }
            halt(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    fn complete(boot: &mut BootSequence) -> Result<u32, BootError> {
        boot.advance(BootEvent::ClocksConfigured, Ok::<_, BootError>(()))?;
        boot.advance(BootEvent::TickStarted, Ok::<_, BootError>(()))?;
        boot.advance(BootEvent::PeripheralsReady, Ok::<_, BootError>(()))?;
        boot.advance(BootEvent::TasksRegistered, Ok::<_, BootError>(42))
    }

    #[test]
    fn test_advance_records_progress() {
        let mut boot = BootSequence::new();
        let clocks = boot.advance(BootEvent::ClocksConfigured, Ok::<_, BootError>(72));
        assert_eq!(clocks, Ok(72));
        assert_eq!(boot.state(), BootState::ClocksConfigured);
    }

    #[test]
    fn test_advance_records_failure() {
        let mut boot = BootSequence::new();
        let result = boot.advance(
            BootEvent::ClocksConfigured,
            Err::<(), _>(ConfigError::ZeroPeriod),
        );
        assert_eq!(result, Err(ConfigError::ZeroPeriod));
        assert_eq!(
            boot.state(),
            BootState::Halted(BootError::Config(ConfigError::ZeroPeriod))
        );
    }

    #[test]
    fn test_launch_runs_loop() {
        let mut boot = BootSequence::new();
        let outcome = launch(&mut boot, complete, |value| Ok(value), Err::<u32, BootError>);
        assert_eq!(outcome, Ok(42));
        assert_eq!(boot.state(), BootState::Running);
    }

    #[test]
    fn test_init_failure_halts_without_running() {
        let mut boot = BootSequence::new();
        let mut loop_entered = false;

        let outcome = launch(
            &mut boot,
            |boot| {
                boot.advance(BootEvent::ClocksConfigured, Ok::<_, BootError>(()))?;
                boot.advance(BootEvent::TickStarted, Err::<(), _>(BootError::TickSource))
            },
            |()| {
                loop_entered = true;
                None
            },
            Some,
        );

        assert!(!loop_entered);
        assert_eq!(outcome, Some(BootError::TickSource));
        assert_eq!(boot.state(), BootState::Halted(BootError::TickSource));
    }

    #[test]
    fn test_skipped_stage_halts() {
        let mut boot = BootSequence::new();
        let mut loop_entered = false;

        let outcome = launch(
            &mut boot,
            |boot| boot.advance(BootEvent::ClocksConfigured, Ok::<_, BootError>(())),
            |()| {
                loop_entered = true;
                None
            },
            Some,
        );

        assert!(!loop_entered);
        assert_eq!(outcome, Some(BootError::Incomplete));
        assert!(boot.state().is_halted());
    }

    #[test]
    fn test_unrecorded_failure_still_halts() {
        let mut boot = BootSequence::new();
        let outcome = launch(
            &mut boot,
            |_| Err::<(), _>(BootError::Uart),
            |()| None,
            Some,
        );

        assert_eq!(outcome, Some(BootError::Uart));
        assert_eq!(boot.state(), BootState::Halted(BootError::Incomplete));
    }
}
