//! Cooperative dispatch loop
//!
//! The dispatcher owns everything the steady-state loop touches: the last
//! tick reading, the task table and the context the task actions act on.
//! Nothing in a pass can fail and nothing in a pass blocks.

use super::delta::compute_delta;
use super::periodic::PeriodicTask;
use crate::config::ConfigError;
use crate::traits::{TickCount, TickSource};

/// Task action, invoked synchronously on the dispatch loop
pub type Action<C> = fn(&mut C);

/// A named periodic task bound to its action
pub struct Task<T, C> {
    /// Name for diagnostics
    name: &'static str,
    /// Time bank
    timer: PeriodicTask<T>,
    /// Effect run on every firing
    action: Action<C>,
    /// Lifetime firing count (saturating)
    fired: u32,
}

impl<T: TickCount, C> Task<T, C> {
    /// Register a task
    ///
    /// Fails with [`ConfigError::ZeroPeriod`] for a zero period.
    pub fn new(name: &'static str, period: T, action: Action<C>) -> Result<Self, ConfigError> {
        Ok(Self {
            name,
            timer: PeriodicTask::new(period)?,
            action,
            fired: 0,
        })
    }

    /// Task name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Firing period
    pub fn period(&self) -> T {
        self.timer.period()
    }

    /// Time banked since the last firing
    pub fn accumulated(&self) -> T {
        self.timer.accumulated()
    }

    /// Number of times the action has run
    pub fn fired(&self) -> u32 {
        self.fired
    }

    fn advance(&mut self, delta: T, context: &mut C) -> u32 {
        let action = self.action;
        let fired = self.timer.advance(delta, || action(context));
        self.fired = self.fired.saturating_add(fired);
        fired
    }
}

impl<T: TickCount, C> core::fmt::Debug for Task<T, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("timer", &self.timer)
            .field("fired", &self.fired)
            .finish()
    }
}

/// Fixed set of periodic tasks fed from one tick counter
///
/// Tasks run in array order on every pass.
pub struct Dispatcher<T, C, const N: usize> {
    /// Most recent tick reading
    previous: T,
    /// State shared with the task actions
    context: C,
    /// Registered tasks
    tasks: [Task<T, C>; N],
}

impl<T: TickCount, C, const N: usize> Dispatcher<T, C, N> {
    /// Create a dispatcher whose first delta is measured from `first_tick`
    pub fn new(first_tick: T, context: C, tasks: [Task<T, C>; N]) -> Self {
        Self {
            previous: first_tick,
            context,
            tasks,
        }
    }

    /// Create a dispatcher seeded with the source's current reading
    pub fn start<S>(source: &S, context: C, tasks: [Task<T, C>; N]) -> Self
    where
        S: TickSource<Count = T>,
    {
        Self::new(source.now(), context, tasks)
    }

    /// Run one dispatch pass for the reading `now`
    ///
    /// Returns the delta fed to every task. An unchanged reading feeds a
    /// zero delta and leaves the stored reading as it was.
    pub fn pass(&mut self, now: T) -> T {
        let delta = if now == self.previous {
            T::ZERO
        } else {
            let delta = compute_delta(self.previous, now);
            self.previous = now;
            delta
        };

        for task in self.tasks.iter_mut() {
            task.advance(delta, &mut self.context);
        }

        delta
    }

    /// Read the source and run one dispatch pass
    pub fn poll<S>(&mut self, source: &S) -> T
    where
        S: TickSource<Count = T>,
    {
        self.pass(source.now())
    }

    /// Poll the source forever
    ///
    /// Busy-polls with no sleep or yield; the tick interrupt is the only
    /// other agent in the system.
    pub fn run<S>(mut self, source: &S) -> !
    where
        S: TickSource<Count = T>,
    {
        loop {
            self.poll(source);
        }
    }

    /// Most recent tick reading
    pub fn previous_tick(&self) -> T {
        self.previous
    }

    /// Registered tasks in dispatch order
    pub fn tasks(&self) -> &[Task<T, C>] {
        &self.tasks
    }

    /// Shared task context
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shared task context, mutably
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }
}
