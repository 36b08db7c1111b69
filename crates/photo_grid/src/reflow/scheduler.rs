use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use super::adapter::GridAdapter;
use crate::{GridError, GridOptions, LayoutEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReflowState {
    Idle,
    /// A pass will run once `deadline` is reached without further triggers.
    Pending { deadline: Instant },
}

/// Collapses bursts of invalidations (image loads, resizes) into one layout pass.
///
/// The scheduler owns no timer. Callers report triggers and poll with the
/// current time; at most one pass is pending at any moment, and every new
/// trigger pushes its deadline out by the full quiet interval.
#[derive(Debug)]
pub struct ReflowScheduler<A: GridAdapter> {
    adapter: A,
    engine: LayoutEngine,
    padding: u32,
    quiet_interval: Duration,
    state: ReflowState,
    passes: u64,
}

impl<A: GridAdapter> ReflowScheduler<A> {
    pub fn new(adapter: A, options: &GridOptions) -> Result<Self, GridError> {
        options.validate()?;

        Ok(Self {
            adapter,
            engine: LayoutEngine,
            padding: options.padding,
            quiet_interval: options.quiet_interval(),
            state: ReflowState::Idle,
            passes: 0,
        })
    }

    pub fn state(&self) -> ReflowState {
        self.state
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet_interval
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn into_adapter(self) -> A {
        self.adapter
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ReflowState::Idle => None,
            ReflowState::Pending { deadline } => Some(deadline),
        }
    }

    /// Cancels any pending pass and schedules a new one a quiet interval from `now`.
    pub fn notify_layout_invalidated(&mut self, now: Instant) {
        if let ReflowState::Pending { deadline } = self.state {
            trace!("cancelling reflow due in {:?}", deadline.saturating_duration_since(now));
        }

        self.state = ReflowState::Pending { deadline: now + self.quiet_interval };
    }

    pub fn cancel(&mut self) {
        self.state = ReflowState::Idle;
    }

    /// Runs the pending pass if its quiet interval has elapsed.
    ///
    /// Returns whether a pass ran.
    pub fn poll(&mut self, now: Instant) -> Result<bool, GridError> {
        match self.state {
            ReflowState::Pending { deadline } if now >= deadline => {
                self.state = ReflowState::Idle;
                self.arrange_now().map(|()| true)
            },
            _ => Ok(false),
        }
    }

    /// Runs the pending pass immediately, if there is one.
    pub fn flush(&mut self) -> Result<bool, GridError> {
        if self.state == ReflowState::Idle {
            return Ok(false);
        }

        self.state = ReflowState::Idle;
        self.arrange_now().map(|()| true)
    }

    /// Lays out every container the adapter reports and applies the results.
    ///
    /// A container that cannot be arranged is skipped; the first such error is
    /// returned after the others have been applied.
    pub fn arrange_now(&mut self) -> Result<(), GridError> {
        let containers = self.adapter.containers();
        let results = self.engine.arrange_containers(self.padding, &containers);
        self.passes += 1;

        let mut first_error = None;
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(layout) => self.adapter.apply(index, &layout),
                Err(err) => {
                    warn!("skipping layout of container {index}: {err}");
                    first_error.get_or_insert(err);
                },
            }
        }

        debug!("reflow pass {} arranged {} containers", self.passes, containers.len());

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
