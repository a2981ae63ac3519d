//! Cancellable per-tick tasks.
//!
//! Each task category (stamina, stand-up, run shake) owns exactly one
//! [`TaskSlot`]. A slot holds at most one live instance; [`TaskSlot::start`]
//! cancels the previous instance before installing the new one, so two
//! instances of a category can never coexist.
//!
//! A freshly started task is *armed* on the next [`TaskSlot::advance`] call and
//! runs its first slice of work on the call after that. The controller advances
//! slots after evaluating input, so a task started during tick N first runs on
//! tick N + 1.

use tracing::debug;

/// Outcome of running one slice of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep the task alive for the next tick.
    Continue,
    /// The task reached its end condition and leaves the slot.
    Done,
}

#[derive(Debug, Clone)]
struct Scheduled<T> {
    task: T,
    armed: bool,
}

/// Holder for the single live instance of one task category.
#[derive(Debug, Clone)]
pub struct TaskSlot<T> {
    label: &'static str,
    current: Option<Scheduled<T>>,
    started: u64,
}

impl<T> TaskSlot<T> {
    /// Creates an empty slot. `label` names the category in log output.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            current: None,
            started: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// The live task, if any.
    pub fn get(&self) -> Option<&T> {
        self.current.as_ref().map(|scheduled| &scheduled.task)
    }

    /// Number of instances ever started in this slot.
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Installs `task`, cancelling any live instance first.
    ///
    /// Returns the cancelled instance.
    pub fn start(&mut self, task: T) -> Option<T> {
        let cancelled = self.cancel();
        self.current = Some(Scheduled { task, armed: false });
        self.started += 1;
        debug!(task = self.label, generation = self.started, "task started");
        cancelled
    }

    /// Starts a task built by `make` unless the live one satisfies `keep`.
    ///
    /// Returns `true` when a new instance was started.
    pub fn ensure(&mut self, keep: impl FnOnce(&T) -> bool, make: impl FnOnce() -> T) -> bool {
        if self.get().is_some_and(keep) {
            return false;
        }
        self.start(make());
        true
    }

    /// Starts a task built by `make` only when the slot is empty.
    pub fn start_if_idle(&mut self, make: impl FnOnce() -> T) -> bool {
        self.ensure(|_| true, make)
    }

    /// Cancels the live instance, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        let cancelled = self.current.take().map(|scheduled| scheduled.task);
        if cancelled.is_some() {
            debug!(task = self.label, "task cancelled");
        }
        cancelled
    }

    /// Runs one slice of the live task through `step`.
    ///
    /// A task started since the previous call is only armed. Returns `true`
    /// when the task finished during this call and the slot is now empty.
    pub fn advance(&mut self, step: impl FnOnce(&mut T) -> Step) -> bool {
        let Some(scheduled) = self.current.as_mut() else {
            return false;
        };
        if !scheduled.armed {
            scheduled.armed = true;
            return false;
        }
        match step(&mut scheduled.task) {
            Step::Continue => false,
            Step::Done => {
                self.current = None;
                debug!(task = self.label, "task finished");
                true
            }
        }
    }
}
