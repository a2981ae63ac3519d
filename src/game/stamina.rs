//! Stamina resource and its drain/recovery state machine.
//!
//! The manager owns the stamina value and a single [`TaskSlot`] holding either
//! a [`StaminaTask::Decreasing`] or a [`StaminaTask::Recovering`] task. Because
//! both live in one slot, draining and recovering can never run at the same
//! time; switching from one to the other cancels the first.
//!
//! # Behavior
//!
//! - **Sprinting** (sprint held, moving, stamina above zero): drain at
//!   `decrease_rate` per second. The drain task ends itself at zero.
//! - **Resting** (sprint not held, stamina below max): recover at
//!   `recover_rate` per second. The recovery task ends itself at max.
//! - **Anything else** (sprint held while standing still, or already
//!   exhausted): no task runs.
//!
//! Display updates are only ever sent with a value inside `[0, max]`. The tick
//! that crosses a bound clamps first and then notifies.

use tracing::info;

use crate::config::StaminaConfig;
use crate::game::collaborators::StaminaDisplay;
use crate::game::task::{Step, TaskSlot};

/// Observable stamina state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaState {
    Idle,
    Decreasing,
    Recovering,
    /// Sprint is requested but the pool is empty.
    Exhausted,
}

/// Work held by the stamina slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaTask {
    Decreasing,
    Recovering,
}

/// Bound crossings reported by [`StaminaManager::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaminaEvent {
    Exhausted,
    Recovered,
}

#[derive(Debug, Clone)]
pub struct StaminaManager {
    stamina: f32,
    max: f32,
    decrease_rate: f32,
    recover_rate: f32,
    task: TaskSlot<StaminaTask>,
    sprint_requested: bool,
}

impl StaminaManager {
    pub fn new(config: &StaminaConfig) -> Self {
        Self {
            stamina: config.initial.clamp(0.0, config.max),
            max: config.max,
            decrease_rate: config.decrease_rate,
            recover_rate: config.recover_rate,
            task: TaskSlot::new("stamina"),
            sprint_requested: false,
        }
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Stamina as a fraction of max, for HUD bars.
    pub fn ratio(&self) -> f32 {
        (self.stamina / self.max).clamp(0.0, 1.0)
    }

    /// Overwrites the stamina value, clamped to `[0, max]`.
    pub fn set_stamina(&mut self, value: f32) {
        self.stamina = if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, self.max)
        };
    }

    pub fn can_sprint(&self) -> bool {
        self.stamina > 0.0
    }

    pub fn task(&self) -> &TaskSlot<StaminaTask> {
        &self.task
    }

    pub fn state(&self) -> StaminaState {
        match self.task.get() {
            Some(StaminaTask::Decreasing) => StaminaState::Decreasing,
            Some(StaminaTask::Recovering) => StaminaState::Recovering,
            None if self.sprint_requested && !self.can_sprint() => StaminaState::Exhausted,
            None => StaminaState::Idle,
        }
    }

    /// Chooses which stamina task should run for this tick.
    pub fn evaluate(&mut self, sprinting: bool, moving: bool) {
        self.sprint_requested = sprinting && moving;

        if sprinting && moving && self.can_sprint() {
            self.task.ensure(
                |task| *task == StaminaTask::Decreasing,
                || StaminaTask::Decreasing,
            );
        } else if !sprinting && self.stamina < self.max {
            self.task.ensure(
                |task| *task == StaminaTask::Recovering,
                || StaminaTask::Recovering,
            );
        } else {
            self.task.cancel();
        }
    }

    /// Runs one slice of the live stamina task.
    ///
    /// With `cheat` set, a drain task pins stamina at max instead of draining.
    /// The display is not told about pinned values.
    pub fn advance<D>(&mut self, dt: f32, cheat: bool, mut display: Option<&mut D>) -> Option<StaminaEvent>
    where
        D: StaminaDisplay + ?Sized,
    {
        let max = self.max;
        let decrease = self.decrease_rate * dt;
        let recover = self.recover_rate * dt;
        let stamina = &mut self.stamina;
        let mut event = None;

        let mut notify = |value: f32| {
            if let Some(display) = display.as_deref_mut() {
                if (0.0..=max).contains(&value) {
                    display.update_stamina(value);
                }
            }
        };

        self.task.advance(|task| match task {
            StaminaTask::Decreasing if cheat => {
                *stamina = max;
                Step::Continue
            }
            StaminaTask::Decreasing => {
                let next = *stamina - decrease;
                if next <= 0.0 {
                    *stamina = 0.0;
                    notify(0.0);
                    info!("out of stamina");
                    event = Some(StaminaEvent::Exhausted);
                    Step::Done
                } else {
                    *stamina = next;
                    notify(next);
                    Step::Continue
                }
            }
            StaminaTask::Recovering => {
                let next = *stamina + recover;
                if next >= max {
                    *stamina = max;
                    notify(max);
                    info!("stamina recovered");
                    event = Some(StaminaEvent::Recovered);
                    Step::Done
                } else {
                    *stamina = next;
                    notify(next);
                    Step::Continue
                }
            }
        });

        event
    }
}
