//! Spin timing for the slot machine.
//!
//! All timing derives from a [`SpinConfig`]. Slot `i` spins for
//! `base_spin_ms + i * stagger_ms`, so reels stop left to right. Once the
//! last slot settles, evaluation waits a further `settle_ms`.
//!
//! [`SpinSchedule`] is the pure timing view: no tasks, no clock reads. The
//! async driver in [`crate::scene`] consumes it; tests can exercise it
//! deterministically.

use petarcade_types::SLOT_COUNT;

/// Spin timing configuration with durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpinConfig {
    /// Interval between symbol-randomization ticks.
    pub tick_ms: u64,
    /// Spin duration of slot 0.
    pub base_spin_ms: u64,
    /// Extra spin duration per slot index.
    pub stagger_ms: u64,
    /// Delay between the last slot settling and evaluation.
    pub settle_ms: u64,
    /// Interval of the decorative pet-sprite flip animation.
    pub flip_ms: u64,
    /// Lifetime of the transient reward message.
    pub message_ms: u64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            base_spin_ms: 1_200,
            stagger_ms: 400,
            settle_ms: 600,
            flip_ms: 150,
            message_ms: 2_500,
        }
    }
}

impl SpinConfig {
    /// Validate the configuration (all durations must be > 0).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.tick_ms == 0 {
            return Err("tick_ms must be greater than zero");
        }
        if self.base_spin_ms == 0 {
            return Err("base_spin_ms must be greater than zero");
        }
        if self.stagger_ms == 0 {
            return Err("stagger_ms must be greater than zero");
        }
        if self.settle_ms == 0 {
            return Err("settle_ms must be greater than zero");
        }
        if self.flip_ms == 0 {
            return Err("flip_ms must be greater than zero");
        }
        if self.message_ms == 0 {
            return Err("message_ms must be greater than zero");
        }
        Ok(())
    }
}

/// Pure timing view of one spin.
#[derive(Clone, Copy, Debug)]
pub struct SpinSchedule {
    config: SpinConfig,
}

impl SpinSchedule {
    /// Create a schedule over a validated configuration.
    pub fn new(config: SpinConfig) -> Self {
        Self { config }
    }

    /// The underlying configuration.
    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Spin duration for a slot: `base_spin_ms + slot * stagger_ms`.
    pub fn slot_duration_ms(&self, slot: usize) -> u64 {
        self.config
            .base_spin_ms
            .saturating_add(self.config.stagger_ms.saturating_mul(slot as u64))
    }

    /// Number of randomization ticks a slot emits before its final draw.
    pub fn ticks_for_slot(&self, slot: usize) -> u64 {
        self.slot_duration_ms(slot) / self.config.tick_ms
    }

    /// Absolute settle time of a slot for a spin started at `start_ms`.
    pub fn slot_settles_at_ms(&self, start_ms: u64, slot: usize) -> u64 {
        start_ms.saturating_add(self.slot_duration_ms(slot))
    }

    /// Whether a slot is still animating at `now_ms`.
    pub fn is_slot_spinning(&self, start_ms: u64, slot: usize, now_ms: u64) -> bool {
        now_ms < self.slot_settles_at_ms(start_ms, slot)
    }

    /// When evaluation may run: the last slot's settle time plus `settle_ms`.
    pub fn evaluation_at_ms(&self, start_ms: u64) -> u64 {
        self.slot_settles_at_ms(start_ms, SLOT_COUNT - 1)
            .saturating_add(self.config.settle_ms)
    }

    /// Total animation time from spin start to evaluation.
    pub fn total_spin_ms(&self) -> u64 {
        self.evaluation_at_ms(0)
    }
}
