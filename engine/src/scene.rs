//! Scene driver: owns the spin lifecycle from button press to handoff.
//!
//! A [`Scene`] is entered with a [`PetSession`] and a [`StatBackend`].
//! [`Scene::spin`] starts one spin: three staggered slot tasks redraw their
//! symbol every tick, a decorative flip task animates the pet sprite for the
//! whole spin, and a driver task collects settlements, evaluates the triple
//! and settles the bonus sequentially against the backend. Progress is
//! surfaced as [`SpinEvent`]s over a bounded channel.
//!
//! Every spawned task's handle is owned by the scene and aborted when the
//! scene drops, so tearing the scene down mid-spin leaks no timers. Dropping
//! the event stream abandons the spin: the slot tasks stop, and no
//! evaluation or settlement occurs.

use crate::backend::StatBackend;
use crate::evaluate::evaluate;
use crate::spin::{SpinConfig, SpinSchedule};
use petarcade_types::{
    Bonus, PetSession, SceneHandoff, SpinResult, StatUpdate, Symbol, SLOT_COUNT, SYMBOL_COUNT,
};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Error starting a spin.
#[derive(Debug, Error)]
pub enum SpinError {
    /// A spin is already in flight; this request started nothing.
    #[error("spin already in progress")]
    AlreadySpinning,
    /// The spin configuration failed validation.
    #[error("invalid spin config: {0}")]
    InvalidConfig(&'static str),
}

/// Progress events emitted during one spin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpinEvent {
    /// A slot redrew its displayed symbol.
    SlotTick { slot: usize, symbol: Symbol },
    /// A slot stopped on its final symbol.
    SlotSettled { slot: usize, symbol: Symbol },
    /// Decorative pet-sprite flip tick.
    PetFlip { frame: u32 },
    /// Every slot settled; the final symbols in slot order.
    Completed { symbols: [Symbol; SLOT_COUNT] },
    /// The backend acknowledged one stat increment.
    StatIncremented(StatUpdate),
    /// Transient reward message shown to the player.
    Message { text: String },
    /// The reward message expired.
    MessageCleared,
    /// A stat increment failed; the rest of the batch was skipped.
    SettlementFailed { error: String },
    /// The spin lifecycle is complete; the stream closes after this.
    Finished,
}

/// Stream of events for one spin.
pub struct SpinEvents {
    receiver: mpsc::Receiver<SpinEvent>,
}

impl SpinEvents {
    /// Receive the next event, or `None` once the spin is over.
    pub async fn next(&mut self) -> Option<SpinEvent> {
        self.receiver.recv().await
    }
}

impl futures::Stream for SpinEvents {
    type Item = SpinEvent;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// The slot mini-game scene.
pub struct Scene<B> {
    session: PetSession,
    backend: Arc<B>,
    schedule: SpinSchedule,
    busy: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl<B: StatBackend + 'static> Scene<B> {
    /// Enter the scene. Rejects configurations with zero durations.
    pub fn new(session: PetSession, backend: Arc<B>, config: SpinConfig) -> Result<Self, SpinError> {
        config.validate().map_err(SpinError::InvalidConfig)?;
        Ok(Self {
            session,
            backend,
            schedule: SpinSchedule::new(config),
            busy: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
        })
    }

    /// The session this scene was entered with.
    pub fn session(&self) -> &PetSession {
        &self.session
    }

    /// Whether a spin is currently in flight.
    ///
    /// Clears once settlement completes; the reward message may still be on
    /// screen at that point.
    pub fn is_spinning(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Start one spin and return its event stream.
    ///
    /// Refused with [`SpinError::AlreadySpinning`] while a spin is in
    /// flight; the refused call starts no overlapping sequence.
    pub fn spin(&mut self) -> Result<SpinEvents, SpinError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            debug!("spin refused: already spinning");
            return Err(SpinError::AlreadySpinning);
        }
        self.tasks.retain(|task| !task.is_finished());

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (settled_tx, settled_rx) = mpsc::channel(SLOT_COUNT);

        for slot in 0..SLOT_COUNT {
            self.tasks.push(tokio::spawn(run_slot(
                self.schedule,
                slot,
                events_tx.clone(),
                settled_tx.clone(),
            )));
        }
        drop(settled_tx);

        self.tasks
            .push(tokio::spawn(run_flip(self.schedule, events_tx.clone())));

        self.tasks.push(tokio::spawn(run_spin(
            self.schedule,
            self.backend.clone(),
            self.session.pet_id,
            self.busy.clone(),
            events_tx,
            settled_rx,
        )));

        Ok(SpinEvents {
            receiver: events_rx,
        })
    }

    /// Leave the scene: abort any outstanding tasks and return the handoff.
    pub fn finish(self) -> SceneHandoff {
        SceneHandoff::from(self.session.clone())
    }
}

impl<B> Drop for Scene<B> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Uniform draw from the 5-symbol set.
fn draw_symbol() -> Symbol {
    Symbol::ALL[rand::thread_rng().gen_range(0..SYMBOL_COUNT)]
}

/// One slot's animation: randomization ticks, then the final draw.
async fn run_slot(
    schedule: SpinSchedule,
    slot: usize,
    events: mpsc::Sender<SpinEvent>,
    settled: mpsc::Sender<(usize, Symbol)>,
) {
    let tick_ms = schedule.config().tick_ms;
    let tick = Duration::from_millis(tick_ms);
    let ticks = schedule.ticks_for_slot(slot);
    for _ in 0..ticks {
        tokio::time::sleep(tick).await;
        let symbol = draw_symbol();
        if events.send(SpinEvent::SlotTick { slot, symbol }).await.is_err() {
            // Renderer gone; closing the settled channel abandons the spin.
            return;
        }
    }

    // Land the final draw exactly on the slot's scheduled duration.
    let remainder = schedule.slot_duration_ms(slot) - ticks * tick_ms;
    if remainder > 0 {
        tokio::time::sleep(Duration::from_millis(remainder)).await;
    }

    let symbol = draw_symbol();
    debug!(slot, symbol = symbol.as_str(), "slot settled");
    let _ = events.send(SpinEvent::SlotSettled { slot, symbol }).await;
    let _ = settled.send((slot, symbol)).await;
}

/// Decorative pet flip, running until the last slot settles.
async fn run_flip(schedule: SpinSchedule, events: mpsc::Sender<SpinEvent>) {
    let config = schedule.config();
    let interval = Duration::from_millis(config.flip_ms);
    let flips = schedule.slot_duration_ms(SLOT_COUNT - 1) / config.flip_ms;
    for frame in 0..flips {
        tokio::time::sleep(interval).await;
        if events
            .send(SpinEvent::PetFlip {
                frame: frame as u32,
            })
            .await
            .is_err()
        {
            return;
        }
    }
}

/// Spin driver: collect settlements, evaluate, settle, clear busy.
async fn run_spin<B: StatBackend + ?Sized>(
    schedule: SpinSchedule,
    backend: Arc<B>,
    pet_id: u64,
    busy: Arc<AtomicBool>,
    events: mpsc::Sender<SpinEvent>,
    mut settled: mpsc::Receiver<(usize, Symbol)>,
) {
    let mut result = SpinResult::new();
    while !result.is_complete() {
        match settled.recv().await {
            Some((slot, symbol)) => {
                if !result.record(slot, symbol) {
                    debug!(slot, "duplicate slot settlement ignored");
                }
            }
            None => break,
        }
    }

    if !result.is_complete() {
        debug!("spin abandoned before all slots settled");
        busy.store(false, Ordering::SeqCst);
        return;
    }

    tokio::time::sleep(Duration::from_millis(schedule.config().settle_ms)).await;

    if let Some(symbols) = result.symbols() {
        let _ = events.send(SpinEvent::Completed { symbols }).await;
    }

    match evaluate(&result) {
        None => {
            debug!("no matching triple");
            busy.store(false, Ordering::SeqCst);
            let _ = events.send(SpinEvent::Finished).await;
        }
        Some(bonus) => {
            info!(?bonus, pet_id, "matching triple");
            let fully_settled = settle(backend.as_ref(), pet_id, &bonus, &events).await;
            busy.store(false, Ordering::SeqCst);
            if fully_settled {
                let _ = events
                    .send(SpinEvent::Message {
                        text: bonus.message(),
                    })
                    .await;
                tokio::time::sleep(Duration::from_millis(schedule.config().message_ms)).await;
                let _ = events.send(SpinEvent::MessageCleared).await;
            }
            let _ = events.send(SpinEvent::Finished).await;
        }
    }
}

/// Issue the bonus increments strictly in plan order, one await at a time.
///
/// A failed call skips the rest of the batch and reports it on the event
/// stream. Returns whether every increment landed.
async fn settle<B: StatBackend + ?Sized>(
    backend: &B,
    pet_id: u64,
    bonus: &Bonus,
    events: &mpsc::Sender<SpinEvent>,
) -> bool {
    for stat in bonus.increment_plan() {
        match backend.increase_stat(stat, pet_id).await {
            Ok(update) => {
                debug!(
                    stat = stat.param(),
                    value = update.value,
                    "stat increment acknowledged"
                );
                let _ = events.send(SpinEvent::StatIncremented(update)).await;
            }
            Err(err) => {
                error!(
                    stat = stat.param(),
                    error = %err,
                    "stat increment failed; skipping rest of batch"
                );
                let _ = events
                    .send(SpinEvent::SettlementFailed {
                        error: err.to_string(),
                    })
                    .await;
                return false;
            }
        }
    }
    true
}
