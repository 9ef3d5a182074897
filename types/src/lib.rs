//! Common types for the petarcade slot mini-game.
//!
//! This crate holds the shared vocabulary used by the engine and the backend
//! client: reel symbols, pet stats, spin results, bonus outcomes, and the
//! session state carried in and out of the scene. It performs no I/O.

pub mod api;
pub mod session;
pub mod slots;

pub use api::{DecodeError, StatUpdate};
pub use session::{PetSession, SceneHandoff};
pub use slots::{Bonus, InvalidSymbol, SpinResult, Stat, Symbol, SLOT_COUNT, SYMBOL_COUNT};
