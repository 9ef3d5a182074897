//! Petarcade slot mini-game engine.
//!
//! The engine is UI-agnostic: it owns the spin lifecycle (staggered per-slot
//! animations, triple evaluation, sequential stat settlement) and surfaces
//! progress as [`SpinEvent`]s a renderer consumes. Network access goes
//! through the [`StatBackend`] seam so the engine itself never touches HTTP.
//!
//! ## One spin, end to end (example)
//! ```rust,ignore
//! use petarcade_engine::{Scene, SpinConfig};
//! use petarcade_types::PetSession;
//! use std::sync::Arc;
//!
//! # async fn example(backend: Arc<impl petarcade_engine::StatBackend + 'static>) {
//! let session = PetSession {
//!     pet_id: 7,
//!     pet_image_url: "/pets/image-proxy/sprite.png".into(),
//!     csrf_token: "tok".into(),
//! };
//! let mut scene = Scene::new(session, backend, SpinConfig::default()).unwrap();
//! let mut events = scene.spin().unwrap();
//! while let Some(event) = events.next().await {
//!     // render ticks, settles, messages...
//! }
//! let handoff = scene.finish();
//! # }
//! ```

pub mod backend;
pub mod evaluate;
pub mod scene;
pub mod spin;

pub use backend::{BackendError, StatBackend};
pub use evaluate::evaluate;
pub use scene::{Scene, SpinError, SpinEvent, SpinEvents};
pub use spin::{SpinConfig, SpinSchedule};
