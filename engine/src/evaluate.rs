//! Outcome evaluation for a completed spin.
//!
//! Three-of-a-kind is the only winning shape. A stat triple pays one
//! increment of that stat, triple cherry pays every stat once, triple
//! diamond pays every stat three times. Anything else pays nothing.

use petarcade_types::{Bonus, SpinResult};

/// Evaluate a spin result.
///
/// Returns `None` when the slots do not all match, or when the result is
/// incomplete (evaluation must not run before every slot settles).
pub fn evaluate(result: &SpinResult) -> Option<Bonus> {
    result.triple().map(Bonus::for_triple)
}
