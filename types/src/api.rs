//! Backend response decoding.
//!
//! The increment endpoints answer with the updated value under the stat's
//! own key, e.g. `{"energy": 42, "message": null, "current_image": "..."}`.
//! The `message` and `current_image` fields appear when the increment
//! triggered an evolution.

use crate::slots::Stat;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Error decoding a stat-increment response body.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("response is missing the \"{key}\" value")]
    MissingValue { key: &'static str },
    #[error("response \"{key}\" value is not a stat amount")]
    InvalidValue { key: &'static str },
}

/// Decoded response for one stat increment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatUpdate {
    /// Which stat the backend incremented.
    pub stat: Stat,
    /// The updated, server-authoritative value.
    pub value: u8,
    /// Evolution notice, when the increment triggered one.
    pub message: Option<String>,
    /// Post-evolution sprite, when it changed.
    pub current_image: Option<String>,
}

impl StatUpdate {
    /// Decode the JSON body of an increment response.
    ///
    /// The updated value must be present under the stat's param key;
    /// `message` and `current_image` are optional and may be null.
    pub fn from_json(stat: Stat, body: &Value) -> Result<Self, DecodeError> {
        let key = stat.param();
        let raw = body.get(key).ok_or(DecodeError::MissingValue { key })?;
        let value = raw
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or(DecodeError::InvalidValue { key })?;

        Ok(Self {
            stat,
            value,
            message: body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            current_image: body
                .get("current_image")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_value_under_stat_key() {
        let body = json!({"energy": 42, "message": null, "current_image": "pets/evo.png"});
        let update = StatUpdate::from_json(Stat::Energy, &body).unwrap();
        assert_eq!(update.stat, Stat::Energy);
        assert_eq!(update.value, 42);
        assert_eq!(update.message, None);
        assert_eq!(update.current_image, Some("pets/evo.png".to_string()));
    }

    #[test]
    fn test_decode_evolution_message() {
        let body = json!({"happiness": 100, "message": "Your pet evolved!"});
        let update = StatUpdate::from_json(Stat::Happiness, &body).unwrap();
        assert_eq!(update.value, 100);
        assert_eq!(update.message, Some("Your pet evolved!".to_string()));
        assert_eq!(update.current_image, None);
    }

    #[test]
    fn test_decode_rejects_wrong_key() {
        // Value present, but under a different stat's key.
        let body = json!({"energy": 42});
        let err = StatUpdate::from_json(Stat::Hunger, &body).unwrap_err();
        assert_eq!(err, DecodeError::MissingValue { key: "hunger" });
    }

    #[test]
    fn test_decode_rejects_non_numeric_value() {
        let body = json!({"energy": "lots"});
        let err = StatUpdate::from_json(Stat::Energy, &body).unwrap_err();
        assert_eq!(err, DecodeError::InvalidValue { key: "energy" });
    }

    #[test]
    fn test_decode_rejects_out_of_range_value() {
        let body = json!({"energy": 1000});
        let err = StatUpdate::from_json(Stat::Energy, &body).unwrap_err();
        assert_eq!(err, DecodeError::InvalidValue { key: "energy" });
    }
}
