//! Pet session state carried in and out of the mini-game scene.

use serde::{Deserialize, Serialize};

/// Context the scene is entered with.
///
/// Stats are server-authoritative; the scene never holds a local copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSession {
    /// Backend id of the pet being played.
    pub pet_id: u64,
    /// Sprite shown during the decorative flip animation.
    pub pet_image_url: String,
    /// Anti-forgery credential required by the backend POST endpoints.
    pub csrf_token: String,
}

/// Value handed back to the caller when the scene exits.
///
/// The three stat fields are passed through untouched: the mini-game never
/// writes them, so they stay `None` unless the caller populated them before
/// entry. Fetching authoritative values on exit is an open question recorded
/// in DESIGN.md.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneHandoff {
    pub pet_id: u64,
    pub pet_image_url: String,
    pub hunger: Option<u8>,
    pub energy: Option<u8>,
    pub happiness: Option<u8>,
    pub csrf_token: String,
}

impl From<PetSession> for SceneHandoff {
    fn from(session: PetSession) -> Self {
        Self {
            pet_id: session.pet_id,
            pet_image_url: session.pet_image_url,
            hunger: None,
            energy: None,
            happiness: None,
            csrf_token: session.csrf_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_passes_session_through_unchanged() {
        let session = PetSession {
            pet_id: 7,
            pet_image_url: "/pets/image-proxy/sprite.png".to_string(),
            csrf_token: "tok".to_string(),
        };

        let handoff = SceneHandoff::from(session.clone());
        assert_eq!(handoff.pet_id, session.pet_id);
        assert_eq!(handoff.pet_image_url, session.pet_image_url);
        assert_eq!(handoff.csrf_token, session.csrf_token);
        assert_eq!(handoff.hunger, None);
        assert_eq!(handoff.energy, None);
        assert_eq!(handoff.happiness, None);
    }
}
