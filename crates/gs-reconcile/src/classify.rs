//! Parameter classification
//!
//! Maps query parameter names onto fixed categories. The mapping is static
//! and never derived from input.

use gs_session::StateKey;

/// Guest fields that must arrive together
pub const REQUIRED_GUEST_KEYS: [StateKey; 2] = [StateKey::SpaceId, StateKey::DeliveryToken];

/// Guest fields present only when explicitly supplied
pub const OPTIONAL_GUEST_KEYS: [StateKey; 1] = [StateKey::PreviewToken];

/// Independent UI toggles
pub const EDITORIAL_KEYS: [StateKey; 2] = [StateKey::Preview, StateKey::Xray];

/// Category of a query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamCategory {
    /// Required-guest credential
    RequiredGuest,
    /// Optional-guest credential
    OptionalGuest,
    /// Editorial boolean toggle
    Editorial,
    /// Not a recognized parameter; never touches the store
    Unrecognized,
}

impl ParamCategory {
    /// Check if category is a guest credential
    #[inline]
    #[must_use]
    pub fn is_guest(&self) -> bool {
        matches!(self, ParamCategory::RequiredGuest | ParamCategory::OptionalGuest)
    }
}

/// Classify a parameter name
#[must_use]
pub fn classify(name: &str) -> ParamCategory {
    match state_key(name) {
        Some(key) if REQUIRED_GUEST_KEYS.contains(&key) => ParamCategory::RequiredGuest,
        Some(key) if OPTIONAL_GUEST_KEYS.contains(&key) => ParamCategory::OptionalGuest,
        Some(key) if EDITORIAL_KEYS.contains(&key) => ParamCategory::Editorial,
        _ => ParamCategory::Unrecognized,
    }
}

/// State key addressed by a recognized parameter name
///
/// `domain` is a state field but not a parameter, so it maps to `None`.
#[must_use]
pub fn state_key(name: &str) -> Option<StateKey> {
    StateKey::from_name(name).filter(|key| *key != StateKey::Domain)
}

/// Check if a parameter name belongs to any recognized category
#[inline]
#[must_use]
pub fn is_recognized(name: &str) -> bool {
    classify(name) != ParamCategory::Unrecognized
}
