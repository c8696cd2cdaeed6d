//! Session state record
//!
//! Defines the persisted guest session record and its keyed field model:
//! - [`SessionState`]: the whole record, (de)serialized under one storage key
//! - [`StateKey`] / [`FieldValue`]: per-field get/set addressing
//! - [`Domain`]: the fixed set of API host variants
//! - [`AccessToken`]: secret token with a redacted `Debug`

use crate::error::{StoreError, UnknownDomain};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// API host variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Domain {
    /// Global production host
    #[default]
    #[serde(rename = "contentful.com")]
    Contentful,
    /// EU data-residency host
    #[serde(rename = "eu.contentful.com")]
    ContentfulEu,
    /// Staging host
    #[serde(rename = "flinkly.com")]
    Flinkly,
}

impl Domain {
    /// Every supported host variant
    pub const ALL: [Domain; 3] = [Domain::Contentful, Domain::ContentfulEu, Domain::Flinkly];

    /// Host string as used in URLs and storage
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Contentful => "contentful.com",
            Domain::ContentfulEu => "eu.contentful.com",
            Domain::Flinkly => "flinkly.com",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownDomain(s.to_string()))
    }
}

/// Secret access token
///
/// Serializes as a plain string so it can be persisted, but never prints
/// its value through `Debug`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value, for building request headers only
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Check if the token is the empty string
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Addressable field of the session record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateKey {
    /// Editorial preview-mode toggle
    Preview,
    /// Debug-overlay toggle
    Xray,
    /// API host variant
    Domain,
    /// Guest space identifier
    SpaceId,
    /// Read-only delivery token
    DeliveryToken,
    /// Preview-mode access token
    PreviewToken,
}

impl StateKey {
    /// All keys in record order
    pub const ALL: [StateKey; 6] = [
        StateKey::Preview,
        StateKey::Xray,
        StateKey::Domain,
        StateKey::SpaceId,
        StateKey::DeliveryToken,
        StateKey::PreviewToken,
    ];

    /// Field name, identical to the query parameter name where one exists
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Preview => "preview",
            StateKey::Xray => "xray",
            StateKey::Domain => "domain",
            StateKey::SpaceId => "space_id",
            StateKey::DeliveryToken => "delivery_token",
            StateKey::PreviewToken => "preview_token",
        }
    }

    /// Look up a key by field name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        StateKey::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Whether the field always holds a value (unset restores the default)
    #[inline]
    #[must_use]
    pub fn is_defaulted(&self) -> bool {
        matches!(self, StateKey::Preview | StateKey::Xray | StateKey::Domain)
    }

    /// Whether the field holds a secret
    #[inline]
    #[must_use]
    pub fn is_secret(&self) -> bool {
        matches!(self, StateKey::DeliveryToken | StateKey::PreviewToken)
    }

    fn expected_kind(self) -> &'static str {
        match self {
            StateKey::Preview | StateKey::Xray => "bool",
            StateKey::Domain => "domain",
            StateKey::SpaceId => "text",
            StateKey::DeliveryToken | StateKey::PreviewToken => "token",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a single session field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Editorial toggle value
    Bool(bool),
    /// Host variant
    Domain(Domain),
    /// Plain text (space id)
    Text(String),
    /// Secret token
    Token(AccessToken),
}

impl FieldValue {
    /// Short name of the value kind, for diagnostics
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::Domain(_) => "domain",
            FieldValue::Text(_) => "text",
            FieldValue::Token(_) => "token",
        }
    }

    /// Build the correctly-typed value for a string-valued key
    ///
    /// Returns `None` for keys that are not string-valued.
    #[must_use]
    pub fn string_for(key: StateKey, value: impl Into<String>) -> Option<Self> {
        match key {
            StateKey::SpaceId => Some(FieldValue::Text(value.into())),
            StateKey::DeliveryToken | StateKey::PreviewToken => {
                Some(FieldValue::Token(AccessToken::new(value)))
            }
            StateKey::Preview | StateKey::Xray | StateKey::Domain => None,
        }
    }
}

/// Persisted guest session record
///
/// `preview`, `xray` and `domain` always hold a value. The guest fields are
/// optional; [`SessionState::has_required_guest`] tells whether the required
/// pair is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Editorial preview-mode toggle
    #[serde(default)]
    pub preview: bool,

    /// Debug-overlay toggle
    #[serde(default)]
    pub xray: bool,

    /// API host variant
    #[serde(default)]
    pub domain: Domain,

    /// Guest space identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,

    /// Read-only delivery token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_token: Option<AccessToken>,

    /// Preview-mode access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_token: Option<AccessToken>,
}

impl SessionState {
    /// Create state with all defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With host variant
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// With preview toggle
    #[inline]
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// With xray toggle
    #[inline]
    #[must_use]
    pub fn with_xray(mut self, xray: bool) -> Self {
        self.xray = xray;
        self
    }

    /// With the required guest pair
    #[must_use]
    pub fn with_guest(mut self, space_id: impl Into<String>, delivery_token: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self.delivery_token = Some(AccessToken::new(delivery_token));
        self
    }

    /// With preview token
    #[must_use]
    pub fn with_preview_token(mut self, token: impl Into<String>) -> Self {
        self.preview_token = Some(AccessToken::new(token));
        self
    }

    /// Read a single field
    ///
    /// Defaulted fields always return `Some`.
    #[must_use]
    pub fn get(&self, key: StateKey) -> Option<FieldValue> {
        match key {
            StateKey::Preview => Some(FieldValue::Bool(self.preview)),
            StateKey::Xray => Some(FieldValue::Bool(self.xray)),
            StateKey::Domain => Some(FieldValue::Domain(self.domain)),
            StateKey::SpaceId => self.space_id.clone().map(FieldValue::Text),
            StateKey::DeliveryToken => self.delivery_token.clone().map(FieldValue::Token),
            StateKey::PreviewToken => self.preview_token.clone().map(FieldValue::Token),
        }
    }

    /// Write a single field; `None` deletes it
    ///
    /// Deleting a defaulted field restores its default.
    ///
    /// # Errors
    /// [`StoreError::TypeMismatch`] if the value kind does not fit the key.
    pub fn set(&mut self, key: StateKey, value: Option<FieldValue>) -> Result<(), StoreError> {
        match (key, value) {
            (StateKey::Preview, None) => self.preview = false,
            (StateKey::Preview, Some(FieldValue::Bool(b))) => self.preview = b,
            (StateKey::Xray, None) => self.xray = false,
            (StateKey::Xray, Some(FieldValue::Bool(b))) => self.xray = b,
            (StateKey::Domain, None) => self.domain = Domain::default(),
            (StateKey::Domain, Some(FieldValue::Domain(d))) => self.domain = d,
            (StateKey::SpaceId, None) => self.space_id = None,
            (StateKey::SpaceId, Some(FieldValue::Text(s))) => self.space_id = Some(s),
            (StateKey::DeliveryToken, None) => self.delivery_token = None,
            (StateKey::DeliveryToken, Some(FieldValue::Token(t))) => self.delivery_token = Some(t),
            (StateKey::PreviewToken, None) => self.preview_token = None,
            (StateKey::PreviewToken, Some(FieldValue::Token(t))) => self.preview_token = Some(t),
            (key, Some(other)) => {
                return Err(StoreError::TypeMismatch {
                    key,
                    expected: key.expected_kind(),
                    actual: other.kind(),
                })
            }
        }
        Ok(())
    }

    /// Check that both required guest fields are present and non-empty
    #[must_use]
    pub fn has_required_guest(&self) -> bool {
        let space = self.space_id.as_deref().is_some_and(|s| !s.is_empty());
        let delivery = self.delivery_token.as_ref().is_some_and(|t| !t.is_empty());
        space && delivery
    }

    /// Check for any guest field at all
    #[must_use]
    pub fn has_any_guest(&self) -> bool {
        self.space_id.is_some() || self.delivery_token.is_some() || self.preview_token.is_some()
    }

    /// Remove every guest field, keeping editorial toggles and domain
    pub fn clear_guest(&mut self) {
        self.space_id = None;
        self.delivery_token = None;
        self.preview_token = None;
    }

    /// Copy with tokens masked, safe to print or log
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mask = |t: &AccessToken| AccessToken::new(if t.is_empty() { "" } else { "***" });
        Self {
            delivery_token: self.delivery_token.as_ref().map(mask),
            preview_token: self.preview_token.as_ref().map(mask),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_defined() {
        let state = SessionState::new();
        assert!(!state.preview);
        assert!(!state.xray);
        assert_eq!(state.domain, Domain::Contentful);
        assert!(!state.has_any_guest());
    }

    #[test]
    fn domain_parses_known_hosts() {
        assert_eq!("contentful.com".parse::<Domain>().unwrap(), Domain::Contentful);
        assert_eq!("eu.contentful.com".parse::<Domain>().unwrap(), Domain::ContentfulEu);
        assert_eq!("flinkly.com".parse::<Domain>().unwrap(), Domain::Flinkly);
        assert!("example.com".parse::<Domain>().is_err());
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("super-secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");

        let state = SessionState::new().with_guest("space", "super-secret");
        assert!(!format!("{state:?}").contains("super-secret"));
    }

    #[test]
    fn unset_defaulted_field_restores_default() {
        let mut state = SessionState::new()
            .with_preview(true)
            .with_domain(Domain::Flinkly);

        state.set(StateKey::Preview, None).unwrap();
        state.set(StateKey::Domain, None).unwrap();

        assert!(!state.preview);
        assert_eq!(state.domain, Domain::Contentful);
    }

    #[test]
    fn set_rejects_wrong_kind() {
        let mut state = SessionState::new();
        let result = state.set(StateKey::Preview, Some(FieldValue::Text("true".into())));
        assert!(matches!(result, Err(StoreError::TypeMismatch { key: StateKey::Preview, .. })));
    }

    #[test]
    fn get_set_cover_every_key() {
        let mut state = SessionState::new();
        for key in StateKey::ALL {
            let value = FieldValue::string_for(key, "v").unwrap_or(match key {
                StateKey::Domain => FieldValue::Domain(Domain::ContentfulEu),
                _ => FieldValue::Bool(true),
            });
            state.set(key, Some(value.clone())).unwrap();
            assert_eq!(state.get(key), Some(value));
        }
    }

    #[test]
    fn required_guest_treats_empty_as_missing() {
        assert!(SessionState::new().with_guest("abc", "tok").has_required_guest());
        assert!(!SessionState::new().with_guest("", "tok").has_required_guest());
        assert!(!SessionState::new().with_guest("abc", "").has_required_guest());
    }

    #[test]
    fn serialized_record_omits_absent_guest_fields() {
        let json = serde_json::to_value(SessionState::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"preview": false, "xray": false, "domain": "contentful.com"})
        );
    }

    #[test]
    fn redacted_masks_tokens_only() {
        let state = SessionState::new()
            .with_guest("abc", "tok1")
            .with_preview_token("tok2");
        let redacted = state.redacted();

        assert_eq!(redacted.space_id.as_deref(), Some("abc"));
        assert_eq!(redacted.delivery_token.as_ref().map(AccessToken::expose), Some("***"));
        assert_eq!(redacted.preview_token.as_ref().map(AccessToken::expose), Some("***"));
    }
}
