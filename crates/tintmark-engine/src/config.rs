//! Annotation configuration
//!
//! [`AnnotationConfig`] carries everything the mutator needs: which nodes
//! are candidates, which marker qualifies them, which property element to
//! write and with which attributes.
//!
//! # Defaults
//!
//! | Field            | Default                          |
//! |------------------|----------------------------------|
//! | `candidate_tag`  | `Neutral`                        |
//! | `property_tag`   | `Actor.Color`                    |
//! | `marker_tag`     | `Origin`                         |
//! | `create_missing` | `true`                           |
//! | `attributes`     | `R = "128"`, `G = "128"`, `B = "128"` |
//!
//! # TOML
//!
//! ```toml
//! candidate_tag = "Neutral"
//! property_tag = "Actor.Color"
//! marker_tag = "Origin"
//! create_missing = true
//!
//! [attributes]
//! R = "128"
//! G = "128"
//! B = "128"
//! ```
//!
//! Omitted fields take their defaults. `marker_tag = ""` disables the marker
//! gate: every candidate qualifies.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tintmark_tree::is_xml_name;

/// Default candidate tag
pub const DEFAULT_CANDIDATE_TAG: &str = "Neutral";
/// Default property element tag
pub const DEFAULT_PROPERTY_TAG: &str = "Actor.Color";
/// Default qualifying marker tag
pub const DEFAULT_MARKER_TAG: &str = "Origin";

/// Static annotation policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationConfig {
    /// Tag selected by the `.//Tag` candidate query
    pub candidate_tag: String,
    /// Tag of the property element written under qualifying candidates
    pub property_tag: String,
    /// Tag that must appear below a candidate for it to qualify
    #[serde(with = "marker_tag")]
    pub marker_tag: Option<String>,
    /// Create the property element when a qualifying candidate lacks one
    pub create_missing: bool,
    /// Attributes applied verbatim to every property element
    pub attributes: IndexMap<String, String>,
}

impl AnnotationConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With candidate tag
    #[inline]
    #[must_use]
    pub fn with_candidate_tag(mut self, tag: impl Into<String>) -> Self {
        self.candidate_tag = tag.into();
        self
    }

    /// With property tag
    #[inline]
    #[must_use]
    pub fn with_property_tag(mut self, tag: impl Into<String>) -> Self {
        self.property_tag = tag.into();
        self
    }

    /// With marker tag (`None` disables the marker gate)
    #[inline]
    #[must_use]
    pub fn with_marker_tag(mut self, tag: Option<String>) -> Self {
        self.marker_tag = tag;
        self
    }

    /// With create-if-missing policy
    #[inline]
    #[must_use]
    pub fn with_create_missing(mut self, create: bool) -> Self {
        self.create_missing = create;
        self
    }

    /// Replace the whole attribute set
    #[inline]
    #[must_use]
    pub fn with_attributes(mut self, attributes: IndexMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Add or overwrite one attribute
    #[inline]
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Check tags and attribute names
    ///
    /// # Errors
    /// - `ConfigError::EmptyTag` / `ConfigError::InvalidTag` for bad tags
    /// - `ConfigError::InvalidAttributeName` for bad attribute keys
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_tag("candidate_tag", &self.candidate_tag)?;
        check_tag("property_tag", &self.property_tag)?;
        if let Some(marker) = &self.marker_tag {
            check_tag("marker_tag", marker)?;
        }
        if let Some(key) = self.attributes.keys().find(|key| !is_xml_name(key)) {
            return Err(ConfigError::InvalidAttributeName(key.clone()));
        }
        Ok(())
    }

    /// Decode and validate a TOML document
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` for malformed TOML or unknown fields, or a
    /// validation error.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns `ConfigError::Render` if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("R".to_string(), "128".to_string());
        attributes.insert("G".to_string(), "128".to_string());
        attributes.insert("B".to_string(), "128".to_string());
        Self {
            candidate_tag: DEFAULT_CANDIDATE_TAG.to_string(),
            property_tag: DEFAULT_PROPERTY_TAG.to_string(),
            marker_tag: Some(DEFAULT_MARKER_TAG.to_string()),
            create_missing: true,
            attributes,
        }
    }
}

/// Split a `NAME=VALUE` attribute assignment
///
/// Only the first `=` separates; the value may contain further `=` signs
/// and may be empty.
///
/// # Errors
/// - `ConfigError::InvalidAssignment` when there is no `=`
/// - `ConfigError::InvalidAttributeName` when `NAME` is not an XML name
pub fn parse_attribute_assignment(input: &str) -> Result<(String, String), ConfigError> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidAssignment(input.to_string()))?;
    let key = key.trim();
    if !is_xml_name(key) {
        return Err(ConfigError::InvalidAttributeName(key.to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// `None` is written as the empty string so it survives a TOML round trip
mod marker_tag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or_default())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok((!value.is_empty()).then_some(value))
    }
}

fn check_tag(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::EmptyTag { field });
    }
    if !is_xml_name(value) {
        return Err(ConfigError::InvalidTag {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
