//! Newtype wrappers for identifiers
//!
//! These keep provider identifiers and slide identifiers from being mixed up
//! with each other or with arbitrary strings (note text, titles, paths).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Identifies one registered asset provider (e.g. `"quickchart"`, `"local-exports"`).
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(Arc<str>);

impl ProviderId {
    /// Creates a new ProviderId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this provider ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for ProviderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identifier a slide is known by when speaker notes are matched against it.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(Arc<str>);

impl SlideId {
    /// Creates a new SlideId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this slide ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SlideId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for SlideId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for SlideId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
