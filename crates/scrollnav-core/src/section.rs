#![forbid(unsafe_code)]

//! Section identity.

use std::borrow::Borrow;

/// Opaque, session-stable identifier of a page section.
///
/// Constructed from either a bare element id (`"home"`) or an anchor
/// (`"#home"`); the leading `#` is stripped so both spellings compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id, stripping one leading `#`.
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref();
        Self(id.strip_prefix('#').unwrap_or(id).to_owned())
    }

    /// The bare element id.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id formatted as an in-page anchor: `#home`.
    pub fn anchor(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SectionId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for SectionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for SectionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host handle for one DOM element.
///
/// The host assigns these; the engine only compares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u64);

impl NodeId {
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// A section id bound to the element that renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub id: SectionId,
    pub node: NodeId,
}

impl SectionDescriptor {
    pub fn new(id: impl Into<SectionId>, node: NodeId) -> Self {
        Self {
            id: id.into(),
            node,
        }
    }
}
