//! Core identifier newtypes.

use std::fmt;

/// Opaque identifier of a story source, unique within one content snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoryId(u64);

impl StoryId {
    /// Wrap a raw 64-bit id supplied by the data source.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for StoryId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
