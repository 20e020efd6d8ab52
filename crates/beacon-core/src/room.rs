//! Room identifiers.

use std::fmt;

/// Well-known room used when a connection supplies no room identifier.
pub const DEFAULT_ROOM: &str = "default";

/// Name of a room: a caller-supplied opaque string.
///
/// No validation is performed. The empty string names a legal room distinct
/// from [`DEFAULT_ROOM`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName(String);

impl RoomName {
    /// Create a room name from a caller-supplied identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Resolve a connection-setup room parameter to a room name.
    ///
    /// An absent parameter maps to [`DEFAULT_ROOM`]. This substitution is the
    /// transport boundary's job and happens exactly once, before the registry
    /// ever sees the identifier; registry operations never default.
    pub fn resolve(param: Option<&str>) -> Self {
        Self::new(param.unwrap_or(DEFAULT_ROOM))
    }

    /// The room name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RoomName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
