//! ULID-based identifier generation with prefixes.
//!
//! Identifiers in ferrocode follow the pattern: `prefix_ulid`
//! For example: `snp_01hqxyz...` for snapshot records. ULIDs embed a
//! millisecond timestamp before the random tail, so ascending identifiers
//! sort lexicographically by creation time.

use ulid::Ulid;

/// Known identifier prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Session,
    Message,
    Snapshot,
}

impl IdPrefix {
    /// Get the string prefix for this identifier type.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdPrefix::Session => "ses",
            IdPrefix::Message => "msg",
            IdPrefix::Snapshot => "snp",
        }
    }

    /// Parse a prefix from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ses" => Some(IdPrefix::Session),
            "msg" => Some(IdPrefix::Message),
            "snp" => Some(IdPrefix::Snapshot),
            _ => None,
        }
    }
}

/// Identifier generation and parsing utilities.
pub struct Identifier;

impl Identifier {
    /// Generate a new ascending identifier (newer = larger).
    pub fn ascending(prefix: IdPrefix) -> String {
        let ulid = Ulid::new();
        format!("{}_{}", prefix.as_str(), ulid.to_string().to_lowercase())
    }

    /// Generate an identifier with a specific ULID (for testing or imports).
    pub fn with_ulid(prefix: IdPrefix, ulid: Ulid) -> String {
        format!("{}_{}", prefix.as_str(), ulid.to_string().to_lowercase())
    }

    /// Parse an identifier into its prefix and ULID parts.
    pub fn parse(id: &str) -> Option<(IdPrefix, Ulid)> {
        let parts: Vec<&str> = id.splitn(2, '_').collect();
        if parts.len() != 2 {
            return None;
        }

        let prefix = IdPrefix::parse(parts[0])?;
        let ulid = Ulid::from_string(parts[1]).ok()?;
        Some((prefix, ulid))
    }

    /// Check if an identifier has the expected prefix.
    pub fn has_prefix(id: &str, prefix: IdPrefix) -> bool {
        id.starts_with(prefix.as_str()) && id.chars().nth(prefix.as_str().len()) == Some('_')
    }

    /// Generate a session ID.
    pub fn session() -> String {
        Self::ascending(IdPrefix::Session)
    }

    /// Generate a message ID.
    pub fn message() -> String {
        Self::ascending(IdPrefix::Message)
    }

    /// Generate a snapshot record ID (ascending for chronological order).
    pub fn snapshot() -> String {
        Self::ascending(IdPrefix::Snapshot)
    }
}
