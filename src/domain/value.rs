use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SignalVine account number, used in account-scoped paths.
///
/// Invariant: non-empty after trimming.
pub struct AccountNumber(String);

impl AccountNumber {
    pub const FIELD: &'static str = "account_number";

    /// Create a validated [`AccountNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated account number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SignalVine account token.
///
/// The token is both part of the signed string and sent in clear in the
/// `Authorization` header.
///
/// Invariant: non-empty after trimming.
pub struct AccountToken(String);

impl AccountToken {
    pub const FIELD: &'static str = "account_token";

    /// Create a validated [`AccountToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// SignalVine account secret, the HMAC key.
///
/// Invariant: must not be empty (whitespace is preserved and allowed).
/// `Debug` output never contains the secret.
pub struct AccountSecret(String);

impl AccountSecret {
    pub const FIELD: &'static str = "account_secret";

    /// Create a validated [`AccountSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccountSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// SignalVine program (campaign) id.
///
/// Invariant: non-empty after trimming, not a dot segment, and made only of
/// ASCII letters, digits, `-`, `.`, `_` and `~`. The id is interpolated into
/// request paths and none of those characters get percent-encoded, so the
/// signed path is byte-for-byte the path that is sent.
pub struct ProgramId(String);

impl ProgramId {
    pub const FIELD: &'static str = "program";

    /// Create a validated [`ProgramId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let unencoded = trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~'));
        // `.` and `..` are dot segments and would be collapsed out of the URL.
        if !unencoded || matches!(trimmed, "." | "..") {
            return Err(ValidationError::InvalidPathSegment {
                field: Self::FIELD,
                input: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated program id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Page size for participant listing (`count`).
///
/// Invariant: at least [`ChunkSize::MIN`]. A zero page size would never
/// advance the offset.
pub struct ChunkSize(u32);

impl ChunkSize {
    /// Query parameter name used by SignalVine (`count`).
    pub const FIELD: &'static str = "count";

    /// Minimum allowed page size.
    pub const MIN: u32 = 1;

    /// Page size used when none is given.
    pub const DEFAULT: Self = Self(500);

    /// Create a validated page size.
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value < Self::MIN {
            return Err(ValidationError::OutOfRange {
                field: Self::FIELD,
                min: Self::MIN,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying page size.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}
