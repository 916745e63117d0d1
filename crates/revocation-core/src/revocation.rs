//! Revocation records.
//!
//! A [`StoredRevocation`] is an immutable, append-only fact: a token, a claim
//! value, or everything issued before some instant is no longer trusted. The
//! payload is a closed set of variants ([`RevocationData`]); the persisted type
//! tag is always derived from the variant, never stored beside it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::EpochMillis;
use crate::error::CoreError;

// =============================================================================
// Revocation Type
// =============================================================================

/// Tag identifying which [`RevocationData`] variant a payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RevocationType {
    Token,
    Claim,
    Global,
}

impl RevocationType {
    /// The tag as persisted in the `revocation_type` column.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "TOKEN",
            Self::Claim => "CLAIM",
            Self::Global => "GLOBAL",
        }
    }
}

impl fmt::Display for RevocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RevocationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TOKEN" => Ok(Self::Token),
            "CLAIM" => Ok(Self::Claim),
            "GLOBAL" => Ok(Self::Global),
            _ => Err(CoreError::unknown_revocation_type(s)),
        }
    }
}

// =============================================================================
// Revocation Data
// =============================================================================

/// A single revoked access token, identified by the hash of its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRevocationData {
    pub token_hash: String,
}

/// Every token carrying claim `name` with a value hashing to `value_hash`
/// and issued before `issued_before`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimRevocationData {
    pub name: String,
    pub value_hash: String,
    pub issued_before: EpochMillis,
}

/// Every token issued before `issued_before`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalRevocationData {
    pub issued_before: EpochMillis,
}

/// The revocation payload.
///
/// Serializes as the bare variant body; decoding always goes through
/// [`crate::codec::decode`] with an explicit [`RevocationType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RevocationData {
    Token(TokenRevocationData),
    Claim(ClaimRevocationData),
    Global(GlobalRevocationData),
}

impl RevocationData {
    #[must_use]
    pub fn token(token_hash: impl Into<String>) -> Self {
        Self::Token(TokenRevocationData {
            token_hash: token_hash.into(),
        })
    }

    #[must_use]
    pub fn claim(
        name: impl Into<String>,
        value_hash: impl Into<String>,
        issued_before: EpochMillis,
    ) -> Self {
        Self::Claim(ClaimRevocationData {
            name: name.into(),
            value_hash: value_hash.into(),
            issued_before,
        })
    }

    #[must_use]
    pub fn global(issued_before: EpochMillis) -> Self {
        Self::Global(GlobalRevocationData { issued_before })
    }

    /// The tag matching this variant.
    #[must_use]
    pub fn revocation_type(&self) -> RevocationType {
        match self {
            Self::Token(_) => RevocationType::Token,
            Self::Claim(_) => RevocationType::Claim,
            Self::Global(_) => RevocationType::Global,
        }
    }
}

// =============================================================================
// Stored Revocation
// =============================================================================

/// A revocation as written to and read from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRevocation {
    data: RevocationData,
    revoked_by: String,
    revoked_at: EpochMillis,
}

impl StoredRevocation {
    #[must_use]
    pub fn new(data: RevocationData, revoked_by: impl Into<String>, revoked_at: EpochMillis) -> Self {
        Self {
            data,
            revoked_by: revoked_by.into(),
            revoked_at,
        }
    }

    #[must_use]
    pub fn revocation_type(&self) -> RevocationType {
        self.data.revocation_type()
    }

    #[must_use]
    pub fn data(&self) -> &RevocationData {
        &self.data
    }

    #[must_use]
    pub fn revoked_by(&self) -> &str {
        &self.revoked_by
    }

    #[must_use]
    pub fn revoked_at(&self) -> EpochMillis {
        self.revoked_at
    }

    #[must_use]
    pub fn into_data(self) -> RevocationData {
        self.data
    }
}
