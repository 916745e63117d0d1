//! Revocation payload codec.
//!
//! Payloads are stored as JSON text next to an explicit type tag. Decoding
//! dispatches on that tag alone; the payload shape is never inspected to guess
//! the variant, and each variant rejects fields it does not own.

use serde::de::DeserializeOwned;

use crate::error::{CoreError, Result};
use crate::revocation::{
    ClaimRevocationData, GlobalRevocationData, RevocationData, RevocationType,
    TokenRevocationData,
};

/// Serializes a payload to its stored JSON form.
///
/// # Errors
///
/// Returns [`CoreError::Encode`] if serialization fails.
pub fn encode(data: &RevocationData) -> Result<String> {
    let encoded = match data {
        RevocationData::Token(token) => serde_json::to_string(token),
        RevocationData::Claim(claim) => serde_json::to_string(claim),
        RevocationData::Global(global) => serde_json::to_string(global),
    };
    encoded.map_err(|e| CoreError::encode(e.to_string()))
}

/// Parses a stored payload as the variant named by `revocation_type`.
///
/// # Errors
///
/// Returns [`CoreError::Decode`] if `raw` is not a valid payload of that variant.
pub fn decode(revocation_type: RevocationType, raw: &str) -> Result<RevocationData> {
    match revocation_type {
        RevocationType::Token => {
            read::<TokenRevocationData>(revocation_type, raw).map(RevocationData::Token)
        }
        RevocationType::Claim => {
            read::<ClaimRevocationData>(revocation_type, raw).map(RevocationData::Claim)
        }
        RevocationType::Global => {
            read::<GlobalRevocationData>(revocation_type, raw).map(RevocationData::Global)
        }
    }
}

/// Like [`decode`], with the tag still in its persisted string form.
///
/// # Errors
///
/// Returns [`CoreError::UnknownRevocationType`] for an unrecognized tag and
/// [`CoreError::Decode`] for a malformed payload.
pub fn decode_tagged(tag: &str, raw: &str) -> Result<RevocationData> {
    decode(tag.parse()?, raw)
}

fn read<T: DeserializeOwned>(revocation_type: RevocationType, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| CoreError::decode(revocation_type, e.to_string()))
}
