//! DID document types, syntax validation, and storage.
//!
//! Documents are stored under `("DID_DOC", did_id)` in persistent storage.
//! An insertion-order index of every registered id is kept alongside so that
//! enumeration (and therefore replay) is deterministic — Soroban storage has
//! no iteration primitive.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::DidError;

// ── Storage key prefixes ─────────────────────────────────────────────────────

const DOCUMENT: Symbol = symbol_short!("DID_DOC");
const DID_INDEX: Symbol = symbol_short!("DID_IDX");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Upper bound on the byte length of a DID string accepted by the registry.
pub const MAX_DID_BYTES: usize = 256;

// ── Types ─────────────────────────────────────────────────────────────────────

/// The on-chain DID document record.
///
/// Only the fields the ledger needs to arbitrate control are kept on-chain;
/// verification methods, service endpoints and the rest of the W3C document
/// live with the holder's wallet.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DidDocument {
    pub id: String,
    /// Address currently in control of the identifier.
    pub controller: Address,
    /// Deactivated documents resolve but reject every mutation.
    pub active: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

// ── Syntax validation ────────────────────────────────────────────────────────

/// Validate that `did` conforms to the simplified W3C DID syntax
/// `did:<method>:<method_specific_id>`.
///
/// `<method>` must be non-empty lower-case alphanumeric; the identifier must
/// be non-empty and restricted to `[A-Za-z0-9._:%-]`.  Soroban strings are
/// opaque host objects, so the check runs over a copied byte buffer.
pub fn validate_did_format(did: &String) -> Result<(), DidError> {
    let len = did.len() as usize;
    if len > MAX_DID_BYTES {
        return Err(DidError::DidTooLong);
    }
    let mut buf = [0u8; MAX_DID_BYTES];
    let bytes = &mut buf[..len];
    did.copy_into_slice(bytes);

    let rest = match bytes.strip_prefix(b"did:") {
        Some(r) => r,
        None => return Err(DidError::MissingPrefix),
    };

    // Split on the first ':' to get method and method-specific id.
    let colon = match rest.iter().position(|&b| b == b':') {
        Some(p) => p,
        None => return Err(DidError::MissingMethod),
    };
    let method = &rest[..colon];
    let id = &rest[colon + 1..];

    if method.is_empty() {
        return Err(DidError::MissingMethod);
    }
    if id.is_empty() {
        return Err(DidError::MissingIdentifier);
    }

    if !method
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(DidError::InvalidCharacters);
    }
    if !id
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_' | b':' | b'%'))
    {
        return Err(DidError::InvalidCharacters);
    }

    Ok(())
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn document_key(did_id: &String) -> (Symbol, String) {
    (DOCUMENT, did_id.clone())
}

pub(crate) fn store(env: &Env, doc: &DidDocument) {
    let key = document_key(&doc.id);
    env.storage().persistent().set(&key, doc);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, did_id: &String) -> Option<DidDocument> {
    env.storage().persistent().get(&document_key(did_id))
}

pub(crate) fn exists(env: &Env, did_id: &String) -> bool {
    env.storage().persistent().has(&document_key(did_id))
}

/// All registered ids, in registration order.
pub(crate) fn all_ids(env: &Env) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&DID_INDEX)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn push_id(env: &Env, did_id: &String) {
    let mut ids = all_ids(env);
    ids.push_back(did_id.clone());
    env.storage().persistent().set(&DID_INDEX, &ids);
    env.storage()
        .persistent()
        .extend_ttl(&DID_INDEX, TTL_THRESHOLD, TTL_EXTEND_TO);
}
