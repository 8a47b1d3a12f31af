//! Guardian registry: one record per `(did_id, address)` pair.
//!
//! Records are never deleted. Removal flips `active` to `false` so the full
//! guardianship history of a DID stays auditable on-chain. A per-DID index
//! vector fixes enumeration order (insertion order, which is command order),
//! and a global index of DIDs with guardians backs state export.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

const GUARDIAN: Symbol = symbol_short!("GUARD");
const GUARDIAN_IDX: Symbol = symbol_short!("GRD_IDX");
const DID_IDX: Symbol = symbol_short!("DID_IDX");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

/// An address authorized to vote on recovery proposals for one DID.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Guardian {
    pub did_id: String,
    pub address: Address,
    /// Opaque key material registered alongside the guardian; used by
    /// off-chain tooling to address signature shares, never interpreted here.
    pub public_key: String,
    pub active: bool,
    pub added_at: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn guardian_key(did_id: &String, address: &Address) -> (Symbol, String, Address) {
    (GUARDIAN, did_id.clone(), address.clone())
}

fn index_key(did_id: &String) -> (Symbol, String) {
    (GUARDIAN_IDX, did_id.clone())
}

pub(crate) fn store(env: &Env, guardian: &Guardian) {
    let key = guardian_key(&guardian.did_id, &guardian.address);
    env.storage().persistent().set(&key, guardian);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, did_id: &String, address: &Address) -> Option<Guardian> {
    env.storage().persistent().get(&guardian_key(did_id, address))
}

pub(crate) fn exists(env: &Env, did_id: &String, address: &Address) -> bool {
    env.storage().persistent().has(&guardian_key(did_id, address))
}

/// Every guardian address ever added for `did_id`, in insertion order.
pub(crate) fn index(env: &Env, did_id: &String) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&index_key(did_id))
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn push_index(env: &Env, did_id: &String, address: &Address) {
    let key = index_key(did_id);
    let mut addrs = index(env, did_id);
    addrs.push_back(address.clone());
    env.storage().persistent().set(&key, &addrs);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// DIDs that have at least one guardian record, in first-touch order.
pub(crate) fn dids(env: &Env) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&DID_IDX)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn push_did(env: &Env, did_id: &String) {
    let mut ids = dids(env);
    if !ids.contains(did_id) {
        ids.push_back(did_id.clone());
        env.storage().persistent().set(&DID_IDX, &ids);
        env.storage()
            .persistent()
            .extend_ttl(&DID_IDX, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

// ── Eligibility ──────────────────────────────────────────────────────────────

/// A guardian may vote, propose, and submit shares only while active.
pub(crate) fn is_active_guardian(env: &Env, did_id: &String, address: &Address) -> bool {
    load(env, did_id, address).map(|g| g.active).unwrap_or(false)
}

pub(crate) fn active_count(env: &Env, did_id: &String) -> u32 {
    let mut count = 0u32;
    for addr in index(env, did_id).iter() {
        if is_active_guardian(env, did_id, &addr) {
            count += 1;
        }
    }
    count
}

/// Active guardians for `did_id` in insertion order (deterministic across
/// replicas because insertion order is command order).
pub(crate) fn list_active(env: &Env, did_id: &String) -> Vec<Guardian> {
    let mut list = Vec::new(env);
    for addr in index(env, did_id).iter() {
        if let Some(guardian) = load(env, did_id, &addr) {
            if guardian.active {
                list.push_back(guardian);
            }
        }
    }
    list
}
