//! Signature share collector.
//!
//! Guardians may deposit one partial signature per proposal. Shares are
//! opaque blobs: the contract neither verifies well-formedness nor combines
//! them, and storing shares has no effect on the proposal lifecycle. An
//! off-chain coordinator reads `list_signature_shares` to perform the actual
//! threshold aggregation.

use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env, String, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

const SHARE: Symbol = symbol_short!("SHARE");
const SHARE_IDX: Symbol = symbol_short!("SHR_IDX");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

/// A raw signature share deposited by one guardian for one proposal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureShare {
    pub proposal_id: String,
    pub signer: Address,
    pub share: Bytes,
    pub public_key_share: Bytes,
    pub signed_at: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn share_key(proposal_id: &String, signer: &Address) -> (Symbol, String, Address) {
    (SHARE, proposal_id.clone(), signer.clone())
}

fn index_key(proposal_id: &String) -> (Symbol, String) {
    (SHARE_IDX, proposal_id.clone())
}

pub(crate) fn store(env: &Env, share: &SignatureShare) {
    let key = share_key(&share.proposal_id, &share.signer);
    env.storage().persistent().set(&key, share);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, proposal_id: &String, signer: &Address) -> Option<SignatureShare> {
    env.storage().persistent().get(&share_key(proposal_id, signer))
}

pub(crate) fn exists(env: &Env, proposal_id: &String, signer: &Address) -> bool {
    env.storage().persistent().has(&share_key(proposal_id, signer))
}

/// Signers that deposited a share for `proposal_id`, in submission order.
pub(crate) fn signers(env: &Env, proposal_id: &String) -> Vec<Address> {
    env.storage()
        .persistent()
        .get(&index_key(proposal_id))
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn push_signer(env: &Env, proposal_id: &String, signer: &Address) {
    let key = index_key(proposal_id);
    let mut all = signers(env, proposal_id);
    all.push_back(signer.clone());
    env.storage().persistent().set(&key, &all);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// All shares for a proposal, in submission order.
pub(crate) fn list(env: &Env, proposal_id: &String) -> Vec<SignatureShare> {
    let mut out = Vec::new(env);
    for signer in signers(env, proposal_id).iter() {
        if let Some(share) = load(env, proposal_id, &signer) {
            out.push_back(share);
        }
    }
    out
}
