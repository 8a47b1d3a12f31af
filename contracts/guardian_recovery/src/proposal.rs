//! Recovery proposals: storage, lifecycle, and the threshold evaluator.
//!
//! ```text
//! Pending ──► Approved ──► Executed
//!    │
//!    └─────► Rejected
//! ```
//!
//! `Rejected` and `Executed` are terminal. Expiry is not a status: an expired
//! proposal simply stops accepting votes and execution, checked lazily at the
//! top of each command that touches it.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

const PROPOSAL: Symbol = symbol_short!("PROP");
const PROPOSAL_IDX: Symbol = symbol_short!("PROP_IDX");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ─────────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

/// One attempt to transfer control of a DID.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryProposal {
    /// Client-chosen globally unique id.
    pub id: String,
    pub did_id: String,
    pub proposer: Address,
    pub new_controller: Address,
    pub reason: String,
    /// Guardians that voted in favour, in vote order. An address appears in
    /// at most one of the two vote vectors.
    pub approvals: Vec<Address>,
    pub rejections: Vec<Address>,
    pub status: ProposalStatus,
    pub created_at: u64,
    pub expires_at: u64,
    /// Zero until the proposal is executed.
    pub executed_at: u64,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn proposal_key(id: &String) -> (Symbol, String) {
    (PROPOSAL, id.clone())
}

pub(crate) fn store(env: &Env, proposal: &RecoveryProposal) {
    let key = proposal_key(&proposal.id);
    env.storage().persistent().set(&key, proposal);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, id: &String) -> Option<RecoveryProposal> {
    env.storage().persistent().get(&proposal_key(id))
}

pub(crate) fn exists(env: &Env, id: &String) -> bool {
    env.storage().persistent().has(&proposal_key(id))
}

/// All proposal ids in creation order.
pub(crate) fn ids(env: &Env) -> Vec<String> {
    env.storage()
        .persistent()
        .get(&PROPOSAL_IDX)
        .unwrap_or_else(|| Vec::new(env))
}

pub(crate) fn push_id(env: &Env, id: &String) {
    let mut all = ids(env);
    all.push_back(id.clone());
    env.storage().persistent().set(&PROPOSAL_IDX, &all);
    env.storage()
        .persistent()
        .extend_ttl(&PROPOSAL_IDX, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Voting ───────────────────────────────────────────────────────────────────

/// Whether `address` has already voted on `proposal`, in either direction.
pub(crate) fn has_voted(proposal: &RecoveryProposal, address: &Address) -> bool {
    proposal.approvals.contains(address) || proposal.rejections.contains(address)
}

// ── Threshold evaluator ──────────────────────────────────────────────────────

/// Compute the status a pending proposal should transition to after a vote.
///
/// Evaluation order matters and is part of the consensus-critical contract:
///
/// 1. `approvals >= threshold` ratifies the proposal, regardless of how many
///    rejections have accumulated.
/// 2. Otherwise, `rejections > active_guardians / 2` (integer division,
///    strictly greater) rejects it.
/// 3. Otherwise the proposal stays pending.
///
/// At most one transition fires per vote; callers only invoke this on a
/// proposal that is still `Pending`.
pub fn evaluate(
    approvals: u32,
    rejections: u32,
    threshold: u32,
    active_guardians: u32,
) -> ProposalStatus {
    if approvals >= threshold {
        ProposalStatus::Approved
    } else if rejections > active_guardians / 2 {
        ProposalStatus::Rejected
    } else {
        ProposalStatus::Pending
    }
}
