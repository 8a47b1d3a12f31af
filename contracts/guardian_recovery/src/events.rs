//! Structured event publishing for the recovery engine.
//!
//! One event per successful command, published under `STREAM`-prefixed
//! topics so indexers and wallet UIs can follow guardianship and proposal
//! lifecycles with wildcard subscriptions.

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

use crate::proposal::ProposalStatus;

// ── Event payloads ───────────────────────────────────────────────────────────

/// Fired when a guardian is added for a DID.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuardianAddedEvent {
    pub did_id: String,
    pub guardian: Address,
    pub controller: Address,
    pub timestamp: u64,
}

/// Fired when a guardian is deactivated.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GuardianRemovedEvent {
    pub did_id: String,
    pub guardian: Address,
    pub controller: Address,
    pub timestamp: u64,
}

/// Fired when a recovery proposal is created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryProposedEvent {
    pub proposal_id: String,
    pub did_id: String,
    pub proposer: Address,
    pub new_controller: Address,
    pub timestamp: u64,
}

/// Fired for every vote, carrying the status the proposal settled on after
/// the tally.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryVoteEvent {
    pub proposal_id: String,
    pub guardian: Address,
    pub approve: bool,
    pub status: ProposalStatus,
    pub timestamp: u64,
}

/// Fired when an approved proposal is executed and control moves.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryExecutedEvent {
    pub proposal_id: String,
    pub did_id: String,
    pub new_controller: Address,
    pub executor: Address,
    pub timestamp: u64,
}

/// Fired when a guardian deposits a signature share.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignatureShareEvent {
    pub proposal_id: String,
    pub signer: Address,
    pub timestamp: u64,
}

/// Fired when module parameters change through the governance path.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamsUpdatedEvent {
    pub recovery_threshold: u32,
    pub max_guardians: u32,
    pub proposal_expiry_secs: u64,
    pub timestamp: u64,
}

/// Fired when a full state snapshot is imported.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StateImportedEvent {
    pub guardians: u32,
    pub proposals: u32,
    pub signature_shares: u32,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn emit_guardian_added(env: &Env, did_id: String, guardian: Address, controller: Address) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("GRD_ADD")),
        GuardianAddedEvent {
            did_id,
            guardian,
            controller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_guardian_removed(env: &Env, did_id: String, guardian: Address, controller: Address) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("GRD_REM")),
        GuardianRemovedEvent {
            did_id,
            guardian,
            controller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_recovery_proposed(
    env: &Env,
    proposal_id: String,
    did_id: String,
    proposer: Address,
    new_controller: Address,
) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("REC_PROP")),
        RecoveryProposedEvent {
            proposal_id,
            did_id,
            proposer,
            new_controller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_recovery_vote(
    env: &Env,
    proposal_id: String,
    guardian: Address,
    approve: bool,
    status: ProposalStatus,
) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("REC_VOTE")),
        RecoveryVoteEvent {
            proposal_id,
            guardian,
            approve,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_recovery_executed(
    env: &Env,
    proposal_id: String,
    did_id: String,
    new_controller: Address,
    executor: Address,
) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("REC_EXEC")),
        RecoveryExecutedEvent {
            proposal_id,
            did_id,
            new_controller,
            executor,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_signature_share(env: &Env, proposal_id: String, signer: Address) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("SIG_SHR")),
        SignatureShareEvent {
            proposal_id,
            signer,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_params_updated(env: &Env, params: &crate::params::RecoveryParams) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("PRM_UPD")),
        ParamsUpdatedEvent {
            recovery_threshold: params.recovery_threshold,
            max_guardians: params.max_guardians,
            proposal_expiry_secs: params.proposal_expiry_secs,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_state_imported(env: &Env, guardians: u32, proposals: u32, signature_shares: u32) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("ST_IMP")),
        StateImportedEvent {
            guardians,
            proposals,
            signature_shares,
            timestamp: env.ledger().timestamp(),
        },
    );
}
