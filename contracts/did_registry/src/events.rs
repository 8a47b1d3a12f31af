//! Structured event publishing for the DID registry.
//!
//! Each publisher emits under a `STREAM`-prefixed topic so external indexers
//! can subscribe with wildcard filters (e.g. `did.*`), mirroring the event
//! streaming convention used across the contract suite.

#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

// ── Event payloads ───────────────────────────────────────────────────────────

/// Fired when a new DID document is registered.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DidRegisteredEvent {
    pub did_id: String,
    pub controller: Address,
    pub timestamp: u64,
}

/// Fired when a document is deactivated or reactivated.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DidStatusChangedEvent {
    pub did_id: String,
    pub active: bool,
    pub timestamp: u64,
}

/// Fired when control of a document moves to a new address.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ControllerTransferredEvent {
    pub did_id: String,
    pub old_controller: Address,
    pub new_controller: Address,
    pub timestamp: u64,
}

// ── Publishers ───────────────────────────────────────────────────────────────

pub fn emit_did_registered(env: &Env, did_id: String, controller: Address) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("DID_REG")),
        DidRegisteredEvent {
            did_id,
            controller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_did_status_changed(env: &Env, did_id: String, active: bool) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("DID_STAT")),
        DidStatusChangedEvent {
            did_id,
            active,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_controller_transferred(
    env: &Env,
    did_id: String,
    old_controller: Address,
    new_controller: Address,
) {
    env.events().publish(
        (symbol_short!("STREAM"), symbol_short!("DID_CTRL")),
        ControllerTransferredEvent {
            did_id,
            old_controller,
            new_controller,
            timestamp: env.ledger().timestamp(),
        },
    );
}
