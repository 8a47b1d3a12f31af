//! Module parameters: recovery threshold, guardian cap, default expiry.
//!
//! A single record in instance storage, read by every handler and mutated
//! only through the admin-gated `update_params` entry point (the ledger's
//! governance path).

use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

const PARAMS: Symbol = symbol_short!("PARAMS");

/// Minimum approving guardians to ratify a proposal.
pub const DEFAULT_RECOVERY_THRESHOLD: u32 = 2;
/// Guardian cap per DID.
pub const DEFAULT_MAX_GUARDIANS: u32 = 5;
/// Default proposal validity window: 7 days.
pub const DEFAULT_PROPOSAL_EXPIRY_SECS: u64 = 7 * 86_400;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryParams {
    /// Approvals required before a proposal flips to Approved.
    pub recovery_threshold: u32,
    /// Maximum simultaneously active guardians per DID.
    pub max_guardians: u32,
    /// Default window offered to clients when composing `expires_at`.
    pub proposal_expiry_secs: u64,
}

impl RecoveryParams {
    pub fn default_params() -> Self {
        Self {
            recovery_threshold: DEFAULT_RECOVERY_THRESHOLD,
            max_guardians: DEFAULT_MAX_GUARDIANS,
            proposal_expiry_secs: DEFAULT_PROPOSAL_EXPIRY_SECS,
        }
    }

    /// A threshold of zero would auto-approve proposals and a cap below the
    /// threshold could never ratify one.
    pub fn is_valid(&self) -> bool {
        self.recovery_threshold >= 1
            && self.max_guardians >= self.recovery_threshold
            && self.proposal_expiry_secs > 0
    }
}

pub(crate) fn store(env: &Env, params: &RecoveryParams) {
    env.storage().instance().set(&PARAMS, params);
}

pub(crate) fn load(env: &Env) -> Option<RecoveryParams> {
    env.storage().instance().get(&PARAMS)
}
