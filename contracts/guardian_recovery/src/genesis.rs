//! Full-state export and import.
//!
//! The snapshot covers every record in the three durable namespaces plus the
//! parameter singleton. Export walks the index vectors, so the snapshot order
//! is the insertion order and two replicas with the same history produce the
//! same snapshot. Import writes every record and rebuilds every index, which
//! is what lets a fresh instance reconstruct identical state.

use soroban_sdk::{contracttype, Env, Vec};

use crate::guardians::{self, Guardian};
use crate::params::RecoveryParams;
use crate::proposal::{self, RecoveryProposal};
use crate::shares::{self, SignatureShare};

/// A complete snapshot of the module's durable state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryState {
    pub params: RecoveryParams,
    pub guardians: Vec<Guardian>,
    pub proposals: Vec<RecoveryProposal>,
    pub signature_shares: Vec<SignatureShare>,
}

/// Serialize every record in every namespace, in index order.
pub(crate) fn export(env: &Env, params: RecoveryParams) -> RecoveryState {
    let mut all_guardians = Vec::new(env);
    for did_id in guardians::dids(env).iter() {
        for addr in guardians::index(env, &did_id).iter() {
            if let Some(guardian) = guardians::load(env, &did_id, &addr) {
                all_guardians.push_back(guardian);
            }
        }
    }

    let mut all_proposals = Vec::new(env);
    let mut all_shares = Vec::new(env);
    for id in proposal::ids(env).iter() {
        if let Some(p) = proposal::load(env, &id) {
            all_proposals.push_back(p);
        }
        for share in shares::list(env, &id).iter() {
            all_shares.push_back(share);
        }
    }

    RecoveryState {
        params,
        guardians: all_guardians,
        proposals: all_proposals,
        signature_shares: all_shares,
    }
}

/// Write every record of `state` and rebuild the index vectors.
///
/// Intended for genesis-style restoration into a fresh instance; records are
/// written as-is, in snapshot order, so a subsequent `export` returns a
/// snapshot equal to the one imported.
pub(crate) fn import(env: &Env, state: &RecoveryState) {
    crate::params::store(env, &state.params);

    for guardian in state.guardians.iter() {
        guardians::store(env, &guardian);
        guardians::push_index(env, &guardian.did_id, &guardian.address);
        guardians::push_did(env, &guardian.did_id);
    }

    for p in state.proposals.iter() {
        proposal::store(env, &p);
        proposal::push_id(env, &p.id);
    }

    for share in state.signature_shares.iter() {
        shares::store(env, &share);
        shares::push_signer(env, &share.proposal_id, &share.signer);
    }
}
