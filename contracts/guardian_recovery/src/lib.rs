#![no_std]

//! # Guardian Recovery
//!
//! Guardian-based social recovery for DIDs held in the [`did_registry`]
//! contract:
//!
//! - **Guardian registry**: a DID's controller designates up to
//!   `max_guardians` addresses; removal deactivates rather than deletes, so
//!   guardianship history stays auditable.
//! - **Recovery proposals**: any active guardian may propose moving control
//!   of a DID to a new address, with an explicit expiry.
//! - **Threshold voting**: each guardian votes once; `recovery_threshold`
//!   approvals ratify the proposal, a strict majority of rejections among
//!   active guardians kills it.
//! - **Permissionless execution**: once ratified, anyone may trigger the
//!   controller transfer through the registry.
//! - **Signature shares**: guardians may additionally deposit opaque partial
//!   signatures per proposal for off-chain threshold aggregation; the
//!   contract stores them verbatim and never combines or verifies them.
//!
//! Every command validates all preconditions before its first storage write,
//! so a failed command leaves no partial state. The only clock is the ledger
//! timestamp and all enumeration runs over insertion-order indexes, which
//! keeps replay deterministic across replicas. Proposal expiry is lazy:
//! checked when a proposal is next voted on or executed, never by a
//! background sweep.

pub mod events;
pub mod genesis;
pub mod guardians;
pub mod params;
pub mod proposal;
pub mod shares;

use soroban_sdk::{
    contract, contractimpl, symbol_short, Address, Bytes, Env, String, Symbol, Vec,
};

use did_registry::{DidDocument, DidRegistryContractClient};
use genesis::RecoveryState;
use guardians::Guardian;
use params::RecoveryParams;
use proposal::{ProposalStatus, RecoveryProposal};
use shares::SignatureShare;

// ── Storage key constants ─────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const DID_REGISTRY: Symbol = symbol_short!("DID_REG");

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InvalidParams = 5,
    DidNotFound = 6,
    DidInactive = 7,
    GuardianAlreadyExists = 8,
    GuardianNotFound = 9,
    GuardianAlreadyInactive = 10,
    MaxGuardiansReached = 11,
    NotAGuardian = 12,
    ProposalAlreadyExists = 13,
    ProposalNotFound = 14,
    ProposalNotPending = 15,
    ProposalExpired = 16,
    AlreadyVoted = 17,
    ProposalNotApproved = 18,
    ShareAlreadySubmitted = 19,
    InvalidExpiry = 20,
    ControllerTransferFailed = 21,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct GuardianRecoveryContract;

#[contractimpl]
impl GuardianRecoveryContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the recovery engine.
    ///
    /// * `did_registry` — address of the DID registry this engine reads
    ///                    documents from and transfers controllers through.
    ///                    The registry must in turn be wired back via its
    ///                    `set_recovery_contract` so transfers are authorized.
    /// * `params`       — initial module parameters; updated later only
    ///                    through `update_params`.
    pub fn initialize(
        env: Env,
        admin: Address,
        did_registry: Address,
        params: RecoveryParams,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if !params.is_valid() {
            return Err(ContractError::InvalidParams);
        }

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&DID_REGISTRY, &did_registry);
        params::store(&env, &params);
        env.storage().instance().set(&INITIALIZED, &true);

        Ok(())
    }

    // ── Guardian registry ─────────────────────────────────────────────────────

    /// Register `guardian` as a recovery guardian for `did_id`.
    ///
    /// The DID must exist and be active, the pair must be unused (a
    /// previously removed guardian blocks re-use of the pair — the inactive
    /// record is the audit trail), and the active count must be below
    /// `max_guardians`.
    //
    // TODO: require `controller` to match the DID document's controller once
    // the split of authorization duties between this engine and the registry
    // is settled; today any authenticated address can curate guardians.
    pub fn add_guardian(
        env: Env,
        controller: Address,
        did_id: String,
        guardian: Address,
        public_key: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        controller.require_auth();

        Self::resolve_active_did(&env, &did_id)?;

        if guardians::exists(&env, &did_id, &guardian) {
            return Err(ContractError::GuardianAlreadyExists);
        }

        let max = Self::params_or_err(&env)?.max_guardians;
        if guardians::active_count(&env, &did_id) >= max {
            return Err(ContractError::MaxGuardiansReached);
        }

        let record = Guardian {
            did_id: did_id.clone(),
            address: guardian.clone(),
            public_key,
            active: true,
            added_at: env.ledger().timestamp(),
        };
        guardians::store(&env, &record);
        guardians::push_index(&env, &did_id, &guardian);
        guardians::push_did(&env, &did_id);

        events::emit_guardian_added(&env, did_id, guardian, controller);
        Ok(())
    }

    /// Deactivate a guardian. The record is kept with `active = false`.
    ///
    /// No floor is enforced: removal may leave fewer active guardians than
    /// `recovery_threshold`, in which case open proposals for the DID can no
    /// longer reach approval until guardians are added again.
    pub fn remove_guardian(
        env: Env,
        controller: Address,
        did_id: String,
        guardian: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        controller.require_auth();

        Self::resolve_active_did(&env, &did_id)?;

        let mut record =
            guardians::load(&env, &did_id, &guardian).ok_or(ContractError::GuardianNotFound)?;
        if !record.active {
            return Err(ContractError::GuardianAlreadyInactive);
        }

        record.active = false;
        guardians::store(&env, &record);

        events::emit_guardian_removed(&env, did_id, guardian, controller);
        Ok(())
    }

    // ── Recovery proposals ────────────────────────────────────────────────────

    /// Open a recovery proposal to move control of `did_id` to
    /// `new_controller`.
    ///
    /// Only an active guardian of the DID may propose. `expires_at` is an
    /// absolute ledger timestamp and must lie in the future.
    pub fn propose_recovery(
        env: Env,
        proposer: Address,
        id: String,
        did_id: String,
        new_controller: Address,
        reason: String,
        expires_at: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        proposer.require_auth();

        if id.len() == 0 {
            return Err(ContractError::InvalidInput);
        }
        if proposal::exists(&env, &id) {
            return Err(ContractError::ProposalAlreadyExists);
        }

        Self::resolve_active_did(&env, &did_id)?;

        if !guardians::is_active_guardian(&env, &did_id, &proposer) {
            return Err(ContractError::NotAGuardian);
        }

        let now = env.ledger().timestamp();
        if expires_at <= now {
            return Err(ContractError::InvalidExpiry);
        }

        let record = RecoveryProposal {
            id: id.clone(),
            did_id: did_id.clone(),
            proposer: proposer.clone(),
            new_controller: new_controller.clone(),
            reason,
            approvals: Vec::new(&env),
            rejections: Vec::new(&env),
            status: ProposalStatus::Pending,
            created_at: now,
            expires_at,
            executed_at: 0,
        };
        proposal::store(&env, &record);
        proposal::push_id(&env, &id);

        events::emit_recovery_proposed(&env, id, did_id, proposer, new_controller);
        Ok(())
    }

    /// Cast a vote on a pending proposal and settle its status.
    ///
    /// Each guardian votes once, in either direction, and the vote is
    /// immutable. After the tally the proposal is re-evaluated: reaching
    /// `recovery_threshold` approvals ratifies it; failing that, a strict
    /// majority of rejections among currently active guardians rejects it.
    /// Returns the status the proposal settled on.
    pub fn approve_recovery(
        env: Env,
        guardian: Address,
        proposal_id: String,
        approve: bool,
    ) -> Result<ProposalStatus, ContractError> {
        Self::require_initialized(&env)?;
        guardian.require_auth();

        let mut record =
            proposal::load(&env, &proposal_id).ok_or(ContractError::ProposalNotFound)?;

        if record.status != ProposalStatus::Pending {
            return Err(ContractError::ProposalNotPending);
        }
        let now = env.ledger().timestamp();
        if now >= record.expires_at {
            return Err(ContractError::ProposalExpired);
        }
        if !guardians::is_active_guardian(&env, &record.did_id, &guardian) {
            return Err(ContractError::NotAGuardian);
        }
        if proposal::has_voted(&record, &guardian) {
            return Err(ContractError::AlreadyVoted);
        }

        if approve {
            record.approvals.push_back(guardian.clone());
        } else {
            record.rejections.push_back(guardian.clone());
        }

        let threshold = Self::params_or_err(&env)?.recovery_threshold;
        let active = guardians::active_count(&env, &record.did_id);
        record.status = proposal::evaluate(
            record.approvals.len(),
            record.rejections.len(),
            threshold,
            active,
        );
        proposal::store(&env, &record);

        events::emit_recovery_vote(
            &env,
            proposal_id,
            guardian,
            approve,
            record.status.clone(),
        );
        Ok(record.status)
    }

    /// Execute a ratified proposal: transfer the DID's controller through the
    /// registry and finalize the proposal.
    ///
    /// The executor is deliberately not required to be a guardian — once the
    /// guardians have ratified the outcome, anyone may trigger it. The DID is
    /// re-checked here: a document deactivated after ratification cannot be
    /// recovered.
    pub fn execute_recovery(
        env: Env,
        executor: Address,
        proposal_id: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        executor.require_auth();

        let mut record =
            proposal::load(&env, &proposal_id).ok_or(ContractError::ProposalNotFound)?;

        if record.status != ProposalStatus::Approved {
            return Err(ContractError::ProposalNotApproved);
        }
        let now = env.ledger().timestamp();
        if now >= record.expires_at {
            return Err(ContractError::ProposalExpired);
        }

        Self::resolve_active_did(&env, &record.did_id)?;

        let registry = Self::registry_address(&env)?;
        let client = DidRegistryContractClient::new(&env, &registry);
        match client.try_transfer_controller(
            &env.current_contract_address(),
            &record.did_id,
            &record.new_controller,
        ) {
            Ok(Ok(())) => {}
            _ => return Err(ContractError::ControllerTransferFailed),
        }

        record.status = ProposalStatus::Executed;
        record.executed_at = now;
        proposal::store(&env, &record);

        events::emit_recovery_executed(
            &env,
            proposal_id,
            record.did_id,
            record.new_controller,
            executor,
        );
        Ok(())
    }

    // ── Signature shares ──────────────────────────────────────────────────────

    /// Deposit a raw signature share for a proposal.
    ///
    /// Shares are stored verbatim, one per guardian per proposal, and play no
    /// part in the vote tally or execution; aggregation happens off-chain
    /// over `list_signature_shares`.
    pub fn submit_signature_share(
        env: Env,
        signer: Address,
        proposal_id: String,
        share: Bytes,
        public_key_share: Bytes,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        signer.require_auth();

        let record =
            proposal::load(&env, &proposal_id).ok_or(ContractError::ProposalNotFound)?;

        if !guardians::is_active_guardian(&env, &record.did_id, &signer) {
            return Err(ContractError::NotAGuardian);
        }
        if shares::exists(&env, &proposal_id, &signer) {
            return Err(ContractError::ShareAlreadySubmitted);
        }

        let share_record = SignatureShare {
            proposal_id: proposal_id.clone(),
            signer: signer.clone(),
            share,
            public_key_share,
            signed_at: env.ledger().timestamp(),
        };
        shares::store(&env, &share_record);
        shares::push_signer(&env, &proposal_id, &signer);

        events::emit_signature_share(&env, proposal_id, signer);
        Ok(())
    }

    // ── Parameters ────────────────────────────────────────────────────────────

    /// Replace the module parameters (governance path, admin-gated).
    pub fn update_params(
        env: Env,
        caller: Address,
        new_params: RecoveryParams,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if !new_params.is_valid() {
            return Err(ContractError::InvalidParams);
        }
        params::store(&env, &new_params);

        events::emit_params_updated(&env, &new_params);
        Ok(())
    }

    // ── State export / import ─────────────────────────────────────────────────

    /// Snapshot every guardian, proposal, share, and the parameters.
    pub fn export_state(env: Env) -> Result<RecoveryState, ContractError> {
        let params = Self::params_or_err(&env)?;
        Ok(genesis::export(&env, params))
    }

    /// Restore a snapshot into this instance (admin-gated, genesis-style:
    /// meant for a freshly initialized instance).
    pub fn import_state(
        env: Env,
        caller: Address,
        state: RecoveryState,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if !state.params.is_valid() {
            return Err(ContractError::InvalidParams);
        }
        genesis::import(&env, &state);

        events::emit_state_imported(
            &env,
            state.guardians.len(),
            state.proposals.len(),
            state.signature_shares.len(),
        );
        Ok(())
    }

    // ── View functions ────────────────────────────────────────────────────────

    pub fn get_guardian(env: Env, did_id: String, guardian: Address) -> Option<Guardian> {
        guardians::load(&env, &did_id, &guardian)
    }

    /// Active guardians for a DID, in the order they were added.
    pub fn list_active_guardians(env: Env, did_id: String) -> Vec<Guardian> {
        guardians::list_active(&env, &did_id)
    }

    pub fn active_guardian_count(env: Env, did_id: String) -> u32 {
        guardians::active_count(&env, &did_id)
    }

    pub fn get_proposal(env: Env, proposal_id: String) -> Option<RecoveryProposal> {
        proposal::load(&env, &proposal_id)
    }

    /// Proposals in creation order, paginated.
    pub fn list_proposals(env: Env, offset: u32, limit: u32) -> Vec<RecoveryProposal> {
        let ids = proposal::ids(&env);
        let mut page = Vec::new(&env);
        let end = offset.saturating_add(limit).min(ids.len());
        for i in offset..end {
            if let Some(id) = ids.get(i) {
                if let Some(p) = proposal::load(&env, &id) {
                    page.push_back(p);
                }
            }
        }
        page
    }

    pub fn proposal_count(env: Env) -> u32 {
        proposal::ids(&env).len()
    }

    pub fn get_signature_share(
        env: Env,
        proposal_id: String,
        signer: Address,
    ) -> Option<SignatureShare> {
        shares::load(&env, &proposal_id, &signer)
    }

    /// Shares for a proposal in submission order.
    pub fn list_signature_shares(env: Env, proposal_id: String) -> Vec<SignatureShare> {
        shares::list(&env, &proposal_id)
    }

    pub fn get_params(env: Env) -> Result<RecoveryParams, ContractError> {
        Self::params_or_err(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn params_or_err(env: &Env) -> Result<RecoveryParams, ContractError> {
        params::load(env).ok_or(ContractError::NotInitialized)
    }

    fn registry_address(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&DID_REGISTRY)
            .ok_or(ContractError::NotInitialized)
    }

    /// Resolve `did_id` through the registry; the document must exist and be
    /// active.
    fn resolve_active_did(env: &Env, did_id: &String) -> Result<DidDocument, ContractError> {
        let registry = Self::registry_address(env)?;
        let client = DidRegistryContractClient::new(env, &registry);
        let doc = client
            .resolve_did(did_id)
            .ok_or(ContractError::DidNotFound)?;
        if !doc.active {
            return Err(ContractError::DidInactive);
        }
        Ok(doc)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
