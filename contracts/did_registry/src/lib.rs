#![no_std]

//! # DID Registry
//!
//! Durable store of DID documents for the ledger's identity suite:
//!
//! - **Registration**: syntax-checked `did:<method>:<id>` identifiers, one
//!   document per id, created active under the registering controller.
//! - **Resolution**: any caller may resolve a document; deactivated documents
//!   still resolve so audit trails stay intact.
//! - **Lifecycle**: the controller may deactivate and reactivate a document.
//! - **Controller transfer**: control moves either by the current controller's
//!   own signature or through the registered recovery contract, which is how
//!   guardian-approved recoveries take effect.
//!
//! The registry never deletes a record.

pub mod did;
pub mod events;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, String, Symbol, Vec};

pub use did::DidDocument;

// ── Storage key constants ─────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const INITIALIZED: Symbol = symbol_short!("INIT");
const RECOVERY_CONTRACT: Symbol = symbol_short!("REC_CTR");

// ── Error codes ───────────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum DidError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    MissingPrefix = 4,
    MissingMethod = 5,
    MissingIdentifier = 6,
    InvalidCharacters = 7,
    DidTooLong = 8,
    AlreadyRegistered = 9,
    NotFound = 10,
    AlreadyDeactivated = 11,
    AlreadyActive = 12,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct DidRegistryContract;

#[contractimpl]
impl DidRegistryContract {
    /// Bootstrap the registry with an admin address.
    ///
    /// The admin's only privilege is wiring the recovery contract; document
    /// lifecycle is entirely controller-driven.
    pub fn initialize(env: Env, admin: Address) -> Result<(), DidError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(DidError::AlreadyInitialized);
        }
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        Ok(())
    }

    /// Register the address authorized to transfer controllers on behalf of
    /// ratified recovery proposals.
    pub fn set_recovery_contract(
        env: Env,
        caller: Address,
        recovery: Address,
    ) -> Result<(), DidError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;
        env.storage().instance().set(&RECOVERY_CONTRACT, &recovery);
        Ok(())
    }

    // ── Document lifecycle ────────────────────────────────────────────────────

    /// Register a new DID document under `controller`.
    pub fn register_did(env: Env, controller: Address, did_id: String) -> Result<(), DidError> {
        Self::require_initialized(&env)?;
        controller.require_auth();

        did::validate_did_format(&did_id)?;
        if did::exists(&env, &did_id) {
            return Err(DidError::AlreadyRegistered);
        }

        let now = env.ledger().timestamp();
        let doc = DidDocument {
            id: did_id.clone(),
            controller: controller.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        did::store(&env, &doc);
        did::push_id(&env, &did_id);

        events::emit_did_registered(&env, did_id, controller);
        Ok(())
    }

    /// Mark a document inactive. Inactive documents still resolve.
    pub fn deactivate_did(env: Env, controller: Address, did_id: String) -> Result<(), DidError> {
        Self::require_initialized(&env)?;
        controller.require_auth();

        let mut doc = did::load(&env, &did_id).ok_or(DidError::NotFound)?;
        if doc.controller != controller {
            return Err(DidError::Unauthorized);
        }
        if !doc.active {
            return Err(DidError::AlreadyDeactivated);
        }

        doc.active = false;
        doc.updated_at = env.ledger().timestamp();
        did::store(&env, &doc);

        events::emit_did_status_changed(&env, did_id, false);
        Ok(())
    }

    /// Reactivate a previously deactivated document.
    pub fn reactivate_did(env: Env, controller: Address, did_id: String) -> Result<(), DidError> {
        Self::require_initialized(&env)?;
        controller.require_auth();

        let mut doc = did::load(&env, &did_id).ok_or(DidError::NotFound)?;
        if doc.controller != controller {
            return Err(DidError::Unauthorized);
        }
        if doc.active {
            return Err(DidError::AlreadyActive);
        }

        doc.active = true;
        doc.updated_at = env.ledger().timestamp();
        did::store(&env, &doc);

        events::emit_did_status_changed(&env, did_id, true);
        Ok(())
    }

    /// Move control of `did_id` to `new_controller`.
    ///
    /// Authorized callers are the document's current controller (ordinary key
    /// rotation) and the registered recovery contract (guardian-ratified
    /// recovery). The caller authenticates itself; a contract caller passes
    /// its own address, which the host authorizes as the direct invoker.
    pub fn transfer_controller(
        env: Env,
        caller: Address,
        did_id: String,
        new_controller: Address,
    ) -> Result<(), DidError> {
        Self::require_initialized(&env)?;
        caller.require_auth();

        let mut doc = did::load(&env, &did_id).ok_or(DidError::NotFound)?;

        let recovery: Option<Address> = env.storage().instance().get(&RECOVERY_CONTRACT);
        let authorized = caller == doc.controller || recovery.is_some_and(|r| caller == r);
        if !authorized {
            return Err(DidError::Unauthorized);
        }

        let old_controller = doc.controller.clone();
        doc.controller = new_controller.clone();
        doc.updated_at = env.ledger().timestamp();
        did::store(&env, &doc);

        events::emit_controller_transferred(&env, did_id, old_controller, new_controller);
        Ok(())
    }

    // ── View functions ────────────────────────────────────────────────────────

    /// Resolve a document by id. `None` when the id was never registered.
    pub fn resolve_did(env: Env, did_id: String) -> Option<DidDocument> {
        did::load(&env, &did_id)
    }

    pub fn is_did_active(env: Env, did_id: String) -> bool {
        did::load(&env, &did_id).map(|d| d.active).unwrap_or(false)
    }

    pub fn get_controller(env: Env, did_id: String) -> Result<Address, DidError> {
        did::load(&env, &did_id)
            .map(|d| d.controller)
            .ok_or(DidError::NotFound)
    }

    /// Registered ids in registration order, paginated.
    pub fn list_dids(env: Env, offset: u32, limit: u32) -> Vec<String> {
        let ids = did::all_ids(&env);
        let mut page = Vec::new(&env);
        let end = offset.saturating_add(limit).min(ids.len());
        for i in offset..end {
            if let Some(id) = ids.get(i) {
                page.push_back(id);
            }
        }
        page
    }

    pub fn did_count(env: Env) -> u32 {
        did::all_ids(&env).len()
    }

    pub fn get_recovery_contract(env: Env) -> Option<Address> {
        env.storage().instance().get(&RECOVERY_CONTRACT)
    }

    pub fn get_admin(env: Env) -> Result<Address, DidError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(DidError::NotInitialized)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), DidError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(DidError::NotInitialized);
        }
        Ok(())
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<(), DidError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(DidError::NotInitialized)?;
        if *caller != admin {
            return Err(DidError::Unauthorized);
        }
        Ok(())
    }
}
