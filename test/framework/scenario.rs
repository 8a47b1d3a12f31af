//! # Command Log Model + Replay Driver
//!
//! Models the inbound command stream as plain data so the same log can be
//! replayed against multiple contract instances. Participants are referred
//! to by roster index rather than by address, which makes generated logs
//! portable across instances within one env.
//!
//! Commands that fail their preconditions are part of normal log semantics:
//! a failed command mutates nothing on any replica, so the driver applies
//! every command through `try_` calls and ignores the outcome.

extern crate std;

use soroban_sdk::{Address, Bytes, String};

use crate::RecoveryWorld;

/// The fixed pool of proposal ids used by generated logs.
pub const PROPOSAL_IDS: [&str; 3] = ["prop-a", "prop-b", "prop-c"];

/// One inbound command, with participants referenced by roster index.
#[derive(Clone, Debug)]
pub enum Command {
    AddGuardian { guardian: usize },
    RemoveGuardian { guardian: usize },
    ProposeRecovery { id: usize, proposer: usize, new_controller: usize, expires_in: u64 },
    ApproveRecovery { id: usize, guardian: usize, approve: bool },
    ExecuteRecovery { id: usize, executor: usize },
    SubmitSignatureShare { id: usize, signer: usize, blob: u8 },
}

/// A world plus the cast of addresses a command log refers to.
pub struct Replay<'a> {
    pub world: &'a RecoveryWorld,
    pub did_id: String,
    pub controller: Address,
    pub roster: std::vec::Vec<Address>,
}

impl<'a> Replay<'a> {
    /// Set the stage: one DID and a roster of `cast` candidate addresses.
    pub fn stage(world: &'a RecoveryWorld, did: &str, cast: usize) -> Self {
        let (did_id, controller) = world.register_did(did);
        let mut roster = std::vec::Vec::new();
        for _ in 0..cast {
            roster.push(<soroban_sdk::Address as soroban_sdk::testutils::Address>::generate(&world.env));
        }
        Self {
            world,
            did_id,
            controller,
            roster,
        }
    }

    /// A second stage for the same cast on a sibling world. The DID is
    /// registered fresh in the sibling's registry under the same id.
    pub fn restage(&self, world: &'a RecoveryWorld, did: &str) -> Replay<'a> {
        let did_id = String::from_str(&world.env, did);
        world.registry().register_did(&self.controller, &did_id);
        Replay {
            world,
            did_id,
            controller: self.controller.clone(),
            roster: self.roster.clone(),
        }
    }

    fn proposal_id(&self, idx: usize) -> String {
        String::from_str(&self.world.env, PROPOSAL_IDS[idx % PROPOSAL_IDS.len()])
    }

    fn member(&self, idx: usize) -> &Address {
        &self.roster[idx % self.roster.len()]
    }

    /// Apply one command; precondition failures are ignored by design.
    pub fn apply(&self, cmd: &Command) {
        let recovery = self.world.recovery();
        let pk = String::from_str(&self.world.env, "pk");
        match cmd {
            Command::AddGuardian { guardian } => {
                let _ = recovery.try_add_guardian(
                    &self.controller,
                    &self.did_id,
                    self.member(*guardian),
                    &pk,
                );
            }
            Command::RemoveGuardian { guardian } => {
                let _ = recovery.try_remove_guardian(
                    &self.controller,
                    &self.did_id,
                    self.member(*guardian),
                );
            }
            Command::ProposeRecovery {
                id,
                proposer,
                new_controller,
                expires_in,
            } => {
                let _ = recovery.try_propose_recovery(
                    self.member(*proposer),
                    &self.proposal_id(*id),
                    &self.did_id,
                    self.member(*new_controller),
                    &String::from_str(&self.world.env, "generated"),
                    &(self.world.now() + expires_in),
                );
            }
            Command::ApproveRecovery {
                id,
                guardian,
                approve,
            } => {
                let _ = recovery.try_approve_recovery(
                    self.member(*guardian),
                    &self.proposal_id(*id),
                    approve,
                );
            }
            Command::ExecuteRecovery { id, executor } => {
                let _ = recovery.try_execute_recovery(
                    self.member(*executor),
                    &self.proposal_id(*id),
                );
            }
            Command::SubmitSignatureShare { id, signer, blob } => {
                let bytes = Bytes::from_array(&self.world.env, &[*blob; 32]);
                let _ = recovery.try_submit_signature_share(
                    self.member(*signer),
                    &self.proposal_id(*id),
                    &bytes,
                    &bytes,
                );
            }
        }
    }

    pub fn apply_all(&self, log: &[Command]) {
        for cmd in log {
            self.apply(cmd);
        }
    }
}
