//! # Recovery Testing Framework — Integration Tests
//!
//! Cross-contract suites exercising the registry + recovery pair end to end:
//! - Full recovery lifecycles observed through the DID registry
//! - Invariant verification over exported snapshots
//! - Replay determinism: midpoint export/import + identical command suffixes
//! - Property-based tests for DID syntax, parameters, the threshold
//!   evaluator, and randomly generated command logs

extern crate std;

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::{Address, String as SorobanString};

use guardian_recovery::proposal::{evaluate, ProposalStatus};
use guardian_recovery::ContractError;

use test_framework::generators::*;
use test_framework::invariants::verify_all;
use test_framework::scenario::{Command, Replay};
use test_framework::{default_params, RecoveryWorld};

// ═════════════════════════════════════════════════════════════════════════════
//  Lifecycle scenarios
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn full_recovery_lifecycle_transfers_control() {
    let world = RecoveryWorld::new(&default_params());
    let (did_id, controller) = world.register_did("did:x:alice");
    let guards = world.add_guardians(&controller, &did_id, 3);
    let recovery = world.recovery();

    let new_controller = Address::generate(&world.env);
    let pid = SorobanString::from_str(&world.env, "p1");
    recovery.propose_recovery(
        &guards[0],
        &pid,
        &did_id,
        &new_controller,
        &SorobanString::from_str(&world.env, "hardware wallet lost"),
        &(world.now() + 3_600),
    );

    assert_eq!(
        recovery.approve_recovery(&guards[0], &pid, &true),
        ProposalStatus::Pending
    );
    assert_eq!(
        recovery.approve_recovery(&guards[1], &pid, &true),
        ProposalStatus::Approved
    );

    // Ratified outcomes are permissionless to trigger.
    let executor = Address::generate(&world.env);
    recovery.execute_recovery(&executor, &pid);

    assert_eq!(world.registry().get_controller(&did_id), new_controller);
    verify_all(&recovery.export_state()).unwrap();
}

#[test]
fn rejected_recovery_never_touches_the_registry() {
    let world = RecoveryWorld::new(&default_params());
    let (did_id, controller) = world.register_did("did:x:bob");
    let guards = world.add_guardians(&controller, &did_id, 3);
    let recovery = world.recovery();

    let pid = SorobanString::from_str(&world.env, "p1");
    recovery.propose_recovery(
        &guards[0],
        &pid,
        &did_id,
        &Address::generate(&world.env),
        &SorobanString::from_str(&world.env, "disputed"),
        &(world.now() + 3_600),
    );

    recovery.approve_recovery(&guards[1], &pid, &false);
    assert_eq!(
        recovery.approve_recovery(&guards[2], &pid, &false),
        ProposalStatus::Rejected
    );

    assert_eq!(
        recovery.try_execute_recovery(&Address::generate(&world.env), &pid),
        Err(Ok(ContractError::ProposalNotApproved))
    );
    // Control never moved.
    assert_eq!(world.registry().get_controller(&did_id), controller);
    verify_all(&recovery.export_state()).unwrap();
}

#[test]
fn expired_proposal_stays_pending_in_storage() {
    let world = RecoveryWorld::new(&default_params());
    let (did_id, controller) = world.register_did("did:x:carol");
    let guards = world.add_guardians(&controller, &did_id, 2);
    let recovery = world.recovery();

    let pid = SorobanString::from_str(&world.env, "p1");
    recovery.propose_recovery(
        &guards[0],
        &pid,
        &did_id,
        &Address::generate(&world.env),
        &SorobanString::from_str(&world.env, "too slow"),
        &(world.now() + 1),
    );

    world.advance_time(2);
    assert_eq!(
        recovery.try_approve_recovery(&guards[0], &pid, &true),
        Err(Ok(ContractError::ProposalExpired))
    );
    // Lazy expiry: no sweep ever finalizes the record.
    assert_eq!(
        recovery.get_proposal(&pid).unwrap().status,
        ProposalStatus::Pending
    );
    verify_all(&recovery.export_state()).unwrap();
}

// ═════════════════════════════════════════════════════════════════════════════
//  Replay determinism
// ═════════════════════════════════════════════════════════════════════════════

/// Export at a midpoint, import into a fresh pair, replay the identical
/// suffix on both, and require bit-identical final snapshots.
#[test]
fn midpoint_snapshot_plus_replay_matches_full_run() {
    let world_a = RecoveryWorld::new(&default_params());
    let stage_a = Replay::stage(&world_a, "did:x:replay", CAST);

    let prefix = [
        Command::AddGuardian { guardian: 0 },
        Command::AddGuardian { guardian: 1 },
        Command::AddGuardian { guardian: 2 },
        Command::ProposeRecovery { id: 0, proposer: 0, new_controller: 5, expires_in: 3_600 },
        Command::ApproveRecovery { id: 0, guardian: 0, approve: true },
        Command::SubmitSignatureShare { id: 0, signer: 1, blob: 0xAB },
    ];
    let suffix = [
        Command::ApproveRecovery { id: 0, guardian: 1, approve: true },
        Command::ExecuteRecovery { id: 0, executor: 4 },
        Command::ProposeRecovery { id: 1, proposer: 2, new_controller: 3, expires_in: 600 },
        Command::ApproveRecovery { id: 1, guardian: 2, approve: false },
        Command::RemoveGuardian { guardian: 2 },
    ];

    stage_a.apply_all(&prefix);
    let midpoint = world_a.recovery().export_state();

    // Fresh pair in the same env, restored from the midpoint snapshot.
    let world_b = world_a.sibling(&default_params());
    let stage_b = stage_a.restage(&world_b, "did:x:replay");
    world_b.recovery().import_state(&world_b.admin, &midpoint);
    assert_eq!(world_b.recovery().export_state(), midpoint);

    stage_a.apply_all(&suffix);
    stage_b.apply_all(&suffix);

    let final_a = world_a.recovery().export_state();
    let final_b = world_b.recovery().export_state();
    assert_eq!(final_a, final_b);
    verify_all(&final_a).unwrap();
}

// ═════════════════════════════════════════════════════════════════════════════
//  Property-based tests
// ═════════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    /// **Property**: every generated well-formed DID registers successfully.
    #[test]
    fn prop_valid_dids_accepted(did in valid_did_strategy()) {
        let world = RecoveryWorld::new(&default_params());
        let controller = Address::generate(&world.env);
        let id = SorobanString::from_str(&world.env, &did);
        let result = world.registry().try_register_did(&controller, &id);
        prop_assert!(result.is_ok(), "rejected valid DID {did}");
    }

    /// **Property**: every generated malformed DID is rejected.
    #[test]
    fn prop_invalid_dids_rejected(did in invalid_did_strategy()) {
        let world = RecoveryWorld::new(&default_params());
        let controller = Address::generate(&world.env);
        let id = SorobanString::from_str(&world.env, &did);
        let result = world.registry().try_register_did(&controller, &id);
        prop_assert!(result.is_err(), "accepted malformed DID {did}");
    }

    /// **Property**: parameter validation accepts exactly the valid region.
    #[test]
    fn prop_params_validation(valid in params_strategy(), invalid in invalid_params_strategy()) {
        prop_assert!(valid.is_valid());
        prop_assert!(!invalid.is_valid());
    }

    /// **Property**: the evaluator never fabricates execution, ratifies at
    /// the threshold regardless of rejections, and otherwise rejects only on
    /// a strict active-guardian majority.
    #[test]
    fn prop_evaluate_transitions(
        approvals in 0u32..10,
        rejections in 0u32..10,
        threshold in 1u32..6,
        active in 1u32..10,
    ) {
        let status = evaluate(approvals, rejections, threshold, active);
        prop_assert_ne!(status.clone(), ProposalStatus::Executed);
        if approvals >= threshold {
            prop_assert_eq!(status, ProposalStatus::Approved);
        } else if rejections > active / 2 {
            prop_assert_eq!(status, ProposalStatus::Rejected);
        } else {
            prop_assert_eq!(status, ProposalStatus::Pending);
        }
    }

    /// **Property**: arbitrary command logs leave the store in a state where
    /// every structural invariant holds.
    #[test]
    fn prop_invariants_hold_after_any_command_log(log in command_log_strategy(24)) {
        let world = RecoveryWorld::new(&default_params());
        let stage = Replay::stage(&world, "did:x:fuzzed", CAST);
        stage.apply_all(&log);
        let snapshot = world.recovery().export_state();
        if let Err(violations) = verify_all(&snapshot) {
            prop_assert!(false, "invariant violations: {violations:?}");
        }
    }

    /// **Property**: two instances fed the same command log from the same
    /// midpoint snapshot end in identical states.
    #[test]
    fn prop_replay_is_deterministic(
        log in command_log_strategy(24),
        split in any::<prop::sample::Index>(),
    ) {
        let world_a = RecoveryWorld::new(&default_params());
        let stage_a = Replay::stage(&world_a, "did:x:fork", CAST);

        let cut = split.index(log.len() + 1);
        let (prefix, suffix) = log.split_at(cut);

        stage_a.apply_all(prefix);
        let midpoint = world_a.recovery().export_state();

        let world_b = world_a.sibling(&default_params());
        let stage_b = stage_a.restage(&world_b, "did:x:fork");
        world_b.recovery().import_state(&world_b.admin, &midpoint);

        stage_a.apply_all(suffix);
        stage_b.apply_all(suffix);

        prop_assert_eq!(
            world_a.recovery().export_state(),
            world_b.recovery().export_state()
        );
    }
}
