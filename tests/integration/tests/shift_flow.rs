//! End-to-end shift ledger tests against the in-memory store

use integration_tests::*;

use shift_core::{Effect, ShiftId, ShiftStatus, Snowflake};
use shift_service::{Action, ActionRequest, BulkFilterRequest, StartShiftRequest};

fn start_action() -> Action {
    Action::ShiftStart {
        request: StartShiftRequest::default(),
        via_button: false,
    }
}

fn request(actor: shift_service::Actor, action: Action) -> ActionRequest {
    ActionRequest {
        actor,
        guild_id: GUILD,
        action,
    }
}

#[tokio::test]
async fn full_lifecycle_accounts_durations() {
    let h = harness_at(1000);
    let alice = member(1);

    // start at t=1000
    let outcome = h.dispatcher.handle(request(alice.clone(), start_action())).await;
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Active);
    assert_eq!(shift.start_ts, 1000);
    assert_eq!(shift.total_seconds, 0);
    assert!(outcome
        .effects
        .iter()
        .any(|e| matches!(e, Effect::GrantShiftRole { role_id, .. } if *role_id == SHIFT_ROLE)));
    assert!(outcome
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Broadcast { channel_id, .. } if *channel_id == LOG_CHANNEL)));

    // pause at t=1500 -> 500s banked
    h.clock.set(1500);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: None }))
        .await;
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Paused);
    assert_eq!(shift.total_seconds, 500);
    assert_eq!(shift.pause_ts, Some(1500));

    // resume at t=2000 -> interval clock restarts
    h.clock.set(2000);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftResume { shift_id: None }))
        .await;
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Active);
    assert_eq!(shift.start_ts, 2000);
    assert_eq!(shift.resume_ts, Some(2000));
    assert_eq!(shift.total_seconds, 500);

    // end at t=2300 -> 500 + 300
    h.clock.set(2300);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftEnd { shift_id: None }))
        .await;
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Ended);
    assert_eq!(shift.end_ts, Some(2300));
    assert_eq!(shift.total_seconds, 800);
    assert!(outcome
        .effects
        .iter()
        .any(|e| matches!(e, Effect::RevokeShiftRole { .. })));

    // audit trail covers every step
    for action in ["shift_start", "shift_pause", "shift_resume", "shift_end"] {
        assert_eq!(h.audit.entries_with_action(action).len(), 1, "{action}");
    }
}

#[tokio::test]
async fn pause_without_active_shift_is_rejected() {
    let h = harness();
    let outcome = h
        .dispatcher
        .handle(request(member(1), Action::ShiftPause { shift_id: None }))
        .await;
    let message = expect_error(&outcome);
    assert!(message.contains("No active shift"));
}

#[tokio::test]
async fn double_pause_is_rejected_and_leaves_record_unchanged() {
    let h = harness_at(1000);
    let alice = member(1);

    let outcome = h.dispatcher.handle(request(alice.clone(), start_action())).await;
    let id = expect_shift(&outcome).id;

    h.clock.set(1200);
    h.dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: None }))
        .await;

    let before = h.ctx.shift_repo().find_by_id(id).await.unwrap().unwrap();

    // second pause goes through the button path with the explicit id
    h.clock.set(1300);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: Some(id) }))
        .await;
    expect_error(&outcome);

    let after = h.ctx.shift_repo().find_by_id(id).await.unwrap().unwrap();
    assert_eq!(before, after, "rejected pause must not modify the record");
    assert_eq!(after.total_seconds, 200);
}

#[tokio::test]
async fn resume_resets_interval_clock() {
    let h = harness_at(1000);
    let alice = member(1);

    h.dispatcher.handle(request(alice.clone(), start_action())).await;
    h.clock.set(4000);
    h.dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: None }))
        .await;

    // a long pause gap must never count toward the total
    h.clock.set(50_000);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftResume { shift_id: None }))
        .await;
    assert_eq!(expect_shift(&outcome).start_ts, 50_000);

    h.clock.set(50_010);
    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftEnd { shift_id: None }))
        .await;
    assert_eq!(expect_shift(&outcome).total_seconds, 3000 + 10);
}

#[tokio::test]
async fn non_owner_cannot_pause_and_nothing_is_logged() {
    let h = harness_at(1000);
    let alice = member(1);
    let mallory = member(2);

    let outcome = h.dispatcher.handle(request(alice, start_action())).await;
    let id = expect_shift(&outcome).id;
    let audit_count = h.audit.entries().len();

    let outcome = h
        .dispatcher
        .handle(request(mallory, Action::ShiftPause { shift_id: Some(id) }))
        .await;
    let message = expect_error(&outcome);
    assert!(message.contains("Not the owner"));

    let shift = h.ctx.shift_repo().find_by_id(id).await.unwrap().unwrap();
    assert_eq!(shift.status, ShiftStatus::Active, "no mutation on rejection");
    assert_eq!(h.audit.entries().len(), audit_count, "no audit on rejection");
}

#[tokio::test]
async fn admin_may_pause_another_members_shift() {
    let h = harness_at(1000);
    let outcome = h.dispatcher.handle(request(member(1), start_action())).await;
    let id = expect_shift(&outcome).id;

    h.clock.set(1100);
    let outcome = h
        .dispatcher
        .handle(request(admin(9), Action::ShiftPause { shift_id: Some(id) }))
        .await;
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Paused);
    // button path carries the explicit id, so the button tag is recorded
    assert_eq!(h.audit.entries_with_action("shift_pause_button").len(), 1);
}

#[tokio::test]
async fn force_end_requires_admin() {
    let h = harness_at(1000);
    let outcome = h.dispatcher.handle(request(member(1), start_action())).await;
    let id = expect_shift(&outcome).id;

    let outcome = h
        .dispatcher
        .handle(request(
            member(2),
            Action::ShiftForceEnd {
                shift_id: Some(id),
                target_user_id: None,
            },
        ))
        .await;
    assert!(expect_error(&outcome).contains("Admin rights required"));

    // the management permission bit alone is enough
    let outcome = h
        .dispatcher
        .handle(request(
            manager(3),
            Action::ShiftForceEnd {
                shift_id: None,
                target_user_id: Some(Snowflake::new(1)),
            },
        ))
        .await;
    assert_eq!(expect_shift(&outcome).status, ShiftStatus::Ended);
    assert_eq!(h.audit.entries_with_action("shift_forceend").len(), 1);
}

#[tokio::test]
async fn audit_failure_never_fails_the_operation() {
    let h = harness_at(1000);
    let alice = member(1);
    h.dispatcher.handle(request(alice.clone(), start_action())).await;

    h.audit.fail_next_append();
    h.clock.set(1500);
    let outcome = h
        .dispatcher
        .handle(request(alice, Action::ShiftPause { shift_id: None }))
        .await;

    // the mutation stands even though its audit write was dropped
    let shift = expect_shift(&outcome);
    assert_eq!(shift.status, ShiftStatus::Paused);
    assert_eq!(shift.total_seconds, 500);
    assert!(h.audit.entries_with_action("shift_pause").is_empty());
}

#[tokio::test]
async fn start_never_checks_for_an_existing_open_shift() {
    // Duplicate open shifts per user are allowed; the ledger only offers
    // find_open for surfaces that want to pre-check.
    let h = harness_at(1000);
    let alice = member(1);

    h.dispatcher.handle(request(alice.clone(), start_action())).await;
    let outcome = h.dispatcher.handle(request(alice, start_action())).await;
    assert_eq!(expect_shift(&outcome).status, ShiftStatus::Active);
    assert_eq!(h.shifts.len(), 2);
}

#[tokio::test]
async fn bulk_end_filters_and_isolates_failures() {
    let h = harness_at(1000);
    for user in 1..=3 {
        h.dispatcher.handle(request(member(user), start_action())).await;
    }
    // one shift already paused; still "open" and must be bulk-ended too
    h.clock.set(1100);
    h.dispatcher
        .handle(request(member(3), Action::ShiftPause { shift_id: None }))
        .await;

    // second record's end is made to fail; the others must still process
    h.shifts.fail_end_for(ShiftId::new(2));

    h.clock.set(2000);
    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkEnd {
                filter: BulkFilterRequest::default(),
            },
        ))
        .await;
    assert_eq!(expect_processed(&outcome), 2);
    assert_eq!(h.audit.entries_with_action("shift_bulk_end").len(), 2);

    let survivor = h
        .ctx
        .shift_repo()
        .find_by_id(ShiftId::new(2))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(survivor.status, ShiftStatus::Active, "failed record untouched");
}

#[tokio::test]
async fn bulk_end_respects_user_and_date_filters() {
    let h = harness_at(1_704_000_000); // 2023-12-31
    h.dispatcher.handle(request(member(1), start_action())).await;

    h.clock.set(1_704_200_000); // past 2024-01-01 midnight
    h.dispatcher.handle(request(member(2), start_action())).await;

    // only shifts started before 2024-01-01 match
    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkEnd {
                filter: BulkFilterRequest {
                    before: Some("2024-01-01".to_string()),
                    ..Default::default()
                },
            },
        ))
        .await;
    assert_eq!(expect_processed(&outcome), 1);

    // user filter matches nothing that is still open
    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkEnd {
                filter: BulkFilterRequest {
                    user_id: Some(Snowflake::new(1)),
                    ..Default::default()
                },
            },
        ))
        .await;
    assert_eq!(expect_processed(&outcome), 0);
}

#[tokio::test]
async fn bulk_end_rejects_non_admin() {
    let h = harness();
    let outcome = h
        .dispatcher
        .handle(request(
            member(1),
            Action::ShiftBulkEnd {
                filter: BulkFilterRequest::default(),
            },
        ))
        .await;
    assert!(expect_error(&outcome).contains("Admin rights required"));
}

#[tokio::test]
async fn bulk_delete_requires_a_bounded_filter() {
    let h = harness();
    h.dispatcher.handle(request(member(1), start_action())).await;

    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkDelete {
                filter: BulkFilterRequest::default(),
            },
        ))
        .await;
    assert!(expect_error(&outcome).contains("narrow it"));
    assert_eq!(h.shifts.len(), 1);
}

#[tokio::test]
async fn bulk_delete_intersects_ids_with_filters_and_logs_each_row() {
    let h = harness_at(1000);
    for user in 1..=2 {
        h.dispatcher.handle(request(member(user), start_action())).await;
    }
    // ended shifts can be deleted too
    h.dispatcher
        .handle(request(member(1), Action::ShiftEnd { shift_id: None }))
        .await;

    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkDelete {
                filter: BulkFilterRequest {
                    user_id: Some(Snowflake::new(1)),
                    ids: Some("1,2".to_string()),
                    ..Default::default()
                },
            },
        ))
        .await;
    // id list intersected with the user filter: only shift 1 belongs to user 1
    assert_eq!(expect_processed(&outcome), 1);
    assert_eq!(h.audit.entries_with_action("shift_bulk_delete").len(), 1);
    assert_eq!(h.shifts.len(), 1);
}

#[tokio::test]
async fn bulk_delete_empty_match_deletes_and_logs_nothing() {
    let h = harness();
    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkDelete {
                filter: BulkFilterRequest {
                    user_id: Some(Snowflake::new(42)),
                    ..Default::default()
                },
            },
        ))
        .await;
    assert_eq!(expect_processed(&outcome), 0);
    assert!(h.audit.entries_with_action("shift_bulk_delete").is_empty());
}

#[tokio::test]
async fn bulk_delete_rejects_garbage_id_list() {
    let h = harness();
    let outcome = h
        .dispatcher
        .handle(request(
            admin(9),
            Action::ShiftBulkDelete {
                filter: BulkFilterRequest {
                    ids: Some("x,y".to_string()),
                    ..Default::default()
                },
            },
        ))
        .await;
    assert!(expect_error(&outcome).contains("No valid ids"));
}

#[tokio::test]
async fn read_accessors_see_open_shifts_only() {
    let h = harness_at(1000);
    let alice = member(1);
    let shifts = shift_service::ShiftService::new(&h.ctx);

    assert!(shifts
        .get_open(Snowflake::new(1), GUILD)
        .await
        .unwrap()
        .is_none());

    let outcome = h.dispatcher.handle(request(alice.clone(), start_action())).await;
    let id = expect_shift(&outcome).id;

    let open = shifts.get_open(Snowflake::new(1), GUILD).await.unwrap().unwrap();
    assert_eq!(open.id, id);

    // paused still counts as open
    h.clock.set(1100);
    h.dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: None }))
        .await;
    assert!(shifts.get_open(Snowflake::new(1), GUILD).await.unwrap().is_some());

    h.dispatcher
        .handle(request(alice, Action::ShiftEnd { shift_id: None }))
        .await;
    assert!(shifts.get_open(Snowflake::new(1), GUILD).await.unwrap().is_none());

    let by_id = shifts.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(by_id.status, ShiftStatus::Ended);
    assert!(shifts.get_by_id(ShiftId::new(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn logs_listing_is_newest_first_and_clamped() {
    let h = harness_at(1000);
    let alice = member(1);

    h.dispatcher.handle(request(alice.clone(), start_action())).await;
    h.clock.set(2000);
    h.dispatcher
        .handle(request(alice.clone(), Action::ShiftPause { shift_id: None }))
        .await;

    let outcome = h
        .dispatcher
        .handle(request(alice.clone(), Action::ShiftLogs { limit: None }))
        .await;
    let listing = expect_listing(&outcome);
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("shift_pause"), "newest first: {listing}");

    // an oversized limit clamps rather than failing
    let outcome = h
        .dispatcher
        .handle(request(alice, Action::ShiftLogs { limit: Some(10_000) }))
        .await;
    assert_eq!(expect_listing(&outcome).lines().count(), 2);
}
