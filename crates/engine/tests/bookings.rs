use sea_orm::{ConnectionTrait, Database, Statement};
use uuid::Uuid;

use engine::{
    BookingStatus, CastBookingVoteCmd, CreateBlackoutCmd, CreateBookingCmd, Engine, EngineError,
    NewPropertyCmd, OwnershipRole, UpsertOwnershipCmd, VoteChoice,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bruno", "carla", "dario"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    Engine::builder().database(db).build().await.unwrap()
}

/// Property with voting powers alice=2, bruno=1, carla=1 (total 4,
/// threshold 3) and the rates from the pricing scenario.
async fn seeded_property(engine: &Engine) -> Uuid {
    let property = engine
        .new_property(
            NewPropertyCmd::new("Baita al Lago", "alice")
                .nightly_rate_cents(35_000)
                .cleaning_fee_cents(12_000)
                .min_nights(1),
        )
        .await
        .unwrap();

    engine
        .upsert_ownership(
            UpsertOwnershipCmd::new(property.id, "alice", "alice", 5000, 2)
                .role(OwnershipRole::Primary)
                .blackout_manager(true)
                .expense_approver(true),
        )
        .await
        .unwrap();
    engine
        .upsert_ownership(
            UpsertOwnershipCmd::new(property.id, "alice", "bruno", 3000, 1).expense_approver(true),
        )
        .await
        .unwrap();
    engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "carla", 2000, 1))
        .await
        .unwrap();

    property.id
}

async fn ownership_of(engine: &Engine, property_id: Uuid, username: &str) -> Uuid {
    engine
        .property_detail(property_id, "alice")
        .await
        .unwrap()
        .ownerships
        .into_iter()
        .find(|o| o.user_id == username)
        .expect("missing ownership")
        .id
}

#[tokio::test]
async fn booking_approval_happy_path() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    // 3 nights x 35000 + 12000 cleaning = 117000.
    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-07-01",
            "2026-07-04",
        ))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_cents, 117_000);
    assert_eq!(booking.stay.nights(), 3);

    let alice_ownership = ownership_of(&engine, property_id, "alice").await;
    let bruno_ownership = ownership_of(&engine, property_id, "bruno").await;

    let detail = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            alice_ownership,
            "alice",
            VoteChoice::Approve,
        ))
        .await
        .unwrap();
    // 2 of 4 power: short of the threshold of 3, still pending.
    assert_eq!(detail.booking.status, BookingStatus::Pending);
    assert_eq!(detail.tally.approvals_power, 2);
    assert_eq!(detail.tally.threshold, 3);

    let detail = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            bruno_ownership,
            "bruno",
            VoteChoice::Approve,
        ))
        .await
        .unwrap();
    assert_eq!(detail.booking.status, BookingStatus::Approved);
    assert_eq!(
        detail.booking.decision_summary.as_deref(),
        Some("Approved with 3/4 voting power")
    );

    // The transition is persisted, not just reflected in the return value.
    let refreshed = engine.booking_detail(booking.id, "carla").await.unwrap();
    assert_eq!(refreshed.booking.status, BookingStatus::Approved);
}

#[tokio::test]
async fn majority_rejection_closes_the_booking() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "bruno",
            "2026-08-01",
            "2026-08-05",
        ))
        .await
        .unwrap();

    let alice_ownership = ownership_of(&engine, property_id, "alice").await;
    let carla_ownership = ownership_of(&engine, property_id, "carla").await;

    engine
        .cast_booking_vote(
            CastBookingVoteCmd::new(booking.id, alice_ownership, "alice", VoteChoice::Reject)
                .rationale("already hosting that week"),
        )
        .await
        .unwrap();
    let detail = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            carla_ownership,
            "carla",
            VoteChoice::Reject,
        ))
        .await
        .unwrap();

    assert_eq!(detail.booking.status, BookingStatus::Rejected);
    assert_eq!(
        detail.booking.decision_summary.as_deref(),
        Some("Rejected with 3/4 voting power")
    );

    // Decided bookings are closed for voting.
    let bruno_ownership = ownership_of(&engine, property_id, "bruno").await;
    let err = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            bruno_ownership,
            "bruno",
            VoteChoice::Approve,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn revoting_upserts_instead_of_double_counting() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-07-10",
            "2026-07-12",
        ))
        .await
        .unwrap();
    let carla_ownership = ownership_of(&engine, property_id, "carla").await;

    let detail = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            carla_ownership,
            "carla",
            VoteChoice::Approve,
        ))
        .await
        .unwrap();
    assert_eq!(detail.votes.len(), 1);
    assert_eq!(detail.tally.approvals_power, 1);

    let detail = engine
        .cast_booking_vote(
            CastBookingVoteCmd::new(booking.id, carla_ownership, "carla", VoteChoice::Reject)
                .rationale("changed my mind"),
        )
        .await
        .unwrap();
    // Still exactly one vote row, now carrying the latest choice.
    assert_eq!(detail.votes.len(), 1);
    assert_eq!(detail.votes[0].choice, VoteChoice::Reject);
    assert_eq!(detail.tally.approvals_power, 0);
    assert_eq!(detail.tally.rejections_power, 1);
    assert_eq!(detail.booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn voting_requires_membership_and_own_ownership() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-07-20",
            "2026-07-22",
        ))
        .await
        .unwrap();
    let bruno_ownership = ownership_of(&engine, property_id, "bruno").await;

    // dario is a user but holds no stake: same NotFound as a missing booking.
    let err = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            bruno_ownership,
            "dario",
            VoteChoice::Approve,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    // alice cannot vote through bruno's ownership.
    let err = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            bruno_ownership,
            "alice",
            VoteChoice::Approve,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn overlapping_requests_conflict_but_adjacent_ones_do_not() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-07-01",
            "2026-07-05",
        ))
        .await
        .unwrap();

    // One shared night conflicts, even against a still-pending request.
    let err = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "bruno",
            "2026-07-04",
            "2026-07-06",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Checkout day is free for the next check-in.
    let adjacent = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "bruno",
            "2026-07-05",
            "2026-07-08",
        ))
        .await
        .unwrap();
    assert_eq!(adjacent.status, BookingStatus::Pending);
}

#[tokio::test]
async fn cancelled_and_rejected_bookings_free_their_dates() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "carla",
            "2026-09-01",
            "2026-09-05",
        ))
        .await
        .unwrap();
    engine.cancel_booking(booking.id, "carla").await.unwrap();

    let rebooked = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "bruno",
            "2026-09-01",
            "2026-09-05",
        ))
        .await
        .unwrap();

    let alice_ownership = ownership_of(&engine, property_id, "alice").await;
    let bruno_ownership = ownership_of(&engine, property_id, "bruno").await;
    engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            rebooked.id,
            alice_ownership,
            "alice",
            VoteChoice::Reject,
        ))
        .await
        .unwrap();
    engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            rebooked.id,
            bruno_ownership,
            "bruno",
            VoteChoice::Reject,
        ))
        .await
        .unwrap();

    // Rejected as well: the range opens up again.
    engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-09-01",
            "2026-09-05",
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancel_is_for_the_requester_or_primary_and_only_while_pending() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "carla",
            "2026-10-01",
            "2026-10-03",
        ))
        .await
        .unwrap();

    let err = engine.cancel_booking(booking.id, "bruno").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // The primary owner can cancel someone else's request.
    let cancelled = engine.cancel_booking(booking.id, "alice").await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    let err = engine.cancel_booking(booking.id, "carla").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn min_nights_and_date_validation() {
    let engine = engine_with_db().await;

    let property = engine
        .new_property(
            NewPropertyCmd::new("Chalet", "alice")
                .nightly_rate_cents(20_000)
                .min_nights(3),
        )
        .await
        .unwrap();

    let err = engine
        .create_booking(CreateBookingCmd::new(
            property.id,
            "alice",
            "2026-07-01",
            "2026-07-03",
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("minimum stay is 3 nights".to_string())
    );

    let err = engine
        .create_booking(CreateBookingCmd::new(
            property.id,
            "alice",
            "01/07/2026",
            "2026-07-05",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .create_booking(CreateBookingCmd::new(
            property.id,
            "alice",
            "2026-07-05",
            "2026-07-05",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn blackouts_gate_new_bookings() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    // bruno holds no blackout_manager capability.
    let err = engine
        .create_blackout(CreateBlackoutCmd::new(
            property_id,
            "bruno",
            "2026-07-01",
            "2026-07-10",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let blackout = engine
        .create_blackout(
            CreateBlackoutCmd::new(property_id, "alice", "2026-07-01", "2026-07-10")
                .reason("roof maintenance"),
        )
        .await
        .unwrap();

    let err = engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "carla",
            "2026-07-08",
            "2026-07-12",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Removing the blackout reopens the range.
    engine.delete_blackout(blackout.id, "alice").await.unwrap();
    engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "carla",
            "2026-07-08",
            "2026-07-12",
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn availability_calendar_marks_blocked_days() {
    let engine = engine_with_db().await;
    let property_id = seeded_property(&engine).await;

    engine
        .create_booking(CreateBookingCmd::new(
            property_id,
            "alice",
            "2026-07-01",
            "2026-07-03",
        ))
        .await
        .unwrap();
    engine
        .create_blackout(CreateBlackoutCmd::new(
            property_id,
            "alice",
            "2026-07-05",
            "2026-07-06",
        ))
        .await
        .unwrap();

    let report = engine
        .check_availability(property_id, "2026-07-01", "2026-07-08", "bruno")
        .await
        .unwrap();

    let flags: Vec<bool> = report.days.iter().map(|d| d.available).collect();
    // 1st and 2nd blocked by the booking, 5th by the blackout; checkout days
    // (the 3rd, the 6th) are free.
    assert_eq!(
        flags,
        vec![false, false, true, true, false, true, true]
    );
    assert_eq!(report.bookings.len(), 1);
    assert_eq!(report.blackouts.len(), 1);
}

#[tokio::test]
async fn zero_total_voting_power_never_resolves() {
    let engine = engine_with_db().await;

    let property = engine
        .new_property(NewPropertyCmd::new("Rustico", "alice").nightly_rate_cents(10_000))
        .await
        .unwrap();
    // Misconfigured roster: the only ownership carries no voting power.
    engine
        .upsert_ownership(
            UpsertOwnershipCmd::new(property.id, "alice", "alice", 10_000, 0)
                .role(OwnershipRole::Primary)
                .blackout_manager(true)
                .expense_approver(true),
        )
        .await
        .unwrap();

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property.id,
            "alice",
            "2026-07-01",
            "2026-07-03",
        ))
        .await
        .unwrap();
    let ownership_id = ownership_of(&engine, property.id, "alice").await;

    let detail = engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            ownership_id,
            "alice",
            VoteChoice::Approve,
        ))
        .await
        .unwrap();

    // threshold = 0/2 + 1 = 1 can never be reached: pending forever.
    assert_eq!(detail.tally.threshold, 1);
    assert_eq!(detail.tally.approvals_power, 0);
    assert_eq!(detail.booking.status, BookingStatus::Pending);
}
