use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{
    CastBookingVoteCmd, CreateBookingCmd, Engine, EngineError, NewPropertyCmd, OwnershipRole,
    UpsertOwnershipCmd, VoteChoice,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bruno", "carla"] {
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

#[tokio::test]
async fn new_property_creates_the_primary_ownership() {
    let engine = engine_with_db().await;

    let property = engine
        .new_property(
            NewPropertyCmd::new("Baita al Lago", "alice")
                .nightly_rate_cents(35_000)
                .cleaning_fee_cents(12_000)
                .min_nights(2),
        )
        .await
        .unwrap();
    assert_eq!(property.min_nights, 2);

    let detail = engine.property_detail(property.id, "alice").await.unwrap();
    assert_eq!(detail.ownerships.len(), 1);
    let primary = &detail.ownerships[0];
    assert_eq!(primary.user_id, "alice");
    assert_eq!(primary.role, OwnershipRole::Primary);
    assert_eq!(primary.share_bps, 10_000);
    assert!(primary.blackout_manager);
    assert!(primary.expense_approver);
    assert_eq!(detail.total_voting_power, 1);
}

#[tokio::test]
async fn upsert_ownership_updates_in_place() {
    let engine = engine_with_db().await;
    let property = engine
        .new_property(NewPropertyCmd::new("Chalet", "alice"))
        .await
        .unwrap();

    let created = engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "bruno", 4000, 1))
        .await
        .unwrap();

    let updated = engine
        .upsert_ownership(
            UpsertOwnershipCmd::new(property.id, "alice", "bruno", 4500, 3).expense_approver(true),
        )
        .await
        .unwrap();

    // Same row, new attributes: the upsert never duplicates a member.
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.share_bps, 4500);
    assert_eq!(updated.voting_power, 3);
    assert!(updated.expense_approver);

    let detail = engine.property_detail(property.id, "alice").await.unwrap();
    assert_eq!(detail.ownerships.len(), 2);
    assert_eq!(detail.total_voting_power, 4);
}

#[tokio::test]
async fn roster_changes_are_primary_only() {
    let engine = engine_with_db().await;
    let property = engine
        .new_property(NewPropertyCmd::new("Chalet", "alice"))
        .await
        .unwrap();
    engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "bruno", 4000, 1))
        .await
        .unwrap();

    let err = engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "bruno", "carla", 1000, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Unknown usernames are rejected before touching the roster.
    let err = engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "nobody", 1000, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn ownership_with_history_cannot_be_removed() {
    let engine = engine_with_db().await;
    let property = engine
        .new_property(NewPropertyCmd::new("Chalet", "alice").nightly_rate_cents(10_000))
        .await
        .unwrap();
    let bruno = engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "bruno", 4000, 1))
        .await
        .unwrap();

    let booking = engine
        .create_booking(CreateBookingCmd::new(
            property.id,
            "bruno",
            "2026-07-01",
            "2026-07-03",
        ))
        .await
        .unwrap();
    engine
        .cast_booking_vote(CastBookingVoteCmd::new(
            booking.id,
            bruno.id,
            "bruno",
            VoteChoice::Approve,
        ))
        .await
        .unwrap();

    // bruno's vote is part of the audit trail now.
    let err = engine
        .remove_ownership(property.id, bruno.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // A stake with no history can still be dropped.
    let carla = engine
        .upsert_ownership(UpsertOwnershipCmd::new(property.id, "alice", "carla", 1000, 0))
        .await
        .unwrap();
    engine
        .remove_ownership(property.id, carla.id, "alice")
        .await
        .unwrap();

    let detail = engine.property_detail(property.id, "alice").await.unwrap();
    assert!(detail.ownerships.iter().all(|o| o.user_id != "carla"));
}

#[tokio::test]
async fn listing_is_scoped_to_memberships() {
    let engine = engine_with_db().await;
    let mine = engine
        .new_property(NewPropertyCmd::new("Baita", "alice"))
        .await
        .unwrap();
    engine
        .new_property(NewPropertyCmd::new("Altrui", "bruno"))
        .await
        .unwrap();

    let visible = engine.list_properties("alice").await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, mine.id);

    // Non-members get NotFound, indistinguishable from a missing property.
    let err = engine.property_detail(mine.id, "bruno").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
