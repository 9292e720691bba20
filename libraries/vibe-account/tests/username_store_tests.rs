mod common;

use common::new_session;
use vibe_core::types::ExtraUsername;
use vibe_core::VibeError;

// The alias limiter admits 2 requests per second and every `add_username`
// call consumes one admission, so each test stays within two calls per
// session unless it logs in again.

#[tokio::test]
async fn test_capacity_starts_at_primary_slot_only() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    let usernames = session.usernames();
    assert!(!usernames.can_add_more().await.unwrap());
    assert_eq!(usernames.next_slot_price().await.unwrap(), 200);

    let err = usernames.add_username("cool_dj").await.unwrap_err();
    assert!(matches!(err, VibeError::NoSlots));
}

#[tokio::test]
async fn test_slot_purchase_unlocks_alias_registration() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    assert_eq!(session.buy_username_slot().await.unwrap(), 2);
    assert_eq!(session.economy().coins().await.unwrap(), 800);
    assert_eq!(session.usernames().next_slot_price().await.unwrap(), 400);

    let entry = session.usernames().add_username("Cool_DJ").await.unwrap();
    assert_eq!(entry.username, "cool_dj");

    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.max_slots, 2);
    assert_eq!(slots.extras.len(), 1);

    // Capacity is full again
    let err = session.usernames().add_username("other_dj").await.unwrap_err();
    assert!(matches!(err, VibeError::NoSlots));
}

#[tokio::test]
async fn test_alias_uniqueness_is_case_insensitive() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    session.buy_username_slot().await.unwrap();

    session.usernames().add_username("cool_dj").await.unwrap();
    let err = session.usernames().add_username("Cool_DJ").await.unwrap_err();
    assert!(matches!(err, VibeError::UsernameTaken(_)));

    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.extras.len(), 1);
}

#[tokio::test]
async fn test_primary_username_is_reserved() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    let err = session.usernames().add_username("Alice").await.unwrap_err();
    assert!(matches!(err, VibeError::UsernameTaken(_)));
}

#[tokio::test]
async fn test_invalid_aliases_are_rejected_before_capacity() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    // No slot purchased, yet format errors win over NoSlots
    let err = session.usernames().add_username("ab").await.unwrap_err();
    assert!(matches!(err, VibeError::InvalidUsername(_)));

    let err = session.usernames().add_username("bad name").await.unwrap_err();
    assert!(matches!(err, VibeError::InvalidUsername(_)));
}

#[tokio::test]
async fn test_rapid_alias_creation_is_rate_limited() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    session.buy_username_slot().await.unwrap();

    session.usernames().add_username("dj_one").await.unwrap();
    session.usernames().add_username("dj_two").await.unwrap();

    let err = session.usernames().add_username("dj_three").await.unwrap_err();
    match err {
        VibeError::RateLimited { retry_after_ms } => assert!(retry_after_ms <= 1000),
        other => panic!("expected rate limit, got {other:?}"),
    }

    // The rejected attempt was not registered
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.extras.len(), 2);
}

#[tokio::test]
async fn test_active_alias_selection_is_exclusive() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    session.buy_username_slot().await.unwrap();

    let first = session.usernames().add_username("dj_one").await.unwrap();
    let second = session.usernames().add_username("dj_two").await.unwrap();

    session.usernames().set_active(Some(first.id.clone())).await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.active.as_ref(), Some(&first.id));
    assert_eq!(slots.extras.iter().filter(|e| e.is_active).count(), 1);

    session.usernames().set_active(Some(second.id.clone())).await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.active.as_ref(), Some(&second.id));
    assert!(!slots.extras.iter().find(|e| e.id == first.id).unwrap().is_active);

    // Back to the primary username
    session.usernames().set_active(None).await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.active, None);
    assert_eq!(slots.extras.iter().filter(|e| e.is_active).count(), 0);
}

#[tokio::test]
async fn test_removing_active_alias_reverts_to_primary() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    let entry = session.usernames().add_username("cool_dj").await.unwrap();
    session.usernames().set_active(Some(entry.id.clone())).await.unwrap();

    session.usernames().remove_username(&entry.id).await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.active, None);
    assert!(slots.extras.is_empty());

    let err = session.usernames().remove_username(&entry.id).await.unwrap_err();
    assert!(matches!(err, VibeError::NotFound { .. }));
}

#[tokio::test]
async fn test_slots_and_aliases_survive_relogin() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.buy_username_slot().await.unwrap();
    session.usernames().add_username("cool_dj").await.unwrap();
    session.logout().await;

    session.login("alice", "pw").await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.max_slots, 2);
    assert_eq!(slots.extras.len(), 1);
    assert_eq!(slots.extras[0].username, "cool_dj");
}

#[tokio::test]
async fn test_account_aliases_seed_a_fresh_device() {
    let (session, gateway) = new_session().await;
    let user_id = gateway.seed_user("alice", "pw").await;
    gateway
        .mutate_record(&user_id, |r| {
            r.extra_usernames = vec![ExtraUsername::new("cloud_dj")];
        })
        .await;

    // No local rows for this user yet, so the account snapshot seeds them
    session.login("alice", "pw").await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.extras.len(), 1);
    assert_eq!(slots.extras[0].username, "cloud_dj");
}

#[tokio::test]
async fn test_seeding_raises_capacity_to_cover_aliases() {
    let (session, gateway) = new_session().await;
    let user_id = gateway.seed_user("alice", "pw").await;
    gateway
        .mutate_record(&user_id, |r| {
            r.extra_usernames = vec![
                ExtraUsername::new("cloud_dj"),
                ExtraUsername::new("night_owl"),
            ];
        })
        .await;

    // The local default capacity (one implicit primary slot) cannot hold the
    // seeded aliases; loading must grow it so the record stays consistent.
    session.login("alice", "pw").await.unwrap();
    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.extras.len(), 2);
    assert!(slots.extras.len() as u32 <= slots.max_slots - 1);
    assert_eq!(slots.max_slots, 3);

    // The next slot is priced as if those slots had been bought here
    assert!(!session.usernames().can_add_more().await.unwrap());
    assert_eq!(session.usernames().next_slot_price().await.unwrap(), 800);

    // The raised capacity is persisted, not recomputed per login
    session.logout().await;
    session.login("alice", "pw").await.unwrap();
    assert_eq!(session.usernames().snapshot().await.unwrap().max_slots, 3);
}

#[tokio::test]
async fn test_slot_purchase_requires_funds() {
    let (session, gateway) = new_session().await;
    gateway.seed_user("alice", "pw").await;
    session.login("alice", "pw").await.unwrap();

    session.economy().debit(900).await.unwrap();

    let err = session.buy_username_slot().await.unwrap_err();
    assert!(matches!(err, VibeError::InsufficientFunds { .. }));
    assert_eq!(session.economy().coins().await.unwrap(), 100);

    let slots = session.usernames().snapshot().await.unwrap();
    assert_eq!(slots.max_slots, 1);
}
