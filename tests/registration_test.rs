mod common;

use scanstation::database::attendee_repo;
use scanstation::services::registration_service::{self, NewRegistration, RegistrationError};

#[tokio::test]
async fn registers_and_resolves_by_scan_code() {
    let (pool, _dir) = common::setup_pool().await;

    let registered = common::register(&pool, "QR-0001", "alumni").await;
    assert_eq!(registered.attendee_type, "alumni");
    assert_eq!(registered.qr_code, "QR-0001");
    assert_eq!(registered.day1_entrance, 0);

    let resolved = registration_service::resolve_scan(&pool, "QR-0001")
        .await
        .expect("resolve")
        .expect("attendee found");
    assert_eq!(resolved.id, registered.id);

    let missing = registration_service::resolve_scan(&pool, "QR-9999")
        .await
        .expect("resolve");
    assert!(missing.is_none());
}

#[tokio::test]
async fn empty_scan_codes_are_rejected_before_storage() {
    let (pool, _dir) = common::setup_pool().await;

    let err = registration_service::resolve_scan(&pool, "   ")
        .await
        .expect_err("blank code");
    assert!(matches!(err, RegistrationError::EmptyScanCode));

    let err = registration_service::register_attendee(
        &pool,
        NewRegistration {
            qr_code: "",
            attendee_type: "alumni",
            name: "Nobody",
            email: "n@example.com",
            phone: "0",
        },
    )
    .await
    .expect_err("blank code");
    assert!(matches!(err, RegistrationError::EmptyScanCode));
}

#[tokio::test]
async fn duplicate_scan_code_leaves_no_second_record() {
    let (pool, _dir) = common::setup_pool().await;

    let first = common::register(&pool, "QR-1", "alumni").await;

    let err = registration_service::register_attendee(
        &pool,
        NewRegistration {
            qr_code: "QR-1",
            attendee_type: "faculty",
            name: "Second",
            email: "second@example.com",
            phone: "1",
        },
    )
    .await
    .expect_err("duplicate must fail");
    assert!(matches!(err, RegistrationError::DuplicateScanCode));

    // The code still resolves to the first registrant.
    let resolved = attendee_repo::find_by_qr_code(&pool, "QR-1")
        .await
        .expect("find")
        .expect("exists");
    assert_eq!(resolved.id, first.id);
    assert_eq!(resolved.attendee_type, "alumni");

    let all = attendee_repo::list_all(&pool).await.expect("list");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn invalid_category_is_rejected_without_burning_a_number() {
    let (pool, _dir) = common::setup_pool().await;

    let err = registration_service::register_attendee(
        &pool,
        NewRegistration {
            qr_code: "QR-1",
            attendee_type: "wizard",
            name: "Gandalf",
            email: "g@example.com",
            phone: "0",
        },
    )
    .await
    .expect_err("unknown category");
    assert!(matches!(err, RegistrationError::InvalidCategory(_)));

    // Category validation happens before allocation, so the first valid
    // registration still gets number one.
    let first = common::register(&pool, "QR-2", "alumni").await;
    assert_eq!(first.attendee_id, "AL-001");
}

#[tokio::test]
async fn category_abbreviations_normalize_at_registration() {
    let (pool, _dir) = common::setup_pool().await;

    let alumni = common::register(&pool, "QR-1", "AL").await;
    assert_eq!(alumni.attendee_type, "alumni");
    assert_eq!(alumni.attendee_id, "AL-001");

    let press = common::register(&pool, "QR-2", "Pr").await;
    assert_eq!(press.attendee_type, "press");
    assert_eq!(press.attendee_id, "PR-001");

    let other = common::register(&pool, "QR-3", "other").await;
    assert_eq!(other.attendee_id, "OT-001");
}

#[tokio::test]
async fn profile_fields_are_trimmed() {
    let (pool, _dir) = common::setup_pool().await;

    let attendee = registration_service::register_attendee(
        &pool,
        NewRegistration {
            qr_code: "  QR-1  ",
            attendee_type: " alumni ",
            name: "  Jane Doe  ",
            email: " jane@example.com ",
            phone: " +31 6 1 ",
        },
    )
    .await
    .expect("register");

    assert_eq!(attendee.qr_code, "QR-1");
    assert_eq!(attendee.name, "Jane Doe");
    assert_eq!(attendee.email, "jane@example.com");
    assert_eq!(attendee.phone, "+31 6 1");
}
