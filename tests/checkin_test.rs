mod common;

use std::time::Duration;

use scanstation::database::{activity_log_repo, attendee_repo, event_settings_repo};
use scanstation::services::category_rules::{EventAction, EventDay};
use scanstation::services::checkin_service::{self, ActionOutcome, CheckinError, Denial};
use scanstation::services::recent_actions::RecentActions;

#[tokio::test]
async fn accepted_action_sets_flag_and_logs() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "volunteer").await;
    let recent = RecentActions::new();

    let outcome = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        Some("operator-1"),
    )
    .await
    .expect("perform action");
    assert_eq!(outcome, ActionOutcome::Done);

    let reloaded = attendee_repo::find_by_id(&pool, &attendee.id)
        .await
        .expect("reload")
        .expect("attendee exists");
    assert_eq!(reloaded.day1_entrance, 1);

    let log = activity_log_repo::list_recent_for_attendee(&pool, &attendee.attendee_id, 10)
        .await
        .expect("log");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].action, "entrance");
    assert_eq!(log[0].day, 1);
    assert_eq!(log[0].performed_by.as_deref(), Some("operator-1"));
}

#[tokio::test]
async fn repeat_is_suppressed_then_reported_as_completed() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "volunteer").await;
    // Short window so the test does not sleep ten seconds.
    let recent = RecentActions::with_ttl(Duration::from_millis(150));

    let first = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("first");
    assert_eq!(first, ActionOutcome::Done);

    // Immediate repeat: the local window answers before the store is asked.
    let second = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("second");
    assert_eq!(second, ActionOutcome::Denied(Denial::DuplicateSubmission));

    // After the window expires the persisted flag takes over.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let third = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("third");
    assert_eq!(third, ActionOutcome::Denied(Denial::AlreadyCompleted));
}

#[tokio::test]
async fn concurrent_requests_apply_the_action_exactly_once() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "alumni").await;

    // Every task gets its own suppression window, like independent stations,
    // so only the conditional update in the store can arbitrate.
    let mut set = tokio::task::JoinSet::new();
    for _ in 0..20 {
        let pool = pool.clone();
        let id = attendee.id.clone();
        set.spawn(async move {
            let recent = RecentActions::new();
            checkin_service::perform_action(
                &pool,
                &recent,
                &id,
                EventAction::Lunch,
                EventDay::Day1,
                None,
            )
            .await
            .expect("perform")
        });
    }

    let mut done = 0;
    let mut denied = 0;
    while let Some(res) = set.join_next().await {
        match res.expect("task panicked") {
            ActionOutcome::Done => done += 1,
            ActionOutcome::Denied(Denial::AlreadyCompleted) => denied += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
    assert_eq!(done, 1);
    assert_eq!(denied, 19);

    let log = activity_log_repo::list_recent_for_attendee(&pool, &attendee.attendee_id, 50)
        .await
        .expect("log");
    assert_eq!(log.len(), 1);
}

#[tokio::test]
async fn kit_is_a_single_entitlement_across_both_days() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "alumni").await;
    let recent = RecentActions::new();

    let day1 = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Kit,
        EventDay::Day1,
        None,
    )
    .await
    .expect("kit day 1");
    assert_eq!(day1, ActionOutcome::Done);

    let day2 = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Kit,
        EventDay::Day2,
        None,
    )
    .await
    .expect("kit day 2");
    assert_eq!(day2, ActionOutcome::Denied(Denial::KitAlreadyIssued));

    let reloaded = attendee_repo::find_by_id(&pool, &attendee.id)
        .await
        .expect("reload")
        .expect("attendee exists");
    assert_eq!(reloaded.day1_kit, 1);
    assert_eq!(reloaded.day2_kit, 0);
}

#[tokio::test]
async fn closed_day_rejects_everything_until_reopened() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "alumni").await;
    let recent = RecentActions::new();

    event_settings_repo::set_day_enabled(&pool, EventDay::Day1, false)
        .await
        .expect("close day 1");

    let closed = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("request while closed");
    assert_eq!(closed, ActionOutcome::Denied(Denial::DayClosed));

    // Day 2 is unaffected.
    let other_day = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day2,
        None,
    )
    .await
    .expect("day 2 request");
    assert_eq!(other_day, ActionOutcome::Done);

    event_settings_repo::set_day_enabled(&pool, EventDay::Day1, true)
        .await
        .expect("reopen day 1");

    let reopened = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("request after reopen");
    assert_eq!(reopened, ActionOutcome::Done);
}

#[tokio::test]
async fn permission_matrix_is_enforced() {
    let (pool, _dir) = common::setup_pool().await;
    let student = common::register(&pool, "QR-S", "student").await;
    let alumni = common::register(&pool, "QR-A", "alumni").await;
    let recent = RecentActions::new();

    let refused = checkin_service::perform_action(
        &pool,
        &recent,
        &student.id,
        EventAction::Dinner,
        EventDay::Day1,
        None,
    )
    .await
    .expect("student dinner");
    assert_eq!(refused, ActionOutcome::Denied(Denial::NotPermitted));

    let accepted = checkin_service::perform_action(
        &pool,
        &recent,
        &alumni.id,
        EventAction::Dinner,
        EventDay::Day1,
        None,
    )
    .await
    .expect("alumni dinner");
    assert_eq!(accepted, ActionOutcome::Done);

    let no_kit = checkin_service::perform_action(
        &pool,
        &recent,
        &student.id,
        EventAction::Kit,
        EventDay::Day1,
        None,
    )
    .await
    .expect("student kit");
    assert_eq!(no_kit, ActionOutcome::Denied(Denial::NotPermitted));
}

#[tokio::test]
async fn flags_never_revert() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "faculty").await;

    let recent = RecentActions::new();
    let first = checkin_service::perform_action(
        &pool,
        &recent,
        &attendee.id,
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect("first");
    assert_eq!(first, ActionOutcome::Done);

    // A fresh window (new process, say) still cannot flip the flag back.
    for _ in 0..3 {
        let fresh = RecentActions::new();
        let repeat = checkin_service::perform_action(
            &pool,
            &fresh,
            &attendee.id,
            EventAction::Entrance,
            EventDay::Day1,
            None,
        )
        .await
        .expect("repeat");
        assert_eq!(repeat, ActionOutcome::Denied(Denial::AlreadyCompleted));

        let reloaded = attendee_repo::find_by_id(&pool, &attendee.id)
            .await
            .expect("reload")
            .expect("attendee exists");
        assert_eq!(reloaded.day1_entrance, 1);
    }
}

#[tokio::test]
async fn unknown_attendee_is_an_error_not_a_denial() {
    let (pool, _dir) = common::setup_pool().await;
    let recent = RecentActions::new();

    let err = checkin_service::perform_action(
        &pool,
        &recent,
        "no-such-id",
        EventAction::Entrance,
        EventDay::Day1,
        None,
    )
    .await
    .expect_err("missing attendee");
    assert!(matches!(err, CheckinError::UnknownAttendee));
}

#[tokio::test]
async fn recent_activity_lists_newest_first() {
    let (pool, _dir) = common::setup_pool().await;
    let attendee = common::register(&pool, "QR-1", "alumni").await;
    let recent = RecentActions::new();

    for (action, day) in [
        (EventAction::Entrance, EventDay::Day1),
        (EventAction::Lunch, EventDay::Day1),
        (EventAction::Kit, EventDay::Day1),
    ] {
        let outcome =
            checkin_service::perform_action(&pool, &recent, &attendee.id, action, day, None)
                .await
                .expect("perform");
        assert_eq!(outcome, ActionOutcome::Done);
    }

    let log = activity_log_repo::list_recent(&pool, 2).await.expect("log");
    assert_eq!(log.len(), 2);
    // Inserts landed within the same second; rowid ordering keeps the last
    // accepted action on top.
    assert_eq!(log[0].action, "kit");
    assert_eq!(log[1].action, "lunch");
}
