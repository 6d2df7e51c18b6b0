//! Tests for the domain task model.

use super::*;
use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .expect("fixture timestamp")
}

#[fixture]
fn owner() -> UserId {
    UserId::new("11111111-1111-1111-1111-111111111111").expect("fixture owner")
}

#[fixture]
fn task(owner: UserId, now: DateTime<Utc>) -> Task {
    Task::new("buy milk", None, owner, now).expect("valid task")
}

#[rstest]
fn new_task_starts_incomplete(task: Task, owner: UserId, now: DateTime<Utc>) {
    assert_eq!(task.text().as_ref(), "buy milk");
    assert!(!task.is_completed());
    assert_eq!(task.owner(), &owner);
    assert_eq!(task.created_at(), now);
    assert_eq!(task.updated_at(), now);
    assert_eq!(task.order(), TaskOrder::default());
}

#[rstest]
fn new_task_keeps_explicit_order(owner: UserId, now: DateTime<Utc>) {
    let task = Task::new("sort me", Some(7), owner, now).expect("valid task");
    assert_eq!(task.order().value(), 7);
}

#[rstest]
#[case::empty(String::new(), TaskValidationError::EmptyText)]
#[case::blank("   ".to_owned(), TaskValidationError::EmptyText)]
#[case::too_long("x".repeat(TASK_TEXT_MAX + 1), TaskValidationError::TextTooLong { max: TASK_TEXT_MAX })]
fn new_task_rejects_invalid_text(
    #[case] text: String,
    #[case] expected: TaskValidationError,
    owner: UserId,
    now: DateTime<Utc>,
) {
    let err = Task::new(&text, None, owner, now).expect_err("invalid text must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn text_at_limit_is_accepted(owner: UserId, now: DateTime<Utc>) {
    let text = "ü".repeat(TASK_TEXT_MAX);
    Task::new(&text, None, owner, now).expect("255 characters are allowed");
}

#[rstest]
#[case(-1, TaskValidationError::NegativeOrder)]
#[case(i64::MIN, TaskValidationError::NegativeOrder)]
#[case(i64::from(i32::MAX) + 1, TaskValidationError::OrderOutOfRange)]
fn new_task_rejects_invalid_order(
    #[case] order: i64,
    #[case] expected: TaskValidationError,
    owner: UserId,
    now: DateTime<Utc>,
) {
    let err = Task::new("x", Some(order), owner, now).expect_err("invalid order must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn new_task_rejects_nil_owner(now: DateTime<Utc>) {
    let err = Task::new("x", None, UserId::from_uuid(Uuid::nil()), now)
        .expect_err("nil owner must fail");
    assert_eq!(err, TaskValidationError::NilOwner);
}

#[rstest]
fn set_text_updates_and_restamps(mut task: Task, now: DateTime<Utc>) {
    let later = now + Duration::minutes(5);
    task.set_text("buy oat milk", later).expect("valid text");
    assert_eq!(task.text().as_ref(), "buy oat milk");
    assert_eq!(task.updated_at(), later);
    assert_eq!(task.created_at(), now);
}

#[rstest]
fn set_text_failure_leaves_task_untouched(mut task: Task, now: DateTime<Utc>) {
    let before = task.clone();
    let err = task
        .set_text("", now + Duration::minutes(5))
        .expect_err("empty text must fail");
    assert_eq!(err, TaskValidationError::EmptyText);
    assert_eq!(task, before);
}

#[rstest]
fn set_order_rejects_negative_values(mut task: Task, now: DateTime<Utc>) {
    let before = task.clone();
    task.set_order(-3, now).expect_err("negative order must fail");
    assert_eq!(task, before);

    task.set_order(2, now + Duration::seconds(1)).expect("valid order");
    assert_eq!(task.order().value(), 2);
}

#[rstest]
fn completion_is_a_boolean_toggle(mut task: Task, now: DateTime<Utc>) {
    task.mark_completed(now + Duration::seconds(1));
    assert!(task.is_completed());

    task.mark_not_completed(now + Duration::seconds(2));
    assert!(!task.is_completed());
}

#[rstest]
fn mark_completed_twice_only_refreshes_timestamp(mut task: Task, now: DateTime<Utc>) {
    let first = now + Duration::seconds(1);
    let second = now + Duration::seconds(2);

    task.mark_completed(first);
    task.mark_completed(second);

    assert!(task.is_completed());
    assert_eq!(task.updated_at(), second);
}

#[rstest]
fn restamping_with_earlier_clock_is_clamped(mut task: Task, now: DateTime<Utc>) {
    task.mark_completed(now - Duration::days(1));
    assert_eq!(task.updated_at(), task.created_at());
}

#[rstest]
fn ownership_check(task: Task, owner: UserId) {
    assert!(task.is_owned_by(&owner));
    assert!(!task.is_owned_by(&UserId::random()));
}

#[rstest]
fn persisted_records_round_trip(mut task: Task, now: DateTime<Utc>) {
    task.mark_completed(now + Duration::seconds(3));
    let restored = Task::from_persisted(PersistedTask {
        id: task.id().clone(),
        text: task.text().to_string(),
        order: i64::from(task.order().value()),
        completed: task.is_completed(),
        owner: task.owner().clone(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
    .expect("stored record is valid");
    assert_eq!(restored, task);
}

#[rstest]
fn persisted_records_reject_inverted_timestamps(owner: UserId, now: DateTime<Utc>) {
    let err = Task::from_persisted(PersistedTask {
        id: TaskId::random(),
        text: "x".to_owned(),
        order: 0,
        completed: false,
        owner,
        created_at: now,
        updated_at: now - Duration::seconds(1),
    })
    .expect_err("corrupt record must fail");
    assert_eq!(err, TaskValidationError::InvalidTimestamps);
}

#[rstest]
#[case("", TaskValidationError::EmptyId)]
#[case("nope", TaskValidationError::InvalidId)]
fn task_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: TaskValidationError) {
    assert_eq!(TaskId::new(raw).expect_err("invalid id"), expected);
}
