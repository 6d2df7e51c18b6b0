//! Tests for the domain user model.

use super::*;
use crate::domain::ports::{FixturePasswordHasher, MockPasswordHasher, PasswordHashError};
use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("fixture timestamp")
}

#[fixture]
fn alice(now: DateTime<Utc>) -> User {
    User::new("alice@example.com", "secret123", &FixturePasswordHasher, now)
        .expect("valid user")
}

#[rstest]
fn new_user_stamps_identity_and_timestamps(alice: User, now: DateTime<Utc>) {
    assert!(!alice.id().is_nil());
    assert_eq!(alice.email().as_ref(), "alice@example.com");
    assert_eq!(alice.created_at(), now);
    assert_eq!(alice.updated_at(), alice.created_at());
}

#[rstest]
fn new_user_verifies_its_own_password(alice: User) {
    assert!(alice.compare_password(&FixturePasswordHasher, "secret123"));
    assert!(!alice.compare_password(&FixturePasswordHasher, "wrong"));
}

#[rstest]
fn new_user_never_stores_plaintext(alice: User) {
    assert_ne!(alice.password_digest().as_str(), "secret123");
    assert!(!format!("{alice:?}").contains("secret123"));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("not-an-email")]
#[case("alice@")]
#[case("@example.com")]
#[case("alice@@example.com")]
fn new_user_rejects_invalid_emails(#[case] email: &str, now: DateTime<Utc>) {
    let err = User::new(email, "secret123", &FixturePasswordHasher, now)
        .expect_err("invalid email must fail");
    assert_eq!(err, UserValidationError::InvalidEmail);
}

#[rstest]
fn email_is_checked_before_password(now: DateTime<Utc>) {
    let err = User::new("nope", "", &FixturePasswordHasher, now).expect_err("invalid");
    assert_eq!(err, UserValidationError::InvalidEmail);
}

#[rstest]
#[case("")]
#[case("12345")]
fn new_user_rejects_short_passwords(#[case] password: &str, now: DateTime<Utc>) {
    let err = User::new("alice@example.com", password, &FixturePasswordHasher, now)
        .expect_err("short password must fail");
    assert_eq!(
        err,
        UserValidationError::InvalidPassword {
            min: PASSWORD_MIN,
            max: PASSWORD_MAX
        }
    );
}

#[rstest]
fn new_user_rejects_long_passwords(now: DateTime<Utc>) {
    let password = "a".repeat(PASSWORD_MAX + 1);
    let err = User::new("alice@example.com", &password, &FixturePasswordHasher, now)
        .expect_err("long password must fail");
    assert!(matches!(err, UserValidationError::InvalidPassword { .. }));
}

#[rstest]
#[case::ascii("a".repeat(PASSWORD_MAX_BYTES + 1))]
#[case::multibyte("é".repeat(40))]
fn new_user_rejects_passwords_over_the_byte_cap(#[case] password: String, now: DateTime<Utc>) {
    assert!(password.chars().count() <= PASSWORD_MAX);
    let err = User::new("alice@example.com", &password, &FixturePasswordHasher, now)
        .expect_err("password past the byte cap must fail");
    assert!(matches!(err, UserValidationError::InvalidPassword { .. }));
}

#[rstest]
fn password_at_the_byte_cap_is_accepted() {
    let password = "a".repeat(PASSWORD_MAX_BYTES);
    Password::new(&password).expect("exactly at the byte cap");
}

#[rstest]
fn password_length_counts_characters_not_bytes(now: DateTime<Utc>) {
    let password = "é".repeat(PASSWORD_MIN);
    User::new("alice@example.com", &password, &FixturePasswordHasher, now)
        .expect("six characters are enough");
}

#[rstest]
fn hashing_failures_are_wrapped(now: DateTime<Utc>) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .return_once(|_| Err(PasswordHashError::hashing("cost out of range")));

    let err = User::new("alice@example.com", "secret123", &hasher, now).expect_err("hash fails");
    assert_eq!(
        err,
        UserValidationError::Hashing {
            message: "password hashing failed: cost out of range".to_owned()
        }
    );
}

#[rstest]
#[case("alice@example.com", "alice@example.com")]
#[case("  alice@example.com  ", "alice@example.com")]
#[case("Alice <alice@example.com>", "alice@example.com")]
#[case("Alice@EXAMPLE.com", "Alice@example.com")]
fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::parse(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

fn long_address(local_len: usize, total_len: usize) -> String {
    let local = "a".repeat(local_len);
    let mut domain = String::new();
    while local_len + 1 + domain.len() + 4 < total_len {
        if !domain.is_empty() {
            domain.push('.');
        }
        let remaining = total_len - local_len - 1 - domain.len() - 4;
        domain.push_str(&"b".repeat(remaining.min(60)));
    }
    format!("{local}@{domain}.com")
}

#[rstest]
fn email_at_the_length_cap_is_accepted() {
    let raw = long_address(64, EMAIL_MAX);
    assert_eq!(raw.len(), EMAIL_MAX);
    let email = Email::parse(&raw).expect("address at the cap");
    assert_eq!(email.as_ref().len(), EMAIL_MAX);
}

#[rstest]
#[case(EMAIL_MAX + 1)]
#[case(292)]
fn email_over_the_length_cap_is_rejected(#[case] total_len: usize) {
    let raw = long_address(64, total_len);
    assert_eq!(raw.len(), total_len);
    assert_eq!(
        Email::parse(&raw).expect_err("address past the cap"),
        UserValidationError::InvalidEmail
    );
}

#[rstest]
fn before_update_advances_updated_at(mut alice: User, now: DateTime<Utc>) {
    let later = now + Duration::seconds(30);
    alice.before_update(later);
    assert_eq!(alice.updated_at(), later);
    assert_eq!(alice.created_at(), now);
}

#[rstest]
fn before_update_never_precedes_creation(mut alice: User, now: DateTime<Utc>) {
    alice.before_update(now - Duration::hours(1));
    assert_eq!(alice.updated_at(), alice.created_at());
}

#[rstest]
fn persisted_records_round_trip(alice: User) {
    let restored = User::from_persisted(PersistedUser {
        id: alice.id().clone(),
        email: alice.email().to_string(),
        password_digest: alice.password_digest().as_str().to_owned(),
        created_at: alice.created_at(),
        updated_at: alice.updated_at(),
    })
    .expect("stored record is valid");
    assert_eq!(restored, alice);
}

#[rstest]
#[case::bad_email("not-an-email", "digest", 0, UserValidationError::InvalidEmail)]
#[case::blank_digest("alice@example.com", "  ", 0, UserValidationError::MissingPasswordDigest)]
#[case::timestamps("alice@example.com", "digest", -5, UserValidationError::InvalidTimestamps)]
fn persisted_records_are_revalidated(
    #[case] email: &str,
    #[case] digest: &str,
    #[case] updated_offset_secs: i64,
    #[case] expected: UserValidationError,
    now: DateTime<Utc>,
) {
    let err = User::from_persisted(PersistedUser {
        id: UserId::new(VALID_ID).expect("fixture id"),
        email: email.to_owned(),
        password_digest: digest.to_owned(),
        created_at: now,
        updated_at: now + Duration::seconds(updated_offset_secs),
    })
    .expect_err("corrupt record must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn persisted_records_reject_nil_ids(now: DateTime<Utc>) {
    let err = User::from_persisted(PersistedUser {
        id: UserId::from_uuid(Uuid::nil()),
        email: "alice@example.com".to_owned(),
        password_digest: "digest".to_owned(),
        created_at: now,
        updated_at: now,
    })
    .expect_err("nil id must fail");
    assert_eq!(err, UserValidationError::InvalidId);
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
}

#[rstest]
fn user_id_serialises_as_string() {
    let id = UserId::new(VALID_ID).expect("valid id");
    let value = serde_json::to_value(&id).expect("serialise");
    assert_eq!(value, serde_json::json!(VALID_ID));
}

#[rstest]
fn password_debug_is_redacted() {
    let password = Password::new("secret123").expect("valid password");
    assert_eq!(format!("{password:?}"), "Password(..)");
}
