//! Behaviour tests for account registration and login.
//!
//! Scenarios drive the user service over the in-memory repository and the
//! fixture password hasher, so they exercise the real policy checks without
//! a database.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use todo_backend::domain::ports::{FixturePasswordHasher, LoginService, UsersCommand, UsersQuery};
use todo_backend::domain::{Credentials, Error, User, UserService};
use todo_backend::outbound::memory::InMemoryUserRepository;
use todo_backend::test_support::MutableClock;
use tokio::runtime::Runtime;

const VALID_PASSWORD: &str = "correct horse";
const WRONG_PASSWORD: &str = "battery staple";

type Service = UserService<InMemoryUserRepository, FixturePasswordHasher>;

/// Wrapper for non-Clone types to enable storage in `Slot`.
#[derive(Clone)]
struct RuntimeHandle(Arc<Runtime>);

#[derive(Default, ScenarioState)]
struct UserAccountsWorld {
    runtime: Slot<RuntimeHandle>,
    service: Slot<Arc<Service>>,
    registered: Slot<User>,
    last_user: Slot<User>,
    last_error: Slot<Error>,
}

impl UserAccountsWorld {
    fn setup(&self) {
        let runtime = Runtime::new().expect("create runtime");
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(FixturePasswordHasher),
            Arc::new(MutableClock::at_fixture_time()),
        );
        self.runtime.set(RuntimeHandle(Arc::new(runtime)));
        self.service.set(Arc::new(service));
    }

    fn service(&self) -> Arc<Service> {
        self.service.get().expect("service")
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        let runtime = self.runtime.get().expect("runtime");
        runtime.0.block_on(future)
    }

    fn record(&self, result: Result<User, Error>) {
        match result {
            Ok(user) => self.last_user.set(user),
            Err(error) => self.last_error.set(error),
        }
    }

    fn register(&self, email: &str, password: &str) {
        let credentials = Credentials::try_from_parts(email, password).expect("credentials");
        let service = self.service();
        let result = self.block_on(async { service.register_new_user(&credentials).await });
        if let Ok(user) = &result {
            self.registered.set(user.clone());
        }
        self.record(result);
    }

    fn login(&self, email: &str, password: &str) {
        let credentials = Credentials::try_from_parts(email, password).expect("credentials");
        let service = self.service();
        let result = self.block_on(async { service.authenticate_user(&credentials).await });
        self.record(result);
    }
}

#[fixture]
fn world() -> UserAccountsWorld {
    UserAccountsWorld::default()
}

// -----------------------------------------------------------------------------
// Given Steps
// -----------------------------------------------------------------------------

#[given("an empty account directory")]
fn an_empty_account_directory(world: &UserAccountsWorld) {
    world.setup();
}

#[given("an account exists for {email}")]
fn an_account_exists_for(world: &UserAccountsWorld, email: String) {
    world.setup();
    world.register(&email, VALID_PASSWORD);
    assert!(world.registered.get().is_some(), "seed registration failed");
}

// -----------------------------------------------------------------------------
// When Steps
// -----------------------------------------------------------------------------

#[when("{email} registers with a valid password")]
fn registers_with_a_valid_password(world: &UserAccountsWorld, email: String) {
    world.register(&email, VALID_PASSWORD);
}

#[when("{email} registers with the password {password}")]
fn registers_with_the_password(world: &UserAccountsWorld, email: String, password: String) {
    world.register(&email, &password);
}

#[when("{email} logs in with the right password")]
fn logs_in_with_the_right_password(world: &UserAccountsWorld, email: String) {
    world.login(&email, VALID_PASSWORD);
}

#[when("{email} logs in with the wrong password")]
fn logs_in_with_the_wrong_password(world: &UserAccountsWorld, email: String) {
    world.login(&email, WRONG_PASSWORD);
}

// -----------------------------------------------------------------------------
// Then Steps
// -----------------------------------------------------------------------------

#[then("the registration succeeds")]
fn the_registration_succeeds(world: &UserAccountsWorld) {
    assert!(world.last_error.get().is_none(), "unexpected error");
    let user = world.last_user.get().expect("registered user");
    assert_eq!(user.created_at(), user.updated_at());
}

#[then("the registered account can be looked up by id")]
fn the_registered_account_can_be_looked_up_by_id(world: &UserAccountsWorld) {
    let registered = world.registered.get().expect("registered user");
    let service = world.service();
    let found = world
        .block_on(async { service.find_user_by_id(registered.id()).await })
        .expect("lookup succeeds");
    assert_eq!(found, registered);
}

#[then("the login returns the registered account")]
fn the_login_returns_the_registered_account(world: &UserAccountsWorld) {
    assert!(world.last_error.get().is_none(), "unexpected error");
    let registered = world.registered.get().expect("registered user");
    let logged_in = world.last_user.get().expect("authenticated user");
    assert_eq!(logged_in.id(), registered.id());
}

#[then("the operation fails with detail code {code}")]
fn the_operation_fails_with_detail_code(world: &UserAccountsWorld, code: String) {
    let error = world.last_error.get().expect("an error should be recorded");
    assert_eq!(error.detail_code(), Some(code.as_str()), "error: {error:?}");
}

// -----------------------------------------------------------------------------
// Scenario Bindings
// -----------------------------------------------------------------------------

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "A new account can be registered and found"
)]
fn a_new_account_can_be_registered_and_found(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "Email addresses are unique"
)]
fn email_addresses_are_unique(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "A short password is rejected"
)]
fn a_short_password_is_rejected(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "A malformed email is rejected"
)]
fn a_malformed_email_is_rejected(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "Logging in with the right password"
)]
fn logging_in_with_the_right_password(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "A wrong password is rejected"
)]
fn a_wrong_password_is_rejected(world: UserAccountsWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/user_accounts.feature",
    name = "An unknown email is rejected the same way"
)]
fn an_unknown_email_is_rejected_the_same_way(world: UserAccountsWorld) {
    let _ = world;
}
