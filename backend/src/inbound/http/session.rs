//! Session cookie construction for the JWT issued at login.
//!
//! Handlers only ask for "the cookie carrying this token" or "the cookie that
//! clears the session"; attribute policy lives here.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "jwt-token";

/// Attribute policy for the session cookie.
///
/// # Examples
/// ```
/// use chrono::{Duration, Utc};
/// use todo_backend::inbound::http::session::SessionCookieSettings;
///
/// let settings = SessionCookieSettings::new(false);
/// let now = Utc::now();
/// let cookie = settings.issue("token", now + Duration::minutes(60), now);
/// assert_eq!(cookie.value(), "token");
/// assert_eq!(cookie.http_only(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCookieSettings {
    secure: bool,
    domain: Option<String>,
}

impl SessionCookieSettings {
    pub fn new(secure: bool) -> Self {
        Self {
            secure,
            domain: None,
        }
    }

    /// Scope the cookie to `domain`. Blank values are ignored.
    #[must_use]
    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Cookie carrying `token` until `expires_at`.
    pub fn issue(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Cookie<'static> {
        let remaining = (expires_at - now).num_seconds().max(0);
        let mut cookie = self.base(token.to_owned());
        cookie.set_max_age(CookieDuration::seconds(remaining));
        cookie
    }

    /// Cookie instructing the client to drop the session.
    pub fn expire(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new());
        cookie.make_removal();
        cookie
    }

    fn base(&self, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE_NAME, value)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .finish();
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::test_support::fixture_timestamp;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    fn issued_cookie_carries_policy_and_lifetime() {
        let now = fixture_timestamp();
        let settings =
            SessionCookieSettings::new(true).with_domain(Some("todo.example".to_owned()));

        let cookie = settings.issue("signed.jwt.value", now + Duration::minutes(60), now);

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "signed.jwt.value");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("todo.example"));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::minutes(60)));
    }

    #[rstest]
    fn expiry_in_the_past_yields_zero_max_age() {
        let now = fixture_timestamp();
        let cookie =
            SessionCookieSettings::new(false).issue("stale", now - Duration::seconds(5), now);

        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    #[rstest]
    fn removal_cookie_clears_the_value() {
        let cookie = SessionCookieSettings::new(false).expire();

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some(" todo.example "), Some("todo.example"))]
    fn blank_domains_are_ignored(#[case] input: Option<&str>, #[case] expected: Option<&str>) {
        let settings = SessionCookieSettings::new(true).with_domain(input.map(str::to_owned));
        assert_eq!(settings.domain(), expected);
    }
}
