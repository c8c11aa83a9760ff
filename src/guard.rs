//! Navigation guards for signed-in and guest-only pages.

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Outcome of a guard check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

/// Access rule attached to a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteGuard {
    /// Pages that need a signed-in user (dashboard, card editor).
    RequireAuth,
    /// Pages only for signed-out visitors (login, register).
    GuestOnly,
}

impl RouteGuard {
    /// Decide whether a visitor with `session` may enter the route.
    pub fn check(self, session: Option<&Session>) -> Navigation {
        match (self, session) {
            (RouteGuard::RequireAuth, None) => {
                tracing::debug!("Unauthenticated visit to protected route");
                Navigation::Redirect(LOGIN_PATH)
            }
            (RouteGuard::GuestOnly, Some(_)) => Navigation::Redirect(DASHBOARD_PATH),
            _ => Navigation::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_guard() {
        let session = Session::new("u1", "jane", "jane@example.com");
        assert_eq!(
            RouteGuard::RequireAuth.check(None),
            Navigation::Redirect("/login")
        );
        assert_eq!(
            RouteGuard::RequireAuth.check(Some(&session)),
            Navigation::Proceed
        );
    }

    #[test]
    fn guest_guard() {
        let session = Session::new("u1", "jane", "jane@example.com");
        assert_eq!(RouteGuard::GuestOnly.check(None), Navigation::Proceed);
        assert_eq!(
            RouteGuard::GuestOnly.check(Some(&session)),
            Navigation::Redirect("/dashboard")
        );
    }
}
