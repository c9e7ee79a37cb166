//! Session collaborator contract.
//!
//! The realtime client never owns authentication state. It reads the current
//! identity from whatever implements [`SessionSource`] at connect time.

/// Read-only view of the authenticated session.
pub trait SessionSource: Send + Sync {
    /// Whether a user is logged in.
    fn is_logged_in(&self) -> bool;

    /// Authenticated user ID.
    fn user_id(&self) -> Option<String>;

    /// Authenticated role, e.g. `doctor` or `patient`.
    fn role(&self) -> Option<String>;

    /// `(user_id, role)` when logged in and both are non-empty.
    fn identity(&self) -> Option<(String, String)> {
        if !self.is_logged_in() {
            return None;
        }
        let user_id = self.user_id().filter(|id| !id.is_empty())?;
        let role = self.role().filter(|role| !role.is_empty())?;
        Some((user_id, role))
    }
}

/// A fixed session, e.g. from command-line arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticSession {
    user_id: Option<String>,
    role: Option<String>,
}

impl StaticSession {
    /// A logged-in session.
    pub fn authenticated(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            role: Some(role.into()),
        }
    }

    /// A logged-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionSource for StaticSession {
    fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    fn user_id(&self) -> Option<String> {
        self.user_id.clone()
    }

    fn role(&self) -> Option<String> {
        self.role.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_identity() {
        let session = StaticSession::authenticated("u1", "doctor");
        assert!(session.is_logged_in());
        assert_eq!(session.identity(), Some(("u1".into(), "doctor".into())));
    }

    #[test]
    fn anonymous_has_no_identity() {
        let session = StaticSession::anonymous();
        assert!(!session.is_logged_in());
        assert!(session.identity().is_none());
    }

    #[test]
    fn empty_role_has_no_identity() {
        let session = StaticSession::authenticated("u1", "");
        assert!(session.is_logged_in());
        assert!(session.identity().is_none());
    }

    #[test]
    fn empty_user_has_no_identity() {
        let session = StaticSession::authenticated("", "patient");
        assert!(session.identity().is_none());
    }
}
