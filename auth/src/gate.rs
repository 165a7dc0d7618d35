//! Access decisions for protected routes.
//!
//! The gate only answers allowed/denied. Redirecting a denied caller to the
//! sign-in entry point is left to whoever asked.

use async_trait::async_trait;

/// Asks the identity provider's session store whether a session exists
#[async_trait]
pub trait SessionQuery: Send + Sync {
    async fn has_active_session(&self) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Access::Allowed
    }
}

pub struct SessionGate<Q> {
    query: Q,
    protected: Vec<String>,
}

impl<Q: SessionQuery> SessionGate<Q> {
    /// `protected` lists route prefixes that need a session. `/dashboard`
    /// covers `/dashboard` and `/dashboard/...` but not `/dashboards`.
    pub fn new<I, S>(query: Q, protected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query,
            protected: protected
                .into_iter()
                .map(|route| {
                    let route: String = route.into();
                    route.trim_end_matches('/').to_string()
                })
                .collect(),
        }
    }

    pub fn is_protected(&self, route: &str) -> bool {
        self.protected.iter().any(|prefix| {
            route
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub async fn can_enter(&self, route: &str) -> Access {
        if !self.is_protected(route) {
            return Access::Allowed;
        }

        if self.query.has_active_session().await {
            Access::Allowed
        } else {
            tracing::debug!("No active session, denying access to {}", route);
            Access::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeSessions {
        active: AtomicBool,
        queries: AtomicUsize,
    }

    #[async_trait]
    impl<'a> SessionQuery for &'a FakeSessions {
        async fn has_active_session(&self) -> bool {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.active.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_denied_without_session() {
        let sessions = FakeSessions::default();
        let gate = SessionGate::new(&sessions, ["/dashboard"]);
        assert_eq!(gate.can_enter("/dashboard").await, Access::Denied);
    }

    #[tokio::test]
    async fn test_allowed_with_session() {
        let sessions = FakeSessions::default();
        sessions.active.store(true, Ordering::SeqCst);
        let gate = SessionGate::new(&sessions, ["/dashboard"]);
        assert_eq!(gate.can_enter("/dashboard").await, Access::Allowed);
        assert_eq!(gate.can_enter("/dashboard/orders").await, Access::Allowed);
    }

    #[tokio::test]
    async fn test_repeated_queries_agree() {
        let sessions = FakeSessions::default();
        let gate = SessionGate::new(&sessions, ["/dashboard"]);

        let first = gate.can_enter("/dashboard").await;
        let second = gate.can_enter("/dashboard").await;
        assert_eq!(first, second);

        sessions.active.store(true, Ordering::SeqCst);
        let first = gate.can_enter("/dashboard").await;
        let second = gate.can_enter("/dashboard").await;
        assert_eq!(first, Access::Allowed);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unprotected_route_skips_query() {
        let sessions = FakeSessions::default();
        let gate = SessionGate::new(&sessions, ["/dashboard/"]);

        assert!(gate.can_enter("/auth/login").await.is_allowed());
        assert!(gate.can_enter("/dashboards").await.is_allowed());
        assert_eq!(sessions.queries.load(Ordering::SeqCst), 0);

        assert!(!gate.can_enter("/dashboard/settings").await.is_allowed());
        assert_eq!(sessions.queries.load(Ordering::SeqCst), 1);
    }
}
