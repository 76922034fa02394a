//! In-memory session state.

use tokio::sync::RwLock;

/// Holder for the current access token.
///
/// The token is an opaque bearer string minted by the backend; it is never
/// decoded locally and never written to durable storage. One `Session` is
/// one signed-in identity: clients constructed around the same `Session`
/// share it, and tests can build independent sessions side by side.
///
/// Writers follow a strict contract: `set_token` is called only on login and
/// on a successful refresh, `clear` only on logout and on a failed refresh.
/// Concurrent writes cannot overlap in practice because refreshes are
/// single-flight, but the slot is last-writer-wins regardless.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, if one is held.
    ///
    /// The API client reads this at send time rather than at request
    /// construction, so a token installed by a refresh that completed in
    /// between is honored.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Install a new access token, replacing any previous one.
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Drop the held token, leaving the session unauthenticated.
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let session = Session::new();
        assert!(session.token().await.is_none());
        assert!(!session.is_authenticated().await);

        session.set_token("tok1".to_string()).await;
        assert_eq!(session.token().await.as_deref(), Some("tok1"));
        assert!(session.is_authenticated().await);

        session.clear().await;
        assert!(session.token().await.is_none());
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_token() {
        let session = Session::new();
        session.set_token("tok1".to_string()).await;
        session.set_token("tok2".to_string()).await;
        assert_eq!(session.token().await.as_deref(), Some("tok2"));
    }

    #[tokio::test]
    async fn test_concurrent_writes_leave_one_winner() {
        let session = Arc::new(Session::new());

        let a = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.set_token("a".to_string()).await })
        };
        let b = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.set_token("b".to_string()).await })
        };
        a.await.unwrap();
        b.await.unwrap();

        let token = session.token().await;
        assert!(token.as_deref() == Some("a") || token.as_deref() == Some("b"));
    }
}
