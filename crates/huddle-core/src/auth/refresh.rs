//! Single-flight session refresh.
//!
//! When an access token expires, every request that was in flight with it
//! comes back rejected at roughly the same time. Firing one refresh call per
//! rejection would be worse than wasteful: each refresh can invalidate the
//! tokens minted by the others. The coordinator therefore keeps at most one
//! refresh in flight; the first rejection starts it and stores the shared
//! handle, and every rejection observed while it runs awaits that same
//! handle and applies the same outcome to its own request.

use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::Session;

/// Outcome of a failed refresh attempt.
///
/// Cloneable so every waiter on the shared refresh handle receives the same
/// result. The reason is only used for logging; callers map any refresh
/// failure to a terminal auth error.
#[derive(Debug, Clone)]
pub(crate) struct RefreshError {
    pub(crate) reason: String,
}

type RefreshHandle = Shared<BoxFuture<'static, Result<(), RefreshError>>>;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// Coordinates session renewal across concurrent requests.
///
/// The slot holds the in-flight refresh, if any. Empty means idle; a future
/// rejection may start a new flight, which is exactly what a rejection
/// arriving after a completed refresh (its request was sent with the old
/// token) should do.
#[derive(Default)]
pub(crate) struct RefreshCoordinator {
    pending: Mutex<Option<RefreshHandle>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Await the in-flight refresh, starting one if none is running.
    ///
    /// Exactly one `POST` to the refresh endpoint is issued per flight no
    /// matter how many requests join it. On success the new token is already
    /// installed in the session when this returns; on failure the session
    /// has been cleared and every joiner gets the same error.
    pub(crate) async fn join(
        &self,
        http: &Client,
        refresh_url: &str,
        session: &Arc<Session>,
    ) -> Result<(), RefreshError> {
        let handle = {
            let mut pending = self.pending.lock().expect("refresh slot poisoned");
            match pending.as_ref() {
                Some(handle) => handle.clone(),
                None => {
                    let handle =
                        Self::run(http.clone(), refresh_url.to_owned(), Arc::clone(session))
                            .boxed()
                            .shared();
                    *pending = Some(handle.clone());
                    handle
                }
            }
        };

        let outcome = handle.clone().await;

        // Return the slot to idle, unless a later flight already replaced it.
        let mut pending = self.pending.lock().expect("refresh slot poisoned");
        if pending
            .as_ref()
            .map_or(false, |current| current.ptr_eq(&handle))
        {
            *pending = None;
        }

        outcome
    }

    /// The refresh call itself. Carries no bearer header: the refresh
    /// credential travels in the client's cookie store.
    async fn run(http: Client, url: String, session: Arc<Session>) -> Result<(), RefreshError> {
        debug!("access token rejected, requesting a new one");

        let response = match http.post(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                session.clear().await;
                warn!(error = %e, "session refresh could not reach the server");
                return Err(RefreshError {
                    reason: e.to_string(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            session.clear().await;
            warn!(status = %status, "session refresh rejected");
            return Err(RefreshError {
                reason: format!("refresh rejected with status {}", status),
            });
        }

        let payload: RefreshResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                session.clear().await;
                warn!(error = %e, "session refresh returned an unreadable payload");
                return Err(RefreshError {
                    reason: e.to_string(),
                });
            }
        };

        session.set_token(payload.access_token).await;
        debug!("session refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refresh_response() {
        let json = r#"{"access_token": "tok2", "token_type": "bearer"}"#;
        let parsed: RefreshResponse = serde_json::from_str(json).expect("refresh payload parses");
        assert_eq!(parsed.access_token, "tok2");
    }

    #[test]
    fn test_coordinator_starts_idle() {
        let coordinator = RefreshCoordinator::new();
        assert!(coordinator.pending.lock().unwrap().is_none());
    }
}
