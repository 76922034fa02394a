//! API client for the huddle collaboration backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the backend REST API: session auth, group CRUD and
//! membership, and the activity feed.
//!
//! Two interceptors wrap every request. On the way out, the current access
//! token is read from the session at send time and attached as a bearer
//! header. On the way back, an auth rejection joins the single-flight
//! session refresh and replays the request exactly once; a second rejection
//! is terminal and tells the caller to reauthenticate.

use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::{RefreshCoordinator, Session};
use crate::config::ClientConfig;
use crate::models::{Activity, Group, GroupFields, Registration, UserProfile};

use super::ApiError;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct GroupAck {
    group_id: i64,
}

#[derive(Debug, Deserialize)]
struct ActivityFeed {
    activities: Vec<Activity>,
}

// ============================================================================
// Request descriptor
// ============================================================================

/// Immutable description of one logical request.
///
/// A replay after a refresh rebuilds the request from this descriptor; the
/// descriptor itself carries no retry state, so a request can never be
/// silently marked as retried more than once.
struct RequestSpec<'a> {
    method: Method,
    path: &'a str,
    body: Option<Value>,
}

impl<'a> RequestSpec<'a> {
    fn get(path: &'a str) -> Self {
        Self {
            method: Method::GET,
            path,
            body: None,
        }
    }

    fn post(path: &'a str, body: Value) -> Self {
        Self {
            method: Method::POST,
            path,
            body: Some(body),
        }
    }

    fn post_empty(path: &'a str) -> Self {
        Self {
            method: Method::POST,
            path,
            body: None,
        }
    }

    fn put(path: &'a str, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path,
            body: Some(body),
        }
    }

    fn delete(path: &'a str) -> Self {
        Self {
            method: Method::DELETE,
            path,
            body: None,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the huddle backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and clones share the same session and refresh coordination.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Arc<Session>,
    refresh: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a client with a fresh, unauthenticated session.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_session(config, Arc::new(Session::new()))
    }

    /// Create a client around an existing session context.
    ///
    /// Lets callers share one identity between clients, or hand a test its
    /// own independent session.
    ///
    /// The cookie store is enabled so the refresh credential set at login
    /// rides along on later refresh calls without this code ever reading it.
    pub fn with_session(config: ClientConfig, session: Arc<Session>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
        })
    }

    /// The session context backing this client.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// Send one attempt of the given request.
    ///
    /// The access token is read from the session here, at send time, so an
    /// attempt made after a refresh picks up the new credential. An auth
    /// rejection comes back as `Ok(None)` for the caller to decide whether a
    /// refresh-and-replay is still allowed; every other failure is final.
    async fn send_once(&self, spec: &RequestSpec<'_>) -> Result<Option<Response>, ApiError> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self.http.request(spec.method.clone(), &url);

        if let Some(token) = self.session.token().await {
            request = request.bearer_auth(token);
        }
        if let Some(ref body) = spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        Ok(Some(Self::check_response(response).await?))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Run a request through the interceptor stack.
    ///
    /// On the first auth rejection, join the shared refresh and replay the
    /// request once with the renewed token. A rejection on the replay means
    /// the freshly minted token is no good either; that is terminal and
    /// deliberately does not go back to the coordinator.
    async fn execute(&self, spec: RequestSpec<'_>) -> Result<Response, ApiError> {
        if let Some(response) = self.send_once(&spec).await? {
            return Ok(response);
        }

        debug!(path = spec.path, "request rejected, joining session refresh");
        if let Err(e) = self
            .refresh
            .join(&self.http, &self.refresh_url(), &self.session)
            .await
        {
            warn!(path = spec.path, reason = %e.reason, "session refresh failed");
            return Err(ApiError::SessionExpired);
        }

        match self.send_once(&spec).await? {
            Some(response) => Ok(response),
            None => {
                warn!(path = spec.path, "request rejected again after refresh");
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        spec: RequestSpec<'_>,
    ) -> Result<T, ApiError> {
        let response = self.execute(spec).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    fn refresh_url(&self) -> String {
        format!("{}/auth/refresh", self.base_url)
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Authenticate and install the returned access token in the session.
    ///
    /// The response also sets the refresh cookie, which the cookie store
    /// carries on later refresh calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let spec = RequestSpec::post(
            "/auth/login",
            json!({ "email": email, "password": password }),
        );
        let payload: LoginResponse = self.execute_json(spec).await?;
        self.session.set_token(payload.access_token).await;
        debug!("login succeeded, access token installed");
        Ok(())
    }

    /// Check whether an account already exists for the given email.
    /// Public endpoint; goes out without a bearer header when no session is
    /// held and never touches the credential slot.
    pub async fn check_email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let spec = RequestSpec::post("/auth/check-email", json!({ "email": email }));
        let payload: ExistsResponse = self.execute_json(spec).await?;
        Ok(payload.exists)
    }

    /// Register a new account and return the new user's id.
    ///
    /// The confirmation field is checked locally; nothing is sent when the
    /// two passwords differ.
    pub async fn register(&self, registration: &Registration) -> Result<i64, ApiError> {
        if registration.password != registration.confirm_password {
            return Err(ApiError::Validation("Passwords do not match".to_string()));
        }

        let spec = RequestSpec::post(
            "/auth/register",
            json!({
                "email": registration.email,
                "password": registration.password,
                "firstname": registration.firstname,
                "lastname": registration.lastname,
            }),
        );
        let payload: RegisterResponse = self.execute_json(spec).await?;
        Ok(payload.user_id)
    }

    /// End the session server-side and drop the held access token.
    ///
    /// Requests already in flight are not aborted; their results are simply
    /// discarded by callers.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.execute(RequestSpec::post_empty("/auth/logout")).await?;
        self.session.clear().await;
        debug!("logged out, access token cleared");
        Ok(())
    }

    /// Fetch the signed-in user's profile.
    pub async fn get_user_profile(&self) -> Result<UserProfile, ApiError> {
        self.execute_json(RequestSpec::get("/auth/user")).await
    }

    // ========================================================================
    // Groups
    // ========================================================================

    /// List all groups.
    pub async fn list_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.execute_json(RequestSpec::get("/groups")).await
    }

    /// Create a group and return its id.
    pub async fn create_group(&self, fields: &GroupFields) -> Result<i64, ApiError> {
        let spec = RequestSpec::post(
            "/groups",
            json!({ "name": fields.name, "description": fields.description }),
        );
        let payload: GroupAck = self.execute_json(spec).await?;
        Ok(payload.group_id)
    }

    /// Update a group owned by the signed-in user.
    pub async fn update_group(&self, group_id: i64, fields: &GroupFields) -> Result<(), ApiError> {
        let path = format!("/groups/{}", group_id);
        let spec = RequestSpec::put(
            &path,
            json!({ "name": fields.name, "description": fields.description }),
        );
        let _ack: GroupAck = self.execute_json(spec).await?;
        Ok(())
    }

    /// Delete a group owned by the signed-in user.
    pub async fn delete_group(&self, group_id: i64) -> Result<(), ApiError> {
        let path = format!("/groups/{}", group_id);
        self.execute(RequestSpec::delete(&path)).await?;
        Ok(())
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Join a group as the signed-in user.
    pub async fn join_group(&self, group_id: i64) -> Result<(), ApiError> {
        let path = format!("/group-members/join?group_id={}", group_id);
        self.execute(RequestSpec::post_empty(&path)).await?;
        Ok(())
    }

    /// Leave a group the signed-in user is a member of.
    pub async fn leave_group(&self, group_id: i64) -> Result<(), ApiError> {
        let path = format!("/group-members/leave?group_id={}", group_id);
        self.execute(RequestSpec::post_empty(&path)).await?;
        Ok(())
    }

    /// List the members of a group.
    pub async fn list_group_members(&self, group_id: i64) -> Result<Vec<UserProfile>, ApiError> {
        let path = format!("/group-members/{}/members", group_id);
        self.execute_json(RequestSpec::get(&path)).await
    }

    /// Groups the signed-in user belongs to.
    pub async fn get_joined_groups(&self) -> Result<Vec<Group>, ApiError> {
        self.execute_json(RequestSpec::get("/group-members/user/groups"))
            .await
    }

    // ========================================================================
    // Activity
    // ========================================================================

    /// Recent activity feed for the signed-in user.
    pub async fn get_recent_activity(&self) -> Result<Vec<Activity>, ApiError> {
        let payload: ActivityFeed = self
            .execute_json(RequestSpec::get("/activity/user/activity"))
            .await?;
        Ok(payload.activities)
    }
}
