//! Session state machine over the identity provider.
//!
//! The provider is the only source of truth: `check_session` reconstitutes
//! the local flag from it, and every other operation funnels back through
//! that probe rather than trusting its own response body.

use api_types::auth::{SessionInfo, SignInEmail, SignUpEmail, User};
use tracing::{debug, warn};

use crate::api::ApiClient;

const GET_SESSION: &str = "/api/auth/get-session";
const SIGN_IN: &str = "/api/auth/sign-in/email";
const SIGN_UP: &str = "/api/auth/sign-up/email";
const SIGN_OUT: &str = "/api/auth/sign-out";

/// What the client currently knows about the provider-side session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionState {
    /// Nothing asked yet; the provider must be probed before any decision.
    #[default]
    Unknown,
    Authenticated(User),
    Unauthenticated,
}

/// Owned, injected session store; pass it to whoever needs it instead of
/// reaching for a process-wide singleton.
#[derive(Clone, Debug)]
pub struct Session {
    api: ApiClient,
    state: SessionState,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: SessionState::Unknown,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Asks the provider whether a valid session exists. Idempotent, and
    /// always lands in one of the two known states: a transport failure
    /// counts as no session.
    pub async fn check_session(&mut self) {
        match self.api.get_json::<Option<SessionInfo>>(GET_SESSION).await {
            Ok(Some(info)) => self.state = SessionState::Authenticated(info.user),
            Ok(None) => self.state = SessionState::Unauthenticated,
            Err(err) => {
                warn!("session probe failed: {err}");
                self.state = SessionState::Unauthenticated;
            }
        }
    }

    /// Returns true on success. The sign-in response is not trusted to carry
    /// the full user record, so a fresh probe fetches the canonical one. On
    /// failure the state is left exactly as it was.
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let payload = SignInEmail {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.post_json_unit(SIGN_IN, &payload).await {
            Ok(()) => {
                self.check_session().await;
                true
            }
            Err(err) => {
                debug!("sign-in rejected: {err}");
                false
            }
        }
    }

    /// Signs out and forgets the user even when the provider call fails; a
    /// dangling server-side session expires on its own.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.post_unit(SIGN_OUT).await {
            warn!("sign-out request failed: {err}");
        }
        self.state = SessionState::Unauthenticated;
    }

    /// Creates the account and, on success, probes for the session the
    /// provider may have opened during sign-up.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> bool {
        let payload = SignUpEmail {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        match self.api.post_json_unit(SIGN_UP, &payload).await {
            Ok(()) => {
                self.check_session().await;
                true
            }
            Err(err) => {
                debug!("sign-up rejected: {err}");
                false
            }
        }
    }
}
