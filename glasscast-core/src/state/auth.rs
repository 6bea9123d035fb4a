use tokio::sync::watch;

use crate::{
    model::{AuthResponse, SignUpOutcome},
    service::AuthService,
};

pub const VERIFY_EMAIL_NOTICE: &str = "Account created! Please verify your email to log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<AuthResponse>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    /// Informational message that is not an error, e.g. pending verification.
    pub notice: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.as_ref().is_some_and(AuthResponse::is_authenticated)
    }

    /// User id and access token of an authenticated session.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let session = self.session.as_ref()?;
        Some((session.user_id()?, session.access_token.as_deref()?))
    }
}

/// Session holder for the signed-in user.
#[derive(Debug)]
pub struct AuthStore<A> {
    service: A,
    state: watch::Sender<AuthState>,
}

impl<A: AuthService> AuthStore<A> {
    pub fn new(service: A) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { service, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Signs in or up. Failures end up in `error_message`; a sign-up that
    /// needs email confirmation sets `notice` and leaves the session empty.
    pub async fn submit(&self, mode: AuthMode, email: &str, password: &str) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message = None;
            state.notice = None;
        });

        let result = match mode {
            AuthMode::SignUp => self.service.sign_up(email, password).await,
            AuthMode::SignIn => {
                self.service.sign_in(email, password).await.map(SignUpOutcome::Authenticated)
            }
        };

        self.state.send_modify(|state| {
            match result {
                Ok(SignUpOutcome::Authenticated(session)) => {
                    tracing::info!(user_id = ?session.user_id(), "signed in");
                    state.session = Some(session);
                }
                Ok(SignUpOutcome::VerificationPending(user)) => {
                    tracing::info!(user_id = %user.id, "sign-up awaiting email verification");
                    state.session = None;
                    state.notice = Some(VERIFY_EMAIL_NOTICE.to_string());
                }
                Err(err) => {
                    tracing::warn!(error = %err, ?mode, "authentication failed");
                    state.error_message = Some(err.to_string());
                }
            }
            state.is_loading = false;
        });
    }

    /// Clears the local session even when the remote logout fails.
    pub async fn sign_out(&self) {
        let token = self.state.borrow().session.as_ref().and_then(|s| s.access_token.clone());

        let Some(token) = token else {
            self.state.send_modify(|state| state.session = None);
            return;
        };

        self.state.send_modify(|state| state.is_loading = true);
        let result = self.service.sign_out(&token).await;

        self.state.send_modify(|state| {
            state.session = None;
            if let Err(err) = result {
                tracing::warn!(error = %err, "remote sign-out failed; local session cleared");
                state.error_message = Some(err.to_string());
            }
            state.is_loading = false;
        });
    }
}
