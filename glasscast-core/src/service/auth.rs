use async_trait::async_trait;
use serde::de::IgnoredAny;

use crate::{
    model::{AuthRequest, AuthResponse, SignUpOutcome},
    network::{ApiRequest, NetworkError, NetworkService},
};

use super::AuthService;

const SIGN_UP_PATH: &str = "/auth/v1/signup";
const TOKEN_PATH: &str = "/auth/v1/token";
const LOGOUT_PATH: &str = "/auth/v1/logout";

/// Email/password auth against Supabase GoTrue.
#[derive(Debug, Clone)]
pub struct SupabaseAuthService {
    network: NetworkService,
}

impl SupabaseAuthService {
    pub fn new(network: NetworkService) -> Self {
        Self { network }
    }
}

#[async_trait]
impl AuthService for SupabaseAuthService {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, NetworkError> {
        let request = ApiRequest::post(SIGN_UP_PATH).json(&AuthRequest::new(email, password));
        let response: AuthResponse = self.network.request(request).await?;

        match response {
            AuthResponse { access_token: Some(_), .. } => {
                Ok(SignUpOutcome::Authenticated(response))
            }
            AuthResponse { user: Some(user), .. } => Ok(SignUpOutcome::VerificationPending(user)),
            _ => Err(NetworkError::InvalidResponse),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, NetworkError> {
        let request = ApiRequest::post(TOKEN_PATH)
            .query("grant_type", "password")
            .json(&AuthRequest::new(email, password));

        self.network.request(request).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), NetworkError> {
        let request = ApiRequest::post(LOGOUT_PATH).bearer_auth(access_token);
        let _: IgnoredAny = self.network.request(request).await?;
        Ok(())
    }
}
