//! Customer accounts: login and signup.

use tracing::instrument;

use super::types::{LoginRequest, LoginResponse, MessageResponse, SignupRequest};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Exchange a username or email and password for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with status 401 for bad credentials, or
    /// another error if the request fails.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let request = self
            .http()
            .post(self.endpoint("auth/login"))
            .json(credentials);
        self.send_json(request).await
    }

    /// Create a customer account.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the signup or the request
    /// fails.
    #[instrument(skip(self, signup), fields(username = %signup.username))]
    pub async fn signup(&self, signup: &SignupRequest) -> Result<MessageResponse, ApiError> {
        let request = self.http().post(self.endpoint("auth/signup")).json(signup);
        self.send_json(request).await
    }
}
