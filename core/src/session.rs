//! Session store: the logged-in user and the persisted bearer token.
//!
//! # Design
//! The token lives in two places: the `TokenStore` (survives restarts) and
//! the `ApiClient` (attached to outgoing requests). Every operation here
//! keeps both in step, so there is never more than one active token.

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::storage::TokenStore;
use crate::types::{Credentials, User};

#[derive(Debug)]
pub struct Session<S> {
    store: S,
    user: Option<User>,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store, user: None }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Attach a previously persisted token to `client`. Returns `false` when
    /// there is nothing to restore.
    pub fn attach_persisted(&self, client: &mut ApiClient) -> Result<bool, ApiError> {
        match self.store.load()? {
            Some(token) => {
                client.set_token(token);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Exchange credentials for a token, persist it and attach it to
    /// `client`. The profile is not loaded here.
    pub fn login(
        &mut self,
        client: &mut ApiClient,
        transport: &impl Transport,
        credentials: &Credentials,
    ) -> Result<String, ApiError> {
        let req = client.build_login(credentials)?;
        let login = client.parse_login(transport.execute(req)?)?;
        self.store.save(&login.access_token)?;
        client.set_token(login.access_token.as_str());
        info!(username = %credentials.username, "logged in");
        Ok(login.access_token)
    }

    pub fn register(
        &self,
        client: &ApiClient,
        transport: &impl Transport,
        credentials: &Credentials,
    ) -> Result<(), ApiError> {
        let req = client.build_register(credentials)?;
        client.parse_register(transport.execute(req)?)?;
        info!(username = %credentials.username, "registered");
        Ok(())
    }

    /// Fetch the profile for the attached token. On any failure the session
    /// is cleared before the error is returned.
    pub fn load_profile(
        &mut self,
        client: &mut ApiClient,
        transport: &impl Transport,
    ) -> Result<User, ApiError> {
        let result = transport
            .execute(client.build_profile())
            .and_then(|response| client.parse_profile(response));
        match result {
            Ok(user) => {
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "profile fetch failed, clearing session");
                self.reset(client);
                Err(e)
            }
        }
    }

    pub fn logout(&mut self, client: &mut ApiClient) -> Result<(), ApiError> {
        self.user = None;
        client.clear_token();
        self.store.clear()
    }

    fn reset(&mut self, client: &mut ApiClient) {
        if let Err(e) = self.logout(client) {
            warn!(error = %e, "could not remove persisted token");
        }
    }
}
