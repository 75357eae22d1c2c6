//! Client side of the protocol: owns a key pair and drives login.

use elgamal::{KeyGenConfig, KeyPair, PublicKey};
use rand::{CryptoRng, Rng};

use crate::errors::ClientError;
use crate::outcome::{AuthOutcome, RegistrationOutcome};
use crate::protocol::Authenticator;
use crate::store::UserStore;

/// Holds a user's key pair and session token and talks to an
/// [`Authenticator`]. The private key never leaves this struct.
pub struct AuthClient<'a, U> {
    service: &'a Authenticator<U>,
    key_pair: Option<KeyPair>,
    username: Option<String>,
    session_token: Option<String>,
}

impl<'a, U: UserStore> AuthClient<'a, U> {
    pub fn new(service: &'a Authenticator<U>) -> Self {
        Self {
            service,
            key_pair: None,
            username: None,
            session_token: None,
        }
    }

    /// A client that already holds keys, e.g. restored from secure storage.
    pub fn with_key_pair(service: &'a Authenticator<U>, key_pair: KeyPair) -> Self {
        Self {
            key_pair: Some(key_pair),
            ..Self::new(service)
        }
    }

    /// Generates a key pair sized by the service settings and registers it.
    ///
    /// The new keys are kept only if registration succeeds. Settings that
    /// fail [`crate::AuthSettings::validate`] are refused before any key is
    /// generated.
    pub fn register<R: Rng + CryptoRng + ?Sized>(
        &mut self,
        rng: &mut R,
        username: &str,
        password: &str,
    ) -> Result<RegistrationOutcome, ClientError> {
        let settings = self.service.settings();
        settings.validate()?;
        let config =
            KeyGenConfig::new(settings.default_key_bits).with_rounds(settings.primality_rounds);
        let key_pair = KeyPair::generate_with(rng, &config)?;

        let outcome = self
            .service
            .register(username, password, key_pair.public_key().clone());
        if outcome.is_success() {
            self.key_pair = Some(key_pair);
            self.username = Some(username.to_string());
        }
        Ok(outcome)
    }

    /// Requests a challenge, signs it and authenticates.
    pub fn login<R: Rng + CryptoRng + ?Sized>(
        &mut self,
        rng: &mut R,
        username: &str,
    ) -> Result<AuthOutcome, ClientError> {
        let key_pair = self.key_pair.as_ref().ok_or(ClientError::MissingKeys)?;
        let challenge = self
            .service
            .issue_challenge(username, None)
            .ok_or(ClientError::ChallengeRefused)?;

        let signature = key_pair.sign(rng, challenge.message_bytes())?;
        let outcome = self
            .service
            .authenticate(username, &challenge.id, &signature);

        if let Some(token) = outcome.session_token() {
            self.session_token = Some(token.to_string());
            self.username = Some(username.to_string());
        }
        Ok(outcome)
    }

    /// Revokes the current session, if any.
    pub fn logout(&mut self) -> bool {
        match self.session_token.take() {
            Some(token) => self.service.revoke_session(&token),
            None => false,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.key_pair.as_ref().map(KeyPair::public_key)
    }

    pub fn has_keys(&self) -> bool {
        self.key_pair.is_some()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_token.is_some()
    }
}
