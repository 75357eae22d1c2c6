//! The challenge-response authentication service.
//!
//! Per login attempt a challenge moves through
//! `issued -> {verified | expired | rejected}`. Whatever the outcome, the
//! first [`Authenticator::authenticate`] call naming a challenge removes it,
//! so a nonce can be answered at most once.
//!
//! Challenge and session stores are each guarded by their own lock and every
//! store call is a single O(1) critical section. Signature verification runs
//! with no lock held.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeDelta, Utc};
use elgamal::{PublicKey, Signature};
use log::{debug, info, warn};
use rand::RngCore;

use crate::clock::{Clock, SystemClock};
use crate::credential::{CredentialHasher, Sha256Credentials};
use crate::errors::{AuthError, RegistrationError};
use crate::outcome::{AuthOutcome, RegistrationOutcome};
use crate::settings::AuthSettings;
use crate::state::{Challenge, KeyedStore, MemoryStore, Session};
use crate::store::{UserRecord, UserStore};

/// Random bytes behind a challenge id (128 bits).
const CHALLENGE_ID_BYTES: usize = 16;
/// Random bytes behind a challenge nonce (256 bits).
const CHALLENGE_NONCE_BYTES: usize = 32;
/// Random bytes behind a session token (256 bits).
const SESSION_TOKEN_BYTES: usize = 32;
/// Fresh ids drawn before giving up on a colliding insert.
const MAX_ID_ATTEMPTS: usize = 4;

/// Server side of the protocol: registration, challenge issuance,
/// signature-based authentication and session bookkeeping.
///
/// The service is `Sync`; share it between threads behind an `Arc` or a
/// scoped borrow.
pub struct Authenticator<U> {
    users: U,
    settings: AuthSettings,
    clock: Arc<dyn Clock>,
    credentials: Box<dyn CredentialHasher>,
    challenges: Box<dyn KeyedStore<Challenge>>,
    sessions: Box<dyn KeyedStore<Session>>,
}

impl<U: UserStore> Authenticator<U> {
    /// A service over `users` with default settings, the system clock,
    /// SHA-256 credentials and in-memory challenge and session stores.
    pub fn new(users: U) -> Self {
        Self {
            users,
            settings: AuthSettings::default(),
            clock: Arc::new(SystemClock),
            credentials: Box::new(Sha256Credentials),
            challenges: Box::new(MemoryStore::<Challenge>::new()),
            sessions: Box::new(MemoryStore::<Session>::new()),
        }
    }

    pub fn with_settings(mut self, settings: AuthSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_credentials(mut self, credentials: impl CredentialHasher + 'static) -> Self {
        self.credentials = Box::new(credentials);
        self
    }

    pub fn with_challenge_store(mut self, store: impl KeyedStore<Challenge> + 'static) -> Self {
        self.challenges = Box::new(store);
        self
    }

    pub fn with_session_store(mut self, store: impl KeyedStore<Session> + 'static) -> Self {
        self.sessions = Box::new(store);
        self
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    /// Registers `username` with a password credential and a public key.
    ///
    /// Blank inputs are rejected before the store is touched. The store's
    /// conditional insert decides races between concurrent registrations of
    /// the same name: the loser gets [`RegistrationError::PersistFailed`].
    pub fn register(
        &self,
        username: &str,
        password: &str,
        public_key: PublicKey,
    ) -> RegistrationOutcome {
        if username.trim().is_empty() {
            return RegistrationOutcome::failed(RegistrationError::UsernameEmpty);
        }
        if password.trim().is_empty() {
            return RegistrationOutcome::failed(RegistrationError::PasswordEmpty);
        }
        if self.users.exists(username) {
            debug!("registration refused: {username:?} already exists");
            return RegistrationOutcome::failed(RegistrationError::UserExists);
        }

        let record = UserRecord::new(
            username,
            self.credentials.hash(password),
            public_key,
            self.clock.now(),
        );
        if !self.users.insert(record) {
            warn!("registration of {username:?} lost a concurrent insert");
            return RegistrationOutcome::failed(RegistrationError::PersistFailed);
        }

        info!("registered user {username:?}");
        RegistrationOutcome::succeeded()
    }

    /// Issues a fresh challenge for `username`, valid for `ttl` or the
    /// configured default.
    ///
    /// Returns `None` for unknown users without saying why, so the call
    /// cannot be used to enumerate accounts.
    pub fn issue_challenge(&self, username: &str, ttl: Option<Duration>) -> Option<Challenge> {
        if username.trim().is_empty() || !self.users.exists(username) {
            debug!("challenge refused for {username:?}");
            return None;
        }

        let ttl = ttl.unwrap_or(self.settings.challenge_ttl);
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        for _ in 0..MAX_ID_ATTEMPTS {
            let challenge = Challenge {
                id: hex::encode(random_bytes(CHALLENGE_ID_BYTES)),
                username: username.to_string(),
                message: STANDARD.encode(random_bytes(CHALLENGE_NONCE_BYTES)),
                issued_at,
                expires_at,
            };
            if self
                .challenges
                .insert_if_absent(challenge.id.clone(), challenge.clone())
            {
                debug!("issued challenge for {username:?}, expires {expires_at}");
                return Some(challenge);
            }
        }

        warn!("challenge ids kept colliding; check the randomness source");
        None
    }

    /// Answers a challenge with a signature over its message.
    ///
    /// 1. The challenge is removed from the store; unknown ids fail with
    ///    [`AuthError::InvalidChallenge`]
    /// 2. Expired challenges fail with [`AuthError::ChallengeExpired`]
    /// 3. A challenge issued to someone else fails with
    ///    [`AuthError::InvalidChallenge`]
    /// 4. Unknown users fail with [`AuthError::UserNotFound`]
    /// 5. The signature is checked against the stored public key
    ///    ([`AuthError::InvalidSignature`] on mismatch)
    /// 6. A new session is recorded and its token returned
    ///
    /// The challenge is consumed in every case past step 1.
    pub fn authenticate(
        &self,
        username: &str,
        challenge_id: &str,
        signature: &Signature,
    ) -> AuthOutcome {
        if username.trim().is_empty() {
            return self.reject(username, AuthError::InvalidUsername);
        }

        let Some(challenge) = self.challenges.take(challenge_id) else {
            return self.reject(username, AuthError::InvalidChallenge);
        };
        let now = self.clock.now();
        if challenge.is_expired_at(now) {
            return self.reject(username, AuthError::ChallengeExpired);
        }
        if challenge.username != username {
            return self.reject(username, AuthError::InvalidChallenge);
        }

        let Some(user) = self.users.get(username) else {
            return self.reject(username, AuthError::UserNotFound);
        };
        if !user.public_key.verify(challenge.message_bytes(), signature) {
            return self.reject(username, AuthError::InvalidSignature);
        }

        let Some(session) = self.open_session(username, now) else {
            warn!("session tokens kept colliding; check the randomness source");
            return AuthOutcome::failed(AuthError::InvalidChallenge);
        };
        self.users.touch_last_login(username, now);

        info!("authenticated {username:?}");
        AuthOutcome::succeeded(session.token)
    }

    pub fn is_valid_session(&self, token: &str) -> bool {
        self.sessions.get(token).is_some()
    }

    /// The user a session token belongs to.
    pub fn username_of(&self, token: &str) -> Option<String> {
        self.sessions.get(token).map(|session| session.username)
    }

    /// Ends a session. True iff the token named a live session.
    pub fn revoke_session(&self, token: &str) -> bool {
        match self.sessions.take(token) {
            Some(session) => {
                info!("revoked session of {:?}", session.username);
                true
            }
            None => false,
        }
    }

    /// Checks `password` against the credential stored at registration.
    pub fn verify_password(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|user| self.credentials.verify(&user.credential, password))
    }

    /// Drops challenges that can no longer be answered. Expired challenges
    /// are rejected whether or not they have been purged.
    pub fn purge_expired_challenges(&self) -> usize {
        let now = self.clock.now();
        let purged = self
            .challenges
            .retain(&|challenge: &Challenge| !challenge.is_expired_at(now));
        if purged > 0 {
            debug!("purged {purged} expired challenges");
        }
        purged
    }

    /// Number of challenges currently held, expired or not.
    pub fn pending_challenges(&self) -> usize {
        self.challenges.len()
    }

    fn open_session(&self, username: &str, now: DateTime<Utc>) -> Option<Session> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let session = Session {
                token: hex::encode(random_bytes(SESSION_TOKEN_BYTES)),
                username: username.to_string(),
                issued_at: now,
            };
            if self
                .sessions
                .insert_if_absent(session.token.clone(), session.clone())
            {
                return Some(session);
            }
        }
        None
    }

    fn reject(&self, username: &str, error: AuthError) -> AuthOutcome {
        info!(
            "authentication of {username:?} failed: {error} (code {})",
            error.code()
        );
        AuthOutcome::failed(error)
    }
}

fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}
