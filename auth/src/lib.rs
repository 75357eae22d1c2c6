//! Challenge-response authentication with ElGamal signatures.
//!
//! A user registers a username, a password credential and an ElGamal public
//! key. To log in, the server issues a short-lived random challenge, the
//! client signs it with its private key, and the server verifies the
//! signature against the registered key before opening a session.
//!
//! # Example
//!
//! ```
//! use auth::{Authenticator, InMemoryUserStore};
//! use elgamal::KeyPair;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let service = Authenticator::new(InMemoryUserStore::new());
//!
//! let keys = KeyPair::generate(&mut rng, 512).expect("key generation");
//! let registered = service.register("alice", "hunter2", keys.public_key().clone());
//! assert!(registered.is_success());
//!
//! let challenge = service.issue_challenge("alice", None).expect("challenge");
//! let signature = keys.sign(&mut rng, challenge.message_bytes()).expect("sign");
//! let outcome = service.authenticate("alice", &challenge.id, &signature);
//!
//! let token = outcome.session_token().expect("session token");
//! assert_eq!(service.username_of(token).as_deref(), Some("alice"));
//! ```
//!
//! # Failure reporting
//!
//! Expected failures are values, never panics: [`RegistrationOutcome`] and
//! [`AuthOutcome`] carry a success flag, a human-readable message and a
//! machine-readable [`RegistrationError`] or [`AuthError`].

mod client;
mod clock;
mod credential;
mod errors;
mod outcome;
mod protocol;
mod settings;
mod state;
mod store;


pub use client::AuthClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{CredentialHasher, Sha256Credentials};
pub use errors::{AuthError, ClientError, RegistrationError, SettingsError};
pub use outcome::{AuthOutcome, RegistrationOutcome};
pub use protocol::Authenticator;
pub use settings::{AuthSettings, DEFAULT_CHALLENGE_TTL};
pub use state::{Challenge, KeyedStore, MemoryStore, Session};
pub use store::{InMemoryUserStore, UserRecord, UserStore};
