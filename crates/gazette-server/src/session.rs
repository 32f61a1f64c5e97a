//! Server-side sessions behind a signed cookie.
//!
//! A session is a random id stored in the `gazette_session` cookie as
//! `<id>.<signature>`, where the signature is a hex-encoded SHA-256 digest
//! keyed by the configured secret. Session values (the god password a
//! visitor has set) live in an in-process map keyed by id; the cookie
//! never carries them. A cookie whose signature does not verify is
//! treated as no session at all.

use constant_time_eq::constant_time_eq;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use uuid::Uuid;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "gazette_session";

/// Session cookie lifetime in seconds (30 days).
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// The session layer: cookie signing plus per-session values.
#[derive(Debug)]
pub struct Sessions {
    secret: String,
    values: DashMap<String, String>,
}

impl Sessions {
    /// Creates a session layer signing with `secret`.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            values: DashMap::new(),
        }
    }

    /// Issues a fresh session id and its signed cookie value.
    #[must_use]
    pub fn issue(&self) -> (String, String) {
        let id = Uuid::new_v4().simple().to_string();
        let cookie = format!("{id}.{}", self.sign(&id));
        (id, cookie)
    }

    /// Verifies a signed cookie value, returning the session id.
    ///
    /// Returns `None` for a malformed value or a bad signature.
    #[must_use]
    pub fn verify(&self, cookie_value: &str) -> Option<String> {
        let (id, signature) = cookie_value.rsplit_once('.')?;
        let expected = self.sign(id);
        constant_time_eq(signature.as_bytes(), expected.as_bytes()).then(|| id.to_string())
    }

    /// Rebuilds the signed cookie value for an existing id.
    #[must_use]
    pub fn cookie_value(&self, id: &str) -> String {
        format!("{id}.{}", self.sign(id))
    }

    /// Stores the god password for a session.
    pub fn set_god_password(&self, id: &str, value: impl Into<String>) {
        self.values.insert(id.to_string(), value.into());
    }

    /// Returns the god password stored for a session, if any.
    #[must_use]
    pub fn god_password(&self, id: &str) -> Option<String> {
        self.values.get(id).map(|entry| entry.value().clone())
    }

    fn sign(&self, id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b".");
        hasher.update(id.as_bytes());
        hex_encode(&hasher.finalize())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let sessions = Sessions::new("secret-key");
        let (id, cookie) = sessions.issue();

        assert_eq!(sessions.verify(&cookie), Some(id));
    }

    #[test]
    fn test_tampered_id_rejected() {
        let sessions = Sessions::new("secret-key");
        let (_, cookie) = sessions.issue();

        let (_, signature) = cookie.rsplit_once('.').unwrap();
        let forged = format!("someotherid.{signature}");
        assert_eq!(sessions.verify(&forged), None);
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let sessions = Sessions::new("secret-key");
        let (id, _) = sessions.issue();

        let forged = format!("{id}.deadbeef");
        assert_eq!(sessions.verify(&forged), None);
    }

    #[test]
    fn test_malformed_cookie_rejected() {
        let sessions = Sessions::new("secret-key");
        assert_eq!(sessions.verify("no-dot-here"), None);
        assert_eq!(sessions.verify(""), None);
    }

    #[test]
    fn test_different_secret_rejects() {
        let sessions = Sessions::new("secret-key");
        let other = Sessions::new("another-key");

        let (_, cookie) = sessions.issue();
        assert_eq!(other.verify(&cookie), None);
    }

    #[test]
    fn test_cookie_value_round_trips() {
        let sessions = Sessions::new("secret-key");
        let (id, cookie) = sessions.issue();

        assert_eq!(sessions.cookie_value(&id), cookie);
    }

    #[test]
    fn test_values_set_and_get() {
        let sessions = Sessions::new("secret-key");
        let (id, _) = sessions.issue();

        assert_eq!(sessions.god_password(&id), None);

        sessions.set_god_password(&id, "hunter2");
        assert_eq!(sessions.god_password(&id), Some("hunter2".to_string()));

        sessions.set_god_password(&id, "changed");
        assert_eq!(sessions.god_password(&id), Some("changed".to_string()));
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x0a]), "00ff0a");
    }
}
