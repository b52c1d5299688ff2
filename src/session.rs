//! The session gate: a single shared secret compared in memory.
//!
//! There is no token issuance, expiry, or server-side session; the "session"
//! is a client-side flag gated by this equality check. The same secret is
//! attached to every remote call, and the server independently rejects bad
//! credentials.

use tracing::{info, warn};

use crate::error::SessionError;

pub struct SessionGate {
    secret: String,
    authenticated: bool,
}

impl SessionGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            authenticated: false,
        }
    }

    /// Compares the entered secret; on mismatch nothing is unlocked and no
    /// collection may be fetched.
    pub fn login(&mut self, entered: &str) -> Result<(), SessionError> {
        if entered == self.secret {
            info!("Admin session unlocked");
            self.authenticated = true;
            Ok(())
        } else {
            warn!("Rejected login attempt");
            Err(SessionError::InvalidSecret)
        }
    }

    pub fn logout(&mut self) {
        info!("Admin session locked");
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
