//! Connect failures for the feed capability.
//!
//! Connect errors are never fatal: the connection manager retries them
//! after a fixed delay, forever. The only extra intelligence here is
//! recognizing the known authentication-related failure signature so a
//! remediation hint can be logged alongside the retry.

/// Marker the platform embeds in connect failures caused by missing
/// authentication cookies.
const AUTH_FAILURE_MARKER: &str = "SIGI_STATE";

/// The feed capability could not establish a subscription.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The handshake with the live platform failed.
    #[error("feed handshake failed: {message}")]
    Handshake {
        /// Description of the handshake failure.
        message: String,
    },
}

impl ConnectError {
    /// Returns a remediation hint when the failure matches the known
    /// authentication-related signature, `None` otherwise.
    ///
    /// The hint does not change the retry policy; it is only logged so
    /// an operator watching the console knows which knobs to turn.
    pub fn remediation_hint(&self) -> Option<&'static str> {
        let Self::Handshake { message } = self;
        if message.contains(AUTH_FAILURE_MARKER) {
            Some("set LIVEPULSE_SESSION_ID (and optionally LIVEPULSE_MS_TOKEN) and restart")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_signature_yields_hint() {
        let err = ConnectError::Handshake {
            message: String::from("failed to extract SIGI_STATE from page"),
        };
        assert!(err.remediation_hint().is_some());
    }

    #[test]
    fn other_failures_yield_no_hint() {
        let err = ConnectError::Handshake {
            message: String::from("connection refused"),
        };
        assert!(err.remediation_hint().is_none());
    }

    #[test]
    fn display_includes_message() {
        let err = ConnectError::Handshake {
            message: String::from("room offline"),
        };
        assert!(format!("{err}").contains("room offline"));
    }
}
