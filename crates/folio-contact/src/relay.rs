//! Client for an external form relay.

use std::time::Duration;

use thiserror::Error;

use crate::message::ContactMessage;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no relay endpoint configured")]
    MissingEndpoint,
    #[error("relay rejected the submission with status {0}")]
    Status(u16),
    #[error("relay request failed: {0}")]
    Transport(String),
}

/// Posts contact messages as JSON to a fixed endpoint. No retries.
#[derive(Debug, Clone)]
pub struct RelayClient {
    endpoint: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Send `message`; any non-2xx answer or transport failure is an error.
    pub fn send(&self, message: &ContactMessage) -> Result<(), RelayError> {
        if self.endpoint.trim().is_empty() {
            return Err(RelayError::MissingEndpoint);
        }

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .new_agent();

        let response = agent
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .send_json(message)
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => RelayError::Status(code),
                other => RelayError::Transport(other.to_string()),
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(RelayError::Status(status));
        }
        log::info!("relay accepted contact message with status {status}");
        Ok(())
    }
}
