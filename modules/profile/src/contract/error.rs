use thiserror::Error;

/// Failures surfaced by a [`DataClient`](crate::contract::client::DataClient).
///
/// Both variants are terminal for the stage that produced them; nothing retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataClientError {
    /// The remote could not be reached, or answered with a non-success status.
    #[error("Network error on {endpoint}: {message}")]
    Network {
        endpoint: String,
        status: Option<u16>,
        message: String,
    },

    /// The response body does not match the expected record shape.
    #[error("Cannot decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
}

impl DataClientError {
    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(endpoint: impl Into<String>, status: u16) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            status: Some(status),
            message: format!("HTTP {}", status),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Network { endpoint, .. } | Self::Decode { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status for errors caused by a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            Self::Decode { .. } => None,
        }
    }
}
