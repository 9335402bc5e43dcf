use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Connection error: {0}")]
    Connect(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Redirect loop or too many redirects (limit {0})")]
    RedirectLimit(usize),
}

impl ProbeError {
    /// Transient network failures are worth another attempt; malformed input
    /// will fail identically every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProbeError::Timeout(_)
                | ProbeError::Connect(_)
                | ProbeError::Tls(_)
                | ProbeError::Network(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum PushError {
    #[error("Push transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Push rejected with status {status}: {context}")]
    Rejected { status: u16, context: String },
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid mailbox address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_retryable() {
        assert!(ProbeError::Timeout(std::time::Duration::from_secs(5)).is_retryable());
        assert!(ProbeError::Connect("refused".into()).is_retryable());
        assert!(ProbeError::Tls("handshake".into()).is_retryable());
    }

    #[test]
    fn input_faults_are_fatal() {
        assert!(!ProbeError::InvalidUrl("not a url".into()).is_retryable());
        assert!(!ProbeError::UnsupportedScheme("ftp".into()).is_retryable());
        assert!(!ProbeError::RedirectLimit(10).is_retryable());
    }
}
