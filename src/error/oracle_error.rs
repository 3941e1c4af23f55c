#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// 限流或过载，可以退避后重试
    #[error("oracle rate limited or overloaded: {0}")]
    RateLimited(String),

    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle response invalid: {0}")]
    InvalidResponse(String),
}

impl OracleError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, OracleError::RateLimited(_))
    }

    /// Maps an HTTP failure status onto the retryable / fatal split.
    pub fn from_status(status: u16, body: String) -> Self {
        let overloaded = body.to_ascii_lowercase().contains("overloaded");
        match status {
            429 | 503 | 529 => OracleError::RateLimited(body),
            _ if overloaded => OracleError::RateLimited(body),
            _ => OracleError::Status { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overload_statuses_are_retryable() {
        assert!(OracleError::from_status(429, String::new()).is_retryable());
        assert!(OracleError::from_status(529, "busy".into()).is_retryable());
        assert!(OracleError::from_status(500, r#"{"error":"Overloaded"}"#.into()).is_retryable());
        assert!(!OracleError::from_status(401, "invalid api key".into()).is_retryable());
    }
}
