use actix_web::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("provider responded with {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("provider request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid provider url: {0}")]
    Url(#[from] url::ParseError),
}

impl UpstreamError {
    /// Status to mirror back to our caller; anything without a provider
    /// status is reported as 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The provider's own `status_message`, if it sent one.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_provider_status() {
        let err = UpstreamError::Status {
            status: 404,
            message: Some("The resource you requested could not be found.".into()),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.provider_message(),
            Some("The resource you requested could not be found.")
        );
    }

    #[test]
    fn out_of_range_status_defaults_to_500() {
        let err = UpstreamError::Status {
            status: 42,
            message: None,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.provider_message(), None);
    }
}
