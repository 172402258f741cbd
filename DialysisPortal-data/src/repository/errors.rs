use thiserror::Error;

/// Message fragments that mark an authentication failure even when the API
/// answers with a generic status code
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "unauthorized",
    "unauthenticated",
    "forbidden",
    "token",
    "não autorizado",
    "nao autorizado",
    "não autenticado",
    "nao autenticado",
    "sessão expirada",
    "sessao expirada",
];

/// Error type for portal API operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Missing, expired or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, timeout or request building failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Http { status, message },
        }
    }

    /// Whether the failure means the session credentials are no longer valid
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ApiError::Unauthorized(_) => true,
            ApiError::Http { message, .. } => contains_auth_marker(message),
            ApiError::NotFound(_) | ApiError::Transport(_) | ApiError::Decode(_) => false,
        }
    }
}

fn contains_auth_marker(message: &str) -> bool {
    let message = message.to_lowercase();
    AUTH_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            ApiError::from_status(status.as_u16(), error.to_string())
        } else {
            ApiError::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from_status(401, "expired"),
            ApiError::Unauthorized("expired".to_string())
        );
        assert!(matches!(ApiError::from_status(404, "x"), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from_status(500, "boom"),
            ApiError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_auth_failure_detected_by_message() {
        let err = ApiError::from_status(500, "Token inválido ou expirado");
        assert!(err.is_auth_failure());

        let err = ApiError::from_status(400, "Usuário não autenticado");
        assert!(err.is_auth_failure());

        let err = ApiError::from_status(500, "Erro interno");
        assert!(!err.is_auth_failure());

        assert!(!ApiError::Transport("connection refused".to_string()).is_auth_failure());
    }
}
