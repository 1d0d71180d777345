use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Only leader accepts write requests")]
    NotLeader,

    #[error("Only followers accept replication requests")]
    NotFollower,

    #[error("Key not found")]
    KeyNotFound,

    #[error("Quorum not reached")]
    QuorumNotReached { replicas: usize, required: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Wire shape shared by every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<usize>,
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotLeader | Error::NotFollower => StatusCode::FORBIDDEN,
            Error::KeyNotFound => StatusCode::NOT_FOUND,
            Error::QuorumNotReached { .. } | Error::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (replicas, required) = match self {
            Error::QuorumNotReached { replicas, required } => (Some(*replicas), Some(*required)),
            _ => (None, None),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.to_string(),
            replicas,
            required,
        })
    }
}
