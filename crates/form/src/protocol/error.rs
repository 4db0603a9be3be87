use std::error::Error as StdError;
use std::io;

use http::StatusCode;
use thiserror::Error;

/// Boxed error produced by the body (chunk) source.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Everything that can abort a form body parse.
///
/// The first four variants describe a body that is not valid
/// `application/x-www-form-urlencoded` or `multipart/form-data`; callers that
/// only care about "the client sent garbage" can use
/// [`FormError::is_invalid_encoding`].
#[derive(Error, Debug)]
pub enum FormError {
    #[error("malformed multipart boundary: {reason}")]
    MalformedBoundary { reason: String },

    #[error("malformed multipart header: {reason}")]
    MalformedHeader { reason: String },

    #[error("decode error: {reason}")]
    Decode { reason: String },

    #[error("form parser reached an unknown state: {reason}")]
    UnknownState { reason: String },

    #[error("body error: {source}")]
    Body { source: BoxError },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl FormError {
    pub fn malformed_boundary<S: ToString>(str: S) -> Self {
        Self::MalformedBoundary { reason: str.to_string() }
    }

    pub fn malformed_header<S: ToString>(str: S) -> Self {
        Self::MalformedHeader { reason: str.to_string() }
    }

    pub fn decode<S: ToString>(str: S) -> Self {
        Self::Decode { reason: str.to_string() }
    }

    pub fn unknown_state<S: ToString>(str: S) -> Self {
        Self::UnknownState { reason: str.to_string() }
    }

    pub fn body<E: Into<BoxError>>(e: E) -> Self {
        Self::Body { source: e.into() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Whether the error means the request body is not a valid form encoding.
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(
            self,
            FormError::MalformedBoundary { .. }
                | FormError::MalformedHeader { .. }
                | FormError::Decode { .. }
                | FormError::UnknownState { .. }
        )
    }

    /// The status a request handling layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            FormError::MalformedBoundary { .. }
            | FormError::MalformedHeader { .. }
            | FormError::Decode { .. }
            | FormError::UnknownState { .. }
            | FormError::Body { .. } => StatusCode::BAD_REQUEST,
            FormError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
