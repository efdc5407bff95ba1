//! Error type shared by the registry, the store and the HTTP routes.
//!
//! The core raises typed errors; the [`Responder`] impl at the bottom of
//! this file is the only place they become status codes and JSON bodies.

use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;

use crate::rsvp::MAX_PARTY_SIZE;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while serving the guest list.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("guest name must not be empty")]
    EmptyName,

    #[error("unknown theme `{0}`")]
    UnknownTheme(String),

    #[error("unknown guest category `{0}`")]
    UnknownCategory(String),

    #[error("party size must be between 1 and {max}, got {0}", max = MAX_PARTY_SIZE)]
    InvalidPartySize(i64),

    #[error("no guest with code `{0}`")]
    GuestNotFound(String),

    #[error("another guest is already named `{0}`")]
    DuplicateName(String),

    #[error("storage error: {0}")]
    Storage(#[from] diesel::result::Error),

    #[error("could not open guest database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("could not write export: {0}")]
    Export(#[from] csv::Error),

    #[error("background task failed: {0}")]
    Task(#[from] rocket::tokio::task::JoinError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

impl Error {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName
            | Self::UnknownTheme(_)
            | Self::UnknownCategory(_)
            | Self::InvalidPartySize(_) => ErrorKind::Validation,
            Self::GuestNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateName(_) => ErrorKind::Conflict,
            Self::Storage(_) | Self::Connection(_) | Self::Export(_) | Self::Task(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// HTTP status the routes answer with for this error.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self.kind() {
            ErrorKind::Validation => Status::BadRequest,
            ErrorKind::NotFound => Status::NotFound,
            ErrorKind::Conflict => Status::Conflict,
            ErrorKind::Internal => Status::InternalServerError,
        }
    }
}

/// JSON body of every failed API call.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let message = if self.kind() == ErrorKind::Internal {
            tracing::error!(error = %self, uri = %req.uri(), "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, uri = %req.uri(), "request rejected");
            self.to_string()
        };

        response::Response::build_from(Json(ErrorBody::new(message)).respond_to(req)?)
            .status(status)
            .ok()
    }
}
