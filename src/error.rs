use crate::data::wire::ErrorBody;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use snafu::Snafu;
use std::{
    fmt,
    net::AddrParseError,
    num::ParseIntError,
    path::PathBuf,
};

pub type RosterResult<T> = Result<T, RosterError>;

/// The record operation a handler was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentAction {
    List,
    Get,
    Create,
    Update,
    Delete,
    Search,
}

impl StudentAction {
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to load students",
            Self::Get => "Failed to load student",
            Self::Create => "Failed to create student",
            Self::Update => "Failed to update student",
            Self::Delete => "Failed to delete student",
            Self::Search => "Failed to search students",
        }
    }
}

impl fmt::Display for StudentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RosterError {
    #[snafu(display("Error creating data directory {}", path.display()))]
    CreateDataDir {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error reading student store at {}", path.display()))]
    ReadStore {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error writing student store at {}", path.display()))]
    WriteStore {
        source: std::io::Error,
        path: PathBuf,
    },
    #[snafu(display("Error parsing student store at {}", path.display()))]
    ParseStore {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[snafu(display("Error serialising students"))]
    SerialiseStore { source: serde_json::Error },
    #[snafu(display("Unable to find student with ID: {}", id))]
    MissingStudent { id: String },
    #[snafu(display("Invalid student data in request body"))]
    InvalidBody { source: JsonRejection },
    #[snafu(display("Unable to retrieve env var `{}`", name))]
    BadEnvVar {
        source: dotenvy::Error,
        name: &'static str,
    },
    #[snafu(display("Unable to parse env var `{}` as a number", name))]
    ParseNumber {
        source: ParseIntError,
        name: &'static str,
    },
    #[snafu(display("Unable to parse listen address {:?}", original))]
    ParseHost {
        source: AddrParseError,
        original: String,
    },
    #[snafu(display("{}", action))]
    Failed {
        action: StudentAction,
        #[snafu(source(from(RosterError, Box::new)))]
        source: Box<RosterError>,
    },
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        const ISE: StatusCode = StatusCode::INTERNAL_SERVER_ERROR; //internal server error
        const NF: StatusCode = StatusCode::NOT_FOUND; //not found
        const BI: StatusCode = StatusCode::BAD_REQUEST; //bad input

        match self {
            Self::Failed { action, source } => match *source {
                client_error @ (Self::MissingStudent { .. } | Self::InvalidBody { .. }) => {
                    client_error.into_response()
                }
                other => {
                    error!(?other, %action, "Error!");
                    json_error(ISE, action.failure_message())
                }
            },
            Self::MissingStudent { id } => {
                warn!(%id, "student not found");
                json_error(NF, "Student not found")
            }
            Self::InvalidBody { source } => {
                warn!(%source, "rejected request body");
                match source {
                    JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                        json_error(BI, "Invalid student data")
                    }
                    other => json_error(other.status(), &other.body_text()),
                }
            }
            other => {
                error!(?other, "Error!");
                json_error(ISE, "Something went wrong!")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::ResultExt;

    fn status_of(error: RosterError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn missing_student_is_not_found_even_when_wrapped() {
        let wrapped: RosterResult<()> = Err(RosterError::MissingStudent { id: "x".into() });
        let error = wrapped
            .context(FailedSnafu {
                action: StudentAction::Update,
            })
            .unwrap_err();

        assert_eq!(status_of(error), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_failures_become_internal_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let inner: RosterResult<()> = Err(RosterError::WriteStore {
            source: io,
            path: PathBuf::from("data/students.json"),
        });
        let error = inner
            .context(FailedSnafu {
                action: StudentAction::Create,
            })
            .unwrap_err();

        assert_eq!(error.to_string(), "Failed to create student");
        assert_eq!(status_of(error), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
