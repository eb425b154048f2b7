use crate::{
    client::ClientConfig,
    data::{
        student::{StudentDetails, StudentPatch, StudentRecord},
        wire::{DeleteConfirmation, ErrorBody, HealthStatus},
    },
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};
use std::time::Duration;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ClientError {
    #[snafu(display("Network timeout - please check your connection"))]
    NetworkTimeout,
    #[snafu(display("Unable to reach the server: {message}"))]
    NetworkUnreachable { message: String },
    #[snafu(display("Student not found"))]
    NotFound,
    #[snafu(display("Server responded with {status}: {message}"))]
    Server { status: u16, message: String },
    #[snafu(display("Unable to decode server response: {message}"))]
    Decode { message: String },
    #[snafu(display("Unable to parse API base URL {original:?}"))]
    InvalidBaseUrl {
        source: url::ParseError,
        original: String,
    },
    #[snafu(display("API base URL {original:?} cannot have paths appended"))]
    NotABaseUrl { original: String },
    #[snafu(display("Unable to build HTTP client"))]
    BuildClient { source: reqwest::Error },
}

impl ClientError {
    /// Whether the failure says something about the network rather than the request.
    #[must_use]
    pub const fn is_connectivity(&self) -> bool {
        matches!(self, Self::NetworkTimeout | Self::NetworkUnreachable { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::NetworkTimeout
        } else if error.is_decode() {
            Self::Decode {
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Server {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::NetworkUnreachable {
                message: error.to_string(),
            }
        }
    }
}

/// Everything the controller needs from the record API.
#[async_trait]
pub trait StudentApi: Send + Sync {
    async fn health(&self) -> ClientResult<HealthStatus>;
    async fn list(&self) -> ClientResult<Vec<StudentRecord>>;
    async fn get(&self, id: &str) -> ClientResult<StudentRecord>;
    async fn create(&self, details: &StudentDetails) -> ClientResult<StudentRecord>;
    /// Replaces every field of the record, clearing optionals that are absent from `details`.
    async fn update(&self, id: &str, details: &StudentDetails) -> ClientResult<StudentRecord>;
    async fn delete(&self, id: &str) -> ClientResult<DeleteConfirmation>;
    async fn search(&self, query: &str) -> ClientResult<Vec<StudentRecord>>;
}

/// [`StudentApi`] over HTTP, every call bounded by the matching timeout in [`ClientConfig`].
#[derive(Debug, Clone)]
pub struct HttpStudentApi {
    client: Client,
    config: ClientConfig,
}

impl HttpStudentApi {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.health_timeout)
            .build()
            .context(BuildClientSnafu)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        timeout: Duration,
    ) -> ClientResult<T> {
        let response = request.timeout(timeout).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return NotFoundSnafu.fail();
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    };
    warn!(%status, %message, "API call failed");
    ServerSnafu {
        status: status.as_u16(),
        message,
    }
    .fail()
}

#[async_trait]
impl StudentApi for HttpStudentApi {
    async fn health(&self) -> ClientResult<HealthStatus> {
        let url = self.config.endpoint(&["health"]);
        self.send(self.client.get(url), self.config.health_timeout)
            .await
    }

    async fn list(&self) -> ClientResult<Vec<StudentRecord>> {
        let url = self.config.endpoint(&["students"]);
        self.send(self.client.get(url), self.config.read_timeout)
            .await
    }

    async fn get(&self, id: &str) -> ClientResult<StudentRecord> {
        let url = self.config.endpoint(&["students", id]);
        self.send(self.client.get(url), self.config.read_timeout)
            .await
    }

    async fn create(&self, details: &StudentDetails) -> ClientResult<StudentRecord> {
        let url = self.config.endpoint(&["students"]);
        self.send(
            self.client.post(url).json(details),
            self.config.mutation_timeout,
        )
        .await
    }

    async fn update(&self, id: &str, details: &StudentDetails) -> ClientResult<StudentRecord> {
        let url = self.config.endpoint(&["students", id]);
        let patch = StudentPatch::from(details.clone());
        self.send(
            self.client.put(url).json(&patch),
            self.config.mutation_timeout,
        )
        .await
    }

    async fn delete(&self, id: &str) -> ClientResult<DeleteConfirmation> {
        let url = self.config.endpoint(&["students", id]);
        self.send(self.client.delete(url), self.config.mutation_timeout)
            .await
    }

    async fn search(&self, query: &str) -> ClientResult<Vec<StudentRecord>> {
        let url = self.config.endpoint(&["students", "search", query]);
        self.send(self.client.get(url), self.config.read_timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_failures_count_as_connectivity() {
        assert!(ClientError::NetworkTimeout.is_connectivity());
        assert!(
            ClientError::NetworkUnreachable {
                message: "connection refused".into()
            }
            .is_connectivity()
        );
        assert!(!ClientError::NotFound.is_connectivity());
        assert!(
            !ClientError::Server {
                status: 500,
                message: "Failed to create student".into()
            }
            .is_connectivity()
        );
    }

    #[test]
    fn timeout_message_is_user_facing() {
        assert_eq!(
            ClientError::NetworkTimeout.to_string(),
            "Network timeout - please check your connection"
        );
    }
}
