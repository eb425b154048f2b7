//! The form-side half of the application: an API client, the connectivity
//! probe, the state controller that ties submission to validation and the
//! API, and the HTML view of that state.

use crate::client::api::{ClientResult, InvalidBaseUrlSnafu};
use snafu::ResultExt;
use std::time::Duration;
use url::Url;

pub mod api;
pub mod controller;
pub mod probe;
pub mod view;

pub use api::{ClientError, HttpStudentApi, StudentApi};
pub use controller::{Connectivity, RecordMode, StudentController};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Where the API lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub health_timeout: Duration,
    pub read_timeout: Duration,
    pub mutation_timeout: Duration,
    pub reprobe_interval: Duration,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).context(InvalidBaseUrlSnafu {
            original: base_url,
        })?;
        snafu::ensure!(
            !base_url.cannot_be_a_base(),
            api::NotABaseUrlSnafu {
                original: base_url.as_str()
            }
        );

        Ok(Self {
            base_url,
            health_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            mutation_timeout: Duration::from_secs(15),
            reprobe_interval: Duration::from_secs(30),
        })
    }

    #[must_use]
    pub fn with_timeouts(mut self, health: Duration, read: Duration, mutation: Duration) -> Self {
        self.health_timeout = health;
        self.read_timeout = read;
        self.mutation_timeout = mutation;
        self
    }

    #[must_use]
    pub fn with_reprobe_interval(mut self, every: Duration) -> Self {
        self.reprobe_interval = every;
        self
    }

    /// `segments` are appended to the base path, each percent-encoded.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
