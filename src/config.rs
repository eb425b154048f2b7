use crate::error::{BadEnvVarSnafu, ParseHostSnafu, ParseNumberSnafu, RosterResult};
use snafu::ResultExt;
use std::{
    env::VarError,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
pub const STUDENTS_FILE: &str = "students.json";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_config: Arc<ServerConfig>,
    storage_config: Arc<StorageConfig>,
}

impl RuntimeConfiguration {
    /// Reads the process environment (after any `.env` file has been loaded).
    pub fn new() -> RosterResult<Self> {
        Self::from_lookup(dotenvy::var)
    }

    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> RosterResult<Self> {
        let get_env_var = |name: &'static str| match lookup(name) {
            Ok(value) => Ok(Some(value)),
            Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
            Err(source) => Err(source).context(BadEnvVarSnafu { name }),
        };

        let host = match get_env_var("ROSTER_HOST")? {
            Some(original) => original
                .trim()
                .parse::<IpAddr>()
                .context(ParseHostSnafu { original })?,
            None => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        let port = match get_env_var("PORT")? {
            Some(port) => port.trim().parse::<u16>().context(ParseNumberSnafu { name: "PORT" })?,
            None => DEFAULT_PORT,
        };
        let body_limit = match get_env_var("ROSTER_BODY_LIMIT")? {
            Some(limit) => limit.trim().parse::<usize>().context(ParseNumberSnafu {
                name: "ROSTER_BODY_LIMIT",
            })?,
            None => DEFAULT_BODY_LIMIT,
        };
        let data_dir = get_env_var("ROSTER_DATA_DIR")?
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        Ok(Self {
            server_config: Arc::new(ServerConfig {
                host,
                port,
                body_limit,
            }),
            storage_config: Arc::new(StorageConfig { data_dir }),
        })
    }

    /// Builds a configuration from explicit `(name, value)` pairs instead of the environment.
    pub fn from_pairs(pairs: &[(&'static str, &str)]) -> RosterResult<Self> {
        Self::from_lookup(|name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .ok_or(dotenvy::Error::EnvVar(VarError::NotPresent))
        })
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }

    pub fn storage_config(&self) -> Arc<StorageConfig> {
        self.storage_config.clone()
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    host: IpAddr,
    port: u16,
    body_limit: usize,
}

impl ServerConfig {
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub const fn body_limit(&self) -> usize {
        self.body_limit
    }
}

#[derive(Debug)]
pub struct StorageConfig {
    data_dir: PathBuf,
}

impl StorageConfig {
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn students_file(&self) -> PathBuf {
        self.data_dir.join(STUDENTS_FILE)
    }
}
