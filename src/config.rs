use crate::{
    configuration::*,
    inputs::host::{GlobalSettings, HostEntry, HostRecord},
    products::unexpected::{ConfigError, RunError},
    utilities::{first_existing, read_text_file},
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;


#[derive(Debug, Clone, Serialize, Deserialize, Default)]
/// Configuration file read at start of each run
pub struct Config {
    /// Log level, overridden by RUST_LOG
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// TLS port to check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,

    /// Per-host check timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Amount of hosts checked at once
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Webhook and owner settings
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Hosts to check, entries parsed one by one so a malformed one doesn't spoil others
    #[serde(default)]
    pub hosts: Vec<serde_json::Value>,
}


impl Config {
    /// Load configuration from given file, or from first existing default location
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                first_existing(&DEFAULT_CONFIG_PATHS)
                    .map(PathBuf::from)
                    .ok_or_else(|| ConfigError::NotFound(DEFAULT_CONFIG_PATHS.join(", ")))?
            }
        };
        debug!("Loading configuration from: {}", path.display());
        let contents =
            read_text_file(&path).map_err(|err| ConfigError::Read(path.clone(), err))?;
        Config::parse(&contents).map_err(|err| ConfigError::Parse(path, err))
    }


    /// Parse configuration JSON
    pub fn parse(contents: &str) -> Result<Config, serde_json::Error> {
        serde_json::from_str(contents)
    }


    /// Host records in configuration order, positions counted from 1
    pub fn host_records(&self) -> Vec<HostRecord> {
        self.hosts
            .iter()
            .enumerate()
            .map(|(index, value)| HostEntry::from_value(index + 1, value.clone()))
            .collect()
    }


    /// Override run parameters with the defined ones (command line wins over file)
    pub fn override_with(
        &mut self,
        port: Option<u32>,
        timeout: Option<u64>,
        concurrency: Option<usize>,
    ) {
        self.port = port.or(self.port);
        self.timeout = timeout.or(self.timeout);
        self.concurrency = concurrency.or(self.concurrency);
    }


    /// Run parameters from configuration, with defaults for undefined ones
    pub fn run_parameters(&self) -> Result<RunParameters, RunError> {
        RunParameters::new(
            self.port.unwrap_or(u32::from(DEFAULT_PORT)),
            self.timeout.unwrap_or(DEFAULT_CHECK_TIMEOUT),
            self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
        )
    }


    /// Get LevelFilter (log level) from configuration
    pub fn get_log_level(&self) -> LevelFilter {
        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
            .to_uppercase();
        match &level[..] {
            "OFF" => LevelFilter::OFF,
            "ERROR" => LevelFilter::ERROR,
            "WARN" => LevelFilter::WARN,
            "INFO" => LevelFilter::INFO,
            "DEBUG" => LevelFilter::DEBUG,
            "TRACE" => LevelFilter::TRACE,
            _ => LevelFilter::INFO,
        }
    }
}


#[derive(Debug, Copy, Clone, PartialEq, Eq)]
/// Validated parameters of a single run
pub struct RunParameters {
    /// TLS port to check
    pub port: u16,

    /// Per-host check timeout
    pub timeout: Duration,

    /// Amount of hosts checked at once
    pub concurrency: usize,
}


impl RunParameters {
    /// Validate raw run parameters
    pub fn new(port: u32, timeout: u64, concurrency: usize) -> Result<RunParameters, RunError> {
        let port = u16::try_from(port)
            .ok()
            .filter(|port| *port > 0)
            .ok_or(RunError::InvalidPort(port))?;
        if timeout < 1 {
            return Err(RunError::InvalidTimeout(timeout));
        }
        if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(RunError::InvalidConcurrency(concurrency, MAX_CONCURRENCY));
        }
        Ok(RunParameters {
            port,
            timeout: Duration::from_secs(timeout),
            concurrency,
        })
    }
}


impl Default for RunParameters {
    fn default() -> RunParameters {
        RunParameters {
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(DEFAULT_CHECK_TIMEOUT),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}
