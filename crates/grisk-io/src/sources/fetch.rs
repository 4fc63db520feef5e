//! HTTP retrieval of remote datasets.
//!
//! Failures never propagate: they are logged and reported as
//! [`FetchOutcome::Failed`] so a missing dataset cannot abort a simulation run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use grisk_core::{GriskError, GriskResult};
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use super::catalog::DataSource;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the response body is turned into the destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchMode {
    /// Stream the body to the destination unchanged.
    Raw,
    /// Parse a weather.gov point response, then fetch its `properties.forecastZone`.
    ForecastZone,
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub destination: PathBuf,
    pub mode: FetchMode,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
    /// Replace an existing destination instead of keeping it
    pub force: bool,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            mode: FetchMode::Raw,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            force: false,
        }
    }

    /// Request for a catalog entry, saved as `dir/<filename>`.
    pub fn for_source(source: &DataSource, dir: &Path) -> Self {
        let mut request = Self::new(source.url, dir.join(source.filename)).with_mode(source.mode);
        for (name, value) in source.headers {
            request = request.with_header(*name, *value);
        }
        request
    }

    pub fn with_mode(mut self, mode: FetchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    AlreadyPresent { path: PathBuf },
    Failed { reason: String },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, FetchOutcome::Failed { .. })
    }
}

/// Fetch `request.url` into `request.destination`.
pub fn fetch(request: &FetchRequest) -> FetchOutcome {
    match try_fetch(request) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(url = %request.url, "fetch failed: {e}");
            FetchOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

fn try_fetch(request: &FetchRequest) -> GriskResult<FetchOutcome> {
    let dest = &request.destination;
    if dest.exists() && !request.force {
        info!(path = %dest.display(), "dataset already present; use force to refresh");
        return Ok(FetchOutcome::AlreadyPresent { path: dest.clone() });
    }
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| GriskError::io("creating dataset directory", parent, source))?;
    }

    let agent = ureq::AgentBuilder::new().timeout(request.timeout).build();
    let url = match request.mode {
        FetchMode::Raw => request.url.clone(),
        FetchMode::ForecastZone => {
            let body: serde_json::Value = get(&agent, &request.url, &request.headers)?
                .into_json()
                .map_err(|e| GriskError::Fetch(format!("decoding {}: {e}", request.url)))?;
            forecast_zone_url(&body)?
        }
    };

    let bytes = download_to_path(&agent, &url, &request.headers, dest)?;
    info!(url = %url, path = %dest.display(), bytes, "dataset downloaded");
    Ok(FetchOutcome::Downloaded {
        path: dest.clone(),
        bytes,
    })
}

fn get(agent: &ureq::Agent, url: &str, headers: &[(String, String)]) -> GriskResult<ureq::Response> {
    let mut call = agent.get(url);
    for (name, value) in headers {
        call = call.set(name, value);
    }
    call.call().map_err(|e| match e {
        ureq::Error::Status(code, _) => GriskError::Fetch(format!("{url}: HTTP {code}")),
        other => GriskError::Fetch(format!("requesting {url}: {other}")),
    })
}

/// Stream the body of `url` into a sibling temp file and move it over `dest`
/// once complete; `dest` is untouched when the transfer fails.
fn download_to_path(
    agent: &ureq::Agent,
    url: &str,
    headers: &[(String, String)],
    dest: &Path,
) -> GriskResult<u64> {
    let response = get(agent, url, headers)?;
    let mut reader = response.into_reader();
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .map_err(|source| GriskError::io("creating download target", dir, source))?;
    let bytes = io::copy(&mut reader, &mut staged)
        .map_err(|source| GriskError::io("writing dataset", dest, source))?;
    staged
        .persist(dest)
        .map_err(|e| GriskError::io("replacing dataset", dest, e.error))?;
    Ok(bytes)
}

/// Extract `properties.forecastZone` from a weather.gov point response.
pub fn forecast_zone_url(body: &serde_json::Value) -> GriskResult<String> {
    body["properties"]["forecastZone"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GriskError::Fetch("response has no properties.forecastZone".into()))
}
