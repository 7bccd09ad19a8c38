use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    route_request::RouteBatch,
    route_response::{RouteArtifact, RouteResponse},
    routing_oracle::{OracleError, RoutingOracle},
    sumo_codec,
};

pub const ROUTER_COMMAND_ENV_VAR: &str = "SPLICE_ROUTER_COMMAND";
pub const DEFAULT_ROUTER_COMMAND: &str = "splice-router";
pub const DEFAULT_DUAROUTER_COMMAND: &str = "duarouter";

/// Files exchanged with the router.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterFormat {
    /// `requests_{batch}.json` in, `routes_{batch}.json` out
    #[default]
    Json,

    /// duarouter's `trips_{batch}.xml` in, `routes_{batch}.alt.xml` read back
    Sumo,
}

pub struct CommandOracleParams {
    pub program: String,

    /// Arguments passed to the router, `{requests}`, `{routes}`, `{network}`
    /// and `{batch}` are substituted per batch
    pub args: Vec<String>,

    pub format: RouterFormat,

    /// Road network handed to the router
    pub network: PathBuf,

    /// Folder receiving the request and route artifacts
    pub staging_folder: PathBuf,
}

impl Default for CommandOracleParams {
    fn default() -> Self {
        Self {
            program: std::env::var(ROUTER_COMMAND_ENV_VAR)
                .unwrap_or_else(|_| String::from(DEFAULT_ROUTER_COMMAND)),
            args: default_router_args(),
            format: RouterFormat::Json,
            network: PathBuf::from("network.json"),
            staging_folder: std::env::temp_dir(),
        }
    }
}

pub fn default_router_args() -> Vec<String> {
    ["-n", "{network}", "-r", "{requests}", "-o", "{routes}"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// duarouter keeps going past unroutable trips, which then have no vehicle.
pub fn default_duarouter_args() -> Vec<String> {
    let mut args = default_router_args();
    args.push(String::from("--ignore-errors"));
    args
}

/// Routes batches by running an external router process over staged files.
pub struct CommandOracle {
    params: CommandOracleParams,
}

impl CommandOracle {
    pub fn new(params: CommandOracleParams) -> Self {
        Self { params }
    }

    pub fn requests_path(&self, batch_id: &str) -> PathBuf {
        let name = match self.params.format {
            RouterFormat::Json => format!("requests_{batch_id}.json"),
            RouterFormat::Sumo => format!("trips_{batch_id}.xml"),
        };
        self.params.staging_folder.join(name)
    }

    /// Output path handed to the router as `{routes}`.
    pub fn routes_path(&self, batch_id: &str) -> PathBuf {
        let name = match self.params.format {
            RouterFormat::Json => format!("routes_{batch_id}.json"),
            RouterFormat::Sumo => format!("routes_{batch_id}.xml"),
        };
        self.params.staging_folder.join(name)
    }

    /// File the responses are read from once the router exits.
    pub fn responses_path(&self, batch_id: &str) -> PathBuf {
        match self.params.format {
            RouterFormat::Json => self.routes_path(batch_id),
            RouterFormat::Sumo => self
                .params
                .staging_folder
                .join(format!("routes_{batch_id}.alt.xml")),
        }
    }

    fn stage_requests(&self, batch: &RouteBatch, path: &Path) -> Result<(), OracleError> {
        let staging_error = |source| OracleError::Staging {
            path: path.to_path_buf(),
            source,
        };

        match self.params.format {
            RouterFormat::Json => {
                let file = File::create(path).map_err(staging_error)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, batch)?;
                writer.flush().map_err(staging_error)?;
            }
            RouterFormat::Sumo => {
                fs::write(path, sumo_codec::write_trips(batch)?).map_err(staging_error)?;
            }
        }

        Ok(())
    }

    fn expand_args(&self, batch_id: &str, requests: &Path, routes: &Path) -> Vec<String> {
        self.params
            .args
            .iter()
            .map(|arg| {
                arg.replace("{requests}", &requests.to_string_lossy())
                    .replace("{routes}", &routes.to_string_lossy())
                    .replace("{network}", &self.params.network.to_string_lossy())
                    .replace("{batch}", batch_id)
            })
            .collect()
    }

    fn read_responses(
        &self,
        batch: &RouteBatch,
        path: &Path,
    ) -> Result<Vec<RouteResponse>, OracleError> {
        let staging_error = |source| OracleError::Staging {
            path: path.to_path_buf(),
            source,
        };

        match self.params.format {
            RouterFormat::Json => {
                let file = File::open(path).map_err(staging_error)?;
                let artifact: RouteArtifact = serde_json::from_reader(BufReader::new(file))?;

                if artifact.batch != batch.id {
                    return Err(OracleError::BatchMismatch {
                        expected: batch.id.clone(),
                        found: artifact.batch,
                    });
                }

                Ok(artifact.routes)
            }
            RouterFormat::Sumo => {
                let xml = fs::read_to_string(path).map_err(staging_error)?;
                sumo_codec::read_alt_routes(&xml, batch)
            }
        }
    }
}

impl RoutingOracle for CommandOracle {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        let requests_path = self.requests_path(&batch.id);
        let routes_path = self.routes_path(&batch.id);

        self.stage_requests(batch, &requests_path)?;

        let args = self.expand_args(&batch.id, &requests_path, &routes_path);
        debug!(
            "CommandOracle: routing batch {} ({} requests) with {} {:?}",
            batch.id,
            batch.len(),
            self.params.program,
            args
        );

        let output = Command::new(&self.params.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| OracleError::Unavailable {
                program: self.params.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OracleError::RouterFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        self.read_responses(batch, &self.responses_path(&batch.id))
    }
}
