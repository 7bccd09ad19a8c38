use std::path::Path;

use crate::{
    command_oracle::{CommandOracle, CommandOracleParams, RouterFormat},
    route_request::RouteBatch,
    route_response::RouteResponse,
    routing_oracle::{OracleError, RoutingOracle},
    routing_oracle_provider::RoutingOracleProvider,
    table_oracle::TableOracle,
};

enum Oracle {
    Command(CommandOracle),
    Table(TableOracle),
}

/// Oracle selected at runtime from a [`RoutingOracleProvider`].
pub struct RoutingOracleClient {
    oracle: Oracle,
}

impl RoutingOracleClient {
    pub fn new(
        provider: RoutingOracleProvider,
        network: &Path,
        staging_folder: &Path,
    ) -> Result<Self, OracleError> {
        let oracle = match provider {
            RoutingOracleProvider::Command { program, args } => {
                Oracle::Command(CommandOracle::new(CommandOracleParams {
                    program,
                    args,
                    network: network.to_path_buf(),
                    staging_folder: staging_folder.to_path_buf(),
                    ..CommandOracleParams::default()
                }))
            }
            RoutingOracleProvider::Duarouter { program, args } => {
                Oracle::Command(CommandOracle::new(CommandOracleParams {
                    program,
                    args,
                    format: RouterFormat::Sumo,
                    network: network.to_path_buf(),
                    staging_folder: staging_folder.to_path_buf(),
                }))
            }
            RoutingOracleProvider::Table => Oracle::Table(TableOracle::from_file(network)?),
        };

        Ok(Self { oracle })
    }
}

impl RoutingOracle for RoutingOracleClient {
    fn route(&self, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
        match &self.oracle {
            Oracle::Command(oracle) => oracle.route(batch),
            Oracle::Table(oracle) => oracle.route(batch),
        }
    }
}
