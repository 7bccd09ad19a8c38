use serde::{Deserialize, Serialize};

use crate::command_oracle::{default_duarouter_args, default_router_args};

fn default_duarouter_program() -> String {
    String::from(crate::command_oracle::DEFAULT_DUAROUTER_COMMAND)
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoutingOracleProvider {
    /// External router process exchanging staged JSON artifacts
    Command {
        program: String,

        #[serde(default = "default_router_args")]
        args: Vec<String>,
    },

    /// SUMO's duarouter over a `.net.xml` network
    Duarouter {
        #[serde(default = "default_duarouter_program")]
        program: String,

        #[serde(default = "default_duarouter_args")]
        args: Vec<String>,
    },

    /// Legs precomputed in the road network descriptor
    Table,
}
