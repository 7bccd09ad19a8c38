pub mod command_oracle;
pub mod edge_id;
pub mod route_request;
pub mod route_response;
pub mod routing_oracle;
pub mod routing_oracle_client;
pub mod routing_oracle_provider;
pub mod sumo_codec;
pub mod table_oracle;
