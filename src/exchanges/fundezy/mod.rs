pub mod auth;
pub mod builder;
pub mod client;
pub mod connector;
pub mod converters;
pub mod types;

pub use builder::{build_connector, build_connector_from_env, FundezyBuilder};
pub use client::FundezyClient;
pub use connector::FundezyConnector;
