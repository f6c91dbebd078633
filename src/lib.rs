pub mod assessment;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod roster;
pub mod routes;
pub mod telemetry;
