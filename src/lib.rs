pub mod cache;
pub mod client;
pub mod configuration;
pub mod media;
pub mod region;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod upstream;
pub mod util;
