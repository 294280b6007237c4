//! Data layer of the browsing UI: a typed client for the proxy plus one
//! state holder per view. Views read snapshots and never talk to the
//! network themselves.

pub mod accumulator;
mod api;
mod error;
pub mod hooks;
mod models;
mod region;
pub mod request;
pub mod scroll;
#[cfg(test)]
pub(crate) mod testing;

pub use api::*;
pub use error::*;
pub use models::*;
pub use region::*;
