pub mod cleanup;
pub mod db;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod purge;
pub mod seed;
pub mod snapshot;
pub mod stats;
mod migrations;

pub use db::{open_store, open_store_existing, StoreDb};
pub use error::CoreError;
