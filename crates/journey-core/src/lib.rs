pub mod backend;
pub mod change;
pub mod config;
pub mod error;
pub mod idea;
pub mod io;
pub mod journey;
pub mod migrations;
pub mod mutation;
pub mod note;
pub mod order;
pub mod paths;
pub mod project;
pub mod skill;
pub mod snapshot;
pub mod store;
pub mod types;

pub use error::{JourneyError, Result};
pub use store::Store;
