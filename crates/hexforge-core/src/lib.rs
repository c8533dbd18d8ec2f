pub mod config;
pub mod error;
pub mod imports;
pub mod introspect;
pub mod io;
pub mod naming;
pub mod orchestrator;
pub mod patch;
pub mod paths;
pub mod project;
pub mod report;
pub mod route;
pub mod syntax;
pub mod templates;
pub mod types;
pub mod writer;

pub use error::{ForgeError, Result};
