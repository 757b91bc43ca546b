pub mod batch;
pub mod config;
pub mod error;
pub mod io;
pub mod labels;
pub mod model;
pub mod prompt;
pub mod reconcile;
pub mod schema;
pub mod standardize;

pub use error::{Result, ToolError};
