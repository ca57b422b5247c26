pub mod config;
pub mod error;
pub mod logging;
pub mod module;

#[cfg(test)]
mod test_support;

pub use error::{LookupError, LookupResult, Stage};
pub use module::pipeline::PassPipeline;
