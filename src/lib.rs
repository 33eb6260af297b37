pub mod config;
pub mod downloaders;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod sites;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;

pub use crate::config::Config;
pub use crate::error::{Result, ScrapeError};
pub use crate::pipeline::MangaScraper;
pub use crate::registry::AdapterRegistry;
pub use crate::report::RunReport;
