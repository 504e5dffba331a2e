mod common;
pub use self::common::*;
pub mod config;
pub mod error;
pub use self::error::{Error, Result};
pub mod graph;
pub use self::graph::GraphModel;
pub mod loader;
pub use self::loader::{load, EdgeLoader, LoadReport, LoaderConfig};

pub mod page_rank;
pub mod report;
