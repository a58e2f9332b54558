pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{lessc_factory, local_packer, LocalPacker, LocalStorage};
pub use config::JitpackConfig;
pub use crate::core::{packer::Packer, pipeline::BundlePipeline};
pub use utils::error::{PackError, Result};
