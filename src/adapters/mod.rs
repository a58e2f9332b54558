// Adapters layer: concrete implementations of the domain ports.

pub mod lessc;
pub mod storage;

pub use lessc::{lessc_factory, LesscCompiler};
pub use storage::LocalStorage;

use crate::config::JitpackConfig;
use crate::core::{packer::Packer, pipeline::BundlePipeline, LessCompilerFactory};

pub type LocalPacker = Packer<BundlePipeline<LocalStorage>>;

/// Packer reading assets from the configured root and writing to its cache dir.
pub fn local_packer(config: &JitpackConfig, less_factory: LessCompilerFactory) -> LocalPacker {
    Packer::new(BundlePipeline::new(
        LocalStorage::new(config.asset_root()),
        LocalStorage::new(config.cache_root()),
        less_factory,
    ))
}
