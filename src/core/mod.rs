pub mod packer;
pub mod pipeline;
pub mod request;
pub mod transform;

pub use crate::domain::model::{
    Asset, AssetKind, BundleJob, CacheArtifact, MinifySelection, PackedBundle,
};
pub use crate::domain::ports::{
    ConfigProvider, LessCompiler, LessCompilerFactory, Pipeline, Storage,
};
pub use crate::utils::error::Result;
