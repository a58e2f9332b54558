use crate::domain::model::{Asset, BundleJob, CacheArtifact, MinifySelection, PackedBundle};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Replaces `path` with `data` and returns the full location written.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<PathBuf>> + Send;
    fn modified(&self, path: &str) -> impl std::future::Future<Output = Result<SystemTime>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn lookup(&self, identifier: &str, extension: &str) -> Option<&[String]>;
    fn minify_enabled(&self) -> bool;
    fn minify_by(&self) -> MinifySelection;
}

#[async_trait]
pub trait LessCompiler: Send + Sync {
    async fn compile(&self, source: &str) -> Result<String>;
}

/// Creates the LESS compiler for a build. Called at most once per build.
pub type LessCompilerFactory = Arc<dyn Fn() -> Box<dyn LessCompiler> + Send + Sync>;

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self, job: &BundleJob) -> Result<Vec<Asset>>;
    async fn transform(&self, job: &BundleJob, assets: Vec<Asset>) -> Result<PackedBundle>;
    async fn load(&self, job: &BundleJob, packed: PackedBundle) -> Result<CacheArtifact>;
}
