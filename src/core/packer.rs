use crate::core::{BundleJob, CacheArtifact, Pipeline};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// 執行 [`Pipeline`]，同一個 bundle 同時只建置一次
///
/// extract、transform、load 與讀回快取都在該 bundle 的鎖內完成，
/// 回應不會混到兩次建置的內容。
pub struct Packer<P: Pipeline> {
    pipeline: P,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<P: Pipeline> Packer<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, bundle_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(bundle_id.to_string()).or_default().clone()
    }

    pub async fn run(&self, job: &BundleJob) -> Result<CacheArtifact> {
        let lock = self.lock_for(&job.id);
        let _guard = lock.lock().await;

        tracing::debug!(bundle = %job.id, assets = job.assets.len(), minify = job.minify, "packing bundle");

        let assets = self.pipeline.extract(job).await?;
        let found = assets.len();
        if found < job.assets.len() {
            tracing::debug!(bundle = %job.id, found, configured = job.assets.len(), "some assets were skipped");
        }

        let packed = self.pipeline.transform(job, assets).await?;
        if let Some(kind) = &packed.minified_as {
            tracing::debug!(bundle = %job.id, minifier = kind.extension(), "bundle minified");
        }

        let artifact = self.pipeline.load(job, packed).await?;
        tracing::info!(
            bundle = %job.id,
            path = %artifact.path.display(),
            bytes = artifact.body.len(),
            "bundle packed"
        );

        Ok(artifact)
    }
}
