use crate::core::transform::{PreTransform, TransformRegistry};
use crate::core::{
    Asset, AssetKind, BundleJob, CacheArtifact, LessCompiler, LessCompilerFactory,
    MinifySelection, PackedBundle, Pipeline, Storage,
};
use crate::utils::error::{PackError, Result};

/// 單次建置的狀態：緩衝區、延遲建立的 LESS 編譯器、最後一個資源的類型
pub struct BuildContext<'a> {
    less_factory: &'a LessCompilerFactory,
    less: Option<Box<dyn LessCompiler>>,
    buffer: String,
    last_kind: Option<AssetKind>,
    packed_assets: usize,
}

impl<'a> BuildContext<'a> {
    pub fn new(less_factory: &'a LessCompilerFactory) -> Self {
        Self {
            less_factory,
            less: None,
            buffer: String::new(),
            last_kind: None,
            packed_assets: 0,
        }
    }

    /// 前處理資源並附加到緩衝區
    pub async fn push(&mut self, asset: Asset) {
        let rule = TransformRegistry::rule_for(&asset.kind);

        let content = match rule.pre {
            PreTransform::Identity => asset.content,
            PreTransform::CompileLess => {
                let factory = self.less_factory;
                let compiler = self.less.get_or_insert_with(|| (**factory)());
                match compiler.compile(&asset.content).await {
                    Ok(css) => css,
                    Err(e) => {
                        tracing::error!(asset = %asset.path, error = %e, "LESS compiler error, using source as-is");
                        asset.content
                    }
                }
            }
        };

        if let Some(separator) = rule.separator {
            self.buffer.push(separator);
        }
        self.buffer.push_str(&content);
        self.buffer.push('\n');

        self.last_kind = Some(asset.kind);
        self.packed_assets += 1;
    }

    /// 需要時對整個緩衝區壓縮一次
    pub fn finish(self, job: &BundleJob) -> PackedBundle {
        let minifier_kind = match job.minify_by {
            MinifySelection::LastAsset => self.last_kind,
            MinifySelection::Bundle => Some(job.kind.clone()),
        };

        let (content, minified_as) = match minifier_kind {
            Some(kind) if job.minify && !self.buffer.is_empty() => {
                (TransformRegistry::minify(&kind, self.buffer), Some(kind))
            }
            _ => (self.buffer, None),
        };

        PackedBundle {
            content,
            packed_assets: self.packed_assets,
            minified_as,
        }
    }
}

/// Builds bundles from `assets` storage into `cache` storage.
pub struct BundlePipeline<S: Storage> {
    assets: S,
    cache: S,
    less_factory: LessCompilerFactory,
}

impl<S: Storage> BundlePipeline<S> {
    pub fn new(assets: S, cache: S, less_factory: LessCompilerFactory) -> Self {
        Self {
            assets,
            cache,
            less_factory,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for BundlePipeline<S> {
    async fn extract(&self, job: &BundleJob) -> Result<Vec<Asset>> {
        let mut assets = Vec::with_capacity(job.assets.len());

        for path in &job.assets {
            if !self.assets.exists(path).await {
                tracing::warn!(bundle = %job.id, asset = %path, "asset file not found, skipping");
                continue;
            }

            match self.assets.read_file(path).await {
                Ok(raw) => {
                    assets.push(Asset::new(path.as_str(), String::from_utf8_lossy(&raw)));
                }
                Err(e) => {
                    tracing::warn!(bundle = %job.id, asset = %path, error = %e, "asset file unreadable, skipping");
                }
            }
        }

        Ok(assets)
    }

    async fn transform(&self, job: &BundleJob, assets: Vec<Asset>) -> Result<PackedBundle> {
        let mut context = BuildContext::new(&self.less_factory);
        for asset in assets {
            context.push(asset).await;
        }
        Ok(context.finish(job))
    }

    async fn load(&self, job: &BundleJob, packed: PackedBundle) -> Result<CacheArtifact> {
        if packed.content.is_empty() {
            return Err(PackError::EmptyResult {
                bundle: job.id.clone(),
            });
        }

        let path = self.cache.write_file(&job.id, packed.content.as_bytes()).await?;
        tracing::debug!(path = %path.display(), bytes = packed.content.len(), "cache file written");

        let modified = self.cache.modified(&job.id).await?;
        let body = self.cache.read_file(&job.id).await?;

        Ok(CacheArtifact {
            bundle_id: job.id.clone(),
            path,
            modified,
            body,
        })
    }
}
