use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// 依副檔名區分的資源類型 (區分大小寫)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum AssetKind {
    Css,
    Less,
    Js,
    Other(String),
}

impl AssetKind {
    pub fn from_extension(extension: &str) -> Self {
        match extension {
            "css" => AssetKind::Css,
            "less" => AssetKind::Less,
            "js" => AssetKind::Js,
            other => AssetKind::Other(other.to_string()),
        }
    }

    /// 路徑的資源類型；沒有副檔名時為 `Other("")`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_else(|| AssetKind::Other(String::new()))
    }

    pub fn extension(&self) -> &str {
        match self {
            AssetKind::Css => "css",
            AssetKind::Less => "less",
            AssetKind::Js => "js",
            AssetKind::Other(ext) => ext,
        }
    }

    /// `Content-Type` for a served bundle of this kind.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            AssetKind::Css => Some("text/css"),
            AssetKind::Js => Some("application/javascript"),
            AssetKind::Less | AssetKind::Other(_) => None,
        }
    }
}

impl From<AssetKind> for String {
    fn from(kind: AssetKind) -> Self {
        kind.extension().to_string()
    }
}

/// Which extension picks the minifier for the concatenated buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinifySelection {
    /// The extension of the last asset that made it into the buffer.
    #[default]
    LastAsset,
    /// The extension declared by the bundle identifier.
    Bundle,
}

/// 建置單一 bundle 所需的資訊
#[derive(Debug, Clone, Serialize)]
pub struct BundleJob {
    pub id: String,
    pub kind: AssetKind,
    pub assets: Vec<String>,
    pub minify: bool,
    pub minify_by: MinifySelection,
}

/// 單次建置讀入的來源檔案
#[derive(Debug, Clone)]
pub struct Asset {
    pub path: String,
    pub kind: AssetKind,
    pub content: String,
}

impl Asset {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let path = path.into();
        let kind = AssetKind::from_path(&path);
        Self {
            path,
            kind,
            content: content.into(),
        }
    }
}

/// 轉換階段的輸出，準備寫入快取
#[derive(Debug, Clone)]
pub struct PackedBundle {
    pub content: String,
    pub packed_assets: usize,
    pub minified_as: Option<AssetKind>,
}

/// 已寫入快取目錄的 bundle
#[derive(Debug, Clone)]
pub struct CacheArtifact {
    pub bundle_id: String,
    pub path: PathBuf,
    pub modified: SystemTime,
    pub body: Vec<u8>,
}
