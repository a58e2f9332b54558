use crate::core::ConfigProvider;
use crate::domain::model::MinifySelection;
use crate::utils::error::{PackError, Result};
use crate::utils::validation::{
    validate_bundle_identifier, validate_non_empty_string, validate_path, validate_relative_path,
    Validate,
};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 設為 `Off` 時關閉壓縮的環境變數
pub const MINIFY_ENV: &str = "JITPACK_MINIFY";

/// 副檔名 -> 依序的資源路徑
pub type BundleSection = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct JitpackConfig {
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub minify: bool,
    pub cache_dir: String,
    #[serde(default = "default_root")]
    pub root: String,
    #[serde(default = "default_lessc")]
    pub lessc: String,
    #[serde(default)]
    pub minify_by: MinifySelection,
    #[serde(default = "default_listen")]
    pub listen: String,
    /// 其餘的頂層表格都是 bundle 區段
    #[serde(flatten)]
    pub bundles: BTreeMap<String, BundleSection>,
}

fn default_root() -> String {
    "..".to_string()
}

fn default_lessc() -> String {
    "lessc".to_string()
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

/// 接受 INI 風格的寬鬆布林值：布林、整數以及字串
/// (空字串、`"0"`、`off`/`no`/`false`/`none` 為假，其餘為真)
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        // INI 的假值字詞視為空字串
        Flag::Text(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "off" | "no" | "false" | "none"
        ),
    })
}

/// 環境變數是否強制關閉壓縮
pub fn minify_forced_off(env_value: Option<&str>) -> bool {
    env_value == Some("Off")
}

impl JitpackConfig {
    /// 從 TOML 檔案載入配置，並套用環境變數覆蓋
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| PackError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_minify_override(std::env::var(MINIFY_ENV).ok().as_deref());
        Ok(config)
    }

    /// 從 TOML 字串解析配置 (不套用環境變數覆蓋)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PackError::ConfigParseError {
            message: e.to_string(),
        })
    }

    /// 替換環境變數 (例如 ${CACHE_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PackError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_minify_override(&mut self, env_value: Option<&str>) {
        if minify_forced_off(env_value) {
            self.minify = false;
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_relative_path("cache_dir", &self.cache_dir)?;
        validate_path("root", &self.root)?;
        validate_non_empty_string("lessc", &self.lessc)?;

        for (identifier, section) in &self.bundles {
            validate_bundle_identifier("bundle", identifier)?;
            for (extension, assets) in section {
                let field = format!("{}.{}", identifier, extension);
                for asset in assets {
                    validate_non_empty_string(&field, asset)?;
                }
            }
        }

        Ok(())
    }

    /// 取得 bundle 的資源清單；未設定或清單為空時回傳 `None`
    pub fn lookup(&self, identifier: &str, extension: &str) -> Option<&[String]> {
        self.bundles
            .get(identifier)?
            .get(extension)
            .filter(|assets| !assets.is_empty())
            .map(Vec::as_slice)
    }

    pub fn asset_root(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    pub fn cache_root(&self) -> PathBuf {
        self.asset_root().join(&self.cache_dir)
    }

    /// 取得所有 bundle 名稱 (已排序)
    pub fn bundle_ids(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(String::as_str)
    }
}

impl ConfigProvider for JitpackConfig {
    fn lookup(&self, identifier: &str, extension: &str) -> Option<&[String]> {
        JitpackConfig::lookup(self, identifier, extension)
    }

    fn minify_enabled(&self) -> bool {
        self.minify
    }

    fn minify_by(&self) -> MinifySelection {
        self.minify_by
    }
}

impl Validate for JitpackConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
