use crate::core::{AssetKind, BundleJob, ConfigProvider};
use crate::utils::error::{PackError, Result};
use crate::utils::validation::is_plain_file_name;
use std::path::Path;

/// Turn the `file` request parameter into a build job.
///
/// A missing or empty parameter is [`PackError::RequestMalformed`]; anything
/// that does not name a configured bundle with assets for its extension is
/// [`PackError::BundleNotFound`].
pub fn resolve_job<C>(config: &C, file: Option<&str>) -> Result<BundleJob>
where
    C: ConfigProvider + ?Sized,
{
    let file = file.filter(|f| !f.is_empty()).ok_or(PackError::RequestMalformed)?;

    let not_found = || PackError::BundleNotFound {
        bundle: file.to_string(),
    };

    if !is_plain_file_name(file) {
        return Err(not_found());
    }

    let extension = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(not_found)?;

    let assets = config.lookup(file, extension).ok_or_else(not_found)?;

    Ok(BundleJob {
        id: file.to_string(),
        kind: AssetKind::from_extension(extension),
        assets: assets.to_vec(),
        minify: config.minify_enabled(),
        minify_by: config.minify_by(),
    })
}

/// 從原始查詢字串取出 `file` 參數，重複時取最後一個
pub fn file_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == "file")
        .last()
        .map(|(_, value)| value.into_owned())
}
