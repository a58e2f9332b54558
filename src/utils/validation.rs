use crate::utils::error::{PackError, Result};
use std::path::{Component, Path};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// 驗證相對路徑不會跳出所在目錄
pub fn validate_relative_path(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;

    let escapes = Path::new(path).components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path must be relative and may not contain '..'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// bundle 名稱同時是快取檔名，必須是帶副檔名的單一路徑片段
pub fn validate_bundle_identifier(field_name: &str, identifier: &str) -> Result<()> {
    validate_non_empty_string(field_name, identifier)?;

    if !is_plain_file_name(identifier) {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: identifier.to_string(),
            reason: "Bundle identifier must be a plain file name".to_string(),
        });
    }

    if Path::new(identifier).extension().is_none() {
        return Err(PackError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: identifier.to_string(),
            reason: "Bundle identifier has no file extension".to_string(),
        });
    }

    Ok(())
}

pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("cache_dir", "cache").is_ok());
        assert!(validate_path("cache_dir", "").is_err());
        assert!(validate_path("cache_dir", "ca\0che").is_err());
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path("cache_dir", "public/cache").is_ok());
        assert!(validate_relative_path("cache_dir", "../cache").is_err());
        assert!(validate_relative_path("cache_dir", "/var/cache").is_err());
    }

    #[test]
    fn test_validate_bundle_identifier() {
        assert!(validate_bundle_identifier("bundle", "app.js").is_ok());
        assert!(validate_bundle_identifier("bundle", "site.min.css").is_ok());
        assert!(validate_bundle_identifier("bundle", "app").is_err());
        assert!(validate_bundle_identifier("bundle", "js/app.js").is_err());
        assert!(validate_bundle_identifier("bundle", "  ").is_err());
    }
}
