//! Extension-keyed transform table.
//!
//! Each [`AssetKind`] maps to a [`TransformRule`]: the pre-transform applied
//! to a single asset before concatenation, the separator written ahead of the
//! asset, and the minifier applied once to a whole concatenated buffer.
//!
//! | kind   | pre-transform | separator | minifier |
//! |--------|---------------|-----------|----------|
//! | `css`  | identity      | none      | CSS      |
//! | `less` | LESS compile  | none      | CSS      |
//! | `js`   | identity      | `;`       | JS       |
//! | other  | identity      | none      | identity |

use crate::domain::model::AssetKind;
use crate::utils::error::{PackError, Result};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreTransform {
    Identity,
    CompileLess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Minifier {
    Identity,
    Css,
    Js,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformRule {
    pub pre: PreTransform,
    pub separator: Option<char>,
    pub minifier: Minifier,
}

const IDENTITY: TransformRule = TransformRule {
    pre: PreTransform::Identity,
    separator: None,
    minifier: Minifier::Identity,
};

pub struct TransformRegistry;

impl TransformRegistry {
    pub fn rule_for(kind: &AssetKind) -> TransformRule {
        match kind {
            AssetKind::Css => TransformRule {
                minifier: Minifier::Css,
                ..IDENTITY
            },
            AssetKind::Less => TransformRule {
                pre: PreTransform::CompileLess,
                minifier: Minifier::Css,
                ..IDENTITY
            },
            AssetKind::Js => TransformRule {
                separator: Some(';'),
                minifier: Minifier::Js,
                ..IDENTITY
            },
            AssetKind::Other(_) => IDENTITY,
        }
    }

    /// 以 `kind` 對應的壓縮器壓縮整個緩衝區
    ///
    /// 壓縮失敗時回傳原始內容
    pub fn minify(kind: &AssetKind, buffer: String) -> String {
        let result = match Self::rule_for(kind).minifier {
            Minifier::Identity => return buffer,
            Minifier::Css => minify_css(&buffer),
            Minifier::Js => Ok(minify_js(&buffer)),
        };

        match result {
            Ok(minified) => minified,
            Err(e) => {
                tracing::warn!(kind = kind.extension(), error = %e, "minification failed, serving unminified");
                buffer
            }
        }
    }
}

pub fn minify_css(source: &str) -> Result<String> {
    let to_error = |message: String| PackError::MinifyError { message };

    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| to_error(e.to_string()))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| to_error(e.to_string()))?;
    let output = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| to_error(e.to_string()))?;

    Ok(output.code)
}

pub fn minify_js(source: &str) -> String {
    minifier::js::minify(source).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_table() {
        assert_eq!(
            TransformRegistry::rule_for(&AssetKind::Less).pre,
            PreTransform::CompileLess
        );
        assert_eq!(TransformRegistry::rule_for(&AssetKind::Css).pre, PreTransform::Identity);
        assert_eq!(TransformRegistry::rule_for(&AssetKind::Js).separator, Some(';'));
        assert_eq!(TransformRegistry::rule_for(&AssetKind::Less).separator, None);
        assert_eq!(TransformRegistry::rule_for(&AssetKind::Less).minifier, Minifier::Css);
        assert_eq!(
            TransformRegistry::rule_for(&AssetKind::Other("txt".to_string())),
            IDENTITY
        );
    }

    #[test]
    fn test_minify_css() {
        let css = "body {\n  color: red;\n}\n";
        assert_eq!(minify_css(css).unwrap(), "body{color:red}");
    }

    #[test]
    fn test_minify_js_strips_comments() {
        let js = "function add(a, b) {\n    // sum\n    return a + b;\n}\n";
        let minified = minify_js(js);

        assert!(!minified.contains("// sum"));
        assert!(minified.len() < js.len());
        assert!(minified.contains("return"));
    }

    #[test]
    fn test_unrecognized_kind_bypasses_minification() {
        let text = "  keep   me  \n".to_string();
        let kind = AssetKind::Other("txt".to_string());
        assert_eq!(TransformRegistry::minify(&kind, text.clone()), text);
    }

    #[test]
    fn test_less_kind_uses_css_minifier() {
        let css = "a {\n  margin: 0px;\n}\n".to_string();
        assert_eq!(TransformRegistry::minify(&AssetKind::Less, css), "a{margin:0}");
    }

    #[test]
    fn test_unparsable_css_is_kept() {
        let broken = "..bad { color: red; }\n".to_string();
        assert!(matches!(minify_css(&broken), Err(PackError::MinifyError { .. })));

        let result = TransformRegistry::minify(&AssetKind::Css, broken.clone());
        assert_eq!(result, broken);
    }
}
