use async_trait::async_trait;
use jitpack::core::request::resolve_job;
use jitpack::core::{LessCompiler, LessCompilerFactory};
use jitpack::{local_packer, JitpackConfig, PackError};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Turns `@name: value;` declarations into nothing and replaces `@name`
/// references, which is enough LESS for these tests. Fails on `@fail`.
struct TinyLess;

#[async_trait]
impl LessCompiler for TinyLess {
    async fn compile(&self, source: &str) -> jitpack::Result<String> {
        if source.contains("@fail") {
            return Err(PackError::TransformError {
                message: "unrecognised input".to_string(),
            });
        }
        let mut vars = Vec::new();
        let mut body = String::new();
        for line in source.lines() {
            let trimmed = line.trim();
            if let Some(decl) = trimmed.strip_prefix('@') {
                if let Some((name, value)) = decl.split_once(':') {
                    vars.push((format!("@{}", name.trim()), value.trim().trim_end_matches(';').to_string()));
                    continue;
                }
            }
            body.push_str(line);
            body.push('\n');
        }
        for (name, value) in vars {
            body = body.replace(&name, &value);
        }
        Ok(body)
    }
}

fn tiny_less() -> LessCompilerFactory {
    Arc::new(|| Box::new(TinyLess) as Box<dyn LessCompiler>)
}

fn write_asset(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(full, content).unwrap();
}

fn config(root: &Path, minify: bool) -> JitpackConfig {
    let toml_content = format!(
        r#"
minify = {minify}
cache_dir = "cache"
root = "{root}"

["app.js"]
js = ["js/a.js", "js/b.js"]

["partial.js"]
js = ["js/missing.js", "js/b.js"]

["ghost.js"]
js = ["js/missing.js", "js/also-missing.js"]

["site.css"]
css = ["css/reset.css", "less/theme.less"]
"#,
        minify = minify,
        root = root.display()
    );
    JitpackConfig::from_toml_str(&toml_content).unwrap()
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write_asset(temp_dir.path(), "js/a.js", "var x=1");
    write_asset(temp_dir.path(), "js/b.js", "var y=2;");
    write_asset(temp_dir.path(), "css/reset.css", "body {\n  margin: 0px;\n}");
    write_asset(
        temp_dir.path(),
        "less/theme.less",
        "@brand: red;\na {\n  color: @brand;\n}",
    );
    temp_dir
}

#[tokio::test]
async fn test_js_bundle_unminified() {
    let temp_dir = fixture();
    let config = config(temp_dir.path(), false);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("app.js")).unwrap();
    let artifact = packer.run(&job).await.unwrap();

    let expected = ";var x=1\n;var y=2;\n";
    assert_eq!(artifact.path, temp_dir.path().join("cache").join("app.js"));
    assert_eq!(String::from_utf8(artifact.body).unwrap(), expected);
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("cache/app.js")).unwrap(),
        expected
    );
}

#[tokio::test]
async fn test_rebuild_is_byte_identical() {
    let temp_dir = fixture();
    let config = config(temp_dir.path(), true);
    let packer = local_packer(&config, tiny_less());
    let job = resolve_job(&config, Some("site.css")).unwrap();

    let first = packer.run(&job).await.unwrap();
    let second = packer.run(&job).await.unwrap();

    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_css_bundle_compiles_less_and_minifies_once() {
    let temp_dir = fixture();
    let config = config(temp_dir.path(), true);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("site.css")).unwrap();
    let artifact = packer.run(&job).await.unwrap();

    assert_eq!(
        String::from_utf8(artifact.body).unwrap(),
        "body{margin:0}a{color:red}"
    );
}

#[tokio::test]
async fn test_minify_toggle_changes_output() {
    let temp_dir = fixture();

    let plain = config(temp_dir.path(), false);
    let job = resolve_job(&plain, Some("site.css")).unwrap();
    let unminified = local_packer(&plain, tiny_less()).run(&job).await.unwrap();
    assert_eq!(
        String::from_utf8(unminified.body).unwrap(),
        "body {\n  margin: 0px;\n}\na {\n  color: red;\n}\n\n"
    );

    let mut overridden = config(temp_dir.path(), true);
    overridden.apply_minify_override(Some("Off"));
    let job = resolve_job(&overridden, Some("site.css")).unwrap();
    assert!(!job.minify);
}

#[tokio::test]
async fn test_missing_asset_is_skipped() {
    let temp_dir = fixture();
    let config = config(temp_dir.path(), false);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("partial.js")).unwrap();
    let artifact = packer.run(&job).await.unwrap();

    assert_eq!(String::from_utf8(artifact.body).unwrap(), ";var y=2;\n");
}

#[tokio::test]
async fn test_all_assets_missing_is_empty_result() {
    let temp_dir = fixture();
    let config = config(temp_dir.path(), false);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("ghost.js")).unwrap();
    let err = packer.run(&job).await.unwrap_err();

    assert!(matches!(err, PackError::EmptyResult { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(!temp_dir.path().join("cache/ghost.js").exists());
}

#[tokio::test]
async fn test_less_failure_falls_back_to_source() {
    let temp_dir = fixture();
    write_asset(temp_dir.path(), "less/theme.less", "@fail\na { color: blue; }");
    let config = config(temp_dir.path(), false);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("site.css")).unwrap();
    let artifact = packer.run(&job).await.unwrap();

    assert_eq!(
        String::from_utf8(artifact.body).unwrap(),
        "body {\n  margin: 0px;\n}\n@fail\na { color: blue; }\n"
    );
}

#[tokio::test]
async fn test_unwritable_cache_is_write_error() {
    let temp_dir = fixture();
    std::fs::write(temp_dir.path().join("cache"), "not a directory").unwrap();
    let config = config(temp_dir.path(), false);
    let packer = local_packer(&config, tiny_less());

    let job = resolve_job(&config, Some("app.js")).unwrap();
    let err = packer.run(&job).await.unwrap_err();

    assert!(matches!(err, PackError::WriteError { .. }));
    assert_eq!(err.status_code(), 500);
}
