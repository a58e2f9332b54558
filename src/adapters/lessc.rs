//! LESS compilation through an external `lessc` executable.
//!
//! The source is piped to `lessc -` and the compiled CSS is read from stdout.
//! A non-zero exit status is reported as a [`PackError::TransformError`]
//! carrying the compiler's stderr.

use crate::core::{LessCompiler, LessCompilerFactory};
use crate::utils::error::{PackError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct LesscCompiler {
    program: String,
}

impl LesscCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl LessCompiler for LesscCompiler {
    async fn compile(&self, source: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PackError::TransformError {
                message: format!("failed to start '{}': {}", self.program, e),
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| PackError::TransformError {
            message: "compiler stdin unavailable".to_string(),
        })?;
        let input = source.as_bytes().to_vec();
        // 同時寫入 stdin，避免 stdout 塞滿時子程序卡住
        let feeder = tokio::spawn(async move {
            let result = stdin.write_all(&input).await;
            drop(stdin);
            result
        });

        let output = child.wait_with_output().await?;
        if let Ok(Err(e)) = feeder.await {
            tracing::debug!(error = %e, "lessc closed stdin early");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PackError::TransformError {
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Factory producing a fresh [`LesscCompiler`] for each build.
pub fn lessc_factory(program: impl Into<String>) -> LessCompilerFactory {
    let program = program.into();
    Arc::new(move || Box::new(LesscCompiler::new(program.clone())) as Box<dyn LessCompiler>)
}
