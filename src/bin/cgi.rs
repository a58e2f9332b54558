//! CGI entry point: one process per request.
//!
//! Reads the `file` parameter from `QUERY_STRING`, builds the bundle and
//! writes a CGI response on stdout. The configuration file is taken from
//! `JITPACK_CONFIG` (default `jitpack.toml` in the working directory).

use jitpack::core::request::{file_param, resolve_job};
use jitpack::http::http_date;
use jitpack::utils::{logger, validation::Validate};
use jitpack::{lessc_factory, local_packer, JitpackConfig, PackError};
use std::io::Write;

const CONFIG_ENV: &str = "JITPACK_CONFIG";

struct CgiResponse {
    status: u16,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl CgiResponse {
    fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    fn write_to(&self, out: &mut impl Write) -> std::io::Result<()> {
        if self.status != 200 {
            writeln!(out, "Status: {} {}\r", self.status, reason_phrase(self.status))?;
        }
        for (name, value) in &self.headers {
            writeln!(out, "{}: {}\r", name, value)?;
        }
        write!(out, "\r\n")?;
        out.write_all(&self.body)?;
        out.flush()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

async fn handle(query: &str) -> Result<CgiResponse, PackError> {
    let config_path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "jitpack.toml".to_string());
    let config = JitpackConfig::from_file(&config_path)?;
    config.validate()?;

    let file = file_param(query);
    let job = resolve_job(&config, file.as_deref())?;

    let packer = local_packer(&config, lessc_factory(config.lessc.clone()));
    let artifact = packer.run(&job).await?;

    let mut response = CgiResponse::status(200);
    if let Some(content_type) = job.kind.content_type() {
        response.headers.push(("Content-Type", content_type.to_string()));
    }
    response
        .headers
        .push(("Last-Modified", http_date(artifact.modified)));
    response.body = artifact.body;
    Ok(response)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    logger::init_cgi_logger();

    let query = std::env::var("QUERY_STRING").unwrap_or_default();
    let response = match handle(&query).await {
        Ok(response) => response,
        Err(e) => {
            match &e {
                PackError::BundleNotFound { .. } => tracing::debug!(error = %e, "bundle not defined"),
                _ => tracing::error!(error = %e, "bundle request failed"),
            }
            CgiResponse::status(e.status_code())
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    response.write_to(&mut out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_has_status_and_no_body() {
        let mut out = Vec::new();
        CgiResponse::status(404).write_to(&mut out).unwrap();
        assert_eq!(out, b"Status: 404 Not Found\r\n\r\n");
    }

    #[test]
    fn test_success_response_headers_then_body() {
        let response = CgiResponse {
            status: 200,
            headers: vec![("Content-Type", "text/css".to_string())],
            body: b"a{}".to_vec(),
        };
        let mut out = Vec::new();
        response.write_to(&mut out).unwrap();
        assert_eq!(out, b"Content-Type: text/css\r\n\r\na{}");
    }
}
