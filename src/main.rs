use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use jitpack::http::{create_router, AppState};
use jitpack::utils::{logger, validation::Validate};
use jitpack::{lessc_factory, CliConfig, JitpackConfig};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    // 載入 TOML 配置並應用命令列覆蓋
    let mut config = JitpackConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file: {}", cli.config))?;
    cli.apply_to(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        config_path = %cli.config,
        bundles = config.bundles.len(),
        minify = config.minify,
        "starting jitpack"
    );

    // 建立快取目錄
    let cache_root = config.cache_root();
    tokio::fs::create_dir_all(&cache_root)
        .await
        .with_context(|| format!("failed to create cache dir: {}", cache_root.display()))?;

    let listen_addr: std::net::SocketAddr =
        config.listen.parse().context("invalid listen address")?;

    let less_factory = lessc_factory(config.lessc.clone());
    let state = Arc::new(AppState::new(Arc::new(config), less_factory));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {listen_addr}"))?;

    tracing::info!(%listen_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("jitpack shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
