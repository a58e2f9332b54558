use clap::Parser;
use jitpack::core::request::resolve_job;
use jitpack::core::BundleJob;
use jitpack::utils::{logger, validation::Validate};
use jitpack::{lessc_factory, local_packer, JitpackConfig, PackError};

#[derive(Parser)]
#[command(name = "jitpack-pack")]
#[command(about = "Build bundles into the cache directory without serving them")]
struct Args {
    /// Bundle identifiers to build, e.g. app.js site.css
    files: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "jitpack.toml")]
    config: String,

    /// Build every configured bundle
    #[arg(long)]
    all: bool,

    /// Asset root directory, overriding `root` from the config
    #[arg(long)]
    root: Option<String>,

    /// Disable minification regardless of the config
    #[arg(long)]
    no_minify: bool,

    /// Print the resolved bundles as JSON without building them
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    // 載入 TOML 配置
    let mut config = match JitpackConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("Make sure the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    if args.no_minify {
        config.minify = false;
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let files: Vec<String> = if args.all {
        config.bundle_ids().map(str::to_string).collect()
    } else {
        args.files.clone()
    };

    if files.is_empty() {
        eprintln!("No bundles given; pass bundle identifiers or --all");
        std::process::exit(2);
    }

    let mut jobs: Vec<BundleJob> = Vec::new();
    let mut failed = 0usize;
    for file in &files {
        match resolve_job(&config, Some(file)) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                eprintln!("{}: {}", file, e);
                failed += 1;
            }
        }
    }

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    // 建立 packer 並逐一建置
    let packer = local_packer(&config, lessc_factory(config.lessc.clone()));
    for job in &jobs {
        match packer.run(job).await {
            Ok(artifact) => {
                println!("{} -> {} ({} bytes)", job.id, artifact.path.display(), artifact.body.len());
            }
            Err(e) => {
                report_failure(&job.id, &e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} bundles failed", failed, files.len());
        std::process::exit(1);
    }

    Ok(())
}

fn report_failure(bundle: &str, error: &PackError) {
    tracing::error!(bundle, error = %error, "bundle failed");
    eprintln!("{}: {}", bundle, error.user_friendly_message());
}
