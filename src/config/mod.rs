pub mod toml_config;

pub use toml_config::JitpackConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "jitpack")]
#[command(about = "Serve concatenated and minified CSS/JS bundles")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jitpack.toml")]
    pub config: String,

    /// Socket address to listen on, overriding `listen` from the config
    #[arg(long)]
    pub listen: Option<String>,

    /// Asset root directory, overriding `root` from the config
    #[arg(long)]
    pub root: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 將命令列參數覆蓋到已載入的配置
    pub fn apply_to(&self, config: &mut JitpackConfig) {
        if let Some(listen) = &self.listen {
            config.listen = listen.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
    }
}
