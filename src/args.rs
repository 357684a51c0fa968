use std::path::PathBuf;

use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct BaseArgs {
    /// Output as JSON
    #[arg(short = 'j', long, global = true)]
    pub json: bool,

    /// Override the eGain API base URL (or via EGAIN_BASE_URL)
    #[arg(
        long,
        env = "EGAIN_BASE_URL",
        hide_env_values = true,
        global = true
    )]
    pub base_url: Option<String>,

    /// Override the stored session token (or via EGAIN_SESSION)
    #[arg(
        long,
        env = "EGAIN_SESSION",
        hide_env_values = true,
        global = true
    )]
    pub session: Option<String>,

    /// Path to a .env file to load before running commands.
    #[arg(long, env = "EGCLI_ENV_FILE", hide_env_values = true)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CLIArgs<T: Args> {
    #[command(flatten)]
    pub base: BaseArgs,

    #[command(flatten)]
    pub args: T,
}
