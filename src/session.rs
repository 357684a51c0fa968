use anyhow::{bail, Result};
use clap::Args;
use dialoguer::{Input, Password};

use crate::args::BaseArgs;
use crate::config;
use crate::ui::{print_command_status, CommandStatus};

/// Resolved connection details for API calls. The session token may be
/// empty; the server answers 401 and the fetcher classifies it, so an
/// unset token is not an error at this layer.
pub struct SearchContext {
    pub base_url: String,
    pub session: String,
}

/// Resolution order for both values: explicit flag/env, then the
/// config file. Only the base URL is mandatory.
pub fn resolve(base: &BaseArgs) -> Result<SearchContext> {
    let cfg = config::load()?;

    let base_url = match base.base_url.clone().or(cfg.base_url) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => bail!(
            "No API base URL configured. Pass --base-url, set EGAIN_BASE_URL, \
             or run `egcli config set base_url <url>`."
        ),
    };

    let session = base
        .session
        .clone()
        .or(cfg.session)
        .unwrap_or_default();

    Ok(SearchContext { base_url, session })
}

#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Session token (prompted for when omitted)
    #[arg(long, hide_env_values = true, env = "EGAIN_SESSION")]
    pub token: Option<String>,

    /// API base URL to store alongside the token
    #[arg(long)]
    pub base_url: Option<String>,
}

pub fn run(args: LoginArgs) -> Result<()> {
    let path = config::config_path()?;
    let mut cfg = config::load_file(&path);

    if let Some(base_url) = args.base_url {
        cfg.base_url = Some(base_url.trim_end_matches('/').to_string());
    } else if cfg.base_url.is_none() {
        let url: String = Input::new()
            .with_prompt("API base URL")
            .interact_text()?;
        cfg.base_url = Some(url.trim_end_matches('/').to_string());
    }

    let token = match args.token {
        Some(t) => t,
        None => Password::new()
            .with_prompt("eGain session token")
            .interact()?,
    };
    if token.trim().is_empty() {
        bail!("Session token cannot be empty.");
    }
    cfg.session = Some(token.trim().to_string());

    config::save_file(&path, &cfg)?;
    print_command_status(
        CommandStatus::Success,
        &format!("Session saved to {}", path.display()),
    );
    Ok(())
}
