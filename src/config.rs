use std::{
    env, fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::args::BaseArgs;
use crate::ui::{print_command_status, CommandStatus};

/// Persisted CLI settings. `session` is the eGain session token written
/// by `egcli login`; `base_url` points at the tenant API root, e.g.
/// https://example.egain.cloud/system/ws/v12/interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub base_url: Option<String>,
    pub session: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub const KNOWN_KEYS: &[&str] = &["base_url", "session"];

impl Config {
    pub fn get_field(&self, key: &str) -> Option<&str> {
        match key {
            "base_url" => self.base_url.as_deref(),
            "session" => self.session.as_deref(),
            _ => None,
        }
    }

    pub fn set_field(&mut self, key: &str, value: String) -> bool {
        match key {
            "base_url" => self.base_url = Some(value),
            "session" => self.session = Some(value),
            _ => return false,
        }
        true
    }

    pub fn unset_field(&mut self, key: &str) -> bool {
        match key {
            "base_url" => self.base_url = None,
            "session" => self.session = None,
            _ => return false,
        }
        true
    }

    pub fn non_empty_fields(&self) -> Vec<(&str, &str)> {
        KNOWN_KEYS
            .iter()
            .filter_map(|&key| self.get_field(key).map(|v| (key, v)))
            .collect()
    }
}

pub fn config_dir() -> Result<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("egcli"));
    }
    dirs::home_dir()
        .map(|path| path.join(".config").join("egcli"))
        .ok_or_else(|| anyhow!("$HOME not configured."))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

pub fn load_file(path: &Path) -> Config {
    let file_contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Config::default(),
        Err(e) => {
            print_command_status(
                CommandStatus::Error,
                &format!("Warning: could not read {}: {e}", path.display()),
            );
            return Config::default();
        }
    };

    let config: Config = match serde_json::from_str(&file_contents) {
        Ok(c) => c,
        Err(e) => {
            print_command_status(
                CommandStatus::Error,
                &format!("Warning: could not read {}: {e}", path.display()),
            );
            return Config::default();
        }
    };

    for key in config.extra.keys() {
        print_command_status(
            CommandStatus::Error,
            &format!("Warning: unknown config key {} in {}", key, path.display()),
        );
    }

    config
}

pub fn load() -> Result<Config> {
    Ok(load_file(&config_path()?))
}

pub fn save_file(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

pub fn save(config: &Config) -> Result<()> {
    save_file(&config_path()?, config)
}

// --- CLI commands ---

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommands {
    /// Print one config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// Remove a config value
    Unset { key: String },
    /// Show all configured values
    List,
}

pub fn run(base: BaseArgs, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Get { key } => run_get(&base, &key),
        ConfigCommands::Set { key, value } => run_set(&key, value),
        ConfigCommands::Unset { key } => run_unset(&key),
        ConfigCommands::List => run_list(&base),
    }
}

fn require_known_key(key: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key {key}. Known keys: {}",
            KNOWN_KEYS.join(", ")
        );
    }
    Ok(())
}

fn run_get(base: &BaseArgs, key: &str) -> Result<()> {
    let cfg = load()?;
    match cfg.get_field(key) {
        Some(value) => {
            if base.json {
                println!("{}", serde_json::to_string(value)?);
            } else {
                println!("{value}");
            }
            Ok(())
        }
        None => process::exit(1),
    }
}

fn run_set(key: &str, value: String) -> Result<()> {
    require_known_key(key)?;
    let path = config_path()?;
    let mut cfg = load_file(&path);
    cfg.set_field(key, value.clone());
    save_file(&path, &cfg)?;

    let shown = if key == "session" {
        "(hidden)"
    } else {
        value.as_str()
    };
    print_command_status(CommandStatus::Success, &format!("Set {key} = {shown}"));
    Ok(())
}

fn run_unset(key: &str) -> Result<()> {
    require_known_key(key)?;
    let path = config_path()?;
    let mut cfg = load_file(&path);
    cfg.unset_field(key);
    save_file(&path, &cfg)?;

    print_command_status(CommandStatus::Success, &format!("Unset {key}"));
    Ok(())
}

fn run_list(base: &BaseArgs) -> Result<()> {
    let cfg = load()?;
    let fields = cfg.non_empty_fields();

    if base.json {
        let map: Map<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect();
        println!("{}", serde_json::to_string(&map)?);
    } else {
        for (key, value) in fields {
            if key == "session" {
                println!("{key}: (hidden)");
            } else {
                println!("{key}: {value}");
            }
        }
    }
    Ok(())
}
