//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, DEFAULT_API_URL};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { api_url, force } => init_config(api_url.as_deref(), force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut shown = ctx.config.clone();
    if shown.api.token.is_some() {
        shown.api.token = Some("<set>".to_string());
    }

    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &shown.api.base_url);
    ctx.output.kv("timeout_secs", &shown.api.timeout_secs.to_string());
    ctx.output
        .kv("token", shown.api.token.as_deref().unwrap_or("(not set)"));

    ctx.output.info("");
    ctx.output.info("[storage]");
    ctx.output
        .kv("data_dir", &ctx.data_dir().display().to_string());

    Ok(())
}

fn init_config(api_url: Option<&str>, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("gem.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let content = generate_default_config(api_url.unwrap_or(DEFAULT_API_URL));
    std::fs::write(&config_path, content)?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
