use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use moviephile_config::{Config, PathManager, SupabaseConfig};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init {
            tmdb_api_key,
            supabase_url,
            supabase_anon_key,
        } => init_config(tmdb_api_key, supabase_url, supabase_anon_key, output),
        ConfigCommands::Path => {
            let path = PathManager::default().config_file();
            output.info(path.display().to_string());
            Ok(())
        }
    }
}

/// Keep the first 4 characters of a secret
fn mask_string(value: &str) -> String {
    if value.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = value.chars().take(4).collect();
    format!("{}{}", visible, "*".repeat(8))
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let secret = |value: &str| if full { value.to_string() } else { mask_string(value) };

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "path": config_file.display().to_string(),
            "exists": config_file.exists(),
            "tmdb": { "api_key": secret(&config.tmdb.api_key), "base_url": config.tmdb.base_url },
            "supabase": config.supabase.as_ref().map(|s| json!({
                "url": s.url,
                "anon_key": secret(&s.anon_key),
                "table": s.table,
            })),
            "feed": config.feed,
            "search": config.search,
            "watchlist": config.watchlist,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!(
            "No configuration file at {} (showing defaults and environment overrides)",
            config_file.display()
        ));
    }
    println!("{}", "Configuration".bright_cyan().bold());

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec!["Config file".to_string(), config_file.display().to_string()]);
    table.add_row(vec!["TMDB API key".to_string(), secret(&config.tmdb.api_key)]);
    table.add_row(vec!["TMDB base URL".to_string(), config.tmdb.base_url.clone()]);
    match &config.supabase {
        Some(supabase) => {
            table.add_row(vec!["Supabase URL".to_string(), supabase.url.clone()]);
            table.add_row(vec!["Supabase anon key".to_string(), secret(&supabase.anon_key)]);
            table.add_row(vec!["Watchlist table".to_string(), supabase.table.clone()]);
        }
        None => {
            table.add_row(vec!["Supabase".to_string(), "(not configured)".to_string()]);
        }
    }
    table.add_row(vec![
        "Reel feed".to_string(),
        format!(
            "{} {}, {} pages max, plays at {:.0}% visible",
            config.feed.category,
            config.feed.media_type,
            config.feed.max_pages,
            config.feed.visibility_threshold * 100.0
        ),
    ]);
    table.add_row(vec![
        "Reel timing".to_string(),
        format!(
            "start after {} ms, controls fade after {} ms",
            config.feed.startup_delay_ms, config.feed.controls_fade_ms
        ),
    ]);
    println!("{}", table);
    Ok(())
}

fn init_config(
    tmdb_api_key: Option<String>,
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    output: &Output,
) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let mut config = if config_file.exists() {
        if !prompts::prompt_yes_no(
            &format!("{} already exists. Update it?", config_file.display()),
            true,
        )? {
            return Ok(());
        }
        Config::load_from_file(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };

    config.tmdb.api_key = match tmdb_api_key {
        Some(key) => key,
        None => prompts::prompt_string("TMDB API key", Some(config.tmdb.api_key.as_str()).filter(|k| !k.is_empty()))?,
    };

    let url = match supabase_url {
        Some(url) => Some(url),
        None => {
            if prompts::prompt_yes_no("Sync the watchlist through Supabase?", config.supabase.is_some())? {
                let current = config.supabase.as_ref().map(|s| s.url.as_str());
                Some(prompts::prompt_string("Supabase project URL", current)?)
            } else {
                None
            }
        }
    };
    if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
        let anon_key = match supabase_anon_key {
            Some(key) => key,
            None => prompts::prompt_password("Supabase anon key")?,
        };
        let table = config
            .supabase
            .as_ref()
            .map(|s| s.table.clone())
            .unwrap_or_else(|| "watchlist".to_string());
        config.supabase = Some(SupabaseConfig {
            url: url.trim().to_string(),
            anon_key,
            table,
        });
    }

    config
        .validate()
        .map_err(|e| eyre!("Configuration is not valid: {}", e))?;
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create {}: {}", paths.config_dir().display(), e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}
