/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When MonitorConfig schema changes
*/

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::path::PathBuf;

use stock_fetch_monitor::config::{HttpConfig, MonitorConfig, default_config_path};
use stock_fetch_monitor::params::{MAX_YEARS, MIN_YEARS};
use stock_fetch_monitor::task::Locale;

pub fn run_init(output: Option<PathBuf>) -> Result<()> {
    let output = match output {
        Some(path) => path,
        None => default_config_path().context("no config directory on this platform; pass --output")?,
    };

    println!("{}", style("Stock fetch monitor setup").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a configuration file.").dim()
    );

    let theme = ColorfulTheme::default();
    let defaults = MonitorConfig::default();

    let server_url: String = Input::with_theme(&theme)
        .with_prompt("Service URL")
        .default(defaults.server_url.clone())
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(())
            } else {
                Err("URL must start with http:// or https://")
            }
        })
        .interact_text()?;

    let locales = ["English", "中文"];
    let locale = match Select::with_theme(&theme)
        .with_prompt("Label language")
        .items(&locales)
        .default(0)
        .interact()?
    {
        1 => Locale::Zh,
        _ => Locale::En,
    };

    let default_years: u32 = Input::with_theme(&theme)
        .with_prompt(format!("Default look-back years ({MIN_YEARS}-{MAX_YEARS})"))
        .default(defaults.default_years)
        .validate_with(|years: &u32| -> Result<(), &str> {
            if (MIN_YEARS..=MAX_YEARS).contains(years) {
                Ok(())
            } else {
                Err("out of range")
            }
        })
        .interact_text()?;

    println!("\n{}", style("--- HTTP ---").bold());
    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Request timeout (seconds)")
        .default(defaults.http.timeout_secs)
        .interact_text()?;

    let config = MonitorConfig {
        server_url,
        locale,
        http: HttpConfig {
            timeout_secs,
            ..HttpConfig::default()
        },
        default_years,
    };

    let yaml = config.to_yaml()?;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );

    Ok(())
}
