//! Status command implementation

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::client::Role;
use crate::config::Config;
use crate::error::Result;

/// Run the status command to display configuration status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "PropTalk Configuration Status".bold());

    let config_path = match opts.config_ref() {
        Some(path) => std::path::PathBuf::from(path),
        None => Config::default_path()?,
    };

    let config = match Config::load_at(opts.config_ref()) {
        Ok(config) => {
            println!("Config file: {}", config_path.display().to_string().cyan());
            config
        }
        Err(_) => {
            println!("{} Configuration not found", "\u{2717}".red());
            println!(
                "  \u{2192} Run {} to create {}",
                "proptalk init".cyan(),
                config_path.display()
            );
            Config::default()
        }
    };
    println!();

    println!(
        "{} API URL: {}",
        "\u{25cb}".dimmed(),
        config.api_url(opts.api_url_ref()).cyan()
    );

    for role in Role::ALL {
        if config.tokens.get(role).is_some() {
            println!("{} {} token configured", "\u{2713}".green(), role);
        } else {
            println!("{} {} token not configured", "\u{2717}".red(), role);
            println!("  \u{2192} Run 'proptalk init --role {}' to add one", role);
        }
    }

    if let Some(ref format) = config.preferences.format {
        println!("{} Default format: {}", "\u{25cb}".dimmed(), format);
    }

    println!();
    Ok(())
}
