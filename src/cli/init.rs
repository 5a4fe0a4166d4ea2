//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use crate::cli::GlobalOptions;
use crate::client::Role;
use crate::config::Config;
use crate::error::Result;

/// Run the init command
///
/// Prompts for the backend URL and a session token per portal. Existing
/// values are kept when the prompt is left empty. With `role`, only that
/// portal's token is asked for.
pub fn run(opts: &GlobalOptions, role: Option<Role>) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut config = Config::load_or_default(opts.config_ref())?;

    println!("{}", "Welcome to PropTalk!".bold().green());
    println!("Let's set up your PropTalk configuration.\n");

    let api_url: String = Input::with_theme(&theme)
        .with_prompt("PropTalk API URL")
        .default(config.api_url(opts.api_url_ref()))
        .interact_text()?;
    config.api_url = Some(api_url.trim().trim_end_matches('/').to_string());

    let roles = match role {
        Some(role) => vec![role],
        None => Role::ALL.to_vec(),
    };

    for role in roles {
        let existing = config.tokens.get(role).is_some();
        let prompt = if existing {
            format!("{} token (leave empty to keep current)", role)
        } else {
            format!("{} token (leave empty to skip)", role)
        };
        let token = Password::with_theme(&theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?;
        if !token.trim().is_empty() {
            config.tokens.set(role, token);
        }
    }

    let config_path = config.save_at(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "\u{2713}".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "proptalk status".cyan());
    if config.tokens.get(Role::Admin).is_some() {
        println!("  {} - Platform counters", "proptalk admin stats".cyan());
    }
    if config.tokens.get(Role::Agent).is_some() {
        println!("  {} - Your approval status", "proptalk agent approval".cyan());
    }
    if config.tokens.get(Role::User).is_some() {
        println!("  {} - Browse listings", "proptalk user properties".cyan());
    }

    Ok(())
}
