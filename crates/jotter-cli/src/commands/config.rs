use jotter_core::config::normalize_api_url;
use jotter_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_url,
            api_token,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_url,
            api_token,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_url: Option<String>,
    api_token: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(url) = normalize_text_option(api_url) {
        profile.api_url = Some(normalize_api_url(&url).map_err(|error| {
            CliError::Config(format!("api_url is not valid: {error}"))
        })?);
    }
    if let Some(token) = normalize_text_option(api_token) {
        profile.api_token = Some(token);
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );
    Ok(())
}

pub fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let resolved = profile.client_config(|name| std::env::var(name).ok())?;

    println!("config:  {}", default_config_path().map_err(CliError::Config)?.display());
    println!("profile: {profile_name}");
    println!("api_url: {}", resolved.api_url);
    println!(
        "token:   {}",
        if resolved.api_token.is_some() { "[REDACTED]" } else { "(none)" }
    );
    Ok(())
}
