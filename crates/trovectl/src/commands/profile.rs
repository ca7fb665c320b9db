//! Profile management command implementations

use colored::Colorize;
use serde_json::{Value, json};
use tracing::{debug, info, trace};
use trovectl_core::config::{Config, CredentialStore, Profile};

use crate::cli::{OutputFormat, ProfileCommands};
use crate::connection::ConnectionManager;
use crate::error::{Result as CliResult, TroveCtlError};
use crate::output::{self, print_output};

pub async fn handle_profile_command(
    profile_cmd: &ProfileCommands,
    conn_mgr: &ConnectionManager,
    output_format: OutputFormat,
) -> CliResult<()> {
    use ProfileCommands::*;

    match profile_cmd {
        List => handle_list(conn_mgr, output_format),
        Path => handle_path(conn_mgr, output_format),
        Show { name } => handle_show(conn_mgr, name, output_format),
        Set {
            name,
            url,
            token,
            prompt_token,
            insecure,
            timeout,
            region,
            default,
            #[cfg(feature = "secure-storage")]
            use_keyring,
        } => {
            let token = match (token, prompt_token) {
                (Some(token), _) => Some(token.clone()),
                (None, true) => Some(
                    rpassword::prompt_password("Token: ").map_err(|e| {
                        TroveCtlError::InvalidInput {
                            message: format!("Failed to read token: {}", e),
                        }
                    })?,
                ),
                (None, false) => None,
            };

            let mut profile = Profile::new(url);
            profile.insecure = *insecure;
            profile.timeout_secs = *timeout;
            profile.region = region.clone();
            profile.token = token;

            #[cfg(feature = "secure-storage")]
            if *use_keyring && let Some(token) = &profile.token {
                let store = CredentialStore::new();
                profile.token = Some(store.store_credential(&format!("{}-token", name), token)?);
                println!("Token stored in {}", store.storage_backend());
            }

            handle_set(conn_mgr, name, profile, *default)
        }
        Remove { name } => handle_remove(conn_mgr, name),
        Default { name } => handle_default(conn_mgr, name),
    }
}

fn structured(output_format: OutputFormat) -> Option<output::OutputFormat> {
    match output_format {
        OutputFormat::Json => Some(output::OutputFormat::Json),
        OutputFormat::Yaml => Some(output::OutputFormat::Yaml),
        OutputFormat::Auto | OutputFormat::Table => None,
    }
}

/// Token as shown to the user: keyring references verbatim, secrets masked
fn masked_token(profile: &Profile) -> Option<String> {
    profile.token.as_deref().map(|token| {
        if CredentialStore::is_keyring_reference(token) {
            token.to_string()
        } else {
            let preview: String = token.chars().take(4).collect();
            format!("{}...", preview)
        }
    })
}

fn profile_json(name: &str, profile: &Profile, is_default: bool) -> Value {
    let mut obj = json!({
        "name": name,
        "url": profile.url,
        "is_default": is_default,
        "token_configured": profile.has_token(),
        "insecure": profile.insecure,
    });
    if let Some(token) = masked_token(profile) {
        obj["token"] = json!(token);
    }
    if let Some(timeout) = profile.timeout_secs {
        obj["timeout_secs"] = json!(timeout);
    }
    if let Some(region) = &profile.region {
        obj["region"] = json!(region);
    }
    obj
}

fn handle_list(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    debug!("Listing all configured profiles");
    let profiles = conn_mgr.config.list_profiles();
    trace!("Found {} profiles", profiles.len());
    let default_name = conn_mgr.config.default_profile.as_deref();
    let config_path = conn_mgr.effective_config_path().ok();

    if let Some(fmt) = structured(output_format) {
        let profile_list: Vec<Value> = profiles
            .iter()
            .map(|(name, profile)| profile_json(name, profile, default_name == Some(name.as_str())))
            .collect();
        let output_data = json!({
            "config_path": config_path.as_ref().map(|p| p.display().to_string()),
            "profiles": profile_list,
            "count": profiles.len(),
        });
        print_output(&output_data, fmt, None)?;
        return Ok(());
    }

    if let Some(path) = &config_path {
        println!("Configuration file: {}", path.display());
        println!();
    }

    if profiles.is_empty() {
        info!("No profiles configured");
        println!("No profiles configured.");
        println!("Use 'trovectl profile set' to create a profile.");
        return Ok(());
    }

    for (name, profile) in &profiles {
        if default_name == Some(name.as_str()) {
            println!("{} {}", name.bold().cyan(), "(default)".green());
        } else {
            println!("{}", name.bold().cyan());
        }
        println!(
            "  {} {}{}",
            "URL:".dimmed(),
            profile.url,
            if profile.insecure { " (insecure)" } else { "" }
        );
        if let Some(region) = &profile.region {
            println!("  {} {}", "Region:".dimmed(), region);
        }
    }
    Ok(())
}

fn handle_path(conn_mgr: &ConnectionManager, output_format: OutputFormat) -> CliResult<()> {
    let config_path = conn_mgr.effective_config_path()?;

    match structured(output_format) {
        Some(fmt) => print_output(json!({ "config_path": config_path.to_str() }), fmt, None)?,
        None => println!("{}", config_path.display()),
    }
    Ok(())
}

fn handle_show(conn_mgr: &ConnectionManager, name: &str, output_format: OutputFormat) -> CliResult<()> {
    let profile = conn_mgr.config.profile(name)?;
    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);

    if let Some(fmt) = structured(output_format) {
        print_output(profile_json(name, profile, is_default), fmt, None)?;
        return Ok(());
    }

    println!("{} {}", "Profile:".dimmed(), name.bold().cyan());
    println!("{} {}", "URL:".dimmed(), profile.url);
    println!(
        "{} {}",
        "Token:".dimmed(),
        masked_token(profile).unwrap_or_else(|| "(not set)".to_string())
    );
    println!("{} {}", "Insecure:".dimmed(), profile.insecure);
    if let Some(timeout) = profile.timeout_secs {
        println!("{} {}s", "Timeout:".dimmed(), timeout);
    }
    if let Some(region) = &profile.region {
        println!("{} {}", "Region:".dimmed(), region);
    }
    if is_default {
        println!("{}", "(default)".green());
    }
    Ok(())
}

fn handle_set(
    conn_mgr: &ConnectionManager,
    name: &str,
    profile: Profile,
    make_default: bool,
) -> CliResult<()> {
    debug!("Setting profile: {}", name);
    if !profile.url.starts_with("http://") && !profile.url.starts_with("https://") {
        return Err(TroveCtlError::InvalidInput {
            message: format!("endpoint URL must start with http:// or https://, got '{}'", profile.url),
        });
    }

    let mut config = conn_mgr.config.clone();
    if let Some(old) = config.profiles.get(name)
        && let Some(old_token) = &old.token
        && profile.token.as_ref() != Some(old_token)
    {
        CredentialStore::new().delete_credential(old_token)?;
    }
    config.set_profile(name.to_string(), profile);

    let first_profile = config.profiles.len() == 1;
    if make_default || (first_profile && config.default_profile.is_none()) {
        config.default_profile = Some(name.to_string());
    }

    let path = conn_mgr.save_config(&config)?;
    println!("Profile '{}' saved successfully to: {}", name, path.display());
    if config.default_profile.as_deref() == Some(name) {
        println!("Profile '{}' is the default profile.", name);
    }
    Ok(())
}

fn handle_remove(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Removing profile: {}", name);
    let mut config = conn_mgr.config.clone();
    let was_default = config.default_profile.as_deref() == Some(name);

    let Some(removed) = config.remove_profile(name) else {
        return Err(TroveCtlError::ProfileNotFound { name: name.into() });
    };
    if let Some(token) = &removed.token {
        CredentialStore::new().delete_credential(token)?;
    }

    conn_mgr.save_config(&config)?;
    if was_default {
        println!("Default profile cleared.");
    }
    println!("Profile '{}' removed successfully.", name);
    Ok(())
}

fn handle_default(conn_mgr: &ConnectionManager, name: &str) -> CliResult<()> {
    debug!("Setting default profile: {}", name);
    let mut config: Config = conn_mgr.config.clone();
    config.profile(name)?;
    config.default_profile = Some(name.to_string());

    conn_mgr.save_config(&config)?;
    println!("Default profile set to '{}'.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_token() {
        let mut profile = Profile::new("https://trove/v1.0/t");
        assert_eq!(masked_token(&profile), None);

        profile.token = Some("gAAAAABkSecret".to_string());
        assert_eq!(masked_token(&profile).as_deref(), Some("gAAA..."));

        profile.token = Some("keyring:prod-token".to_string());
        assert_eq!(masked_token(&profile).as_deref(), Some("keyring:prod-token"));
    }

    #[test]
    fn test_profile_json_hides_secret() {
        let mut profile = Profile::new("https://trove/v1.0/t");
        profile.token = Some("supersecret".to_string());
        let value = profile_json("prod", &profile, true);
        assert_eq!(value["is_default"], json!(true));
        assert_eq!(value["token_configured"], json!(true));
        assert!(!value.to_string().contains("supersecret"));
    }

    #[test]
    fn test_set_and_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let conn = ConnectionManager::with_config_path(Config::default(), Some(path.clone()));

        handle_set(&conn, "lab", Profile::new("http://trove:8779/v1.0/t"), false).unwrap();
        let saved = Config::load_from_path(&path).unwrap();
        assert_eq!(saved.default_profile.as_deref(), Some("lab"));
        assert_eq!(saved.profiles["lab"].url, "http://trove:8779/v1.0/t");

        let conn = ConnectionManager::with_config_path(saved, Some(path.clone()));
        handle_remove(&conn, "lab").unwrap();
        let saved = Config::load_from_path(&path).unwrap();
        assert!(saved.profiles.is_empty());
        assert_eq!(saved.default_profile, None);
    }

    #[test]
    fn test_set_rejects_bad_url() {
        let conn = ConnectionManager::with_config_path(Config::default(), None);
        assert!(matches!(
            handle_set(&conn, "bad", Profile::new("trove:8779"), false),
            Err(TroveCtlError::InvalidInput { .. })
        ));
    }
}
