//! CLI configuration: thin wrapper around `sphere_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--api-url,
//! --token, --api-key, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use sphere_core::{Credential, StoreConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use sphere_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// A credential given directly on the command line, if any.
fn flag_credential(global: &GlobalOpts) -> Option<Credential> {
    if let Some(ref token) = global.token {
        return Some(Credential::Bearer(SecretString::from(token.clone())));
    }
    global
        .api_key
        .as_ref()
        .map(|key| Credential::ApiKey(SecretString::from(key.clone())))
}

/// Build the `StoreConfig` for this invocation.
///
/// Flags win over the profile; without a profile, `--api-url` and a
/// credential flag are enough.
pub fn build_store_config(global: &GlobalOpts) -> Result<StoreConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let api_url = sphere_config::parse_api_url(url_str)?;
    let credential = flag_credential(global).ok_or(CliError::NoCredentials {
        profile: profile_name,
    })?;

    let mut config = StoreConfig::new(api_url).with_credential(credential);
    if global.insecure || cfg.defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(config)
}

/// Translate a `Profile` + global flags into a `StoreConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<StoreConfig, CliError> {
    let url_str = global.api_url.as_deref().unwrap_or(&profile.api_url);
    let api_url = sphere_config::parse_api_url(url_str)?;

    let credential = match flag_credential(global) {
        Some(credential) => credential,
        None => sphere_config::resolve_credential(profile, profile_name)?,
    };

    let mut config = StoreConfig::new(api_url).with_credential(credential);
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        sphere_config::tls_for(profile, defaults)
    };
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(defaults.timeout),
    );
    Ok(config)
}
