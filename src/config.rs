use anyhow::{bail, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration: every backup profile the tool operates on.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Backup profiles grouped by kind.
    #[serde(default)]
    pub profiles: Profiles,
}

/// Profile groups. Generic targets are processed before GitHub discovery.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Profiles {
    /// Profiles listing explicit repository URLs.
    #[serde(default)]
    pub generic: Vec<GenericProfile>,

    /// Profiles whose repositories are discovered through the GitHub API.
    #[serde(default)]
    pub github: Vec<GitHubProfile>,
}

/// A profile backing up a fixed list of repository URLs.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenericProfile {
    /// Profile name, used in logs and error reports.
    #[serde(rename = "profile")]
    pub name: String,

    /// Directory receiving this profile's mirrors.
    pub root_folder: String,

    /// Private key for SSH transport, passed to git for every target.
    #[serde(default)]
    pub private_ssh_key: Option<String>,

    /// Repositories to back up, in order.
    #[serde(default)]
    pub targets: Vec<GenericTarget>,
}

/// One explicit repository target.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GenericTarget {
    /// Clone/fetch URL, used exactly as written.
    pub url: String,

    /// Destination folder under the profile's root.
    pub folder: String,
}

/// A profile backing up repositories discovered from a GitHub account.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubProfile {
    /// Profile name, used in logs and error reports.
    #[serde(rename = "profile")]
    pub name: String,

    /// Directory receiving this profile's mirrors, laid out as owner/name.
    pub root_folder: String,

    /// Comma-separated GitHub affiliation roles, passed through to the API
    /// verbatim (e.g. "owner,collaborator,organization_member").
    pub affiliation: String,

    /// Personal access token used for discovery and for HTTPS fetching.
    pub token: String,

    /// Private key for SSH transport. When set, discovered repositories are
    /// backed up over SSH and the token is only used for discovery.
    #[serde(default)]
    pub private_ssh_key: Option<String>,

    /// Repository names to back up. Omitted means every discovered
    /// repository; present but empty means none (the profile is disabled
    /// without being deleted). Matched case-insensitively.
    #[serde(default)]
    pub include: Option<Vec<String>>,

    /// Repository names to skip, applied after `include`. Matched
    /// case-insensitively.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Config {
    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_paths()?;
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path (XDG compliant).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("repovault").join("config.yml"))
    }

    /// Expand `~` and environment variables in configured paths.
    pub fn expand_paths(&mut self) -> Result<()> {
        for profile in &mut self.profiles.generic {
            profile.root_folder = expand(&profile.root_folder, "root_folder")?;
            if let Some(key) = profile.private_ssh_key.take() {
                profile.private_ssh_key = Some(expand(&key, "private_ssh_key")?);
            }
        }
        for profile in &mut self.profiles.github {
            profile.root_folder = expand(&profile.root_folder, "root_folder")?;
            if let Some(key) = profile.private_ssh_key.take() {
                profile.private_ssh_key = Some(expand(&key, "private_ssh_key")?);
            }
        }

        Ok(())
    }

    /// Reject profiles that cannot possibly run.
    pub fn validate(&self) -> Result<()> {
        for profile in &self.profiles.generic {
            if profile.name.is_empty() {
                bail!("generic profile with empty name");
            }
            if profile.root_folder.is_empty() {
                bail!("profile {}: root_folder is empty", profile.name);
            }
            for target in &profile.targets {
                if target.url.is_empty() || target.folder.is_empty() {
                    bail!("profile {}: target with empty url or folder", profile.name);
                }
            }
        }
        for profile in &self.profiles.github {
            if profile.name.is_empty() {
                bail!("github profile with empty name");
            }
            if profile.root_folder.is_empty() {
                bail!("profile {}: root_folder is empty", profile.name);
            }
            if profile.affiliation.is_empty() {
                bail!("profile {}: affiliation is empty", profile.name);
            }
            if profile.token.is_empty() {
                bail!("profile {}: token is empty", profile.name);
            }
        }

        Ok(())
    }
}

fn expand(value: &str, field: &str) -> Result<String> {
    Ok(shellexpand::full(value)
        .with_context(|| format!("Failed to expand {} path: {}", field, value))?
        .into_owned())
}
