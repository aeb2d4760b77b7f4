//! Narrow git capability used by the sync decision.
//!
//! Four operations, all against a bare repository layout. The production
//! implementation shells out to the `git` binary; tests substitute the
//! trait.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::auth::Credential;
use crate::error::Error;

/// The operations a backup run needs from git.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Git: Send + Sync {
    /// Create a bare clone of `url` at `path`.
    async fn clone_repo(&self, url: &str, path: &Path, credential: &Credential)
        -> Result<(), Error>;

    /// Fetch new objects into the bare repository at `path`.
    async fn fetch(&self, path: &Path, credential: &Credential) -> Result<(), Error>;

    /// Read the origin remote URL of the repository at `path`.
    async fn remote_url(&self, path: &Path) -> Result<String, Error>;

    /// Point the origin remote of the repository at `path` to `url`.
    async fn set_remote_url(&self, path: &Path, url: &str) -> Result<(), Error>;
}

/// [`Git`] implementation shelling out to the system `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: Vec<String>, credential: &Credential) -> Result<Vec<u8>, Error> {
        let mut cmd = Command::new("git");
        cmd.args(&args);
        // Fail outright instead of prompting for credentials on a terminal.
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        if let Credential::SshKey(key) = credential {
            cmd.env("GIT_SSH_COMMAND", ssh_command(key));
        }

        let output = cmd.output().await.map_err(|err| Error::GitOperation {
            command: "git".to_string(),
            args: args.clone(),
            stderr: err.to_string(),
        })?;

        if !output.status.success() {
            return Err(Error::GitOperation {
                command: "git".to_string(),
                args,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Git for GitCli {
    #[instrument(skip(self, credential))]
    async fn clone_repo(
        &self,
        url: &str,
        path: &Path,
        credential: &Credential,
    ) -> Result<(), Error> {
        debug!("cloning bare repository");
        self.run(clone_args(url, path), credential).await?;
        Ok(())
    }

    #[instrument(skip(self, credential))]
    async fn fetch(&self, path: &Path, credential: &Credential) -> Result<(), Error> {
        debug!("fetching into bare repository");
        self.run(fetch_args(path), credential).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remote_url(&self, path: &Path) -> Result<String, Error> {
        let stdout = self.run(remote_url_args(path), &Credential::None).await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    #[instrument(skip(self))]
    async fn set_remote_url(&self, path: &Path, url: &str) -> Result<(), Error> {
        debug!("repointing origin remote");
        self.run(set_remote_url_args(path, url), &Credential::None)
            .await?;
        Ok(())
    }
}

fn ssh_command(key: &Path) -> String {
    format!("ssh -i {} -o IdentitiesOnly=yes", key.display())
}

fn clone_args(url: &str, path: &Path) -> Vec<String> {
    vec![
        "clone".to_string(),
        "--bare".to_string(),
        url.to_string(),
        path.display().to_string(),
    ]
}

fn fetch_args(path: &Path) -> Vec<String> {
    vec![
        "-C".to_string(),
        path.display().to_string(),
        "--bare".to_string(),
        "fetch".to_string(),
    ]
}

fn remote_url_args(path: &Path) -> Vec<String> {
    vec![
        "-C".to_string(),
        path.display().to_string(),
        "remote".to_string(),
        "get-url".to_string(),
        "origin".to_string(),
    ]
}

fn set_remote_url_args(path: &Path, url: &str) -> Vec<String> {
    vec![
        "-C".to_string(),
        path.display().to_string(),
        "remote".to_string(),
        "set-url".to_string(),
        "origin".to_string(),
        url.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_args_are_bare() {
        assert_eq!(
            clone_args("https://host/repo.git", Path::new("/backups/repo")),
            vec!["clone", "--bare", "https://host/repo.git", "/backups/repo"]
        );
    }

    #[test]
    fn test_fetch_args_target_the_repository() {
        assert_eq!(
            fetch_args(Path::new("/backups/repo")),
            vec!["-C", "/backups/repo", "--bare", "fetch"]
        );
    }

    #[test]
    fn test_remote_url_args_read_origin() {
        assert_eq!(
            remote_url_args(Path::new("/backups/repo")),
            vec!["-C", "/backups/repo", "remote", "get-url", "origin"]
        );
    }

    #[test]
    fn test_set_remote_url_args_write_origin() {
        assert_eq!(
            set_remote_url_args(Path::new("/backups/repo"), "https://host/new.git"),
            vec![
                "-C",
                "/backups/repo",
                "remote",
                "set-url",
                "origin",
                "https://host/new.git"
            ]
        );
    }

    #[test]
    fn test_ssh_command_pins_the_key() {
        assert_eq!(
            ssh_command(Path::new("/keys/id_ed25519")),
            "ssh -i /keys/id_ed25519 -o IdentitiesOnly=yes"
        );
    }
}
