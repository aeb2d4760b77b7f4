//! Clone-or-fetch decision for a single repository.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::Credential;
use crate::error::Error;
use crate::git::Git;

/// Orchestrator-facing face of the sync decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backup: Send + Sync {
    /// Bring the mirror at `path` up to date with `url`.
    async fn run(&self, url: &str, path: &Path, credential: &Credential) -> Result<(), Error>;
}

/// [`Backup`] implementation over a [`Git`] capability.
///
/// An absent mirror is cloned bare. A present mirror is re-pointed at `url`
/// first when its origin has drifted, then fetched, so the mirror always
/// tracks the configured source even across renames and transfers.
pub struct BackupService<G> {
    git: G,
}

impl<G: Git> BackupService<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    async fn mirror_exists(&self, path: &Path) -> Result<bool, Error> {
        match tokio::fs::metadata(path).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Error::Filesystem {
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }
}

#[async_trait]
impl<G: Git> Backup for BackupService<G> {
    async fn run(&self, url: &str, path: &Path, credential: &Credential) -> Result<(), Error> {
        if !self.mirror_exists(path).await? {
            info!(url, path = %path.display(), "mirror absent, cloning");
            return self.git.clone_repo(url, path, credential).await;
        }

        let current = self.git.remote_url(path).await?;
        if current != url {
            info!(path = %path.display(), from = %current, to = url, "origin drifted, repointing");
            self.git.set_remote_url(path, url).await?;
        }

        debug!(path = %path.display(), "fetching");
        self.git.fetch(path, credential).await
    }
}
