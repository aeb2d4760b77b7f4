//! Error types for backup runs.
//!
//! A run distinguishes two layers of failure: [`Error`] describes what went
//! wrong with one repository or one discovery request, while [`RunError`] is
//! the composite result of a run in which at least one operation failed or a
//! cancellation truncated the remaining work.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A failure scoped to a single repository or discovery request.
#[derive(Debug, Error)]
pub enum Error {
    /// The local mirror path could not be probed. Not-found is never an
    /// error here; it means the mirror must be cloned.
    #[error("failed to inspect {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A git subcommand exited non-zero or could not be spawned.
    #[error("{command} failed with \"{stderr}\" (args: {args:?})")]
    GitOperation {
        command: String,
        args: Vec<String>,
        stderr: String,
    },

    /// A repository listing page failed: non-2xx status, transport error,
    /// or a body that did not decode.
    #[error("repository listing failed on page {page}: {message}")]
    Discovery { page: u32, message: String },

    /// Token authentication needs an `https://` clone URL.
    #[error("unexpected URL prefix")]
    InvalidUrlScheme { url: String },

    /// Cooperative stop requested; the run is truncated.
    #[error("backup run cancelled")]
    Cancelled,
}

/// What the orchestrator was doing when a failure was recorded.
#[derive(Debug)]
pub enum FailureKind {
    /// Cloning or fetching one repository.
    Backup { url: String },
    /// Listing repositories for a GitHub profile.
    Discovery,
    /// Preparing an authenticated clone URL.
    Credential { url: String },
}

/// One accumulated failure, carrying enough context to locate the cause.
///
/// For GitHub repositories the recorded URL is always the plain HTTPS clone
/// URL, never the token-rewritten form, so credentials cannot leak into
/// error output.
#[derive(Debug)]
pub struct BackupFailure {
    pub profile: String,
    pub kind: FailureKind,
    pub error: Error,
}

impl fmt::Display for BackupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::Backup { url } => write!(
                f,
                "failed to backup repository {url} from profile {}: {}",
                self.profile, self.error
            ),
            FailureKind::Discovery => write!(
                f,
                "failed to read repositories from profile {}: {}",
                self.profile, self.error
            ),
            FailureKind::Credential { url } => write!(
                f,
                "failed to add token to clone URL {url} from profile {}: {}",
                self.profile, self.error
            ),
        }
    }
}

/// Composite result of a run that did not fully succeed.
///
/// Enumerates every accumulated failure and records whether the run was cut
/// short by a cancellation request.
#[derive(Debug)]
pub struct RunError {
    pub cancelled: bool,
    pub failures: Vec<BackupFailure>,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cancelled {
            write!(f, "backup run cancelled")?;
            if self.failures.is_empty() {
                return Ok(());
            }
            write!(
                f,
                "; {} operation(s) failed before the stop:",
                self.failures.len()
            )?;
        } else {
            write!(f, "{} backup operation(s) failed:", self.failures.len())?;
        }
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RunError {}
