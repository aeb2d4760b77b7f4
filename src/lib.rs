//! RepoVault - Bare-Mirror Git Repository Backup
//!
//! RepoVault keeps local bare mirrors of configured repositories up to date:
//! explicit URL targets and repositories discovered from a GitHub account,
//! organized under per-profile root folders.
//!
//! ## Core Features
//!
//! - **Bare Mirrors**: Absent repositories are cloned bare, existing ones
//!   fetched; drifted origin URLs are re-pointed before fetching
//! - **GitHub Discovery**: Paged listing of every repository a token can
//!   see, with case-insensitive include/exclude filtering
//! - **Credential Selection**: SSH key per profile, or the profile token
//!   embedded into HTTPS clone URLs
//! - **Resilient Runs**: Per-repository failures are collected while the
//!   run continues; a cancellation request stops at the next repository
//!
//! ## Modules
//!
//! - [`config`]: YAML profile configuration
//! - [`launcher`]: run orchestration, cancellation, and error aggregation
//! - [`backup`]: clone-or-fetch decision per repository
//! - [`github`]: repository discovery over the GitHub API
//! - [`git`]: subprocess-backed git operations
//! - [`auth`]: clone URL and credential resolution
//! - [`filter`]: include/exclude name filtering

pub mod auth;
pub mod backup;
pub mod config;
pub mod error;
pub mod filter;
pub mod git;
pub mod github;
pub mod launcher;

pub use auth::{CloneSource, Credential};
pub use backup::{Backup, BackupService};
pub use config::Config;
pub use error::{BackupFailure, Error, FailureKind, RunError};
pub use filter::NameFilter;
pub use git::{Git, GitCli};
pub use github::{GitHubLister, RemoteRepo, RepoLister, RepoPager};
pub use launcher::{run, CancelToken, RunSummary};
