//! Shared fixtures for the RepoVault integration suites.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use repovault::auth::Credential;
use repovault::config::{Config, GenericProfile, GenericTarget, GitHubProfile, Profiles};
use repovault::error::Error;
use repovault::git::Git;

/// One recorded call against the fake git backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Clone {
        url: String,
        path: PathBuf,
        credential: Credential,
    },
    Fetch {
        path: PathBuf,
    },
    RemoteUrl {
        path: PathBuf,
    },
    SetRemoteUrl {
        path: PathBuf,
        url: String,
    },
}

/// In-memory git backend that records every call it receives.
///
/// Mirrors behave like the real thing: a clone creates the destination
/// directory and remembers the URL as its origin remote, and a repoint
/// updates that remote. URLs registered through [`RecordingGit::fail_clone`]
/// fail the way a missing upstream would.
#[derive(Clone, Default)]
pub struct RecordingGit {
    state: Arc<State>,
}

#[derive(Default)]
struct State {
    calls: Mutex<Vec<GitCall>>,
    remotes: Mutex<HashMap<PathBuf, String>>,
    broken_urls: Mutex<Vec<String>>,
}

impl RecordingGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the origin URL an existing mirror at `path` reports.
    pub fn set_remote(&self, path: impl Into<PathBuf>, url: &str) {
        self.state
            .remotes
            .lock()
            .unwrap()
            .insert(path.into(), url.to_string());
    }

    /// Make every clone of `url` fail.
    pub fn fail_clone(&self, url: &str) {
        self.state.broken_urls.lock().unwrap().push(url.to_string());
    }

    pub fn calls(&self) -> Vec<GitCall> {
        self.state.calls.lock().unwrap().clone()
    }

    /// URLs passed to clone, in call order, failed attempts included.
    pub fn clones(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Clone { url, .. } => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn fetches(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::Fetch { path } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn repoints(&self) -> Vec<(PathBuf, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GitCall::SetRemoteUrl { path, url } => Some((path, url)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall) {
        self.state.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Git for RecordingGit {
    async fn clone_repo(
        &self,
        url: &str,
        path: &Path,
        credential: &Credential,
    ) -> Result<(), Error> {
        self.record(GitCall::Clone {
            url: url.to_string(),
            path: path.to_path_buf(),
            credential: credential.clone(),
        });
        if self.state.broken_urls.lock().unwrap().iter().any(|u| u == url) {
            return Err(Error::GitOperation {
                command: "git".to_string(),
                args: vec!["clone".to_string(), "--bare".to_string(), url.to_string()],
                stderr: "fatal: could not read from remote repository".to_string(),
            });
        }
        std::fs::create_dir_all(path).expect("failed to create mirror directory");
        self.set_remote(path, url);
        Ok(())
    }

    async fn fetch(&self, path: &Path, _credential: &Credential) -> Result<(), Error> {
        self.record(GitCall::Fetch {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    async fn remote_url(&self, path: &Path) -> Result<String, Error> {
        self.record(GitCall::RemoteUrl {
            path: path.to_path_buf(),
        });
        match self.state.remotes.lock().unwrap().get(path) {
            Some(url) => Ok(url.clone()),
            None => Err(Error::GitOperation {
                command: "git".to_string(),
                args: vec![
                    "remote".to_string(),
                    "get-url".to_string(),
                    "origin".to_string(),
                ],
                stderr: format!("fatal: not a git repository: {}", path.display()),
            }),
        }
    }

    async fn set_remote_url(&self, path: &Path, url: &str) -> Result<(), Error> {
        self.record(GitCall::SetRemoteUrl {
            path: path.to_path_buf(),
            url: url.to_string(),
        });
        self.set_remote(path, url);
        Ok(())
    }
}

pub fn generic_profile(name: &str, root: &Path, targets: &[(&str, &str)]) -> GenericProfile {
    GenericProfile {
        name: name.to_string(),
        root_folder: root.display().to_string(),
        private_ssh_key: None,
        targets: targets
            .iter()
            .map(|(url, folder)| GenericTarget {
                url: url.to_string(),
                folder: folder.to_string(),
            })
            .collect(),
    }
}

pub fn github_profile(name: &str, root: &Path, token: &str) -> GitHubProfile {
    GitHubProfile {
        name: name.to_string(),
        root_folder: root.display().to_string(),
        affiliation: "owner".to_string(),
        token: token.to_string(),
        private_ssh_key: None,
        include: None,
        exclude: vec![],
    }
}

pub fn config(generic: Vec<GenericProfile>, github: Vec<GitHubProfile>) -> Config {
    Config {
        profiles: Profiles { generic, github },
    }
}

/// Repository object as the listing API returns it, extra fields included.
pub fn repo_json(owner: &str, name: &str) -> serde_json::Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("{owner}/{name}"),
        "owner": { "login": owner, "id": 1 },
        "private": false,
        "fork": false,
        "clone_url": format!("https://github.com/{owner}/{name}.git"),
        "ssh_url": format!("git@github.com:{owner}/{name}.git")
    })
}
