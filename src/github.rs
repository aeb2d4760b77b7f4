//! GitHub repository discovery.
//!
//! Discovery is a paged walk over the authenticated user's repository
//! listing. [`RepoLister`] is the one-page capability; [`RepoPager`] turns
//! it into the single-pass sequence the orchestrator consumes.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;

/// Repositories requested per listing page. Pagination stops at the first
/// page shorter than this.
pub const PAGE_SIZE: usize = 100;

const GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("repovault/", env!("CARGO_PKG_VERSION"));

/// One repository as discovered from the listing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    pub name: String,
    /// Login of the owning user or organization.
    pub owner: String,
    pub clone_url: String,
    pub ssh_url: String,
}

/// Paged repository-listing capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepoLister: Send + Sync {
    /// Fetch one page (1-based) of repositories affiliated with the token's
    /// user. A full page means more pages may follow.
    async fn list_page(
        &self,
        token: &str,
        affiliation: &str,
        page: u32,
    ) -> Result<Vec<RemoteRepo>, Error>;
}

/// [`RepoLister`] over the GitHub REST API.
pub struct GitHubLister {
    client: reqwest::Client,
    api_url: String,
}

impl GitHubLister {
    pub fn new() -> Self {
        Self::with_api_url(GITHUB_API_URL)
    }

    /// Use a different API root. Tests point this at a local mock server.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }
}

impl Default for GitHubLister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepoLister for GitHubLister {
    async fn list_page(
        &self,
        token: &str,
        affiliation: &str,
        page: u32,
    ) -> Result<Vec<RemoteRepo>, Error> {
        // The affiliation string is passed through verbatim; the API treats
        // it as a comma-separated role set.
        let url = format!(
            "{}/user/repos?affiliation={}&per_page={}&page={}",
            self.api_url, affiliation, PAGE_SIZE, page
        );
        debug!(page, "requesting repository listing page");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|err| Error::Discovery {
                page,
                message: format!("request failed: {err}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Discovery {
                page,
                message: format!("unexpected status code: {status}"),
            });
        }

        let body = response.text().await.map_err(|err| Error::Discovery {
            page,
            message: format!("failed to read response body: {err}"),
        })?;

        let repos: Vec<ApiRepo> = serde_json::from_str(&body).map_err(|err| Error::Discovery {
            page,
            message: format!("failed to decode repository list: {err}"),
        })?;

        Ok(repos.into_iter().map(RemoteRepo::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    owner: ApiOwner,
    clone_url: String,
    ssh_url: String,
}

#[derive(Debug, Deserialize)]
struct ApiOwner {
    login: String,
}

impl From<ApiRepo> for RemoteRepo {
    fn from(repo: ApiRepo) -> Self {
        Self {
            name: repo.name,
            owner: repo.owner.login,
            clone_url: repo.clone_url,
            ssh_url: repo.ssh_url,
        }
    }
}

/// Single-pass iteration over every repository a token can list.
///
/// The protocol is a tagged pull: `Ok(Some(repo))` yields an item,
/// `Ok(None)` is the end of the sequence, and `Err` is terminal. After an
/// error every subsequent call returns `Ok(None)`; callers must treat the
/// error as the end. Consuming the pager advances pagination state, so
/// re-iterating requires a new pager.
pub struct RepoPager<'a, L: ?Sized> {
    lister: &'a L,
    token: &'a str,
    affiliation: &'a str,
    next_page: u32,
    buffered: VecDeque<RemoteRepo>,
    exhausted: bool,
}

impl<'a, L: RepoLister + ?Sized> RepoPager<'a, L> {
    pub fn new(lister: &'a L, token: &'a str, affiliation: &'a str) -> Self {
        Self {
            lister,
            token,
            affiliation,
            next_page: 1,
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Pull the next repository, fetching a page when the buffer runs dry.
    pub async fn next(&mut self) -> Result<Option<RemoteRepo>, Error> {
        if self.buffered.is_empty() && !self.exhausted {
            let page = match self
                .lister
                .list_page(self.token, self.affiliation, self.next_page)
                .await
            {
                Ok(page) => page,
                Err(err) => {
                    self.exhausted = true;
                    return Err(err);
                }
            };
            self.next_page += 1;
            if page.len() < PAGE_SIZE {
                self.exhausted = true;
            }
            self.buffered.extend(page);
        }

        Ok(self.buffered.pop_front())
    }
}
