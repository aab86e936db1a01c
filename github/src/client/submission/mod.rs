use crate::client::{Client, Credential, Result};
use log::{info, warn};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::fmt;

mod archive;
mod collaborators;
mod contents;

pub use contents::PutContentRequest;

/// The remote repository a submission lives in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionTarget {
    owner: String,
    repo: String,
}

impl SubmissionTarget {
    pub fn new<O: Into<String>, R: Into<String>>(owner: O, repo: R) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

impl fmt::Display for SubmissionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// `SubmissionClient` is a student's authenticated connection to a single
/// submission repository.
///
/// GitHub API docs: https://developer.github.com/v3/repos/
#[derive(Debug)]
pub struct SubmissionClient {
    inner: Client,
    target: SubmissionTarget,
}

impl SubmissionClient {
    /// Connect to `user/repo` on the default API host
    pub fn new(
        user: &str,
        credential: Credential,
        repo: &str,
        otp: Option<String>,
    ) -> Result<Self> {
        let mut builder = Client::builder().credential(credential);
        if let Some(otp) = otp {
            builder = builder.otp(otp);
        }

        Ok(Self::with_client(
            builder.build()?,
            SubmissionTarget::new(user, repo),
        ))
    }

    pub fn with_client(client: Client, target: SubmissionTarget) -> Self {
        Self {
            inner: client,
            target,
        }
    }

    pub fn user(&self) -> &str {
        self.target.owner()
    }

    pub fn repo(&self) -> &str {
        self.target.repo()
    }

    pub fn target(&self) -> &SubmissionTarget {
        &self.target
    }

    pub fn client(&self) -> &Client {
        &self.inner
    }

    /// Path below `repos/{owner}/{repo}`, with every segment escaped
    fn repo_path(&self, rest: &[&str]) -> Result<String> {
        let mut segments = vec!["repos", self.target.owner.as_str(), self.target.repo.as_str()];
        segments.extend_from_slice(rest);

        self.inner.path(&segments)
    }

    /// Check whether the repository exists
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/#get
    pub fn exists(&self) -> Result<bool> {
        let exchange = self.inner.get(&self.repo_path(&[])?)?;
        Ok(exchange.status() != StatusCode::NOT_FOUND)
    }

    /// Create the repository as a private repository of the authenticated
    /// user, unless it already exists.
    ///
    /// Returns whether a creation request was issued. The outcome of that
    /// request is logged but not checked.
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/#create
    pub fn create_repo(&self) -> Result<bool> {
        #[derive(Debug, Serialize)]
        struct CreateRepoRequest<'a> {
            name: &'a str,
            private: bool,
        }

        if self.exists()? {
            info!("{} already exists", self.target);
            return Ok(false);
        }

        let request = CreateRepoRequest {
            name: &self.target.repo,
            private: true,
        };
        let exchange = self
            .inner
            .do_request(Method::POST, "user/repos", Some(&request))?;

        if exchange.status().is_success() {
            info!("created {}", self.target);
        } else {
            warn!("creating {} returned {}", self.target, exchange.status());
        }

        Ok(true)
    }

    /// Fork the repository into the authenticated user's account.
    ///
    /// The credentials don't need to belong to the repository owner, which
    /// allows forking a student's submission with someone else's account.
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/forks/#create-a-fork
    pub fn fork(&self) -> Result<StatusCode> {
        let url = self.repo_path(&["forks"])?;
        let exchange = self.inner.post(&url)?;

        Ok(exchange.status())
    }

    /// Fork the repository into an organization
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/forks/#create-a-fork
    pub fn fork_into(&self, organization: &str) -> Result<StatusCode> {
        let url = self.repo_path(&["forks"])?;
        let exchange = self
            .inner
            .post_query(&url, &[("organization", organization)])?;

        Ok(exchange.status())
    }

    /// Delete the repository
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/#delete-a-repository
    pub fn delete(&self) -> Result<StatusCode> {
        let exchange = self.inner.delete(&self.repo_path(&[])?)?;

        Ok(exchange.status())
    }
}
