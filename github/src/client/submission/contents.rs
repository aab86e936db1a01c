use super::SubmissionClient;
use crate::{
    client::{Error, Result},
    ContentFile, Oid,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::{fmt, fs, path::Path};

/// Payload for creating or updating a file.
///
/// `sha` is the blob being replaced, empty when the file is new.
#[derive(Debug, Serialize)]
pub struct PutContentRequest {
    pub path: String,
    pub message: String,
    pub content: String,
    pub sha: String,
}

impl PutContentRequest {
    pub fn new(path: &str, message: String, contents: &[u8], sha: Option<&Oid>) -> Self {
        Self {
            path: path.to_owned(),
            message,
            content: STANDARD.encode(contents),
            sha: sha.map(|sha| sha.to_string()).unwrap_or_default(),
        }
    }
}

/// Prefix a commit message with a time such as `Fri Oct 16 08:17:37 -0400 2026`
fn timestamped<Tz>(time: DateTime<Tz>, message: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("{} {}", time.format("%a %b %d %H:%M:%S %z %Y"), message)
}

// Implementation for the contents endpoint
// https://developer.github.com/v3/repos/contents/
impl SubmissionClient {
    fn content_path(&self, file_name: &str) -> Result<String> {
        self.repo_path(&["contents", file_name])
    }

    /// Get the metadata of a file, `None` if it doesn't exist
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/contents/#get-contents
    pub fn get_content(&self, file_name: &str) -> Result<Option<ContentFile>> {
        let exchange = self.inner.get(&self.content_path(file_name)?)?;

        match exchange.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(exchange.json()?)),
            _ => Err(exchange.into_error()),
        }
    }

    /// Commit a local file to the root of the repository, creating or
    /// replacing the file of the same name. The commit message is prefixed
    /// with the current time.
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/contents/#create-or-update-a-file
    pub fn push_file<P: AsRef<Path>>(&self, file: P, message: &str) -> Result<bool> {
        let file = file.as_ref();
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| Error::from(format!("not a file name: {}", file.display())))?;

        let sha = self
            .get_content(file_name)?
            .and_then(|existing| existing.sha);
        debug!("{} in {} has sha {:?}", file_name, self.target, sha);

        let contents = fs::read(file)?;
        let message = timestamped(Local::now(), message);
        let request = PutContentRequest::new(file_name, message, &contents, sha.as_ref());

        let exchange = self.inner.do_request(
            Method::PUT,
            &self.content_path(file_name)?,
            Some(&request),
        )?;
        let status = exchange.status();
        info!("pushed {} to {}: {}", file_name, self.target, status);

        Ok(status == StatusCode::OK || status == StatusCode::CREATED)
    }
}
