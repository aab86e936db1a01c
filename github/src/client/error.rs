//! Error type for Github Client

use reqwest::StatusCode;
use serde::Deserialize;
use std::{borrow::Cow, io, str};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Io error")]
    Io(#[from] io::Error),

    #[error("reqwest error")]
    Reqwest(#[from] reqwest::Error),

    #[error("json error")]
    Json(#[from] serde_json::Error),

    #[error("invalid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("url error")]
    Url(#[from] url::ParseError),

    #[error("`{0}`")]
    Message(Cow<'static, str>),

    #[error("two-factor authentication code required")]
    TwoFactorRequired,

    #[error("404 Not Found: `{0}`")]
    NotFound(String),

    #[error("no Location header in response for `{0}`")]
    MissingLocation(String),

    #[error("unexpected status `{0}` `{1:?}`")]
    UnexpectedStatus(StatusCode, Option<GithubClientError>),

    #[error("Encountered error while downloading `{target}`'s submission")]
    Download {
        target: String,
        #[source]
        source: Box<Error>,
    },
}

impl From<&'static str> for Error {
    fn from(error: &'static str) -> Self {
        Error::Message(error.into())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Message(error.into())
    }
}

// Github Error Responses
// https://developer.github.com/v3/#client-errors
#[derive(Debug, Deserialize)]
pub struct GithubClientError {
    pub message: Option<String>,
    pub errors: Option<Vec<GithubClientErrorType>>,
    pub documentation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GithubClientErrorType {
    Message(String),
    Code {
        resource: String,
        field: String,
        code: String,
    },
}
