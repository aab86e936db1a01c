use crate::{Error, Result};
use github::{client::DEFAULT_BASE_URL, Credential};
use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// API root of the GitHub Enterprise instance, ending in `/api/v3/`
    base_url: Option<String>,

    /// Owner of the submission repository
    user: String,

    /// Name of the submission repository
    repo: String,

    /// base64 encoded `user:password`
    credential: Option<String>,

    /// Plain password for `user`, used when no `credential` is given
    password: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn credential(&self) -> Result<Credential> {
        match (&self.credential, &self.password) {
            (Some(encoded), _) => Ok(Credential::from_base64(encoded.as_str())),
            (None, Some(password)) => Ok(Credential::new(&self.user, password)),
            (None, None) => Err(Error::from("config needs either `credential` or `password`")),
        }
    }
}
