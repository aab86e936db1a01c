use super::Oid;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// File metadata returned by the contents endpoint.
///
/// Only the fields needed to update a file are required; the blob `sha` is
/// optional so that a payload missing it decodes instead of failing.
#[derive(Clone, Debug, Deserialize)]
pub struct ContentFile {
    pub name: String,
    pub path: String,
    pub sha: Option<Oid>,
    pub size: Option<u64>,
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
    pub encoding: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub download_url: Option<String>,
}
