use serde::{Deserialize, Serialize};
use std::fmt;

/// A git object id, e.g. the sha of a blob
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Oid(String);

impl Oid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Oid {
    fn from(oid: String) -> Self {
        Self(oid)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
