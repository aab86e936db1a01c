//! Client for the repository endpoints of Github's v3 API used to manage
//! student submission repositories on a GitHub Enterprise instance.
//! https://developer.github.com/v3/

pub mod client;
mod common;
mod content;

pub use client::{Client, Credential, SubmissionClient, SubmissionTarget};
pub use common::*;
pub use content::*;
