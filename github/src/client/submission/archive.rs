use super::SubmissionClient;
use crate::client::{Error, Result};
use log::{info, warn};
use reqwest::StatusCode;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

// Implementation for the archive endpoint
// https://developer.github.com/v3/repos/contents/#get-archive-link
impl SubmissionClient {
    /// Download a zipball of the default branch into `{file_name}.zip`.
    ///
    /// The API answers with a redirect to the archive; the `Location` is then
    /// fetched without API credentials. Returns the path of the written
    /// archive. Nothing is written when the repository doesn't exist, and an
    /// existing archive is only replaced once the new one is being received.
    pub fn download<P: AsRef<Path>>(&self, file_name: P) -> Result<PathBuf> {
        let mut destination = file_name.as_ref().as_os_str().to_owned();
        destination.push(".zip");
        let destination = PathBuf::from(destination);

        let url = self.repo_path(&["zipball"])?;
        let exchange = self.inner.get(&url)?;

        if exchange.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(self.target.to_string()));
        }

        let location = exchange
            .location()
            .ok_or_else(|| Error::MissingLocation(url.clone()))?
            .to_owned();

        if let Err(e) = self.fetch_archive(&location, &destination) {
            return Err(Error::Download {
                target: self.target.owner().to_owned(),
                source: Box::new(e),
            });
        }

        info!("downloaded {} to {}", self.target, destination.display());
        Ok(destination)
    }

    fn fetch_archive(&self, location: &str, destination: &Path) -> Result<u64> {
        let mut response = self.inner.follow(location)?;

        let mut writer = BufWriter::new(File::create(destination)?);
        let written = io::copy(&mut response, &mut writer).and_then(|written| {
            writer.flush()?;
            Ok(written)
        });
        drop(writer);

        // Only a partial archive written by this call is removed
        if written.is_err() {
            if let Err(remove) = fs::remove_file(destination) {
                warn!("unable to remove {}: {}", destination.display(), remove);
            }
        }

        Ok(written?)
    }
}
