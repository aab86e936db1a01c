use super::SubmissionClient;
use crate::client::Result;
use reqwest::StatusCode;

// Implementation from the collaborators endpoint
// https://developer.github.com/v3/repos/collaborators/
impl SubmissionClient {
    fn collaborator_path(&self, user: &str) -> Result<String> {
        self.repo_path(&["collaborators", user])
    }

    /// Add a user (a TA, for example) as a collaborator.
    ///
    /// Returns whether the user is now a collaborator. An invitation that
    /// still has to be accepted is not reported as success.
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/collaborators/#add-user-as-a-collaborator
    pub fn add_collaborator(&self, user: &str) -> Result<bool> {
        let exchange = self.inner.put(&self.collaborator_path(user)?)?;

        Ok(exchange.status() == StatusCode::NO_CONTENT)
    }

    /// Remove a collaborator
    ///
    /// GitHub API docs: https://developer.github.com/v3/repos/collaborators/#remove-user-as-a-collaborator
    pub fn remove_collaborator(&self, user: &str) -> Result<bool> {
        let exchange = self.inner.delete(&self.collaborator_path(user)?)?;

        Ok(exchange.status() == StatusCode::NO_CONTENT)
    }
}
