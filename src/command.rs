use crate::{Config, Error, Result};
use github::{
    client::{self, test_auth, test_two_factor_auth},
    Client, SubmissionClient, SubmissionTarget,
};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub enum Command {
    #[structopt(name = "check-auth")]
    /// Check that the configured credential is accepted
    CheckAuth,

    #[structopt(name = "create")]
    /// Create the submission repository unless it already exists
    Create,

    #[structopt(name = "push")]
    /// Commit a file to the submission repository
    Push {
        #[structopt(parse(from_os_str))]
        file: PathBuf,

        #[structopt(short, long, default_value = "submission")]
        message: String,
    },

    #[structopt(name = "fork")]
    /// Fork the submission repository
    Fork {
        #[structopt(long)]
        /// organization to fork into instead of the authenticated user
        org: Option<String>,
    },

    #[structopt(name = "delete")]
    /// Delete the submission repository
    Delete,

    #[structopt(name = "add-collab")]
    /// Add a collaborator to the submission repository
    AddCollab { name: String },

    #[structopt(name = "remove-collab")]
    /// Remove a collaborator from the submission repository
    RemoveCollab { name: String },

    #[structopt(name = "download")]
    /// Download the submission repository into `<name>.zip`
    Download {
        #[structopt(parse(from_os_str))]
        name: PathBuf,
    },
}

impl Command {
    pub fn run(&self, config: &Config, otp: Option<&str>) -> Result<()> {
        match self {
            Command::CheckAuth => check_auth(config, otp)?,
            Command::Create => {
                connect(config, otp)?.create_repo()?;
            }
            Command::Push { file, message } => {
                let submission = connect(config, otp)?;
                if !submission.push_file(file, message)? {
                    return Err(format!("failed to push {}", file.display()).into());
                }
            }
            Command::Fork { org } => {
                let submission = connect(config, otp)?;
                let status = match org {
                    Some(org) => submission.fork_into(org)?,
                    None => submission.fork()?,
                };
                if !status.is_success() {
                    let message = format!("fork of {} failed: {}", submission.target(), status);
                    return Err(message.into());
                }
                info!("forked {}", submission.target());
            }
            Command::Delete => {
                let submission = connect(config, otp)?;
                let status = submission.delete()?;
                if !status.is_success() {
                    let message = format!("delete of {} failed: {}", submission.target(), status);
                    return Err(message.into());
                }
                info!("deleted {}", submission.target());
            }
            Command::AddCollab { name } => {
                let submission = connect(config, otp)?;
                if !submission.add_collaborator(name)? {
                    return Err(format!("unable to add collaborator {}", name).into());
                }
                info!("added {} to {}", name, submission.target());
            }
            Command::RemoveCollab { name } => {
                let submission = connect(config, otp)?;
                if !submission.remove_collaborator(name)? {
                    return Err(format!("unable to remove collaborator {}", name).into());
                }
                info!("removed {} from {}", name, submission.target());
            }
            Command::Download { name } => {
                connect(config, otp)?.download(name)?;
            }
        }

        Ok(())
    }
}

fn connect(config: &Config, otp: Option<&str>) -> Result<SubmissionClient> {
    let mut builder = Client::builder()
        .base_url(config.base_url())
        .credential(config.credential()?);
    if let Some(otp) = otp {
        builder = builder.otp(otp);
    }

    Ok(SubmissionClient::with_client(
        builder.build()?,
        SubmissionTarget::new(config.user(), config.repo()),
    ))
}

fn check_auth(config: &Config, otp: Option<&str>) -> Result<()> {
    let credential = config.credential()?;

    let accepted = match otp {
        Some(otp) => test_two_factor_auth(config.base_url(), &credential, otp)?,
        None => match test_auth(config.base_url(), &credential) {
            Err(client::Error::TwoFactorRequired) => {
                return Err(Error::from(
                    "two-factor authentication is enabled, rerun with --otp <code>",
                ))
            }
            result => result?,
        },
    };

    if accepted {
        info!("credential for {} accepted", config.user());
        Ok(())
    } else {
        Err(format!("credential for {} rejected", config.user()).into())
    }
}

#[cfg(test)]
mod test {
    use super::Command;
    use crate::{Config, Error};
    use httpmock::prelude::*;
    use std::path::PathBuf;
    use structopt::StructOpt;
    use tempfile::TempDir;

    fn config(server: &MockServer) -> Config {
        Config::from_toml(&format!(
            r#"
            base-url = "{}"
            user = "alice"
            repo = "hw1"
            credential = "dXNlcjpwYXNz"
            "#,
            server.base_url()
        ))
        .unwrap()
    }

    #[derive(StructOpt)]
    struct Wrapper {
        #[structopt(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        let args = std::iter::once("gitsubmitter").chain(args.iter().copied());
        Wrapper::from_iter_safe(args).unwrap().command
    }

    #[test]
    fn parse_commands() {
        match parse(&["push", "Hello.java", "-m", "final"]) {
            Command::Push { file, message } => {
                assert_eq!(file, PathBuf::from("Hello.java"));
                assert_eq!(message, "final");
            }
            other => panic!("unexpected command {:?}", other),
        }

        match parse(&["fork", "--org", "cs1331"]) {
            Command::Fork { org } => assert_eq!(org.as_deref(), Some("cs1331")),
            other => panic!("unexpected command {:?}", other),
        }

        match parse(&["add-collab", "bob"]) {
            Command::AddCollab { name } => assert_eq!(name, "bob"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn add_collab() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/repos/alice/hw1/collaborators/bob")
                .header("authorization", "Basic dXNlcjpwYXNz");
            then.status(204);
        });

        parse(&["add-collab", "bob"])
            .run(&config(&server), None)
            .unwrap();

        mock.assert();
    }

    #[test]
    fn add_collab_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/repos/alice/hw1/collaborators/bob");
            then.status(404);
        });

        let result = parse(&["add-collab", "bob"]).run(&config(&server), None);
        assert!(matches!(result, Err(Error::Message(_))));
    }

    #[test]
    fn check_auth_needs_otp() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(401).header("X-GitHub-OTP", "required; sms");
        });

        let result = Command::CheckAuth.run(&config(&server), None);
        match result {
            Err(Error::Message(message)) => assert!(message.contains("--otp")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn check_auth_with_otp() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/").header("x-github-otp", "123456");
            then.status(200);
        });

        Command::CheckAuth
            .run(&config(&server), Some("123456"))
            .unwrap();

        mock.assert();
    }

    #[test]
    fn create_and_push() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Hello.java");
        std::fs::write(&file, "class Hello {}\n").unwrap();

        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/hw1");
            then.status(404);
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/user/repos");
            then.status(201);
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/hw1/contents/Hello.java");
            then.status(404);
        });
        let push = server.mock(|when, then| {
            when.method(PUT).path("/repos/alice/hw1/contents/Hello.java");
            then.status(201);
        });

        let config = config(&server);
        Command::Create.run(&config, None).unwrap();
        Command::Push {
            file,
            message: "submission".to_owned(),
        }
        .run(&config, None)
        .unwrap();

        create.assert();
        push.assert();
    }

    #[test]
    fn download() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/archive.zip");
            then.status(200).body("PK");
        });
        server.mock(|when, then| {
            when.method(GET).path("/repos/alice/hw1/zipball");
            then.status(302).header("Location", server.url("/archive.zip"));
        });

        Command::Download {
            name: dir.path().join("alice"),
        }
        .run(&config(&server), None)
        .unwrap();

        assert_eq!(std::fs::read(dir.path().join("alice.zip")).unwrap(), b"PK");
    }
}
