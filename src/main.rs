use gitsubmitter::{Command, Config, Error};
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
struct Options {
    #[structopt(short, long, parse(from_os_str), default_value = "gitsubmitter.toml")]
    /// config file to use
    config: PathBuf,

    #[structopt(long)]
    /// two-factor authentication code
    otp: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

fn main() -> Result<(), Error> {
    let opts = Options::from_args();

    // set up logging, allowing info level logging by default
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_file(&opts.config)?;
    info!("using {}/{} at {}", config.user(), config.repo(), config.base_url());

    opts.command.run(&config, opts.otp.as_deref())
}
