pub mod export;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser};
use console::Term;
use tracing::level_filters::LevelFilter;

use f5export_common::config::{AddressListPolicy, Config, DEFAULT_OUTPUT, DEFAULT_TIMEOUT};

/// F5 export tool: exports the virtual servers of a BIG-IP to CSV over the
/// iControl REST API.
///
/// Environment variables can be used instead of the common options:
/// F5EXPORT_HOSTNAME, F5EXPORT_USERNAME, F5EXPORT_PASSWORD and
/// F5EXPORT_SSLVERIFY.
#[derive(Parser)]
#[command(name = "f5export", version)]
#[command(disable_help_flag = true)]
pub struct CommandLine {
    /// BIG-IP hostname or address, `host:8443` to use another port
    #[arg(short = 'h', long, env = "F5EXPORT_HOSTNAME")]
    pub hostname: String,

    /// BIG-IP username
    #[arg(short, long, env = "F5EXPORT_USERNAME")]
    pub username: String,

    /// BIG-IP password [prompted when not specified]
    #[arg(short, long, env = "F5EXPORT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Do not verify the BIG-IP's TLS certificate
    #[arg(long, env = "F5EXPORT_SSLVERIFY")]
    pub no_ssl_verify: bool,

    /// Seconds to wait for a response from the device
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// CSV file to write
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Virtual servers on address lists: 'placeholder' or 'skip'
    #[arg(long, value_name = "POLICY", default_value_t = AddressListPolicy::Placeholder)]
    pub address_lists: AddressListPolicy,

    /// Enables verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enables debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else if self.verbose {
            LevelFilter::INFO
        } else {
            LevelFilter::WARN
        }
    }

    /// Builds the run configuration, prompting for the password if needed.
    pub fn into_config(self) -> anyhow::Result<Config> {
        let password = match self.password {
            Some(password) => password,
            None => prompt_password(&self.username)?,
        };

        Ok(Config {
            hostname: self.hostname,
            username: self.username,
            password,
            verify_tls: !self.no_ssl_verify,
            timeout: Duration::from_secs(self.timeout),
            output: self.output,
            address_lists: self.address_lists,
        })
    }
}

fn prompt_password(username: &str) -> anyhow::Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("Password for {username}: "))?;
    term.read_secure_line()
        .context("no password given and none could be read from the terminal")
}
