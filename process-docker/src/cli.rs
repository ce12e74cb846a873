use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use process_docker_core::config::{Config, ENV_LOG};
use process_docker_core::{DockerCli, Plugin, ProcessDescriptor, Runner};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "warn";

const LAUNCH_ABOUT: &str = r#"launch starts a docker container with the given parameters.

process is expected to be a json object with the following format:

{
	"Name": "unique-container-name",
	"Command": "command to run",
	"Image": "docker/whalesay",
	"Ports": [
		{
			"External": 7888,
			"Internal": 37888,
			"Endpoint": ""
		}
	],
	"Volumes": [
		{
			"ExternalMount": "/foo/bar",
			"InternalMount": "/baz/bat",
			"Mode": "ro",
			"Name": "foobar"
		}
	],
	"EnvVars": {
		"foo": "bar"
	},
	"TypeOptions": {
		"RepoFile": "/home/foo/repository-to-load.tar"
	}
}

If RepoFile is non-empty, the given repository tar file will be loaded before
attempting to launch the docker image."#;

#[derive(Parser)]
#[command(
    name = "juju-process-docker",
    version,
    about = "Juju workload process plugin for Docker containers",
    long_about = "juju-process-docker is a plugin for Juju which enables Juju's workload process\nmanagement to manage Docker containers."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Launch a docker container with the given parameters
    #[command(long_about = LAUNCH_ABOUT)]
    Launch {
        /// Process descriptor as JSON
        process: String,
    },

    /// Return status for the process with the given id
    Status {
        /// ID or name of a docker container running on this machine
        id: String,
    },

    /// Stop and clean up the process with the given id
    Destroy {
        /// ID or name of a docker container running on this machine
        id: String,
    },

    /// Print the plugin version and the local docker client version
    Version,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    init_logging(&config);

    let mut runner = Runner::new(DockerCli::new(&config.docker_bin));
    if let Some(api) = config.api_version.clone() {
        runner = runner.with_api_version(api);
    }

    match cli.command {
        Commands::Launch { process } => cmd_launch(&Plugin::new(runner), &process),
        Commands::Status { id } => cmd_status(&Plugin::new(runner), &id),
        Commands::Destroy { id } => Plugin::new(runner).destroy(&id),
        Commands::Version => cmd_version(&runner),
    }
}

/// Logs go to stderr; stdout carries the plugin's JSON payload.
fn init_logging(config: &Config) {
    let (filter, rejected) = match EnvFilter::try_new(&config.log_filter) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_FILTER), Some(e)),
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("juju-process-docker: logging disabled: {e}");
        return;
    }

    if let Some(e) = rejected {
        warn!(
            filter = %config.log_filter,
            error = %e,
            "invalid {ENV_LOG}, falling back to {DEFAULT_LOG_FILTER}"
        );
    }
}

fn cmd_launch(plugin: &Plugin<DockerCli>, process: &str) -> Result<()> {
    let descriptor =
        ProcessDescriptor::from_json(process).context("can't decode proc-info")?;
    let details = plugin.launch(&descriptor)?;
    println!("{}", serde_json::to_string(&details)?);
    Ok(())
}

fn cmd_status(plugin: &Plugin<DockerCli>, id: &str) -> Result<()> {
    let status = plugin.status(id)?;
    println!("{}", serde_json::to_string(&status)?);
    Ok(())
}

fn cmd_version(runner: &Runner<DockerCli>) -> Result<()> {
    println!("juju-process-docker {VERSION}");
    let version = runner.version()?;
    println!("docker {} (API {})", version.client, version.api_client);
    Ok(())
}
