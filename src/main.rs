use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use mvn_bootstrap::bootstrap::orchestrator::Bootstrapper;
use mvn_bootstrap::config::{self, BootstrapConfig, Goal, Invocation};
use mvn_bootstrap::logging;

#[derive(Parser)]
#[command(name = "mvn-bootstrap", disable_version_flag = true)]
#[command(about = "Downloads the latest stable Apache Maven if needed and builds the project")]
struct Cli {
    /// Maven version to use instead of the latest stable release
    #[arg(long = "version", visible_alias = "v", value_name = "VERSION")]
    tool_version: Option<String>,

    /// Goal to run after `clean`
    #[arg(long, visible_alias = "g", value_enum, ignore_case = true)]
    goal: Option<Goal>,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory holding the project (defaults to the current directory)
    #[arg(short = 'C', long, value_name = "DIR")]
    work_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = logging::init(&config::log_path())
        .inspect_err(|e| eprintln!("warning: file logging disabled: {:#}", e))
        .ok();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => BootstrapConfig::load(path)?,
        None => BootstrapConfig::default(),
    };

    let work_dir = match cli.work_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let invocation = Invocation::resolve(&config, work_dir, cli.tool_version, cli.goal);

    let bootstrapper =
        Bootstrapper::from_config(config).context("failed to create HTTP client")?;

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(bootstrapper.run(&invocation));

    Ok(match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    })
}
