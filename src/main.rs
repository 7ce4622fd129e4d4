//! deploy-pruner CLI - deletes resources left behind by earlier releases

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use deploy_pruner::commands::cleanup::{self, CleanupOptions};
use deploy_pruner::config::identity::DeployIdentity;
use deploy_pruner::config::settings::{Overrides, Settings};
use deploy_pruner::k8s::kubectl::{Kubectl, ProcessRunner};
use deploy_pruner::log_info;
use deploy_pruner::utils::errors::{display_error_and_exit, enhance_error};
use deploy_pruner::utils::logger;
use deploy_pruner::utils::prereqs::CommandPrereq;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deploy-pruner")]
#[command(author, version, about = "Delete resources deployed by previous releases but absent from the current one", long_about = None)]
struct Cli {
    /// Namespaces to clean (comma-separated). Default: no namespace flag
    #[arg(long, env = "PRUNE_NAMESPACE")]
    namespace: Option<String>,

    /// Resource types to query (comma-separated). Default: discover from the cluster
    #[arg(long, env = "PRUNE_RESOURCE_TYPE")]
    resource_type: Option<String>,

    /// kubectl binary to invoke
    #[arg(long)]
    kubectl: Option<String>,

    /// Path to kubeconfig file
    #[arg(long, env = "KUBECONFIG")]
    kubeconfig: Option<String>,

    /// Settings file (default: .deploy-pruner.toml or ~/.config/deploy-pruner/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dry-run mode: list stale resources without deleting them.
    /// `--dry-run=false` overrides a settings file that enables it
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    dry_run: Option<bool>,

    /// Write a JSON summary of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Verbose output (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "deploy-pruner", &mut io::stdout());
        return;
    }

    logger::init(logger::level_for(cli.verbose, cli.quiet));

    if let Err(e) = run(cli) {
        display_error_and_exit(enhance_error(e));
    }

    println!("Done!");
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?.merge(Overrides {
        kubectl: cli.kubectl,
        kubeconfig: cli.kubeconfig,
        namespaces: cli.namespace,
        resource_types: cli.resource_type,
        dry_run: cli.dry_run,
    });

    CommandPrereq::kubectl(&settings.kubectl.binary)
        .check()
        .context("kubectl is required to query the cluster")?;

    let options = CleanupOptions::from_settings(DeployIdentity::from_env(), &settings);

    if options.dry_run {
        log_info!("🔍 DRY RUN MODE: No resources will be deleted");
    }

    let runner = ProcessRunner::new(settings.kubectl.kubeconfig.map(PathBuf::from));
    let kubectl = Kubectl::new(&runner, settings.kubectl.binary);

    let report = cleanup::run(&kubectl, &options)?;

    if let Some(path) = cli.report {
        report.write_json(&path)?;
        log_info!("Wrote report to {}", path.display());
    }

    Ok(())
}
