use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use profile::{Phase, ProfileConfig, ProfileModule};
use runtime::{AppConfig, CliArgs};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod render;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Name of the module section read from `modules.*` in the config.
const PROFILE_MODULE: &str = "profile";

/// Profile Viewer - loads a user, their photos and posts from a REST API
#[derive(Parser)]
#[command(name = "profile-viewer")]
#[command(about = "Profile Viewer - loads a user profile with photo highlights and posts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the remote API (overrides config)
    #[arg(long)]
    base_url: Option<String>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load one profile and print it
    Show {
        /// Load this user instead of a random one
        #[arg(long)]
        user_id: Option<u32>,
    },
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if let Some(base_url) = &cli.base_url {
        config.set_module_value(
            PROFILE_MODULE,
            "base_url",
            serde_json::Value::String(base_url.clone()),
        );
    }

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::info!("Profile Viewer starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(ExitCode::SUCCESS);
    }

    let profile_config: ProfileConfig = config.module_config(PROFILE_MODULE)?;

    match cli.command.unwrap_or(Commands::Show { user_id: None }) {
        Commands::Show { user_id } => show(profile_config, user_id).await,
        Commands::Check => check_config(&config, &profile_config),
    }
}

async fn show(profile_config: ProfileConfig, user_id: Option<u32>) -> Result<ExitCode> {
    let module =
        ProfileModule::from_config(profile_config).context("invalid profile configuration")?;
    let view = module.new_view();

    let id = match user_id {
        Some(id) => {
            view.activate_with_id(id).await?;
            id
        }
        None => view.activate().await?,
    };
    tracing::info!(user_id = id, "loading profile");

    let phase = tokio::select! {
        phase = view.wait_settled() => phase,
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            }
            view.deactivate();
            tracing::warn!("interrupted, rendering what was loaded so far");
            view.phase()
        }
    };

    let state = view.snapshot();
    let stdout = std::io::stdout();
    render::render_profile(&mut stdout.lock(), &state).context("failed to write profile")?;

    Ok(match phase {
        Phase::Ready => ExitCode::SUCCESS,
        Phase::Errored => ExitCode::FAILURE,
        // Interrupted mid-chain.
        _ => ExitCode::from(130),
    })
}

fn check_config(config: &AppConfig, profile_config: &ProfileConfig) -> Result<ExitCode> {
    tracing::info!("Checking configuration...");

    let base = profile_config
        .validate()
        .context("invalid profile configuration")?;
    tracing::info!(base_url = %base, "Configuration is valid");

    println!("Configuration check passed");
    println!("Remote API: {}", base);
    println!(
        "User ids:   {}..={}",
        profile_config.min_user_id, profile_config.max_user_id
    );
    println!("{}", config.to_yaml()?);
    Ok(ExitCode::SUCCESS)
}
