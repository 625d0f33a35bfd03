use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iocraft::prelude::*;

use readme_gen::app::App;
use readme_gen::config::{AppConfig, loader};
use readme_gen::engine::{Engine, SessionEngine};
use readme_gen::form::GenerationController;
use readme_gen::service::{Backend, HttpBackend, StubBackend};
use readme_gen::types::{FormInput, RepoKey};
use readme_gen::url::parse_pr_url;

#[derive(Parser)]
#[command(name = "readme-gen", version, about = "Generate updated READMEs from pull requests")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging (to debug.log for the interactive form, stderr otherwise).
    #[arg(long)]
    debug: bool,

    /// Base URL of the generation service (overrides `service.base_url`).
    #[arg(long, value_name = "URL")]
    server: Option<String>,

    /// Use built-in demo data instead of the generation service.
    #[arg(long)]
    offline: bool,

    /// Pre-fill the repository (`owner/repo`, repository URL or PR URL).
    /// Defaults to the git remote of the current directory.
    #[arg(long, value_name = "REPO")]
    repo: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a README once and print it to stdout.
    Generate {
        /// Repository (`owner/repo` or URL).
        repo: String,
        /// Pull request number.
        pr: String,
    },
    /// Print repository suggestions for a query, one per line.
    Search { query: String },
    /// Print the PRs of a repository, one per line.
    Prs { repo: String },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = loader::load_config(cli.config.as_deref())?;
    if let Some(server) = cli.server.clone() {
        config.service.base_url = server;
    }

    if let Some(command) = cli.command {
        init_tracing(cli.debug, None)?;
        let rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
        return if cli.offline {
            rt.block_on(run_command(command, StubBackend::demo()))
        } else {
            let backend = HttpBackend::new(&config.service).context("building HTTP client")?;
            rt.block_on(run_command(command, backend))
        };
    }

    // Install a panic hook that writes to a file, since the fullscreen form
    // swallows stderr.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::force_capture();
        let msg = format!("{info}\n\n{backtrace}");
        let _ = std::fs::write("panic.log", &msg);
        eprintln!("{msg}");
    }));
    init_tracing(cli.debug, Some(Path::new("debug.log")))?;

    let initial = initial_input(cli.repo.as_deref());
    if cli.offline {
        run_form(StubBackend::demo(), &config, &initial, "offline demo".to_owned())?;
    } else {
        let backend = HttpBackend::new(&config.service).context("building HTTP client")?;
        let server = backend.base_url().to_owned();
        run_form(backend, &config, &initial, server)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Install the tracing subscriber when `--debug` is set. The fullscreen form
/// owns the terminal, so it logs to `log_file`; one-shot commands use stderr.
fn init_tracing(debug: bool, log_file: Option<&Path>) -> Result<()> {
    if !debug {
        return Ok(());
    }
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            builder.with_writer(file).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Repository and PR to start with: `--repo` (a PR URL fills both), else the
/// git remote of the current directory.
fn initial_input(repo_arg: Option<&str>) -> FormInput {
    if let Some(arg) = repo_arg {
        return match parse_pr_url(arg) {
            Some((key, number)) => FormInput::new(key.full_name(), number.to_string()),
            None => FormInput::new(
                RepoKey::parse(arg).map_or_else(|| arg.trim().to_owned(), |k| k.full_name()),
                "",
            ),
        };
    }
    let detected = std::env::current_dir()
        .ok()
        .as_deref()
        .and_then(readme_gen::git::detect_repo);
    FormInput::new(detected.map(|k| k.full_name()).unwrap_or_default(), "")
}

fn run_form<B: Backend>(
    backend: B,
    config: &AppConfig,
    initial: &FormInput,
    server: String,
) -> Result<()> {
    // The engine runs on its own thread and tokio runtime. Dropping the handle
    // at the end of this function closes its channel and stops it.
    let engine_handle = SessionEngine::new(backend, config.suggestions.clone())
        .with_initial_input(initial.clone())
        .start();

    tracing::info!("readme-gen starting against {server}");

    // Enter the fullscreen form (iocraft uses smol internally).
    smol::block_on(
        element! {
            App(engine: &engine_handle, initial: initial, server: server)
        }
        .fullscreen(),
    )?;
    Ok(())
}

async fn run_command<B: Backend>(command: Commands, backend: B) -> Result<ExitCode> {
    match command {
        Commands::Generate { repo, pr } => {
            let mut controller = GenerationController::new();
            let Some(ticket) = controller.submit(&FormInput::new(repo, pr)) else {
                anyhow::bail!("need a repository and a positive PR number");
            };
            let result = backend.generate(&ticket.repo_url, ticket.pr_number).await;
            controller.complete(&ticket, result);
            if let Some(artifact) = controller.artifact() {
                println!("{artifact}");
                return Ok(ExitCode::SUCCESS);
            }
            eprintln!("{}", controller.error().unwrap_or_default());
            Ok(ExitCode::FAILURE)
        }
        Commands::Search { query } => {
            for repo in backend.search_repos(query.trim()).await? {
                println!("{repo}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Prs { repo } => {
            let key = RepoKey::parse(&repo)
                .with_context(|| format!("expected owner/repo, got {repo:?}"))?;
            for pr in backend.list_prs(&key).await? {
                println!("{pr}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
