//! `codelab` entry-point: signs in against the backend and runs the compile,
//! analyze and optimize workflow from a terminal.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use codelab_client::ClientSettings;
use codelab_client::domain::ports::{AuthView, SessionStore};
use codelab_client::domain::{
    AuthClient, AuthOutcome, CodeSubmission, OperationPhase, OperationReport, ViewMode,
    ViewModeController, WorkflowOrchestrator,
};
use codelab_client::outbound::http::HttpBackendGateway;
use codelab_client::outbound::session::FileSessionStore;
use codelab_client::outbound::terminal::TerminalSurface;

/// `codelab` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "codelab",
    about = "Sign in to the code-lab backend and compile, analyze or optimize code",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and sign in.
    Signup {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Sign in to an existing account.
    Signin {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Signout,
    /// Show the signed-in account.
    Whoami,
    /// Compile-check code.
    Compile(CodeArgs),
    /// Estimate the time complexity of code.
    Analyze(CodeArgs),
    /// Request an optimized rewrite of code.
    Optimize(CodeArgs),
}

#[derive(Debug, Args)]
struct CodeArgs {
    /// Source file to submit; standard input is read when omitted.
    #[arg(long = "file", value_name = "path")]
    file: Option<PathBuf>,
}

type Surface = TerminalSurface<io::Stdout>;

struct App {
    settings: ClientSettings,
    sessions: Arc<FileSessionStore>,
    gateway: Arc<HttpBackendGateway>,
    surface: Arc<Surface>,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args.command))
}

async fn run(command: Command) -> Result<ExitCode> {
    let app = App::from_settings(load_settings()?)?;
    match command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            ViewModeController::new(app.surface.clone()).toggle(ViewMode::Signup);
            let outcome = app.auth().signup(&name, &email, &password).await;
            Ok(auth_exit_code(&outcome))
        }
        Command::Signin { email, password } => {
            ViewModeController::new(app.surface.clone()).toggle(ViewMode::Signin);
            let outcome = app.auth().signin(&email, &password).await;
            Ok(auth_exit_code(&outcome))
        }
        Command::Signout => {
            app.auth().signout().wrap_err("failed to clear session")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Whoami => app.whoami(),
        Command::Compile(code) => {
            let report = app.workflow().compile(read_code(&code)?).await;
            Ok(settle_report(report).await)
        }
        Command::Analyze(code) => {
            let report = app.workflow().analyze(read_code(&code)?).await;
            Ok(settle_report(report).await)
        }
        Command::Optimize(code) => {
            let report = app.workflow().optimize(read_code(&code)?).await;
            Ok(settle_report(report).await)
        }
    }
}

fn load_settings() -> Result<ClientSettings> {
    ClientSettings::load_from_iter([OsString::from("codelab")])
        .map_err(|error| eyre!("failed to load configuration: {error}"))
}

impl App {
    fn from_settings(settings: ClientSettings) -> Result<Self> {
        let base_url = settings
            .base_url()
            .wrap_err("CODELAB_BASE_URL is not a valid URL")?;
        let session_dir = settings.session_dir();
        let sessions = FileSessionStore::open(&session_dir)
            .wrap_err_with(|| format!("open session directory {}", session_dir.display()))?;
        let gateway = HttpBackendGateway::new(base_url, settings.request_timeout())
            .wrap_err("build HTTP client")?;
        Ok(Self {
            settings,
            sessions: Arc::new(sessions),
            gateway: Arc::new(gateway),
            surface: Arc::new(TerminalSurface::stdout()),
        })
    }

    fn auth(&self) -> AuthClient<FileSessionStore, HttpBackendGateway, Surface, Surface> {
        AuthClient::new(
            self.sessions.clone(),
            self.gateway.clone(),
            self.surface.clone(),
            self.surface.clone(),
        )
    }

    fn workflow(&self) -> WorkflowOrchestrator<FileSessionStore, HttpBackendGateway, Surface> {
        WorkflowOrchestrator::new(
            self.sessions.clone(),
            self.gateway.clone(),
            self.surface.clone(),
        )
        .with_policy(self.settings.ordering_policy())
    }

    fn whoami(&self) -> Result<ExitCode> {
        let session = self.sessions.get().wrap_err("failed to read session")?;
        match session {
            Some(session) => {
                self.surface
                    .show_status(&format!("Signed in as {}", session.identifier()));
                Ok(ExitCode::SUCCESS)
            }
            None => {
                self.surface.show_status("Not signed in.");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn auth_exit_code(outcome: &AuthOutcome) -> ExitCode {
    match outcome {
        AuthOutcome::SignedIn(_) => ExitCode::SUCCESS,
        AuthOutcome::Rejected => ExitCode::FAILURE,
    }
}

/// Wait for any bookkeeping before the runtime shuts down.
async fn settle_report(report: OperationReport) -> ExitCode {
    if let Some(bookkeeping) = report.bookkeeping {
        bookkeeping.finished().await;
    }
    match report.phase {
        OperationPhase::SuccessRendered => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

fn read_code(args: &CodeArgs) -> Result<CodeSubmission> {
    let code = match &args.file {
        Some(path) => read_file(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("read code from standard input")?;
            buffer
        }
    };
    Ok(CodeSubmission::new(code))
}

fn read_file(path: &Path) -> Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("{} is not a file path", path.display()))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open directory {}", parent.display()))?;
    directory
        .read_to_string(Path::new(file_name))
        .wrap_err_with(|| format!("read code from {}", path.display()))
}
