use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use catalog_admin::api::ApiClient;
use catalog_admin::auth::{AuthState, Authenticator, HostedIdentity, SessionStore};
use catalog_admin::config::AdminConfig;
use catalog_admin::{telemetry, tui, AdminError, Result};

#[derive(Parser, Debug)]
#[command(version, about = "Admin client for the language-learning catalog", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive admin screens (default)
    Run,
    /// Sign in and keep the session for later runs
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Print catalog totals
    Stats,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!(target: "catalog_admin", error = %e, "Exiting with error");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AdminConfig::load(args.config.as_deref())?;
    config.validate()?;
    telemetry::init_tracing(&config.log_file)?;

    let state = AuthState::new();
    let provider = HostedIdentity::new(
        &config.auth_url,
        &config.auth_publishable_key,
        config.request_timeout(),
    )?;
    let store = SessionStore::new(config.session_path.clone());
    let auth = Authenticator::new(provider, state.clone(), store);
    let api = ApiClient::new(
        &config.api_base_url,
        config.request_timeout(),
        Arc::new(state),
    )?;

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!(target: "catalog_admin", api = %config.api_base_url, "Starting admin screens");
            tui::run(&api, &auth).await
        }
        Command::Login { email } => {
            let password = read_password()?;
            let user = auth.login(&email, &password).await?;
            println!("Signed in as {}", user.display_name());
            Ok(())
        }
        Command::Logout => {
            auth.restore().await?;
            auth.logout().await?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => {
            match auth.restore().await? {
                Some(user) => println!("{} <{}>", user.display_name(), user.email),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Command::Stats => {
            if auth.restore().await?.is_none() {
                return Err(AdminError::NotAuthenticated);
            }
            let stats = api.dashboard_stats().await?;
            println!("Categories: {}", stats.total_categories);
            println!("Vocabulary: {}", stats.total_vocabulary);
            println!("Lessons:    {}", stats.total_lessons);
            println!("Levels:     {}", stats.total_levels);
            Ok(())
        }
    }
}

/// `CATALOG_ADMIN_PASSWORD`, or one line of stdin.
fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var("CATALOG_ADMIN_PASSWORD") {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
