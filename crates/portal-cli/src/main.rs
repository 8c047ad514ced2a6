use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_application::PortalContext;
use portal_core::storage::KeyValueStore;
use portal_infrastructure::{
    ClientConfig, HttpApiClient, JsonFileStore, LoggingNavigator, MemoryStore,
};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

#[derive(Parser)]
#[command(name = "portal")]
#[command(about = "Portal CLI - sign in, manage your profile and settings", long_about = None)]
struct Cli {
    /// Keep state in memory only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Validate the stored session and show where things stand
    Status,
    /// Show or edit the signed-in user's profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Change the signed-in user's password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Inspect and edit settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Run the session clock for a few seconds and print what it records
    Telemetry {
        #[arg(long, default_value_t = 3)]
        seconds: u64,
    },
    /// Print the resolved client configuration
    Env,
}

#[derive(Subcommand)]
enum ProfileAction {
    Show,
    Update {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    /// Set one key and save. VALUE is parsed as JSON, falling back to a string
    Set { key: String, value: String },
    /// Save the current settings, syncing them when signed in
    Save,
    /// Restore the defaults
    Reset,
    /// Flip dark mode and save
    ToggleTheme,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respects RUST_LOG, defaults to INFO. Logs go to stderr so stdout stays
    // clean for command output.
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the tracing subscriber")?;

    let config = ClientConfig::load().context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration resolved");

    match cli.command {
        Commands::Env => commands::status::env(&config),
        command => {
            let context = build_context(&config, cli.ephemeral)?;
            run(command, &context, &config).await
        }
    }
}

async fn run(command: Commands, context: &PortalContext, config: &ClientConfig) -> Result<()> {
    match command {
        Commands::Login { email, password } => {
            commands::session::login(context, email, password).await
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            commands::session::register(
                context,
                username,
                email,
                password,
                first_name,
                last_name,
            )
            .await
        }
        Commands::Logout => {
            commands::session::logout(context);
            Ok(())
        }
        Commands::Status => commands::status::run(context, config).await,
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(context).await,
            ProfileAction::Update {
                username,
                email,
                first_name,
                last_name,
            } => commands::profile::update(context, username, email, first_name, last_name).await,
        },
        Commands::Password { current, new } => {
            commands::profile::change_password(context, current, new).await
        }
        Commands::Settings { action } => {
            context.settings.load();
            match action {
                SettingsAction::Show => commands::settings::show(context),
                SettingsAction::Set { key, value } => {
                    commands::settings::set(context, &key, value).await
                }
                SettingsAction::Save => commands::settings::save(context).await,
                SettingsAction::Reset => {
                    commands::settings::reset(context);
                    Ok(())
                }
                SettingsAction::ToggleTheme => commands::settings::toggle_theme(context).await,
            }
        }
        Commands::Telemetry { seconds } => commands::telemetry::watch(context, seconds).await,
        Commands::Env => commands::status::env(config),
    }
}

fn build_context(config: &ClientConfig, ephemeral: bool) -> Result<PortalContext> {
    let storage: Arc<dyn KeyValueStore> = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        let path = config.storage_path()?;
        Arc::new(
            JsonFileStore::open(&path)
                .with_context(|| format!("Failed to open storage at {}", path.display()))?,
        )
    };

    let api = Arc::new(HttpApiClient::from_config(config));
    Ok(PortalContext::new(api, storage, Arc::new(LoggingNavigator::new())))
}
