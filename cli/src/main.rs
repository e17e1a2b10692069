mod config;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use adapters::outbound::http::HttpApiClient;
use adapters::outbound::navigator::RecordingNavigator;
use adapters::outbound::persistence::FileCredentialStore;
use adapters::outbound::telemetry::TracingTelemetry;
use application::error::Result;
use application::ports::inbound::SessionLifecycle;
use application::usecases::{SessionService, UnauthorizedTeardown};
use clap::{Parser, Subcommand};
use domain::auth::{LoginCredentials, RegisterData};
use domain::session::Session;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "Client for the docsearch backend", long_about = None)]
struct Args {
    /// Path to an alternative configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Sign in and persist the session.
    Login {
        email: String,
        #[arg(long, short)]
        password: String,
    },
    /// Create an account and persist the session.
    Register {
        email: String,
        username: String,
        #[arg(long, short)]
        password: String,
        /// Optional display name.
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Tear the current session down.
    Logout,
    /// Show the signed-in user.
    Profile,
    /// Exchange the current token for a fresh one.
    Refresh,
    /// Run a search query.
    Search { query: String },
    /// List indexed documents.
    Documents,
    /// Probe backend liveness.
    Health {
        /// Poll every N seconds instead of probing once.
        #[arg(long)]
        watch: Option<u64>,
    },
    /// Print the third-party sign-in URL for a provider.
    OauthUrl { provider: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = config::read(args.config.as_deref());

    let base_url = Url::parse(&config.api.base_url)
        .expect("api.base_url is not a valid URL");
    let store = Arc::new(match config.storage.credentials_path {
        Some(path) => FileCredentialStore::with_path(path),
        None => FileCredentialStore::new()
            .expect("cannot locate a credentials directory"),
    });
    let navigator = Arc::new(RecordingNavigator::new());
    let telemetry = Arc::new(TracingTelemetry::new());

    let client = Arc::new(HttpApiClient::new(base_url).with_unauthorized_handler(
        Arc::new(UnauthorizedTeardown::new(
            store.clone(),
            navigator.clone(),
            telemetry.clone(),
        )),
    ));
    let service = SessionService::new(
        client.clone(),
        store,
        navigator,
        telemetry,
    );

    // Rehydrate before touching any command; a stored session makes the
    // authenticated commands work without a fresh login.
    service.initialize().await;

    match run(args.cmd, &service, &client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Auth rejections carry a human-readable message on the session.
            match service.session().error {
                Some(message) => eprintln!("error: {message}"),
                None => eprintln!("error: {error}"),
            }
            ExitCode::FAILURE
        },
    }
}

async fn run(
    cmd: Commands,
    service: &SessionService,
    client: &HttpApiClient,
) -> Result<()> {
    match cmd {
        Commands::Login { email, password } => {
            let credentials = LoginCredentials::new(email, password)?;
            service.login(credentials).await?;
            print_signed_in(&service.session());
        },
        Commands::Register {
            email,
            username,
            password,
            full_name,
        } => {
            let data = RegisterData::new(email, username, password, full_name)?;
            service.register(data).await?;
            print_signed_in(&service.session());
        },
        Commands::Logout => {
            service.logout().await;
            println!("signed out.");
        },
        Commands::Profile => match service.session().user {
            Some(user) => println!(
                "{}",
                serde_json::to_string_pretty(&user)
                    .expect("user record always serializes")
            ),
            None => println!("no active session."),
        },
        Commands::Refresh => {
            service.refresh_token().await?;
            print_signed_in(&service.session());
        },
        Commands::Search { query } => {
            let results = client.search(&query).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&results)
                    .expect("backend reply always reserializes")
            );
        },
        Commands::Documents => {
            let documents = client.documents().await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&documents)
                    .expect("backend reply always reserializes")
            );
        },
        Commands::Health { watch: None } => {
            let status = client.health().await?;
            println!("{status}");
        },
        Commands::Health {
            watch: Some(seconds),
        } => {
            let mut interval =
                tokio::time::interval(Duration::from_secs(seconds.max(1)));
            loop {
                interval.tick().await;
                match client.health().await {
                    Ok(status) => println!("{status}"),
                    Err(error) => {
                        tracing::warn!(error = ?error, "health probe failed");
                    },
                }
            }
        },
        Commands::OauthUrl { provider } => {
            println!("{}", client.oauth_url(&provider));
        },
    }

    Ok(())
}

fn print_signed_in(session: &Session) {
    if let Some(user) = &session.user {
        println!("signed in as {} <{}>", user.username, user.email);
    }
}
