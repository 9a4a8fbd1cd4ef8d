use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use folio_app::{
    modules::users::{
        models::{NewUser, MIN_PASSWORD_CHARS},
        store::UserStore,
    },
    App,
};
use folio_authz::Identity;
use folio_http::Violations;
use folio_kernel::settings::Settings;

/// Operate a Folio deployment
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server until interrupted
    Serve,
    /// Create missing tables and exit
    Schema,
    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),
    /// Mint bearer tokens for local use
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Insert a user with a bcrypt-hashed password
    Create(CreateUser),
}

#[derive(Debug, Args)]
struct CreateUser {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "FOLIO_USER_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    #[arg(long, default_value = "user")]
    role: String,
    #[arg(long)]
    phone_number: Option<String>,
}

#[derive(Debug, Subcommand)]
enum TokenCommand {
    /// Sign a token for an existing user
    Issue {
        #[arg(long)]
        user_id: i64,
        /// Lifetime in seconds; defaults to auth.token_ttl_secs
        #[arg(long)]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Folio settings")?;
    folio_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => App::bootstrap(settings).await?.serve().await,
        Command::Schema => {
            App::apply_schema(&settings).await?;
            tracing::info!(db = %settings.database.url, "schema is up to date");
            Ok(())
        }
        Command::User(UserCommand::Create(args)) => {
            let app = App::bootstrap(settings).await?;
            create_user(&app, args).await
        }
        Command::Token(TokenCommand::Issue { user_id, ttl_secs }) => {
            let app = App::bootstrap(settings).await?;
            issue_token(&app, user_id, ttl_secs).await
        }
    }
}

async fn create_user(app: &App, args: CreateUser) -> anyhow::Result<()> {
    let mut violations = Violations::new();
    violations.min_chars("password", &args.password, MIN_PASSWORD_CHARS);
    if !violations.is_empty() {
        bail!("password must be at least {MIN_PASSWORD_CHARS} characters");
    }

    let hashed_password = app.hasher.hash_blocking(args.password).await?;
    let store = UserStore::new(app.db.clone());
    let id = store
        .create(&NewUser {
            email: args.email,
            username: args.username.clone(),
            first_name: args.first_name,
            last_name: args.last_name,
            hashed_password,
            role: args.role,
            phone_number: args.phone_number,
        })
        .await?;

    tracing::info!(user_id = id, username = %args.username, "user created");
    println!("{id}");
    Ok(())
}

async fn issue_token(app: &App, user_id: i64, ttl_secs: Option<u64>) -> anyhow::Result<()> {
    let store = UserStore::new(app.db.clone());
    let Some(user) = store.find_by_id(user_id).await? else {
        bail!("no user with id {user_id}");
    };

    let token = app.tokens.issue(
        &Identity {
            user_id: user.id,
            username: user.username,
            role: user.role,
        },
        ttl_secs.map(Duration::from_secs),
    )?;

    println!("{token}");
    Ok(())
}
