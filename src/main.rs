use anyhow::Context;
use folio::auth::jwt::AuthService;
use folio::cli::init::{self, InitConfig, InitResult};
use folio::cli::output::{Mark, Output};
use folio::cli::{Cli, Commands};
use folio::db::{seed, DatabaseProvider};
use folio::types::AdminRole;
use folio::utils::toml_config::{FolioConfig, FolioConfigManager};
use folio::{api, AppState};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::new(!cli.no_color);

    if let Err(e) = run(cli, &output).await {
        output.status(Mark::Fail, &format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> anyhow::Result<()> {
    match cli.command {
        None | Some(Commands::Serve) => serve(&cli.config, cli.verbose).await,
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => match init::run(
            InitConfig {
                path,
                force,
                host,
                port,
            },
            output,
        ) {
            InitResult::Success | InitResult::AlreadyExists => Ok(()),
            InitResult::Error(e) => anyhow::bail!("init failed: {}", e),
        },
        Some(Commands::Seed { dry_run }) => seed_command(&cli.config, dry_run, output).await,
        Some(Commands::CreateAdmin {
            username,
            name,
            password,
        }) => create_admin(&cli.config, &username, name.as_deref(), &password, output).await,
        Some(Commands::Config { full, validate }) => show_config(&cli.config, full, validate, output),
    }
}

fn init_tracing(config: &FolioConfig, verbose: bool) {
    let default_directive = if verbose {
        "debug".to_string()
    } else {
        format!("{},tower_http=info", config.server.log_level)
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn serve(config_path: &Path, verbose: bool) -> anyhow::Result<()> {
    let mut config_manager = FolioConfigManager::new(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let config = config_manager.config();
    init_tracing(&config, verbose);

    if let Err(e) = config_manager.start_watching() {
        tracing::warn!("config hot reload disabled: {}", e);
    }

    tracing::info!(
        database = %config.database.url,
        uploads = %config.uploads.dir.display(),
        "starting folio-server"
    );

    let state = AppState::from_config(config_manager).await?;
    let app = api::routes::app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("listening on http://{}/api", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn seed_command(config_path: &Path, dry_run: bool, output: &Output) -> anyhow::Result<()> {
    if dry_run {
        println!("{}", serde_json::to_string_pretty(&seed::sample_as_json())?);
        return Ok(());
    }

    let config = FolioConfig::load(config_path)?;
    let store = DatabaseProvider::from_url(&config.database.url)
        .connect()
        .await?;

    if seed::seed_portfolio(&store).await? {
        output.status(
            Mark::Done,
            &format!("Seeded sample portfolio into {}", config.database.url),
        );
        output.counts(&[
            ("skills", store.get_skills().await?.len()),
            ("projects", store.list_projects().await?.len()),
            ("learning-journey", store.list_learning_phases().await?.len()),
        ]);
    } else {
        output.status(
            Mark::Skip,
            &format!("{} already has content", config.database.url),
        );
    }
    Ok(())
}

async fn create_admin(
    config_path: &Path,
    username: &str,
    name: Option<&str>,
    password: &str,
    output: &Output,
) -> anyhow::Result<()> {
    let config = FolioConfig::load(config_path)?;
    let input = folio::types::AdminCreate {
        username: username.to_string(),
        password: password.to_string(),
        name: name.unwrap_or(username).to_string(),
        profile_image: String::new(),
    };
    input
        .validate()
        .map_err(|e| anyhow::anyhow!("{}: {}", e.field, e.msg))?;

    let store = DatabaseProvider::from_url(&config.database.url)
        .connect()
        .await?;
    let auth = AuthService::new(config.jwt_secret()?, config.auth.jwt_expiry);
    let hash = auth.hash_password(&input.password)?;

    let admin = store
        .create_admin(
            &input.username,
            &hash,
            &input.name,
            &input.profile_image,
            AdminRole::Admin,
        )
        .await?;

    output.status(Mark::Done, &format!("Created admin '{}'", admin.username));
    Ok(())
}

fn show_config(config_path: &Path, full: bool, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config = match FolioConfig::load(config_path) {
        Ok(config) => config,
        Err(e) if validate => {
            output.status(Mark::Fail, &format!("{} is invalid", config_path.display()));
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if validate {
        output.status(Mark::Done, &format!("{} is valid", config_path.display()));
    }

    output.section("Configuration");
    output.field("file", &config_path.display().to_string());
    output.field("bind", &config.bind_address());
    output.field("database", &config.database.url);
    output.field("uploads", &config.uploads.dir.display().to_string());
    output.field("owner", &config.auth.admin_username);

    if full {
        output.section("Full configuration");
        println!();
        println!("{}", toml::to_string_pretty(&config)?);
    }
    Ok(())
}
