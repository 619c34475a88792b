use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use traceforce::api::http::format_api_error;
use traceforce::config::Config;
use traceforce::models::{
    CreateSourceAppDatalakeLinkRequest, InfrastructureMetadata, PostConnectionRequest,
    SourceAppDatalakeLink, UpdateConnectionRequest, UpdateDatalakeRequest, UpdateHostingEnvironmentRequest,
    UpdateSourceAppRequest,
};
use traceforce::resource::{count_by_status, HasStatus, Lifecycle, Resource, ResourceClient};
use traceforce::{CancellationToken, Client, ClientError};

/// Command-line client for the Traceforce control plane
#[derive(Parser, Debug)]
#[command(name = "tfctl", version, about, long_about = None)]
struct Args {
    /// API key (overrides TRACEFORCE_API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Base URL of the API (overrides TRACEFORCE_BASE_URL and the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage hosting environments
    #[command(subcommand)]
    HostingEnvironments(HostingEnvironmentAction),
    /// Manage datalakes
    #[command(subcommand)]
    Datalakes(DatalakeAction),
    /// Manage source apps
    #[command(subcommand)]
    SourceApps(SourceAppAction),
    /// Manage connections
    #[command(subcommand)]
    Connections(ConnectionAction),
    /// Manage source app to datalake links
    #[command(subcommand)]
    Links(LinkAction),
    /// Count every resource kind by status
    Overview,
    /// Write --api-key / --base-url and the options below to the config file
    Configure {
        /// Request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Constant header sent with every request, as NAME=VALUE
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got {:?}", raw)),
    }
}

#[derive(Subcommand, Debug)]
enum HostingEnvironmentAction {
    /// List hosting environments, or look one up by name
    List {
        #[arg(long)]
        name: Option<String>,
    },
    Get { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
    /// Report provisioned infrastructure and mark the environment connected
    PostConnection {
        id: String,
        /// JSON document mapping module names to versions
        #[arg(long)]
        terraform_module_versions: String,
        #[arg(long)]
        aws_account_id: Option<String>,
        #[arg(long)]
        role_name: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DatalakeAction {
    List {
        #[arg(long)]
        hosting_environment: Option<String>,
    },
    Get { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum SourceAppAction {
    List {
        #[arg(long)]
        hosting_environment: Option<String>,
    },
    Get { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum ConnectionAction {
    /// List connections, or look one up by name
    List {
        #[arg(long)]
        name: Option<String>,
    },
    Get { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum LinkAction {
    List {
        #[arg(long, conflicts_with = "datalake")]
        source_app: Option<String>,
        #[arg(long)]
        datalake: Option<String>,
    },
    Get { id: String },
    Create { source_app_id: String, datalake_id: String },
    Delete { id: String },
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("tfctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("traceforce").join("tfctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".traceforce").join("tfctl.log");
    }
    PathBuf::from("tfctl.log")
}

fn load_file_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) if path.exists() => Config::load_from(path),
        Some(_) => Ok(Config::default()),
        None => Ok(Config::load()),
    }
}

/// Flags over environment over file.
fn load_config(args: &Args) -> Result<Config> {
    let config = load_file_config(args)?.with_env();
    Ok(apply_flags(config, args))
}

fn apply_flags(mut config: Config, args: &Args) -> Config {
    if let Some(key) = &args.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(url) = &args.base_url {
        config.base_url = Some(url.clone());
    }
    config
}

/// Persist flags into the file config. Environment values are not written.
fn configure(args: &Args, timeout_secs: Option<u64>, headers: &[(String, String)]) -> Result<()> {
    let mut config = apply_flags(load_file_config(args)?, args);
    if timeout_secs.is_some() {
        config.timeout_secs = timeout_secs;
    }
    config.extra_headers.extend(headers.iter().cloned());

    match &args.config {
        Some(path) => {
            config.save_to(path)?;
            println!("Saved {}", path.display());
        }
        None => {
            config.save()?;
            match Config::config_path() {
                Some(path) => println!("Saved {}", path.display()),
                None => println!("No config directory available; nothing saved"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: {err:#}");
            None
        }
    };

    let result = run(args).await;
    if let Err(err) = &result {
        match err.downcast_ref::<ClientError>() {
            Some(client_err) => {
                tracing::error!("{:?}", client_err);
                eprintln!("Error: {}", format_api_error(client_err));
            }
            None => eprintln!("Error: {err:#}"),
        }
    }

    // flush the log file before exiting
    drop(log_guard);
    if result.is_err() {
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::Configure {
        timeout_secs,
        headers,
    } = &args.command
    {
        return configure(&args, *timeout_secs, headers);
    }

    let config = load_config(&args)?;

    // Ctrl-C aborts the in-flight request instead of killing the process mid-read
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let client = config.build_client()?.with_cancellation(cancel);

    match args.command {
        Command::HostingEnvironments(action) => hosting_environments(&client, action).await,
        Command::Datalakes(action) => datalakes(&client, action).await,
        Command::SourceApps(action) => source_apps(&client, action).await,
        Command::Connections(action) => connections(&client, action).await,
        Command::Links(action) => links(&client, action).await,
        Command::Overview => overview(&client).await,
        Command::Configure { .. } => Ok(()),
    }
}

async fn hosting_environments(client: &Client, action: HostingEnvironmentAction) -> Result<()> {
    let resources = client.hosting_environments();
    match action {
        HostingEnvironmentAction::List { name: Some(name) } => {
            print_json(&resources.get_by_name(&name).await?)
        }
        HostingEnvironmentAction::List { name: None } => print_json(&resources.list().await?),
        HostingEnvironmentAction::Get { id } => print_json(&resources.get(&id).await?),
        HostingEnvironmentAction::Rename { id, name } => print_json(
            &resources
                .update(&id, &UpdateHostingEnvironmentRequest::rename(name))
                .await?,
        ),
        HostingEnvironmentAction::Delete { id } => delete(resources, &id).await,
        HostingEnvironmentAction::PostConnection {
            id,
            terraform_module_versions,
            aws_account_id,
            role_name,
        } => {
            let request = PostConnectionRequest::new(InfrastructureMetadata {
                terraform_module_versions,
                control_plane_aws_account_id: aws_account_id,
                control_plane_role_name: role_name,
            });
            print_json(&resources.post_connection(&id, &request).await?)
        }
    }
}

async fn datalakes(client: &Client, action: DatalakeAction) -> Result<()> {
    let resources = client.datalakes();
    match action {
        DatalakeAction::List {
            hosting_environment: Some(parent),
        } => print_json(&resources.list_by_hosting_environment(&parent).await?),
        DatalakeAction::List {
            hosting_environment: None,
        } => print_json(&resources.list().await?),
        DatalakeAction::Get { id } => print_json(&resources.get(&id).await?),
        DatalakeAction::Rename { id, name } => {
            print_json(&resources.update(&id, &UpdateDatalakeRequest::rename(name)).await?)
        }
        DatalakeAction::Delete { id } => delete(resources, &id).await,
    }
}

async fn source_apps(client: &Client, action: SourceAppAction) -> Result<()> {
    let resources = client.source_apps();
    match action {
        SourceAppAction::List {
            hosting_environment: Some(parent),
        } => print_json(&resources.list_by_hosting_environment(&parent).await?),
        SourceAppAction::List {
            hosting_environment: None,
        } => print_json(&resources.list().await?),
        SourceAppAction::Get { id } => print_json(&resources.get(&id).await?),
        SourceAppAction::Rename { id, name } => {
            print_json(&resources.update(&id, &UpdateSourceAppRequest::rename(name)).await?)
        }
        SourceAppAction::Delete { id } => delete(resources, &id).await,
    }
}

async fn connections(client: &Client, action: ConnectionAction) -> Result<()> {
    let resources = client.connections();
    match action {
        ConnectionAction::List { name: Some(name) } => {
            print_json(&resources.get_by_name(&name).await?)
        }
        ConnectionAction::List { name: None } => print_json(&resources.list().await?),
        ConnectionAction::Get { id } => print_json(&resources.get(&id).await?),
        ConnectionAction::Rename { id, name } => {
            print_json(&resources.update(&id, &UpdateConnectionRequest::rename(name)).await?)
        }
        ConnectionAction::Delete { id } => delete(resources, &id).await,
    }
}

async fn links(client: &Client, action: LinkAction) -> Result<()> {
    let resources = client.source_app_datalake_links();
    match action {
        LinkAction::List {
            source_app: Some(id),
            ..
        } => print_json(&resources.list_by_source_app(&id).await?),
        LinkAction::List {
            datalake: Some(id), ..
        } => print_json(&resources.list_by_datalake(&id).await?),
        LinkAction::List { .. } => print_json(&resources.list().await?),
        LinkAction::Get { id } => print_json(&resources.get(&id).await?),
        LinkAction::Create {
            source_app_id,
            datalake_id,
        } => print_json(
            &resources
                .create(&CreateSourceAppDatalakeLinkRequest::new(source_app_id, datalake_id))
                .await?,
        ),
        LinkAction::Delete { id } => delete(resources, &id).await,
    }
}

async fn delete<K: Resource>(resources: ResourceClient<'_, K>, id: &str) -> Result<()> {
    resources.delete(id).await?;
    println!("Deleted {} {}", K::KIND, id);
    Ok(())
}

/// Fetch every kind concurrently and print status counts
async fn overview(client: &Client) -> Result<()> {
    let (environments, datalakes, source_apps, connections, links) = (
        client.hosting_environments(),
        client.datalakes(),
        client.source_apps(),
        client.connections(),
        client.source_app_datalake_links(),
    );

    let (environments, datalakes, source_apps, connections, links) = futures::try_join!(
        environments.list(),
        datalakes.list(),
        source_apps.list(),
        connections.list(),
        links.list(),
    )?;

    print_counts(&environments);
    print_counts(&datalakes);
    print_counts(&source_apps);
    print_counts(&connections);
    println!("{}: {}", SourceAppDatalakeLink::KIND, links.len());
    Ok(())
}

fn print_counts<K: HasStatus>(items: &[K]) {
    let counts = count_by_status(items.iter().map(|item| item.status()))
        .into_iter()
        .map(|(status, count)| format!("{}={}", status.as_str(), count))
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}: {} ({})", K::KIND, items.len(), counts);
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
