use anyhow::{Context, Result};
use bqrest::config::Config;
use bqrest::model::{
    Dataset, DatasetReference, Job, JobProjection, JobReference, JobState, Table, TableReference,
};
use bqrest::resource::{ListDatasetsConfig, ListJobsConfig, ListTablesConfig};
use bqrest::{BigQueryClient, GcpCredentials};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Command line client for the BigQuery REST API
#[derive(Parser, Debug)]
#[command(name = "bqctl", version, about, long_about = None)]
struct Args {
    /// GCP project to use
    #[arg(short, long, global = true)]
    project: Option<String>,

    /// Override the API endpoint
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dataset operations
    #[command(subcommand)]
    Datasets(DatasetsCommand),
    /// Table operations
    #[command(subcommand)]
    Tables(TablesCommand),
    /// Job operations
    #[command(subcommand)]
    Jobs(JobsCommand),
    /// Inspect or change the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum DatasetsCommand {
    /// List datasets in the project
    List {
        /// Include hidden datasets
        #[arg(long)]
        all: bool,
        /// Label filter, e.g. labels.env:prod
        #[arg(long)]
        filter: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one dataset
    Get { dataset: String },
}

#[derive(Subcommand, Debug)]
enum TablesCommand {
    /// List tables in a dataset
    List {
        dataset: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one table
    Get { dataset: String, table: String },
    /// Delete a table
    Delete {
        dataset: String,
        table: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum JobsCommand {
    /// List jobs in the project, newest first
    List {
        /// Show jobs of every user
        #[arg(long)]
        all_users: bool,
        /// Only jobs in these states (repeatable)
        #[arg(long = "state", value_enum)]
        states: Vec<StateArg>,
        #[arg(long, value_enum)]
        projection: Option<ProjectionArg>,
        /// Only jobs created at or after this RFC 3339 time
        #[arg(long)]
        min_creation_time: Option<DateTime<Utc>>,
        /// Only jobs created at or before this RFC 3339 time
        #[arg(long)]
        max_creation_time: Option<DateTime<Utc>>,
        /// Only children of this script job
        #[arg(long)]
        parent_job_id: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one job
    Get {
        job: String,
        /// Job location, required outside the US and EU multi-regions
        #[arg(long)]
        location: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Save the default project
    SetProject { project: String },
}

#[derive(clap::Args, Debug)]
struct PageArgs {
    /// Page size requested from the server
    #[arg(long)]
    max_results: Option<u32>,
    /// Fetch only this page instead of every page
    #[arg(long)]
    page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StateArg {
    Done,
    Pending,
    Running,
}

impl From<StateArg> for JobState {
    fn from(state: StateArg) -> Self {
        match state {
            StateArg::Done => JobState::Done,
            StateArg::Pending => JobState::Pending,
            StateArg::Running => JobState::Running,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProjectionArg {
    Full,
    Minimal,
}

impl From<ProjectionArg> for JobProjection {
    fn from(projection: ProjectionArg) -> Self {
        match projection {
            ProjectionArg::Full => JobProjection::Full,
            ProjectionArg::Minimal => JobProjection::Minimal,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Yaml,
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

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let env_filter = std::env::var("RUST_LOG").ok();

    let tracing_level = match (level.to_tracing_level(), &env_filter) {
        (Some(level), _) => level,
        (None, Some(_)) => Level::TRACE,
        (None, None) => return Ok(None),
    };

    let log_path = get_log_path();
    let file = open_log_file(&log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let filter = match env_filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(tracing_level.as_str()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("bqctl started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn open_log_file(log_path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("bqrest").join("bqctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".bqrest").join("bqctl.log");
    }
    PathBuf::from("bqctl.log")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = match setup_logging(args.log_level) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    if let Err(err) = run(args).await {
        match err.downcast_ref::<bqrest::Error>() {
            Some(api_err) => {
                tracing::error!("{:?}", err);
                eprintln!("Error: {}", bqrest::format_api_error(api_err));
            }
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();

    if let Command::Config(cmd) = &args.command {
        return run_config(cmd, &mut config, &args);
    }

    let project = config
        .effective_project(args.project.as_deref())
        .context("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project flag")?;
    let base_url = config.effective_base_url(args.base_url.as_deref());

    tracing::info!("Using project: {}, endpoint: {}", project, base_url);

    let credentials = GcpCredentials::new()
        .await
        .context("Failed to initialize GCP authentication. Run 'gcloud auth application-default login'")?;
    let client = BigQueryClient::with_credentials(&base_url, credentials, config.timeout())?;

    let output = args.output;
    let default_page_size = config.max_results;

    match args.command {
        Command::Datasets(DatasetsCommand::List { all, filter, page }) => {
            let datasets = client
                .list_datasets(&ListDatasetsConfig {
                    all: all.then_some(true),
                    filter,
                    max_results: page.max_results.or(default_page_size),
                    page_token: page.page_token,
                    ..ListDatasetsConfig::new(&project)
                })
                .await?;
            print_list(output, datasets.as_slice(), dataset_line)
        }
        Command::Datasets(DatasetsCommand::Get { dataset }) => {
            let dataset = client
                .get_dataset(&DatasetReference::new(&project, dataset))
                .await?;
            print_one(output, &dataset, dataset_line)
        }
        Command::Tables(TablesCommand::List { dataset, page }) => {
            let tables = client
                .list_tables(&ListTablesConfig {
                    max_results: page.max_results.or(default_page_size),
                    page_token: page.page_token,
                    ..ListTablesConfig::new(&project, dataset)
                })
                .await?;
            print_list(output, tables.as_slice(), table_line)
        }
        Command::Tables(TablesCommand::Get { dataset, table }) => {
            let table = client
                .get_table(&TableReference::new(&project, dataset, table))
                .await?;
            print_one(output, &table, table_line)
        }
        Command::Tables(TablesCommand::Delete { dataset, table, yes }) => {
            let reference = TableReference::new(&project, dataset, table);
            if !yes && !confirm(&format!("Delete table {}?", reference))? {
                println!("Aborted.");
                return Ok(());
            }
            client.delete_table(&reference).await?;
            println!("Deleted {}", reference);
            Ok(())
        }
        Command::Jobs(JobsCommand::List {
            all_users,
            states,
            projection,
            min_creation_time,
            max_creation_time,
            parent_job_id,
            page,
        }) => {
            let jobs = client
                .list_jobs(&ListJobsConfig {
                    all_users: all_users.then_some(true),
                    max_results: page.max_results.or(default_page_size),
                    min_creation_time,
                    max_creation_time,
                    page_token: page.page_token,
                    projection: projection.map(Into::into),
                    state_filter: states.into_iter().map(Into::into).collect(),
                    parent_job_id,
                    ..ListJobsConfig::new(&project)
                })
                .await?;
            print_list(output, jobs.as_slice(), job_line)
        }
        Command::Jobs(JobsCommand::Get { job, location }) => {
            let job = client
                .get_job(&JobReference {
                    project_id: project,
                    job_id: job,
                    location,
                })
                .await?;
            print_one(output, &job, job_line)
        }
        Command::Config(_) => unreachable!("handled above"),
    }
}

fn run_config(cmd: &ConfigCommand, config: &mut Config, args: &Args) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let effective = Config {
                project_id: config.effective_project(args.project.as_deref()),
                base_url: Some(config.effective_base_url(args.base_url.as_deref())),
                ..config.clone()
            };
            print_serialized(args.output, &effective)
        }
        ConfigCommand::SetProject { project } => {
            config.set_project(project)?;
            println!("Default project set to {}", project);
            Ok(())
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_list<T: Serialize>(format: OutputFormat, items: &[T], line: fn(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Table => {
            for item in items {
                println!("{}", line(item));
            }
            Ok(())
        }
        _ => print_serialized(format, &items),
    }
}

fn print_one<T: Serialize>(format: OutputFormat, item: &T, line: fn(&T) -> String) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", line(item));
            Ok(())
        }
        _ => print_serialized(format, item),
    }
}

fn print_serialized<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<()> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json | OutputFormat::Table => serde_json::to_string_pretty(value)?,
    };
    println!("{}", text.trim_end());
    Ok(())
}

/// Format a millisecond timestamp to short form
fn format_time(ms: Option<bqrest::model::Int64>) -> String {
    ms.and_then(|ms| ms.to_datetime())
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format bytes to human readable
fn format_bytes(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;
    const TB: i64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn dataset_line(dataset: &Dataset) -> String {
    format!(
        "{:<40} {:<12} {}",
        dataset.dataset_reference,
        dataset.location.as_deref().unwrap_or("-"),
        dataset.friendly_name.as_deref().unwrap_or("")
    )
}

fn table_line(table: &Table) -> String {
    format!(
        "{:<50} {:<18} {:>12} {:>10} {}",
        table.table_reference,
        table.ty.as_deref().unwrap_or("-"),
        table
            .num_rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string()),
        table
            .num_bytes
            .map(|n| format_bytes(n.get()))
            .unwrap_or_else(|| "-".to_string()),
        format_time(table.creation_time)
    )
}

fn job_line(job: &Job) -> String {
    let state = job
        .status
        .as_ref()
        .map(|s| s.state.as_str())
        .unwrap_or("-");
    let failed = job
        .status
        .as_ref()
        .and_then(|s| s.error_result.as_ref())
        .and_then(|e| e.reason.as_deref())
        .map(|reason| format!(" ({})", reason))
        .unwrap_or_default();

    format!(
        "{:<60} {:<8} {:<8}{} {}",
        job.job_reference,
        job.configuration
            .as_ref()
            .and_then(|c| c.job_type.as_deref())
            .unwrap_or("-"),
        state,
        failed,
        format_time(job.statistics.as_ref().and_then(|s| s.creation_time))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn test_args_parse_job_filters() {
        let args = Args::try_parse_from([
            "bqctl",
            "--project",
            "my-project",
            "jobs",
            "list",
            "--state",
            "done",
            "--state",
            "running",
            "--projection",
            "minimal",
            "--min-creation-time",
            "2024-01-01T00:00:00Z",
        ])
        .unwrap();

        let Command::Jobs(JobsCommand::List { states, projection, min_creation_time, .. }) =
            args.command
        else {
            panic!("expected jobs list");
        };
        assert_eq!(states.len(), 2);
        assert!(matches!(projection, Some(ProjectionArg::Minimal)));
        assert_eq!(min_creation_time.unwrap().timestamp_millis(), 1_704_067_200_000);
    }

    #[test]
    fn test_job_line_shows_failure_reason() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "j1", "location": "EU"},
            "configuration": {"jobType": "QUERY"},
            "status": {"state": "DONE", "errorResult": {"reason": "invalidQuery"}}
        }))
        .unwrap();

        let line = job_line(&job);
        assert!(line.starts_with("p:EU.j1"));
        assert!(line.contains("DONE (invalidQuery)"));
    }

    #[test]
    fn test_job_line_without_configuration() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "jobReference": {"projectId": "p", "jobId": "j1"},
            "status": {"state": "RUNNING"}
        }))
        .unwrap();

        let line = job_line(&job);
        assert_eq!(&line[60..], " -        RUNNING  -");
    }

    #[test]
    fn test_dataset_lines_align() {
        let short: Dataset = serde_json::from_value(serde_json::json!({
            "datasetReference": {"projectId": "p", "datasetId": "a"},
            "location": "US"
        }))
        .unwrap();
        let long: Dataset = serde_json::from_value(serde_json::json!({
            "datasetReference": {"projectId": "analytics-prod", "datasetId": "events_raw"},
            "location": "EU"
        }))
        .unwrap();

        let short_line = dataset_line(&short);
        let long_line = dataset_line(&long);
        assert_eq!(short_line.find("US"), Some(41));
        assert_eq!(long_line.find("EU"), Some(41));
    }

    #[test]
    fn test_open_log_file_reports_directory_failure() {
        let dir = std::env::temp_dir().join(format!("bqctl-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let err = open_log_file(&blocker.join("sub").join("bqctl.log")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create log directory"));

        assert!(open_log_file(&dir.join("logs").join("bqctl.log")).is_ok());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
