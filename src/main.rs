use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use rallyscore::assessment::{
    AssessmentForm, ExportOutcome, FieldKey, Gender, GroupKey, NoticeSurface, RenderableSummary,
    Subject, SLOT_COUNT,
};
use rallyscore::config::AppConfig;
use rallyscore::error::AppError;
use rallyscore::export::DocumentExporter;
use rallyscore::i18n::{Catalog, Locale};
use rallyscore::roster::RosterImporter;
use rallyscore::routes::{router, AppState};
use rallyscore::telemetry;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "rallyscore",
    about = "Score table tennis skill tests and export the results as PDF",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score one subject and print the localized summary
    Score(ScoreArgs),
    /// Score every row of a CSV roster
    Roster(RosterArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Full name of the subject
    #[arg(long, default_value = "")]
    name: String,
    /// Age as entered on the form
    #[arg(long, default_value = "")]
    age: String,
    /// Gender code: L/P or male/female
    #[arg(long, default_value = "")]
    gender: String,
    /// Comma-separated movement scores, blanks allowed (e.g. 20,18,,22)
    #[arg(long, value_delimiter = ',')]
    movement: Vec<String>,
    /// Comma-separated outcome scores, blanks allowed
    #[arg(long, value_delimiter = ',')]
    outcome: Vec<String>,
    /// Summary language (id or en); defaults to APP_DEFAULT_LOCALE
    #[arg(long)]
    locale: Option<Locale>,
    /// Write the PDF export into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RosterArgs {
    /// CSV file with name, age, gender, movement_1..6 and outcome_1..6 columns
    #[arg(long)]
    csv: PathBuf,
    /// Summary language (id or en); defaults to APP_DEFAULT_LOCALE
    #[arg(long)]
    locale: Option<Locale>,
    /// Write one PDF per scored row into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

/// Prints notices on stderr, where a terminal user will see them.
struct ConsoleNotice;

impl NoticeSurface for ConsoleNotice {
    fn show(&self, message: &str) {
        eprintln!("! {message}");
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Score(args) => run_score(args).await,
        Command::Roster(args) => run_roster(args).await,
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let state = AppState::new(
        Arc::new(Catalog::builtin()),
        DocumentExporter::with_config(config.export.clone()),
        config.default_locale,
    )
    .with_metrics(prometheus_handle);
    let readiness_flag = state.readiness.clone();

    let app = router(state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        locale = %config.default_locale,
        page_mode = config.export.page_mode.label(),
        "scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let ScoreArgs {
        name,
        age,
        gender,
        movement,
        outcome,
        locale,
        export_dir,
    } = args;

    let locale = locale.unwrap_or(config.default_locale);
    let mut form = AssessmentForm::new(
        Arc::new(Catalog::builtin()),
        Arc::new(ConsoleNotice),
        locale,
    );
    form.set_subject(Subject::new(name, age, Gender::parse(&gender)));

    for (group, raw_scores) in [(GroupKey::Movement, &movement), (GroupKey::Outcome, &outcome)] {
        if raw_scores.len() > SLOT_COUNT {
            warn!(%group, supplied = raw_scores.len(), "extra scores ignored");
        }
        for (field, raw) in FieldKey::for_group(group).zip(raw_scores) {
            form.input(field, raw);
        }
    }

    let Some(summary) = form.submit() else {
        eprintln!("no result: both score groups need at least one valid score");
        return Ok(());
    };
    print_summary(&summary);

    if let Some(dir) = export_dir {
        let exporter = DocumentExporter::with_config(config.export.clone());
        if let ExportOutcome::Exported(document) = form.export(&exporter).await? {
            let path = write_document(&dir, &document.filename, &document.bytes)?;
            println!("\nSaved {} ({} page(s))", path.display(), document.page_count);
        }
    }

    Ok(())
}

async fn run_roster(args: RosterArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let locale = args.locale.unwrap_or(config.default_locale);
    let catalog = Arc::new(Catalog::builtin());
    let entries = RosterImporter::from_path(&args.csv, catalog, locale)?;
    let exporter = DocumentExporter::with_config(config.export.clone());
    let mut failed_exports = 0usize;

    for entry in &entries {
        let name = if entry.subject.name.is_empty() {
            "(unnamed)"
        } else {
            entry.subject.name.as_str()
        };
        println!("\n#{} {}", entry.row, name);
        for notice in &entry.notices {
            println!("  ! {notice}");
        }

        let Some(summary) = &entry.summary else {
            println!("  not scored: a score group is empty");
            continue;
        };
        for row in &summary.group_rows {
            println!("  {}: {} ({})", row.label, row.mean_text, row.band_label);
        }
        println!(
            "  {}: {} ({})",
            summary.total.label, summary.total.mean_text, summary.total.band_label
        );

        if let Some(dir) = &args.export_dir {
            match exporter.export(summary, &entry.subject.name).await {
                Ok(document) => {
                    let path = write_document(dir, &document.filename, &document.bytes)?;
                    println!("  saved {}", path.display());
                }
                Err(err) => {
                    failed_exports += 1;
                    warn!(row = entry.row, kind = err.kind(), error = %err, "roster export failed");
                }
            }
        }
    }

    let scored = entries.iter().filter(|entry| entry.summary.is_some()).count();
    println!("\n{scored}/{} rows scored", entries.len());
    if failed_exports > 0 {
        println!("{failed_exports} export(s) failed");
    }
    Ok(())
}

fn write_document(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

fn print_summary(summary: &RenderableSummary) {
    println!("{}", summary.title);
    println!();
    for row in &summary.subject_rows {
        println!("{}: {}", row.label, row.value);
    }
    for row in &summary.group_rows {
        println!("{}: {} ({})", row.label, row.mean_text, row.band_label);
    }
    println!();
    println!("{}", summary.total.label);
    println!("{} ({})", summary.total.mean_text, summary.total.band_label);
    println!();
    println!("\"{}\"", summary.message.text);
    println!("{}", summary.closing);
}
