use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use sarkari_sathi::config::AppConfig;
use sarkari_sathi::error::AppError;
use sarkari_sathi::portal::accounts::{account_router, AccountService};
use sarkari_sathi::portal::admin::{admin_router, AdminService};
use sarkari_sathi::portal::catalog::{
    catalog_router, eligibility, Category, CatalogService, CitizenProfile, Disability,
    EducationLevel, EligibilityRules, EntryDraft, EntryKind, Gender, IncomeBand, MaritalStatus,
    Occupation,
};
use sarkari_sathi::portal::infra::{
    DigestPasswordHasher, InMemoryAccountRepository, InMemoryAdminRepository,
    InMemoryCatalogRepository, InMemoryTokenAuthority, RecordingOtpMailer, SequenceCodeSource,
};
use sarkari_sathi::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Sarkari Sathi",
    about = "Run the welfare scheme portal service or explore a catalog from the command line",
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
    /// Inspect or match against a catalog seed file
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
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

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// Parse a seed CSV and print a summary
    Import(ImportArgs),
    /// Run the eligibility matcher over a seed CSV for one profile
    Match(MatchArgs),
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Catalog seed CSV
    #[arg(long)]
    csv: PathBuf,
}

#[derive(Args, Debug)]
struct MatchArgs {
    /// Catalog seed CSV
    #[arg(long)]
    csv: PathBuf,
    #[arg(long)]
    age: Option<u8>,
    #[arg(long, value_parser = parse_label::<Category>)]
    category: Option<Category>,
    #[arg(long, value_parser = parse_label::<Gender>)]
    gender: Option<Gender>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long, value_parser = parse_label::<EducationLevel>)]
    education: Option<EducationLevel>,
    #[arg(long, value_parser = parse_label::<IncomeBand>)]
    income: Option<IncomeBand>,
    #[arg(long, value_parser = parse_label::<MaritalStatus>)]
    marital_status: Option<MaritalStatus>,
    #[arg(long, value_parser = parse_label::<Occupation>)]
    occupation: Option<Occupation>,
    #[arg(long, value_parser = parse_label::<Disability>)]
    disability: Option<Disability>,
}

impl MatchArgs {
    fn profile(&self) -> CitizenProfile {
        CitizenProfile {
            name: None,
            age: self.age,
            gender: self.gender,
            category: self.category,
            income: self.income,
            education: self.education,
            occupation: self.occupation,
            state: self.state.clone(),
            district: None,
            marital_status: self.marital_status,
            disability: self.disability,
        }
    }
}

fn parse_label<T: FromStr<Err = String>>(raw: &str) -> Result<T, String> {
    raw.parse()
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
        Command::Catalog {
            command: CatalogCommand::Import(args),
        } => run_catalog_import(args),
        Command::Catalog {
            command: CatalogCommand::Match(args),
        } => run_catalog_match(args),
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let hasher = Arc::new(DigestPasswordHasher);
    let tokens = Arc::new(InMemoryTokenAuthority::default());

    let catalog_repository = Arc::new(InMemoryCatalogRepository::default());
    let catalog_service = Arc::new(CatalogService::new(catalog_repository));

    let account_repository = Arc::new(InMemoryAccountRepository::default());
    let mailer = Arc::new(RecordingOtpMailer::default());
    let account_service = Arc::new(AccountService::new(
        account_repository,
        mailer,
        Arc::new(SequenceCodeSource::default()),
        hasher.clone(),
        tokens.clone(),
    ));

    let admin_repository = Arc::new(InMemoryAdminRepository::default());
    let admin_service = Arc::new(AdminService::new(admin_repository, hasher, tokens));

    for draft in demo_drafts() {
        catalog_service.add_entry(draft, None)?;
    }

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(catalog_router(
            catalog_service.clone(),
            account_service.clone(),
        ))
        .merge(account_router(account_service.clone()))
        .merge(admin_router(admin_service, catalog_service, account_service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "welfare portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_catalog_import(args: ImportArgs) -> Result<(), AppError> {
    let drafts = sarkari_sathi::portal::catalog::drafts_from_path(&args.csv)?;

    let schemes = drafts
        .iter()
        .filter(|draft| draft.kind == EntryKind::Scheme)
        .count();
    let scholarships = drafts.len() - schemes;
    let inactive = drafts.iter().filter(|draft| !draft.is_active).count();
    let unrestricted = drafts
        .iter()
        .filter(|draft| draft.eligibility.is_unrestricted())
        .count();

    println!("Catalog seed: {}", args.csv.display());
    println!(
        "{} entries ({schemes} schemes, {scholarships} scholarships)",
        drafts.len()
    );
    println!("{inactive} inactive, {unrestricted} without eligibility restrictions");

    Ok(())
}

fn run_catalog_match(args: MatchArgs) -> Result<(), AppError> {
    let drafts = sarkari_sathi::portal::catalog::drafts_from_path(&args.csv)?;
    let profile = args.profile();

    println!("Catalog seed: {}", args.csv.display());

    let mut eligible = 0usize;
    for draft in drafts.iter().filter(|draft| draft.is_active) {
        if eligibility::matches(&draft.eligibility, &profile) {
            eligible += 1;
            println!("  [{}] {}", draft.kind, draft.title);
        }
    }

    if eligible == 0 {
        println!("  no eligible entries for this profile");
    }

    Ok(())
}

fn demo_drafts() -> Vec<EntryDraft> {
    vec![
        EntryDraft {
            kind: EntryKind::Scheme,
            title: "Universal Health Card".to_string(),
            description: "Cashless treatment cover for enrolled households.".to_string(),
            benefits: Some("Hospitalization cover up to 5 lakh per family per year.".to_string()),
            application_process: Some("Apply at the nearest enrollment centre.".to_string()),
            documents: vec!["Aadhaar card".to_string(), "Ration card".to_string()],
            video_link: None,
            application_link: Some("https://example.gov.in/health-card".to_string()),
            last_date: None,
            is_active: true,
            eligibility: EligibilityRules::default(),
        },
        EntryDraft {
            kind: EntryKind::Scheme,
            title: "Young Farmer Support".to_string(),
            description: "Input subsidy for young cultivators.".to_string(),
            benefits: Some("Seasonal input subsidy credited directly.".to_string()),
            application_process: Some("Apply through the district agriculture office.".to_string()),
            documents: vec!["Land record".to_string()],
            video_link: None,
            application_link: None,
            last_date: None,
            is_active: true,
            eligibility: EligibilityRules {
                occupation: vec![Occupation::SelfEmployed, Occupation::Unemployed],
                age_min: Some(18),
                age_max: Some(40),
                ..EligibilityRules::default()
            },
        },
        EntryDraft {
            kind: EntryKind::Scholarship,
            title: "National Merit Scholarship".to_string(),
            description: "Awarded to students with outstanding academic performance.".to_string(),
            benefits: None,
            application_process: None,
            documents: Vec::new(),
            video_link: None,
            application_link: None,
            last_date: None,
            is_active: true,
            eligibility: EligibilityRules {
                category: vec![Category::General, Category::Obc],
                gender: vec![Gender::Male, Gender::Female],
                state: vec!["Jharkhand".to_string()],
                education: vec![EducationLevel::Graduate],
                age_min: Some(18),
                age_max: Some(25),
                ..EligibilityRules::default()
            },
        },
        EntryDraft {
            kind: EntryKind::Scholarship,
            title: "Women in STEM Scholarship".to_string(),
            description: "For female students pursuing STEM degrees.".to_string(),
            benefits: None,
            application_process: None,
            documents: Vec::new(),
            video_link: None,
            application_link: None,
            last_date: None,
            is_active: true,
            eligibility: EligibilityRules {
                gender: vec![Gender::Female],
                education: vec![EducationLevel::Graduate, EducationLevel::Postgraduate],
                state: vec!["Jharkhand".to_string(), "Bihar".to_string()],
                ..EligibilityRules::default()
            },
        },
    ]
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "sarkari-sathi" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
