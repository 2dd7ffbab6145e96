use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use passenger_ai::analytics::metrics::{
    class_distribution, customer_type_distribution, AgeGroupBreakdown, DistributionEntry,
    KeyMetrics,
};
use passenger_ai::analytics::{key_metrics, satisfaction_by_age_group, SegmentFilter, SurveyDataset};
use passenger_ai::config::AppConfig;
use passenger_ai::error::AppError;
use passenger_ai::model::{ranked_importances, ArtifactModel, FeatureImportance, ModelMetadata};
use passenger_ai::satisfaction::batch::RowErrorView;
use passenger_ai::satisfaction::recommend::{recommendations_for, RecommendationView};
use passenger_ai::satisfaction::template;
use passenger_ai::satisfaction::{
    validate, BatchSummary, CustomerRecord, PredictionAdapter, RawRecord, SatisfactionLabel,
};
use passenger_ai::satisfaction::import::SurveyImporter;
use passenger_ai::telemetry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
    adapter: PredictionAdapter,
    dataset: Option<Arc<SurveyDataset>>,
}

#[derive(Parser, Debug)]
#[command(
    name = "Passenger Satisfaction Service",
    about = "Predict airline passenger satisfaction and summarize survey analytics from the command line",
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
    /// Predict satisfaction for a single record stored as JSON
    Predict(PredictArgs),
    /// Predict satisfaction for every row of an uploaded CSV file
    Batch(BatchArgs),
    /// Write the batch upload template
    Template(TemplateArgs),
    /// Show the model's feature importance ranking
    Importance(ImportanceArgs),
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
struct PredictArgs {
    /// JSON file holding one record keyed by the template's column names
    #[arg(long)]
    input: PathBuf,
    /// Override the configured model artifact
    #[arg(long)]
    model: Option<PathBuf>,
    /// Print the improvement catalog for dissatisfied verdicts
    #[arg(long)]
    recommendations: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// CSV file matching the upload template
    #[arg(long)]
    input: PathBuf,
    /// Override the configured model artifact
    #[arg(long)]
    model: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    /// Destination file (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ImportanceArgs {
    /// Override the configured model artifact
    #[arg(long)]
    model: Option<PathBuf>,
    /// How many leading features to highlight
    #[arg(long, default_value_t = 3)]
    top: usize,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    #[serde(flatten)]
    record: RawRecord,
    #[serde(default)]
    include_recommendations: bool,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    label: SatisfactionLabel,
    label_text: &'static str,
    record: CustomerRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendations: Option<Vec<RecommendationView>>,
}

#[derive(Debug, Deserialize)]
struct BatchPredictRequest {
    csv: String,
}

#[derive(Debug, Serialize)]
struct BatchRowView {
    row: usize,
    label: SatisfactionLabel,
    label_text: &'static str,
}

#[derive(Debug, Serialize)]
struct BatchPredictResponse {
    results: Vec<BatchRowView>,
    errors: Vec<RowErrorView>,
    summary: BatchSummary,
}

#[derive(Debug, Serialize)]
struct ImportanceResponse {
    model: ModelMetadata,
    features: Vec<FeatureImportance>,
    top: Vec<FeatureImportance>,
}

#[derive(Debug, Serialize)]
struct AnalyticsResponse {
    metrics: KeyMetrics,
    customer_types: Vec<DistributionEntry>,
    classes: Vec<DistributionEntry>,
    age_groups: Vec<AgeGroupBreakdown>,
}

#[derive(Debug, Serialize)]
struct OverviewResponse {
    rows: usize,
    columns: usize,
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
        Command::Predict(args) => run_predict(args),
        Command::Batch(args) => run_batch(args),
        Command::Template(args) => run_template(args),
        Command::Importance(args) => run_importance(args),
    }
}

fn load_adapter(config: &AppConfig, model_override: Option<PathBuf>) -> Result<PredictionAdapter, AppError> {
    let path = model_override.unwrap_or_else(|| config.model.artifact_path.clone());
    let model = ArtifactModel::from_path(path)?;
    Ok(PredictionAdapter::new(Arc::new(model)))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    // The artifact is loaded exactly once and shared read-only; a missing
    // model is fatal at startup, never a degraded prediction later.
    let adapter = load_adapter(&config, None)?;
    let metadata = adapter.model().metadata();
    info!(
        model = %metadata.name,
        version = %metadata.version,
        arity = metadata.input_arity,
        "model artifact loaded"
    );

    let dataset = match SurveyDataset::from_path(&config.data.dataset_path) {
        Ok(dataset) => {
            info!(rows = dataset.row_count(), "survey dataset loaded");
            Some(Arc::new(dataset))
        }
        Err(err) => {
            warn!(
                path = %config.data.dataset_path.display(),
                "survey dataset not loaded, analytics disabled: {err}"
            );
            None
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
        adapter,
        dataset,
    };

    let app = router(state);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "passenger satisfaction service ready");

    axum::serve(listener, app.layer(prometheus_layer)).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/predict", post(predict_endpoint))
        .route("/api/v1/predict/batch", post(batch_endpoint))
        .route("/api/v1/template", get(template_endpoint))
        .route("/api/v1/model", get(model_endpoint))
        .route("/api/v1/model/importance", get(importance_endpoint))
        .route("/api/v1/analytics/summary", post(analytics_endpoint))
        .route("/api/v1/dataset/overview", get(overview_endpoint))
        .with_state(state)
}

fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let adapter = load_adapter(&config, args.model)?;

    let raw_json = std::fs::read_to_string(&args.input)?;
    let raw: RawRecord = serde_json::from_str(&raw_json)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
    let record = validate(&raw)?;
    let result = adapter.predict(&record)?;

    println!("Predicted satisfaction: {}", result.label.label());

    if args.recommendations && result.label == SatisfactionLabel::Dissatisfied {
        println!("\nRecommendations to improve satisfaction:");
        for entry in recommendations_for(&result) {
            println!("- {}: {}", entry.area.label(), entry.advice);
        }
    }

    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let adapter = load_adapter(&config, args.model)?;

    let rows = SurveyImporter::from_path(&args.input)?;
    let outcome = adapter.predict_batch(&rows)?;

    println!("Batch prediction for {}", args.input.display());
    println!("Rows imported: {}", rows.len());

    for entry in &outcome.results {
        println!("- row {}: {}", entry.row, entry.result.label.label());
    }

    if !outcome.errors.is_empty() {
        println!("\nRows skipped");
        for error in &outcome.errors {
            println!("- row {}: {}", error.row, error.reason);
        }
    }

    println!(
        "\nSatisfied customers: {} out of {}",
        outcome.summary.satisfied, outcome.summary.total
    );
    match outcome.summary.satisfied_percentage {
        Some(pct) => println!("Percentage satisfied: {pct:.2}%"),
        None => println!("Percentage satisfied: n/a (no rows predicted)"),
    }

    Ok(())
}

fn run_template(args: TemplateArgs) -> Result<(), AppError> {
    match args.output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            template::write_template(file)?;
            println!("Template written to {}", path.display());
        }
        None => {
            let csv = template::template_csv()?;
            print!("{csv}");
        }
    }
    Ok(())
}

fn run_importance(args: ImportanceArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let adapter = load_adapter(&config, args.model)?;

    let metadata = adapter.model().metadata();
    let ranked = ranked_importances(adapter.model());

    println!(
        "Feature importance for {} v{} (trained {})",
        metadata.name, metadata.version, metadata.trained_at
    );
    for entry in &ranked {
        println!("- {}: {:.4}", entry.feature, entry.importance);
    }

    let highlighted = args.top.min(ranked.len());
    println!("\nTop {highlighted} features to focus on:");
    for (position, entry) in ranked.iter().take(highlighted).enumerate() {
        println!(
            "{}. {} (importance {:.4})",
            position + 1,
            entry.feature,
            entry.importance
        );
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
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

async fn predict_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, AppError> {
    let record = validate(&payload.record)?;
    let result = state.adapter.predict(&record)?;

    let recommendations = payload.include_recommendations.then(|| {
        recommendations_for(&result)
            .iter()
            .map(|entry| entry.to_view())
            .collect()
    });

    Ok(Json(PredictResponse {
        label: result.label,
        label_text: result.label.label(),
        record: result.record,
        recommendations,
    }))
}

async fn batch_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<BatchPredictRequest>,
) -> Result<Json<BatchPredictResponse>, AppError> {
    let rows = SurveyImporter::from_reader(payload.csv.as_bytes())?;
    let outcome = state.adapter.predict_batch(&rows)?;

    let results = outcome
        .results
        .iter()
        .map(|entry| BatchRowView {
            row: entry.row,
            label: entry.result.label,
            label_text: entry.result.label.label(),
        })
        .collect();
    let errors = outcome.errors.iter().map(|error| error.to_view()).collect();

    Ok(Json(BatchPredictResponse {
        results,
        errors,
        summary: outcome.summary,
    }))
}

async fn template_endpoint() -> Result<impl IntoResponse, AppError> {
    let csv = template::template_csv()?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"template_airline_customer_satisfaction.csv\"",
            ),
        ],
        csv,
    ))
}

async fn model_endpoint(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.adapter.model().metadata())
}

async fn importance_endpoint(State(state): State<AppState>) -> Json<ImportanceResponse> {
    let ranked = ranked_importances(state.adapter.model());
    let top = ranked.iter().take(3).cloned().collect();

    Json(ImportanceResponse {
        model: state.adapter.model().metadata(),
        features: ranked,
        top,
    })
}

async fn analytics_endpoint(
    State(state): State<AppState>,
    Json(filter): Json<SegmentFilter>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let dataset = state.dataset.as_ref().ok_or(AppError::DatasetUnavailable)?;
    let selected = filter.apply(dataset.rows());

    Ok(Json(AnalyticsResponse {
        metrics: key_metrics(&selected),
        customer_types: customer_type_distribution(&selected),
        classes: class_distribution(&selected),
        age_groups: satisfaction_by_age_group(&selected),
    }))
}

async fn overview_endpoint(
    State(state): State<AppState>,
) -> Result<Json<OverviewResponse>, AppError> {
    let dataset = state.dataset.as_ref().ok_or(AppError::DatasetUnavailable)?;
    Ok(Json(OverviewResponse {
        rows: dataset.row_count(),
        columns: dataset.column_count(),
    }))
}
