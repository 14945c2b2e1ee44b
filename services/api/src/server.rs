use crate::cli::ServeArgs;
use crate::infra::{load_question_bank, AppState, InMemoryAssessmentRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use learning_compass::config::AppConfig;
use learning_compass::error::AppError;
use learning_compass::telemetry;
use learning_compass::workflows::assessment::AssessmentService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let bank = load_question_bank(config.catalog.question_bank_csv.as_deref())?;
    info!(questions = bank.len(), "question bank ready");

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let assessment_service = Arc::new(AssessmentService::new(
        repository,
        bank,
        config.payment.clone(),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "learning compass ready");

    axum::serve(listener, app).await?;
    Ok(())
}
