use metrics_exporter_prometheus::PrometheusHandle;
use rim_orientation::catalog::{CsvResultSink, ProgramCatalog, QuestionCatalog};
use rim_orientation::config::CatalogConfig;
use rim_orientation::error::AppError;
use rim_orientation::orientation::{
    CompletedResult, Dimension, InMemoryResultSink, InMemorySessionStore, OrientationService,
    ResultSink, ResultSinkError, ScoreMap,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Result log chosen at startup: a CSV file when one is configured, memory
/// otherwise.
pub(crate) enum ConfiguredResultSink {
    Memory(InMemoryResultSink),
    Csv(CsvResultSink),
}

impl ResultSink for ConfiguredResultSink {
    fn persist_result(&self, result: &CompletedResult) -> Result<(), ResultSinkError> {
        match self {
            ConfiguredResultSink::Memory(sink) => sink.persist_result(result),
            ConfiguredResultSink::Csv(sink) => sink.persist_result(result),
        }
    }
}

impl From<&CatalogConfig> for ConfiguredResultSink {
    fn from(config: &CatalogConfig) -> Self {
        match &config.results_csv {
            Some(path) => ConfiguredResultSink::Csv(CsvResultSink::new(path)),
            None => ConfiguredResultSink::Memory(InMemoryResultSink::default()),
        }
    }
}

pub(crate) type ConfiguredService = OrientationService<InMemorySessionStore, ConfiguredResultSink>;

pub(crate) fn build_service(catalog: &CatalogConfig) -> Result<ConfiguredService, AppError> {
    let questions = QuestionCatalog::from_path(&catalog.questions_csv)?;
    let programs = ProgramCatalog::from_path(&catalog.programs_csv)?;

    let service = OrientationService::new(
        questions,
        programs,
        Arc::new(InMemorySessionStore::new(catalog.session_idle_timeout)),
        Arc::new(ConfiguredResultSink::from(catalog)),
    )?
    .with_match_count(catalog.match_count);
    Ok(service)
}

/// Parses `R=4,I=3` style score lists. Unlisted dimensions score zero and a
/// repeated letter keeps its last value.
pub(crate) fn parse_scores(raw: &str) -> Result<ScoreMap, String> {
    let mut scores = ScoreMap::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (letter, points) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected LETTER=POINTS, got '{entry}'"))?;
        let dimension = letter
            .parse::<Dimension>()
            .map_err(|err| err.to_string())?;
        let points: u32 = points
            .trim()
            .parse()
            .map_err(|err| format!("invalid points for {dimension}: '{points}' ({err})"))?;
        scores.set(dimension, points);
    }
    Ok(scores)
}

pub(crate) fn parse_count(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(format!("count must be a positive integer, got '{raw}'")),
    }
}
