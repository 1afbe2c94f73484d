//! Report fetch layer.
//!
//! A refresh fetches the stats endpoint plus all thirteen reports as
//! one batch, in parallel, then joins. RULE: the batch is atomic.
//! Either every payload arrives or the whole batch fails, so the view
//! never mixes report sections from different filter states.

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::catalog::{self, STATS_PATH};
use crate::error::{MisError, MisResult};
use crate::filter::FilterState;
use crate::types::{Generation, ReportKind};

const USER_AGENT: &str = "leadmis/0.3 (mis-runner)";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything a batch fetches, addressed uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    DashboardStats,
    Report(ReportKind),
}

impl Endpoint {
    /// Fetch path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DashboardStats => STATS_PATH,
            Endpoint::Report(kind) => catalog::spec_for(kind).path,
        }
    }

    /// Stable name for logs and directory-source file stems.
    pub fn slug(self) -> &'static str {
        match self {
            Endpoint::DashboardStats => "dashboard_stats",
            Endpoint::Report(kind) => kind.name(),
        }
    }
}

/// Where raw payloads come from. `Sync` because one source instance
/// serves the entire fan-out.
pub trait ReportSource: Sync {
    fn fetch(&self, endpoint: Endpoint, query: &[(String, String)]) -> MisResult<Value>;
}

/// Live backend over HTTP.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str, timeout_secs: u64) -> MisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(HttpSource { client, base_url: base_url.trim_end_matches('/').into() })
    }
}

impl ReportSource for HttpSource {
    fn fetch(&self, endpoint: Endpoint, query: &[(String, String)]) -> MisResult<Value> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        log::debug!("GET {url}");
        let payload =
            self.client.get(&url).query(query).send()?.error_for_status()?.json::<Value>()?;
        Ok(payload)
    }
}

/// Offline source reading `<dir>/<slug>.json`. Used by tests and for
/// replaying captured payloads; query parameters are ignored.
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirSource { dir: dir.into() }
    }
}

impl ReportSource for DirSource {
    fn fetch(&self, endpoint: Endpoint, _query: &[(String, String)]) -> MisResult<Value> {
        let path = self.dir.join(format!("{}.json", endpoint.slug()));
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One completed fan-out: raw payloads, not yet decoded or filtered.
#[derive(Debug, Clone)]
pub struct ReportBatch {
    pub generation: Generation,
    pub fetched_at: NaiveDateTime,
    pub stats: Value,
    pub payloads: Vec<(ReportKind, Value)>,
}

/// Fetch stats plus every report in parallel and join. Each failure is
/// logged per endpoint; the first one fails the batch.
pub fn fetch_batch(
    source: &dyn ReportSource,
    filters: &FilterState,
    generation: Generation,
    now: NaiveDateTime,
) -> MisResult<ReportBatch> {
    log::info!(
        "Fetching report batch (generation {generation}, dateRange {})",
        filters.date_range.token()
    );

    let stats_query = filters.query_params(None);
    let report_queries: Vec<(ReportKind, Vec<(String, String)>)> = ReportKind::ALL
        .iter()
        .map(|k| (*k, filters.query_params(Some(*k))))
        .collect();

    let (stats_result, kind_results) = thread::scope(|s| {
        let stats_handle = s.spawn(|| source.fetch(Endpoint::DashboardStats, &stats_query));
        let report_handles: Vec<_> = report_queries
            .iter()
            .map(|(kind, query)| {
                (*kind, s.spawn(move || source.fetch(Endpoint::Report(*kind), query)))
            })
            .collect();

        let stats_result = join_fetch("dashboard_stats", stats_handle);
        let kind_results: Vec<(ReportKind, MisResult<Value>)> = report_handles
            .into_iter()
            .map(|(kind, handle)| (kind, join_fetch(kind.name(), handle)))
            .collect();
        (stats_result, kind_results)
    });

    let mut first_err: Option<MisError> = None;
    let stats = match stats_result {
        Ok(v) => v,
        Err(e) => {
            log::error!("Dashboard stats failed to fetch: {e}");
            first_err = Some(fetch_error("dashboard_stats", e));
            Value::Null
        }
    };

    let mut payloads = Vec::with_capacity(kind_results.len());
    for (kind, result) in kind_results {
        match result {
            Ok(v) => payloads.push((kind, v)),
            Err(e) => {
                log::error!("Report '{}' failed to fetch: {e}", kind.name());
                if first_err.is_none() {
                    first_err = Some(fetch_error(kind.name(), e));
                }
            }
        }
    }

    if let Some(e) = first_err {
        return Err(e);
    }
    log::info!("Report batch complete (generation {generation}, {} reports)", payloads.len());
    Ok(ReportBatch { generation, fetched_at: now, stats, payloads })
}

fn join_fetch(
    name: &str,
    handle: thread::ScopedJoinHandle<'_, MisResult<Value>>,
) -> MisResult<Value> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(MisError::Fetch {
            kind: name.into(),
            reason: "fetch thread panicked".into(),
        }),
    }
}

fn fetch_error(name: &str, e: MisError) -> MisError {
    match e {
        already @ MisError::Fetch { .. } => already,
        other => MisError::Fetch { kind: name.into(), reason: other.to_string() },
    }
}
