//! mis-runner: headless MIS report runner for the lead dashboard.
//!
//! Usage:
//!   mis-runner --base-url http://localhost:3000/api --date-range thisMonth
//!   mis-runner --data-dir ./payloads --out ./exports --xlsx
//!   mis-runner --ipc-mode

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use leadmis_core::{
    config::MisConfig,
    date_range::DateRange,
    export::{export_document, export_workbook, ExportSnapshot},
    fetch::{DirSource, HttpSource, ReportSource},
    filter::FilterState,
    fmt,
    session::MisSession,
    summary::executive_summary,
    types::{PivotGroupBy, ReportKind},
};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    SetFilters { filters: FilterState },
    Refresh,
    GetView,
    Export { format: String },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let config = MisConfig::load_or_default(str_arg(&args, "--config"))?;

    let base_url = str_arg(&args, "--base-url").unwrap_or(&config.base_url).to_string();
    let timeout_secs = parse_arg(&args, "--timeout-secs", config.timeout_secs);
    let export_dir: PathBuf =
        str_arg(&args, "--out").map_or_else(|| PathBuf::from(&config.export_dir), PathBuf::from);

    let mut filters = FilterState {
        date_range: match str_arg(&args, "--date-range") {
            Some(tok) => DateRange::parse(tok),
            None => config.default_date_range,
        },
        agents: csv_arg(&args, "--agents"),
        sources: csv_arg(&args, "--sources"),
        statuses: csv_arg(&args, "--statuses"),
        ..FilterState::default()
    };
    if let Some(v) = str_arg(&args, "--region") {
        filters.region = v.into();
    }
    if let Some(v) = str_arg(&args, "--confidence") {
        filters.confidence = v.into();
    }
    if let Some(v) = str_arg(&args, "--score") {
        filters.score = v.into();
    }
    if let Some(v) = str_arg(&args, "--conversion") {
        filters.conversion = v.into();
    }
    if let Some(v) = str_arg(&args, "--pivot-by") {
        filters.pivot_group_by = PivotGroupBy::parse(v);
    }

    let source: Box<dyn ReportSource> = match str_arg(&args, "--data-dir") {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(HttpSource::new(&base_url, timeout_secs)?),
    };

    if !ipc_mode {
        println!("Lead CRM MIS Runner");
        println!("  source:      {}", str_arg(&args, "--data-dir").unwrap_or(&base_url));
        println!("  date range:  {}", filters.date_range.token());
        println!("  export dir:  {}", export_dir.display());
        println!();
    }

    let mut session = MisSession::new(filters);

    if ipc_mode {
        run_ipc_loop(&mut session, source.as_ref(), &export_dir)?;
        return Ok(());
    }

    let now = local_now();
    if let Err(e) = session.refresh(source.as_ref(), now) {
        log::error!("Batch refresh failed: {e}");
        anyhow::bail!("MIS data fetch failed");
    }

    print_summary(&session, now);

    let want_xlsx = args.iter().any(|a| a == "--xlsx");
    let want_pdf = args.iter().any(|a| a == "--pdf");
    let (do_xlsx, do_pdf) = if want_xlsx || want_pdf { (want_xlsx, want_pdf) } else { (true, true) };

    fs::create_dir_all(&export_dir)?;
    let snapshot = build_snapshot(&session, now);
    if do_xlsx {
        let path = export_workbook(&snapshot, &export_dir, now.date())?;
        println!("Workbook: {}", path.display());
    }
    if do_pdf {
        let path = export_document(&snapshot, &export_dir, now.date())?;
        println!("Document: {}", path.display());
    }

    Ok(())
}

fn run_ipc_loop(
    session: &mut MisSession,
    source: &dyn ReportSource,
    export_dir: &Path,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::SetFilters { filters } => {
                session.set_filters(filters);
                writeln!(stdout, "{}", build_view_state(session, local_now()))?;
            }
            IpcCommand::Refresh => {
                let now = local_now();
                match session.refresh(source, now) {
                    Ok(()) => writeln!(stdout, "{}", build_view_state(session, now))?,
                    Err(e) => {
                        log::error!("Batch refresh failed: {e}");
                        let err_json = serde_json::json!({ "error": "MIS data fetch failed" });
                        writeln!(stdout, "{}", err_json)?;
                    }
                }
            }
            IpcCommand::GetView => {
                writeln!(stdout, "{}", build_view_state(session, local_now()))?;
            }
            IpcCommand::Export { format } => {
                let now = local_now();
                fs::create_dir_all(export_dir)?;
                let snapshot = build_snapshot(session, now);
                let result = match format.as_str() {
                    "xlsx" => export_workbook(&snapshot, export_dir, now.date()),
                    "pdf" => export_document(&snapshot, export_dir, now.date()),
                    other => {
                        let err_json =
                            serde_json::json!({ "error": format!("Unknown format: {other}") });
                        writeln!(stdout, "{}", err_json)?;
                        stdout.flush()?;
                        continue;
                    }
                };
                match result {
                    Ok(path) => writeln!(
                        stdout,
                        "{}",
                        serde_json::json!({ "ok": true, "path": path.display().to_string() })
                    )?,
                    Err(e) => {
                        log::error!("Export failed: {e}");
                        writeln!(stdout, "{}", serde_json::json!({ "error": e.to_string() }))?;
                    }
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_snapshot(session: &MisSession, now: NaiveDateTime) -> ExportSnapshot {
    let stats = session.view().map(|v| v.stats.clone()).unwrap_or_default();
    let summary = executive_summary(&stats, session.filters(), now);
    ExportSnapshot::new(summary, &session.export_sections(now))
}

fn build_view_state(session: &MisSession, now: NaiveDateTime) -> serde_json::Value {
    let mut sections = serde_json::Map::new();
    for kind in ReportKind::ALL {
        sections.insert(
            kind.name().into(),
            serde_json::Value::Array(session.filtered_rows(kind, now)),
        );
    }
    let (generation, fetched_at) = match session.view() {
        Some(v) => (v.generation, Some(v.fetched_at.format("%Y-%m-%dT%H:%M:%S").to_string())),
        None => (0, None),
    };
    let stats = session.view().map(|v| v.stats.clone()).unwrap_or_default();
    serde_json::json!({
        "generation": generation,
        "fetchedAt": fetched_at,
        "filters": session.filters(),
        "stats": stats,
        "sections": sections,
    })
}

fn print_summary(session: &MisSession, now: NaiveDateTime) {
    let view = match session.view() {
        Some(v) => v,
        None => {
            println!("(no data fetched)");
            return;
        }
    };

    println!("=== LEAD MIS SUMMARY ===");
    println!("  generation:    {}", view.generation);
    println!("  period:        {}", session.filters().date_range.label());
    println!("  total leads:   {}", fmt::count(view.stats.total_leads as f64));
    println!("  converted:     {}", fmt::count(view.stats.converted_leads as f64));
    println!("  conversion:    {}", fmt::percent(view.stats.conversion_rate));
    println!("  premium:       {}", fmt::currency(view.stats.total_premium));
    println!("  agents:        {}", fmt::count(view.stats.active_agents as f64));
    println!("  renewals due:  {}", fmt::count(view.stats.pending_renewals as f64));

    println!();
    println!("=== REPORT SECTIONS ===");
    for kind in ReportKind::ALL {
        let rows = session.filtered_rows(kind, now);
        println!("  {:<24} {:>6} rows", kind.name(), rows.len());
    }
    println!();
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn csv_arg(args: &[String], flag: &str) -> Vec<String> {
    str_arg(args, flag)
        .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
