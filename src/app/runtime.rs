use std::fs;
use std::io;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::analyze::{analyze_html, analyze_url, validate_target_url};
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::report::LinkReport;

use super::data_io::write_report;
use super::logging::init_logging;
use super::tui::{TuiOptions, draw_loop};
use super::types::{AnalysisControl, AnalysisEvent, Cli, PageSource, ResultView};

struct AbortTaskOnDrop(tokio::task::AbortHandle);

impl Drop for AbortTaskOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn send_status(tx: &UnboundedSender<AnalysisEvent>, message: impl Into<String>) {
    let _ = tx.send(AnalysisEvent::Status(message.into()));
}

pub(crate) async fn analyze_source(fetcher: &PageFetcher, source: &PageSource) -> Result<LinkReport> {
    match source {
        PageSource::Remote(url) => analyze_url(fetcher, url).await,
        PageSource::LocalFile { path, base_url } => {
            validate_target_url(base_url)?;
            let html = fs::read_to_string(path)?;
            analyze_html(&html, path, base_url)
        }
    }
}

/// Serves analysis requests one at a time until shut down or the UI goes away.
async fn analysis_worker(
    fetcher: PageFetcher,
    mut control_rx: UnboundedReceiver<AnalysisControl>,
    tx: UnboundedSender<AnalysisEvent>,
) {
    while let Some(control) = control_rx.recv().await {
        match control {
            AnalysisControl::Analyze(source) => {
                send_status(&tx, format!("analyzing {}", source.label()));
                let event = match analyze_source(&fetcher, &source).await {
                    Ok(report) => AnalysisEvent::Completed(Box::new(report)),
                    Err(err) => AnalysisEvent::Failed(err.to_string()),
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            AnalysisControl::Shutdown => break,
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let source = cli.page_source().ok_or_else(|| Error::InvalidInput {
        input: String::new(),
        reason: "a URL or --html with --base-url is required",
    })?;
    init_logging(cli.log_file.as_deref(), !cli.no_tui)?;
    let fetcher = PageFetcher::new(&cli.fetch_config())?;

    if cli.no_tui {
        return run_headless(&cli, &fetcher, &source).await;
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<AnalysisEvent>();
    let (control_tx, control_rx) = mpsc::unbounded_channel::<AnalysisControl>();
    let worker = tokio::spawn(analysis_worker(fetcher, control_rx, tx));
    let _worker_guard = AbortTaskOnDrop(worker.abort_handle());

    let options = TuiOptions {
        source,
        view: ResultView::from(cli.view),
        show_html: cli.show_html,
    };
    let tui_result = run_tui(options, &control_tx, &mut rx);
    let _ = control_tx.send(AnalysisControl::Shutdown);

    tui_result
}

async fn run_headless(cli: &Cli, fetcher: &PageFetcher, source: &PageSource) -> Result<()> {
    let report = analyze_source(fetcher, source).await?;
    info!(
        source = source.label(),
        anchors = report.total_anchors,
        destinations = report.unique_destinations,
        "analysis finished"
    );
    let stdout = io::stdout().lock();
    write_report(&report, cli.format, cli.view, cli.show_html, stdout)
}

fn run_tui(
    options: TuiOptions,
    control_tx: &UnboundedSender<AnalysisControl>,
    rx: &mut UnboundedReceiver<AnalysisEvent>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let tui_result = draw_loop(&mut terminal, options, control_tx, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tui_result
}
