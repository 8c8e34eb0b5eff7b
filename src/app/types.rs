use std::collections::VecDeque;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::fetch::{DEFAULT_USER_AGENT, FetchConfig};
use crate::report::LinkReport;

pub(crate) const EMPTY_RESULT_NOTICE: &str =
    "No anchor links found outside navigation/footer sections";

#[derive(Debug, Parser, Clone)]
#[command(
    name = "anchorscope",
    version,
    about = "Group a page's content links by destination, skipping navigation and footer chrome"
)]
pub(crate) struct Cli {
    #[arg(value_name = "URL", required_unless_present = "html_file")]
    pub(crate) url: Option<String>,

    /// Analyze a saved HTML file instead of fetching URL.
    #[arg(
        long = "html",
        value_name = "FILE",
        requires = "base_url",
        conflicts_with = "url"
    )]
    pub(crate) html_file: Option<String>,

    /// Base URL that relative links in --html resolve against.
    #[arg(long, value_name = "URL")]
    pub(crate) base_url: Option<String>,

    #[arg(long, default_value_t = false)]
    pub(crate) show_html: bool,

    #[arg(long, value_enum, default_value_t = ViewArg::Both)]
    pub(crate) view: ViewArg,

    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub(crate) format: FormatArg,

    #[arg(long, value_name = "SECS", default_value_t = 15)]
    pub(crate) timeout_secs: u64,

    #[arg(long, value_name = "UA")]
    pub(crate) user_agent: Option<String>,

    #[arg(long, value_name = "N", default_value_t = 10)]
    pub(crate) max_redirects: usize,

    #[arg(long, value_name = "FILE")]
    pub(crate) log_file: Option<String>,

    #[arg(long, default_value_t = false)]
    pub(crate) no_tui: bool,
}

impl Cli {
    pub(crate) fn page_source(&self) -> Option<PageSource> {
        if let Some(path) = self.html_file.clone() {
            let base_url = self.base_url.clone()?;
            return Some(PageSource::LocalFile { path, base_url });
        }
        self.url.clone().map(PageSource::Remote)
    }

    pub(crate) fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            max_redirects: self.max_redirects,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum, PartialEq, Eq)]
pub(crate) enum ViewArg {
    Grouped,
    Flat,
    Both,
}

#[derive(Debug, Copy, Clone, ValueEnum, PartialEq, Eq)]
pub(crate) enum FormatArg {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageSource {
    Remote(String),
    LocalFile { path: String, base_url: String },
}

impl PageSource {
    pub(crate) fn label(&self) -> &str {
        match self {
            PageSource::Remote(url) => url,
            PageSource::LocalFile { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResultView {
    Grouped,
    Flat,
}

impl ResultView {
    pub(crate) fn as_index(self) -> usize {
        match self {
            ResultView::Grouped => 0,
            ResultView::Flat => 1,
        }
    }

    pub(crate) fn toggle(self) -> Self {
        match self {
            ResultView::Grouped => ResultView::Flat,
            ResultView::Flat => ResultView::Grouped,
        }
    }
}

impl From<ViewArg> for ResultView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Flat => ResultView::Flat,
            ViewArg::Grouped | ViewArg::Both => ResultView::Grouped,
        }
    }
}

#[derive(Debug)]
pub(crate) enum AnalysisEvent {
    Status(String),
    Completed(Box<LinkReport>),
    Failed(String),
}

#[derive(Debug)]
pub(crate) enum AnalysisControl {
    Analyze(PageSource),
    Shutdown,
}

#[derive(Default)]
pub(crate) struct AppState {
    pub(crate) report: Option<LinkReport>,
    pub(crate) running: bool,
    pub(crate) last_error: Option<String>,
    pub(crate) errors: VecDeque<String>,
    pub(crate) status_messages: VecDeque<String>,
}

impl AppState {
    /// Applies an event; returns true when a new report replaced the old one.
    pub(crate) fn handle_event(&mut self, event: AnalysisEvent) -> bool {
        match event {
            AnalysisEvent::Status(message) => {
                self.push_status(message);
                false
            }
            AnalysisEvent::Completed(report) => {
                self.running = false;
                self.last_error = None;
                self.push_status(format!(
                    "found {} anchor links grouped into {} unique destinations",
                    report.total_anchors, report.unique_destinations
                ));
                self.report = Some(*report);
                true
            }
            AnalysisEvent::Failed(error) => {
                self.running = false;
                self.report = None;
                self.push_error(error.clone());
                self.last_error = Some(error);
                true
            }
        }
    }

    pub(crate) fn push_error(&mut self, error: String) {
        self.errors.push_front(error);
        while self.errors.len() > 10 {
            self.errors.pop_back();
        }
    }

    pub(crate) fn push_status(&mut self, message: String) {
        self.status_messages.push_front(message);
        while self.status_messages.len() > 20 {
            self.status_messages.pop_back();
        }
    }

    /// Informational notice for a finished analysis with nothing to show.
    pub(crate) fn notice(&self) -> Option<&'static str> {
        self.report
            .as_ref()
            .filter(|report| report.is_empty())
            .map(|_| EMPTY_RESULT_NOTICE)
    }
}

/// Clamps a selection into `0..len`, or `None` for an empty list.
pub(crate) fn clamp_selection(selected: usize, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(selected.min(len - 1))
    }
}
