//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The render worker communicates via channels.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{NaiveDate, NaiveDateTime};

use stockdash_core::chart::ChartKind;
use stockdash_core::{DashboardPage, DashboardRequest, ErrorKind, InvertedRangePolicy};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which input has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Ticker,
    Start,
    End,
    /// Not editing: digit keys pick charts, letters open overlays.
    Charts,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Ticker => Focus::Start,
            Focus::Start => Focus::End,
            Focus::End => Focus::Charts,
            Focus::Charts => Focus::Ticker,
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Ticker => Focus::Charts,
            Focus::Start => Focus::Ticker,
            Focus::End => Focus::Start,
            Focus::Charts => Focus::End,
        }
    }

    pub fn is_editing(self) -> bool {
        self != Focus::Charts
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub kind: Option<ErrorKind>,
    pub message: String,
    pub context: String,
}

impl ErrorRecord {
    pub fn label(&self) -> &'static str {
        match self.kind {
            Some(ErrorKind::Provider) => "DATA",
            Some(ErrorKind::IndicatorComputation) => "IND",
            Some(ErrorKind::Format) => "FMT",
            Some(ErrorKind::ChartRender) => "CHART",
            None => "INPUT",
        }
    }
}

/// The three text inputs. Dates are kept as typed until submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub ticker: String,
    pub start: String,
    /// Empty means today.
    pub end: String,
    pub focus: Focus,
}

impl InputState {
    pub fn new(ticker: &str, start: NaiveDate) -> Self {
        Self {
            ticker: ticker.to_string(),
            start: start.format("%Y-%m-%d").to_string(),
            end: String::new(),
            focus: Focus::Ticker,
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Ticker => Some(&mut self.ticker),
            Focus::Start => Some(&mut self.start),
            Focus::End => Some(&mut self.end),
            Focus::Charts => None,
        }
    }

    /// Parse the inputs into a request; the error is a user-facing message.
    pub fn to_request(
        &self,
        today: NaiveDate,
        policy: InvertedRangePolicy,
    ) -> Result<DashboardRequest, String> {
        let start = parse_date("start", &self.start)?;
        let end = if self.end.trim().is_empty() {
            today
        } else {
            parse_date("end", &self.end)?
        };
        DashboardRequest::new(&self.ticker, start, end, policy).map_err(|e| e.to_string())
    }
}

fn parse_date(field: &str, text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid {field} date '{}', expected YYYY-MM-DD", text.trim()))
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Summary,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,

    pub input: InputState,
    pub chart: ChartKind,
    pub page: Option<DashboardPage>,
    pub pending: Option<DashboardRequest>,
    pub policy: InvertedRangePolicy,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        input: InputState,
        policy: InvertedRangePolicy,
    ) -> Self {
        Self {
            running: true,
            input,
            chart: ChartKind::PriceVolume,
            page: None,
            pending: None,
            policy,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Validate the inputs and hand the request to the worker.
    pub fn submit(&mut self) {
        let today = chrono::Local::now().date_naive();
        let request = match self.input.to_request(today, self.policy) {
            Ok(request) => request,
            Err(message) => {
                self.push_error(None, message, "input".into());
                return;
            }
        };

        self.input.ticker = request.ticker.clone();
        self.set_status(format!(
            "Loading {} ({} to {})...",
            request.ticker, request.start, request.end
        ));
        if self
            .worker_tx
            .send(WorkerCommand::Render(request.clone()))
            .is_err()
        {
            self.push_error(None, "render worker is gone".into(), request.ticker);
            return;
        }
        self.pending = Some(request);
    }

    /// Install a rendered page and surface its warnings.
    pub fn apply_page(&mut self, page: DashboardPage) {
        if self.pending.as_ref() == Some(&page.request) {
            self.pending = None;
        }

        for warning in &page.warnings {
            self.push_error(
                Some(warning.kind),
                warning.message.clone(),
                page.request.ticker.clone(),
            );
        }
        if page.warnings.is_empty() {
            let rows = page.table.as_ref().map_or(0, |t| t.len());
            self.set_status(format!("{}: {rows} rows", page.request.ticker));
        } else if page.has_data() {
            self.set_warning(format!(
                "{}: rendered with {} warning(s), press e for details",
                page.request.ticker,
                page.warnings.len()
            ));
        }
        self.page = Some(page);
    }

    pub fn select_chart(&mut self, index: usize) {
        if let Some(&kind) = ChartKind::ALL.get(index) {
            self.chart = kind;
        }
    }

    pub fn cycle_chart(&mut self, forward: bool) {
        let len = ChartKind::ALL.len();
        let current = ChartKind::ALL
            .iter()
            .position(|&k| k == self.chart)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.chart = ChartKind::ALL[next];
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, kind: Option<ErrorKind>, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            kind,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
