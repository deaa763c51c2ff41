//! Background render thread: fetches and computes off the UI thread.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Requests
//! are handled one at a time, in order.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use stockdash_core::{Dashboard, DashboardPage, DashboardRequest};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Render(DashboardRequest),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Page(Box<DashboardPage>),
}

/// Spawn the render worker. It owns the dashboard and its fetch memo.
pub fn spawn_worker(
    dashboard: Dashboard,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stockdash-render".into())
        .spawn(move || worker_loop(&dashboard, &rx, &tx))
}

fn worker_loop(
    dashboard: &Dashboard,
    rx: &Receiver<WorkerCommand>,
    tx: &Sender<WorkerResponse>,
) {
    info!(provider = dashboard.provider_name(), "render worker started");
    while let Ok(cmd) = rx.recv() {
        match cmd {
            WorkerCommand::Render(request) => {
                let page = dashboard.render(&request);
                debug!(
                    ticker = %request.ticker,
                    cache_hits = dashboard.cache().hits(),
                    cache_misses = dashboard.cache().misses(),
                    "page ready"
                );
                if tx.send(WorkerResponse::Page(Box::new(page))).is_err() {
                    break;
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }
    info!("render worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::mpsc;
    use stockdash_core::data::SyntheticProvider;
    use stockdash_core::InvertedRangePolicy;

    #[test]
    fn renders_then_shuts_down() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let dashboard = Dashboard::new(Box::new(SyntheticProvider::new(1, 300)));
        let handle = spawn_worker(dashboard, cmd_rx, resp_tx).unwrap();

        let request = DashboardRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            InvertedRangePolicy::Swap,
        )
        .unwrap();
        cmd_tx.send(WorkerCommand::Render(request.clone())).unwrap();

        let WorkerResponse::Page(page) = resp_rx.recv().unwrap();
        assert_eq!(page.request, request);
        assert!(page.has_data());

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }
}
