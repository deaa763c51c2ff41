//! Last inputs: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use stockdash_core::chart::ChartKind;

use crate::app::{AppState, InputState};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub ticker: Option<String>,
    pub start: Option<String>,
    /// Empty means today; stored so a fixed end date survives restarts.
    pub end: String,
    pub chart: ChartKind,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            ticker: None,
            start: None,
            end: String::new(),
            chart: ChartKind::PriceVolume,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        ticker: Some(app.input.ticker.clone()),
        start: Some(app.input.start.clone()),
        end: app.input.end.clone(),
        chart: app.chart,
    }
}

/// Overlay persisted inputs on the configured defaults.
pub fn apply(app: &mut AppState, state: PersistedState) {
    apply_inputs(&mut app.input, &state);
    app.chart = state.chart;
}

fn apply_inputs(input: &mut InputState, state: &PersistedState) {
    if let Some(ticker) = state.ticker.as_ref().filter(|t| !t.trim().is_empty()) {
        input.ticker = ticker.clone();
    }
    if let Some(start) = &state.start {
        input.start = start.clone();
    }
    input.end = state.end.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockdash").join("state.json");

        let state = PersistedState {
            ticker: Some("MSFT".into()),
            start: Some("2010-01-01".into()),
            end: "2020-12-31".into(),
            chart: ChartKind::Rsi,
        };
        save(&path, &state).unwrap();
        assert_eq!(load(&path), state);
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded, PersistedState::default());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();
        assert_eq!(load(&path), PersistedState::default());
    }

    #[test]
    fn blank_ticker_keeps_default() {
        let mut input = InputState::new("AAPL", NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        let state = PersistedState {
            ticker: Some("   ".into()),
            ..PersistedState::default()
        };
        apply_inputs(&mut input, &state);
        assert_eq!(input.ticker, "AAPL");
        assert_eq!(input.start, "1900-01-01");
    }
}
