//! Keyboard input dispatch: global keys, then overlays, then the focused field.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Focus, Overlay};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Help | Overlay::Summary => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::None => {}
    }

    // 2. Keys shared by every focus.
    match key.code {
        KeyCode::Tab => {
            app.input.focus = app.input.focus.next();
            return;
        }
        KeyCode::BackTab => {
            app.input.focus = app.input.focus.prev();
            return;
        }
        KeyCode::Enter => {
            app.submit();
            app.input.focus = Focus::Charts;
            return;
        }
        _ => {}
    }

    // 3. Focus-specific keys.
    if app.input.focus.is_editing() {
        handle_edit_key(app, key);
    } else {
        handle_chart_key(app, key);
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input.focus = Focus::Charts,
        KeyCode::Backspace => {
            if let Some(field) = app.input.focused_mut() {
                field.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = app.input.focused_mut() {
                field.push(c);
            }
        }
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            app.select_chart(index);
        }
        KeyCode::Right | KeyCode::Char('l') => app.cycle_chart(true),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_chart(false),
        KeyCode::Char('r') => app.submit(),
        KeyCode::Char('/') | KeyCode::Char('t') => {
            app.input.focus = Focus::Ticker;
            app.input.ticker.clear();
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
        }
        KeyCode::Char('s') => app.overlay = Overlay::Summary,
        KeyCode::Char('?') => app.overlay = Overlay::Help,
        _ => {}
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputState;
    use chrono::NaiveDate;
    use crossterm::event::KeyEventState;
    use std::sync::mpsc::{self, Receiver};
    use stockdash_core::chart::ChartKind;
    use stockdash_core::InvertedRangePolicy;

    use crate::worker::WorkerCommand;

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        let input = InputState::new("AAPL", NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        (AppState::new(tx, rx2, input, InvertedRangePolicy::Swap), rx)
    }

    fn press(app: &mut AppState, code: KeyCode) {
        handle_key(
            app,
            KeyEvent {
                code,
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            },
        );
    }

    #[test]
    fn typing_edits_focused_field() {
        let (mut app, _rx) = app();
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        for c in "msft".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.input.ticker, "msft");

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.input.focus, Focus::Start);
        // Digits go into the date field while editing.
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.input.start, "1900-01-011");
        assert_eq!(app.chart, ChartKind::PriceVolume);
    }

    #[test]
    fn enter_submits_and_leaves_edit_mode() {
        let (mut app, rx) = app();
        press(&mut app, KeyCode::Enter);
        assert!(matches!(rx.try_recv(), Ok(WorkerCommand::Render(_))));
        assert_eq!(app.input.focus, Focus::Charts);
    }

    #[test]
    fn digits_pick_charts_outside_edit_mode() {
        let (mut app, _rx) = app();
        app.input.focus = Focus::Charts;
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.chart, ChartKind::Rsi);
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.chart, ChartKind::MovingAverages);
    }

    #[test]
    fn overlays_swallow_keys() {
        let (mut app, _rx) = app();
        app.input.focus = Focus::Charts;
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.overlay, Overlay::None);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
