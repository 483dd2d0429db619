use crate::render::{SUB_X, SUB_Y};
use crate::scene::SceneKey;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Quit,
    Pause,
    Hud,
    Key(SceneKey),
    Click { col: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
}

pub(crate) fn map_event(ev: Event) -> Option<AppEvent> {
    match ev {
        Event::Resize(cols, rows) => Some(AppEvent::Resize { cols, rows }),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Some(AppEvent::Click { col: column, row }),
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            if kind != KeyEventKind::Press {
                return None;
            }
            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(AppEvent::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(AppEvent::Quit),
                KeyCode::Char('p') | KeyCode::Char('P') => Some(AppEvent::Pause),
                KeyCode::Char('h') | KeyCode::Char('H') => Some(AppEvent::Hud),
                KeyCode::Char(' ') => Some(AppEvent::Key(SceneKey::Space)),
                KeyCode::Char(ch) => Some(AppEvent::Key(SceneKey::Char(ch))),
                _ => None,
            }
        }
        _ => None,
    }
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<AppEvent>> {
    let mut out = Vec::new();

    // poll with a tiny timeout so we stay responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Some(ev) = map_event(event::read()?) {
            out.push(ev);
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

/// Logical surface size for a terminal of `cols` x `rows`.
pub(crate) fn logical_size(cols: u16, rows: u16, px_per_dot: f32) -> (f32, f32) {
    (
        cols as f32 * SUB_X as f32 * px_per_dot,
        rows as f32 * SUB_Y as f32 * px_per_dot,
    )
}

/// Logical position of the centre of a terminal cell.
pub(crate) fn cell_center(col: u16, row: u16, px_per_dot: f32) -> (f32, f32) {
    (
        (col as f32 + 0.5) * SUB_X as f32 * px_per_dot,
        (row as f32 + 0.5) * SUB_Y as f32 * px_per_dot,
    )
}
