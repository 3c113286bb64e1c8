//! Plain-text sprint view.
//!
//! [`render`] turns a snapshot into lines of text; [`Screen`] writes them to the
//! terminal, rewriting only the lines that changed since the previous frame.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::Print,
    terminal, QueueableCommand,
};

use tui_sprint::core::{format_elapsed, GameSnapshot};
use tui_sprint::types::{Phase, GRID_HEIGHT, VISIBLE_HEIGHT};

const EMPTY: &str = " .";
const BLOCK: &str = "[]";
const GHOST: &str = "::";

/// Rows kept above the visible field for spawning.
const BUFFER_ROWS: u8 = GRID_HEIGHT - VISIBLE_HEIGHT;

/// Render a snapshot as text lines: the field on the left, status on the right.
pub fn render(snapshot: &GameSnapshot) -> Vec<String> {
    let visible = snapshot.height.saturating_sub(BUFFER_ROWS).max(1);
    let ghost_cells: Vec<(i8, i8)> = match (snapshot.ghost_row, snapshot.active) {
        (Some(ghost_y), Some(active)) => snapshot
            .active_cells
            .iter()
            .map(|&(x, y)| (x, y - active.y + ghost_y))
            .collect(),
        _ => Vec::new(),
    };

    let panel = side_panel(snapshot);
    let mut lines = Vec::with_capacity(visible as usize + 2);
    let border = format!("+{}+", "-".repeat(snapshot.width as usize * 2));
    lines.push(border.clone());

    for y in (0..visible as i8).rev() {
        let mut line = String::from("|");
        for x in 0..snapshot.width as i8 {
            let cell = if snapshot.active_cells.contains(&(x, y)) || snapshot.cell(x, y).is_some() {
                BLOCK
            } else if ghost_cells.contains(&(x, y)) {
                GHOST
            } else {
                EMPTY
            };
            line.push_str(cell);
        }
        line.push('|');

        let row_from_top = (visible as i8 - 1 - y) as usize;
        if let Some(text) = panel.get(row_from_top) {
            line.push_str("  ");
            line.push_str(text);
        }
        lines.push(line);
    }

    lines.push(border);
    lines
}

fn side_panel(snapshot: &GameSnapshot) -> Vec<String> {
    let piece_name = |kind: Option<tui_sprint::types::PieceKind>| {
        kind.map(|k| k.as_str()).unwrap_or("-").to_string()
    };
    let hold = if snapshot.hold.available {
        piece_name(snapshot.hold.piece)
    } else {
        format!("{} (used)", piece_name(snapshot.hold.piece))
    };
    let status = match snapshot.phase {
        Phase::Paused => "PAUSED".to_string(),
        Phase::GameOver if snapshot.won => {
            format!("CLEAR! {}", format_elapsed(snapshot.elapsed_ms))
        }
        Phase::GameOver => "TOPPED OUT".to_string(),
        Phase::Ready => "READY".to_string(),
        Phase::Spawning | Phase::Falling => String::new(),
    };

    vec![
        "SPRINT".to_string(),
        String::new(),
        format!("lines  {}", snapshot.lines_remaining),
        format!("time   {}", format_elapsed(snapshot.elapsed_ms)),
        String::new(),
        format!("next   {}", piece_name(snapshot.next)),
        format!("hold   {}", hold),
        String::new(),
        status,
        String::new(),
        "arrows/hjkl move".to_string(),
        "up/x cw  z ccw".to_string(),
        "space drop  c hold".to_string(),
        "p pause  r restart".to_string(),
        "q quit".to_string(),
    ]
}

/// Raw-mode terminal screen.
pub struct Screen {
    stdout: io::Stdout,
    last: Vec<String>,
    enhanced_keys: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: Vec::new(),
            enhanced_keys: false,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        // Release events let held keys end exactly when they are let go.
        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            self.stdout.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
            self.enhanced_keys = true;
        }
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if self.enhanced_keys {
            self.stdout.queue(PopKeyboardEnhancementFlags)?;
        }
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.last.clear();
        let _ = self.stdout.queue(terminal::Clear(terminal::ClearType::All));
    }

    pub fn draw(&mut self, lines: Vec<String>) -> Result<()> {
        for (y, line) in lines.iter().enumerate() {
            if self.last.get(y) == Some(line) {
                continue;
            }
            self.stdout.queue(cursor::MoveTo(0, y as u16))?;
            self.stdout.queue(Print(line))?;
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
        }
        self.stdout.flush()?;
        self.last = lines;
        Ok(())
    }
}
