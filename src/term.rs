use crate::{TermInt, Coords};
use crate::config::{GRID_HEIGHT, GRID_WIDTH};
use crate::surface::{Canvas, Color, Surface, Tile};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context, Result};
use log::error;
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

/// Terminal columns per board cell; terminal characters are about twice as
/// tall as they are wide.
const CELL_COLUMNS: TermInt = 2;
const BOARD_COLUMNS: TermInt = GRID_WIDTH as TermInt * CELL_COLUMNS;
const BOARD_ROWS: TermInt = GRID_HEIGHT as TermInt;

/// Terminal state that has to be undone before the process exits.
pub trait Session {
    fn setup(&mut self) -> Result<()>;
    fn restore(&mut self) -> Result<()>;
}

/// Sets the session up, runs `body` and restores the session afterwards,
/// including when setup itself fails halfway. Restore errors are logged so
/// they don't hide the original one.
pub fn run_session<S, T, F>(session: &mut S, body: F) -> Result<T>
where
    S: Session,
    F: FnOnce(&mut S) -> Result<T>,
{
    let result = match session.setup() {
        Ok(()) => body(session),
        Err(err) => Err(err),
    };

    if let Err(err) = session.restore() {
        error!("failed to restore terminal: {:#}", err);
    }

    result
}

pub struct TermManager<W: Write = Stdout> {
    width: TermInt,
    height: TermInt,
    origin: (TermInt, TermInt),
    out: W,
    back: Canvas,
    front: Option<Canvas>,
    message: Option<Vec<String>>,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        TermManager::with_writer(stdout(), width, height)
    }
}

impl<W: Write> Session for TermManager<W> {
    fn setup(&mut self) -> Result<()> {
        execute!(self.out, EnterAlternateScreen).context("failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(self.out, cursor::Hide, cursor::DisableBlinking, terminal::Clear(ClearType::All))
            .context("failed to prepare the screen")?;
        Ok(())
    }

    fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        execute!(self.out, style::ResetColor, cursor::Show, cursor::EnableBlinking)
            .context("failed to restore the cursor")?;
        execute!(self.out, LeaveAlternateScreen).context("failed to leave alternate screen")?;
        Ok(())
    }
}

impl<W: Write> TermManager<W> {
    pub fn with_writer(out: W, width: TermInt, height: TermInt) -> Result<Self> {
        check_fits(width, height)?;

        let back = Canvas::new(GRID_WIDTH as usize, GRID_HEIGHT as usize, Color::BOARD_BACKGROUND);
        Ok(TermManager {
            width,
            height,
            origin: board_origin(width, height),
            out,
            back,
            front: None,
            message: None,
        })
    }

    /// Drains every pending key press without blocking. A resize recenters
    /// the board and forces a full repaint.
    pub fn read_key_events_queue(&mut self) -> Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(1))? {
            match read()? {
                Event::Key(ev) => events.push(ev),
                Event::Resize(w, h) => self.resized(w, h)?,
                _ => {}
            }
        }

        Ok(events)
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.message.is_some() {
            self.hide_message()?;
        }

        self.message = Some(lines.iter().map(|line| line.to_string()).collect());
        self.print_message()
    }

    /// Removes the message by repainting the whole board from the last frame.
    pub fn hide_message(&mut self) -> Result<()> {
        if self.message.take().is_none() {
            return Ok(());
        }

        execute!(self.out, style::ResetColor, terminal::Clear(ClearType::All))?;
        self.repaint()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush the terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Paints the last presented frame again from scratch.
    fn repaint(&mut self) -> Result<()> {
        match self.front.take() {
            Some(shown) => {
                self.back = shown;
                self.present()
            }
            None => Ok(()),
        }
    }

    fn print_message(&mut self) -> Result<()> {
        let lines = match &self.message {
            Some(lines) => lines.clone(),
            None => return Ok(()),
        };

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        queue!(self.out, style::ResetColor)?;

        // Print the top and bottom empty lines
        let blank = " ".repeat(msg_width as usize);
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            queue!(self.out, cursor::MoveTo(top_left.0, *y), style::Print(&blank))?;
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            queue!(self.out, cursor::MoveTo(top_left.0, y), style::Print(padded_line))?;
        }

        self.flush()
    }

    /// Recenters the board, repaints the last frame and puts any message
    /// back on top of it.
    fn resized(&mut self, width: TermInt, height: TermInt) -> Result<()> {
        check_fits(width, height)?;
        self.width = width;
        self.height = height;
        self.origin = board_origin(width, height);
        execute!(self.out, style::ResetColor, terminal::Clear(ClearType::All))?;

        self.repaint()?;
        self.print_message()
    }

    fn print_tile(&mut self, col: usize, row: usize, tile: Tile) -> Result<()> {
        let x = self.origin.0 + col as TermInt * CELL_COLUMNS;
        let y = self.origin.1 + row as TermInt;

        queue!(self.out, cursor::MoveTo(x, y), style::SetBackgroundColor(term_color(tile.fill)))?;
        match tile.border {
            Some(border) => queue!(self.out, style::SetForegroundColor(term_color(border)), style::Print("[]"))?,
            None => queue!(self.out, style::Print("  "))?,
        }
        Ok(())
    }
}

impl<W: Write> Surface for TermManager<W> {
    fn clear(&mut self, color: Color) {
        self.back.clear(color);
    }

    fn fill_cell(&mut self, pos: Coords, color: Color) {
        self.back.fill_cell(pos, color);
    }

    fn outline_cell(&mut self, pos: Coords, color: Color) {
        self.back.outline_cell(pos, color);
    }

    /// Writes the tiles that changed since the last frame, then flushes once.
    fn present(&mut self) -> Result<()> {
        let front = self.front.take();

        for (col, row, tile) in changed_tiles(front.as_ref(), &self.back) {
            self.print_tile(col, row, tile)?;
        }

        queue!(self.out, style::ResetColor)?;
        self.front = Some(self.back.clone());
        self.flush()
    }
}

/// Tiles of `back` that differ from `front`, or all of them when nothing
/// has been shown yet.
fn changed_tiles(front: Option<&Canvas>, back: &Canvas) -> Vec<(usize, usize, Tile)> {
    let mut changed = vec![];

    for row in 0..back.rows() {
        for col in 0..back.cols() {
            let tile = match back.tile(col, row) {
                Some(tile) => *tile,
                None => continue,
            };
            if front.and_then(|f| f.tile(col, row)) != Some(&tile) {
                changed.push((col, row, tile));
            }
        }
    }

    changed
}

fn check_fits(width: TermInt, height: TermInt) -> Result<()> {
    if width < BOARD_COLUMNS || height < BOARD_ROWS {
        bail!(
            "terminal is {}x{}, the board needs at least {}x{}",
            width, height, BOARD_COLUMNS, BOARD_ROWS
        );
    }
    Ok(())
}

fn board_origin(width: TermInt, height: TermInt) -> (TermInt, TermInt) {
    ((width - BOARD_COLUMNS) / 2, (height - BOARD_ROWS) / 2)
}

fn term_color(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_needs_64_by_24() {
        assert!(check_fits(64, 24).is_ok());
        assert!(check_fits(63, 24).is_err());
        assert!(check_fits(80, 23).is_err());
    }

    #[test]
    fn board_is_centered() {
        assert_eq!(board_origin(64, 24), (0, 0));
        assert_eq!(board_origin(80, 30), (8, 3));
        assert_eq!(board_origin(81, 31), (8, 3));
    }

    fn board() -> Canvas {
        Canvas::new(GRID_WIDTH as usize, GRID_HEIGHT as usize, Color::BOARD_BACKGROUND)
    }

    #[test]
    fn first_frame_paints_every_tile() {
        let changed = changed_tiles(None, &board());
        assert_eq!(changed.len(), (GRID_WIDTH * GRID_HEIGHT) as usize);
    }

    #[test]
    fn identical_frames_paint_nothing() {
        let mut frame = board();
        frame.fill_cell((100, 100), Color::SNAKE);

        assert!(changed_tiles(Some(&frame.clone()), &frame).is_empty());
    }

    #[test]
    fn moved_snake_repaints_only_head_and_tail() {
        let segment = Tile { fill: Color::SNAKE, border: Some(Color::BORDER) };

        let mut before = board();
        for x in [20, 40, 60].iter() {
            before.fill_cell((*x, 0), Color::SNAKE);
            before.outline_cell((*x, 0), Color::BORDER);
        }

        let mut after = board();
        for x in [40, 60, 80].iter() {
            after.fill_cell((*x, 0), Color::SNAKE);
            after.outline_cell((*x, 0), Color::BORDER);
        }

        let changed = changed_tiles(Some(&before), &after);
        assert_eq!(changed, vec![(1, 0, Tile::blank(Color::BOARD_BACKGROUND)), (4, 0, segment)]);
    }

    #[test]
    fn present_writes_only_changed_tiles() {
        let mut term = TermManager::with_writer(Vec::new(), 64, 24).unwrap();
        term.present().unwrap();
        let full = term.out.len();

        term.out.clear();
        term.present().unwrap();
        let idle = term.out.len();

        term.out.clear();
        term.fill_cell((0, 0), Color::APPLE);
        term.present().unwrap();
        let one = term.out.len();

        assert!(idle < one, "idle frame wrote {} bytes, one tile {}", idle, one);
        assert!(one < full, "one tile wrote {} bytes, full frame {}", one, full);
    }

    #[test]
    fn resize_while_paused_keeps_board_and_message() {
        let mut term = TermManager::with_writer(Vec::new(), 80, 30).unwrap();
        term.fill_cell((320, 240), Color::SNAKE);
        term.present().unwrap();
        term.show_message(&["Paused"]).unwrap();

        term.out.clear();
        term.resized(100, 40).unwrap();
        let written = String::from_utf8_lossy(&term.out).to_string();

        assert!(written.contains("Paused"), "message not redrawn after resize");
        assert_eq!(term.origin, (18, 8));
        assert_eq!(term.front.as_ref().and_then(|f| f.tile(16, 12)).map(|t| t.fill), Some(Color::SNAKE));

        // Resuming brings the board back without the message
        term.out.clear();
        term.hide_message().unwrap();
        let written = String::from_utf8_lossy(&term.out).to_string();
        assert!(!written.contains("Paused"));
        assert!(written.contains("  "));
        assert!(term.message.is_none());
    }

    #[derive(Default)]
    struct FakeSession {
        fail_setup: bool,
        restored: bool,
        ran: bool,
    }

    impl Session for FakeSession {
        fn setup(&mut self) -> Result<()> {
            if self.fail_setup {
                bail!("raw mode unavailable");
            }
            Ok(())
        }

        fn restore(&mut self) -> Result<()> {
            self.restored = true;
            Ok(())
        }
    }

    #[test]
    fn failed_setup_still_restores() {
        let mut session = FakeSession { fail_setup: true, ..FakeSession::default() };

        let result = run_session(&mut session, |s| {
            s.ran = true;
            Ok(())
        });

        assert!(result.is_err());
        assert!(!session.ran);
        assert!(session.restored);
    }

    #[test]
    fn session_restores_after_body_error() {
        let mut session = FakeSession::default();

        let result: Result<()> = run_session(&mut session, |s| {
            s.ran = true;
            bail!("terminal went away")
        });

        assert_eq!(result.unwrap_err().to_string(), "terminal went away");
        assert!(session.ran);
        assert!(session.restored);
    }

    #[test]
    fn colors_map_to_rgb() {
        assert_eq!(term_color(Color::BORDER), style::Color::Rgb { r: 93, g: 216, b: 228 });
    }
}
