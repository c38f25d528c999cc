use std::time::{Duration, Instant};

use crate::term::{Coords, Glyph, TermInt, TermManager};
use grid_snake::color::{self, Rgb};
use grid_snake::session::{Frame, GameOver, Outcome, Presenter, Session, SessionState};
use grid_snake::{Board, Cell, Direction, Settings};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Color;
use crossterm::{ErrorKind, Result};
use log::{info, warn};

const IDLE_POLL: Duration = Duration::from_millis(100);
const SPEED_STEP: Duration = Duration::from_millis(10);
const MIN_SPEED: Duration = Duration::from_millis(10);
const MAX_SPEED: Duration = Duration::from_millis(1000);
const HEAD_DARKEN_PERCENT: u8 = 20;

const SNAKE_CHAR: char = '█';
const FOOD_CHAR: char = '●';
const DEAD_SNAKE_CHAR: char = 'X';
const FOOD_COLOR: Color = Color::Red;
const FALLBACK_SNAKE_COLOR: Color = Color::Green;

/// Colours offered on the main menu.
const PALETTE: &[&str] = &["#4caf50", "#2196f3", "#ffeb3b", "#e91e63", "#ffffff"];

/// Terminal columns per grid cell, so cells look roughly square.
const CELL_COLUMNS: TermInt = 2;

enum Flow {
    Continue,
    Quit,
}

/// Where the board sits on the terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Layout {
    board: Board,
    top_left: Coords,
}

impl Layout {
    /// Terminal columns and rows the board needs, `None` if beyond any
    /// terminal.
    fn size_for(board: &Board) -> Option<Coords> {
        let side = TermInt::try_from(board.cells_per_side()).ok()?;
        // Border on each side plus a score line underneath
        let width = side.checked_mul(CELL_COLUMNS)?.checked_add(2)?;
        let height = side.checked_add(3)?;
        Some((width, height))
    }

    fn fit(board: Board, term_size: Coords) -> Option<Self> {
        let (w, h) = Layout::size_for(&board)?;
        if w > term_size.0 || h > term_size.1 {
            return None;
        }
        Some(Layout { board, top_left: ((term_size.0 - w) / 2, (term_size.1 - h) / 2) })
    }

    fn border_size(&self) -> Coords {
        // fit() already proved the size is representable
        let (w, h) = Layout::size_for(&self.board).unwrap_or((0, 1));
        (w, h - 1)
    }

    fn cell_origin(&self, cell: Cell) -> Option<Coords> {
        let (col, row) = self.board.index_of(cell);
        let col = TermInt::try_from(col).ok()?;
        let row = TermInt::try_from(row).ok()?;
        let x = col.checked_mul(CELL_COLUMNS)?.checked_add(self.top_left.0 + 1)?;
        let y = row.checked_add(self.top_left.1 + 1)?;
        Some((x, y))
    }

    fn score_line(&self) -> Coords {
        (self.top_left.0, self.top_left.1 + self.border_size().1)
    }
}

/// Draws sessions onto the terminal.
pub struct BoardView {
    term: TermManager,
    layout: Option<Layout>,
    drawn: Vec<Cell>,
    error: Option<ErrorKind>,
}

impl BoardView {
    fn new(term: TermManager) -> Self {
        BoardView { term, layout: None, drawn: vec![], error: None }
    }

    fn take_error(&mut self) -> Result<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn record(&mut self, res: Result<()>) {
        if let Err(e) = res {
            self.error.get_or_insert(e);
        }
    }

    /// Clears the screen and draws an empty board for `board`.
    fn prepare(&mut self, board: Board) -> Result<bool> {
        let layout = match Layout::fit(board, self.term.get_terminal_size()) {
            Some(layout) => layout,
            None => return Ok(false),
        };

        self.term.clear()?;
        self.term.draw_borders(layout.top_left, layout.border_size())?;
        self.layout = Some(layout);
        self.drawn.clear();
        Ok(true)
    }

    fn paint_cell(&mut self, cell: Cell, glyph: Glyph) -> Result<()> {
        let layout = match self.layout {
            Some(layout) if layout.board.contains(cell) => layout,
            _ => return Ok(()),
        };
        let (x, y) = match layout.cell_origin(cell) {
            Some(origin) => origin,
            None => return Ok(()),
        };
        for dx in 0..CELL_COLUMNS {
            self.term.print_at((x + dx, y), glyph)?;
        }
        Ok(())
    }

    fn draw_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        for cell in std::mem::take(&mut self.drawn) {
            self.paint_cell(cell, Glyph::BLANK)?;
        }

        let (body, head) = snake_colors(frame.snake_color);
        for (i, cell) in frame.snake.iter().enumerate().rev() {
            let color = if i == 0 { head } else { body };
            self.paint_cell(*cell, Glyph::colored(SNAKE_CHAR, color))?;
        }
        self.paint_cell(frame.food, Glyph::colored(FOOD_CHAR, FOOD_COLOR))?;

        self.drawn.extend_from_slice(frame.snake);
        self.drawn.push(frame.food);

        if let Some(layout) = self.layout {
            let width = layout.border_size().0 as usize;
            let line = format!("{:<width$}", format!("Score: {}", frame.score), width = width);
            self.term.print_text(layout.score_line(), &line)?;
        }

        self.term.flush()
    }

    fn draw_game_over(&mut self, over: GameOver) -> Result<()> {
        if let Outcome::Crashed(_) = over.outcome {
            for cell in self.drawn.clone() {
                self.paint_cell(cell, Glyph::plain(DEAD_SNAKE_CHAR))?;
            }
        }

        let title = if over.outcome == Outcome::Won {"You won!"} else {"Game over!"};
        self.term.show_message(&[
            title,
            &format!("Final score: {}", over.score),
            "",
            "R to play again",
            "M for the main menu",
            "CTRL+C to quit",
        ])
    }
}

impl Presenter for BoardView {
    fn render(&mut self, frame: &Frame<'_>) {
        let res = self.draw_frame(frame);
        self.record(res);
    }

    fn game_over(&mut self, over: GameOver) {
        let res = self.draw_game_over(over);
        self.record(res);
    }
}

pub struct SnakeGame {
    session: Session,
    view: BoardView,
}

impl SnakeGame {
    pub fn new(settings: Settings, seed: Option<u64>) -> Result<Self> {
        let session = match seed {
            Some(seed) => Session::with_seed(settings, seed),
            None => Session::new(settings),
        };
        Ok(SnakeGame { session, view: BoardView::new(TermManager::new()?) })
    }

    pub fn setup(&mut self) -> Result<()> {
        self.view.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.view.term.restore()
    }

    pub fn run(&mut self) -> Result<()> {
        self.show_main_menu()?;

        loop {
            let timeout = self.session.timer().remaining(Instant::now()).map_or(IDLE_POLL, |t| t.min(IDLE_POLL));

            for key_ev in self.view.term.read_key_events(timeout)? {
                if let Flow::Quit = self.handle_key(&key_ev)? {
                    info!("quitting");
                    return Ok(());
                }
            }

            self.session.pump(Instant::now(), &mut self.view);
            self.view.take_error()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, ev: &KeyEvent) -> Result<Flow> {
        if is_ctrl_c(ev) {
            return Ok(Flow::Quit);
        }

        match self.session.state() {
            SessionState::NotStarted => self.handle_menu_key(ev.code)?,
            SessionState::Running => match ev.code {
                KeyCode::Esc => self.pause()?,
                code => {
                    if let Some(dir) = direction_for(code) {
                        self.session.request_direction(dir);
                    }
                }
            },
            SessionState::Paused => match ev.code {
                KeyCode::Esc => self.resume()?,
                KeyCode::Char('r') => self.start(true)?,
                KeyCode::Char('m') => self.return_to_menu()?,
                _ => {}
            },
            SessionState::Over => match ev.code {
                KeyCode::Char('r') => self.start(true)?,
                KeyCode::Char('m') => self.return_to_menu()?,
                _ => {}
            },
        }

        Ok(Flow::Continue)
    }

    fn handle_menu_key(&mut self, code: KeyCode) -> Result<()> {
        let mut settings = self.session.settings().clone();

        match code {
            KeyCode::Char('+') | KeyCode::Char('=') => {
                settings.game_speed = settings.game_speed.saturating_sub(SPEED_STEP).max(MIN_SPEED);
            }
            KeyCode::Char('-') => {
                settings.game_speed = (settings.game_speed + SPEED_STEP).min(MAX_SPEED);
            }
            KeyCode::Char('[') => {
                settings.board_size = (settings.board_size - settings.cell_size).max(settings.cell_size * 2);
            }
            KeyCode::Char(']') => settings.board_size += settings.cell_size,
            KeyCode::Char('c') => {
                let next = PALETTE
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(&settings.snake_color))
                    .map_or(0, |i| (i + 1) % PALETTE.len());
                settings.snake_color = PALETTE[next].to_string();
            }
            _ => return self.start(false),
        }

        self.session.configure(settings);
        self.show_main_menu()
    }

    fn start(&mut self, restart: bool) -> Result<()> {
        let pending = match self.session.settings().board() {
            Ok(board) => board,
            Err(e) => return self.show_menu_error(&e.to_string()),
        };

        if !self.view.prepare(pending)? {
            let reason = match Layout::size_for(&pending) {
                Some((w, h)) => format!("Terminal must be at least {}x{}", w, h),
                None => "Board is too large for any terminal".to_string(),
            };
            return self.show_menu_error(&reason);
        }

        let res = if restart {
            self.session.request_restart()
        } else {
            self.session.request_start()
        };
        if let Err(e) = res {
            return self.show_menu_error(&e.to_string());
        }

        if let Some(frame) = self.session.frame() {
            self.view.draw_frame(&frame)?;
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.session.request_pause();
        self.view.term.show_message(&[
            "Paused",
            "Esc to resume",
            "R to restart",
            "M for the main menu",
            "CTRL+C to quit",
        ])
    }

    fn resume(&mut self) -> Result<()> {
        self.view.term.hide_message()?;
        self.session.request_resume();
        Ok(())
    }

    fn return_to_menu(&mut self) -> Result<()> {
        self.session.request_return_to_menu();
        self.show_main_menu()
    }

    fn show_main_menu(&mut self) -> Result<()> {
        self.view.term.clear()?;
        self.view.layout = None;

        let settings = self.session.settings();
        let speed = format!("Speed: {}ms per step  (+/-)", settings.game_speed.as_millis());
        let size = format!("Board: {0}px, {1}x{1} cells  ([/])", settings.board_size, cells_label(settings));
        let color = format!("Snake colour: {}  (c)", settings.snake_color);

        self.view.term.show_message(&[
            "SNAKE",
            "",
            &speed,
            &size,
            &color,
            "",
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any other key to begin",
        ])
    }

    fn show_menu_error(&mut self, reason: &str) -> Result<()> {
        warn!("cannot start: {}", reason);
        self.view.term.clear()?;
        self.view.layout = None;
        self.view.term.show_message(&[
            "Cannot start",
            reason,
            "",
            "Adjust the settings and press any key",
        ])
    }
}

fn cells_label(settings: &Settings) -> String {
    match settings.board() {
        Ok(board) => board.cells_per_side().to_string(),
        Err(_) => "?".to_string(),
    }
}

fn snake_colors(hex: &str) -> (Color, Color) {
    match color::parse_hex(hex) {
        Ok(rgb) => (to_color(rgb), to_color(color::darken(rgb, HEAD_DARKEN_PERCENT))),
        Err(e) => {
            warn!("{}, drawing the snake in the default colour", e);
            (FALLBACK_SNAKE_COLOR, Color::DarkGreen)
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Char('w') | KeyCode::Up => Some(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
