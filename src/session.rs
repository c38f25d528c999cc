//! The game loop controller: owns one game's state, its tick timer and the
//! session lifecycle, and reports to a [`Presenter`].
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{self, Collision};
use crate::config::Settings;
use crate::error::ConfigError;
use crate::food::place_food;
use crate::grid::{Board, Cell};
use crate::snake::{Direction, Snake};
use crate::timer::TickTimer;

const INITIAL_DIRECTION: Direction = Direction::Right;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Paused,
    Over,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    /// The snake covers every cell; no food can be placed.
    Won,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOver {
    pub score: u32,
    pub outcome: Outcome,
}

/// Everything a presenter needs to draw one tick.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub board: Board,
    pub snake: &'a [Cell],
    pub food: Cell,
    pub score: u32,
    pub snake_color: &'a str,
}

/// Drawing surface on the other side of the core.
pub trait Presenter {
    fn render(&mut self, frame: &Frame<'_>);

    fn game_over(&mut self, over: GameOver);
}

#[derive(Debug, Clone)]
struct Game {
    board: Board,
    snake: Snake,
    food: Cell,
    score: u32,
    speed: Duration,
    snake_color: String,
}

impl Game {
    fn frame(&self) -> Frame<'_> {
        Frame {
            board: self.board,
            snake: self.snake.body(),
            food: self.food,
            score: self.score,
            snake_color: &self.snake_color,
        }
    }
}

pub struct Session<R = StdRng> {
    settings: Settings,
    state: SessionState,
    game: Option<Game>,
    outcome: Option<Outcome>,
    timer: TickTimer,
    rng: R,
}

impl Session<StdRng> {
    pub fn new(settings: Settings) -> Self {
        Session::with_rng(settings, StdRng::from_entropy())
    }

    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        Session::with_rng(settings, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(settings: Settings, rng: R) -> Self {
        Session {
            settings,
            state: SessionState::NotStarted,
            game: None,
            outcome: None,
            timer: TickTimer::new(),
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the settings used by the next start; the current game keeps
    /// the ones it was started with.
    pub fn configure(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn score(&self) -> u32 {
        self.game.as_ref().map_or(0, |g| g.score)
    }

    pub fn board(&self) -> Option<Board> {
        self.game.as_ref().map(|g| g.board)
    }

    pub fn snake(&self) -> Option<&[Cell]> {
        self.game.as_ref().map(|g| g.snake.body())
    }

    pub fn food(&self) -> Option<Cell> {
        self.game.as_ref().map(|g| g.food)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.game.as_ref().map(|g| g.snake.direction())
    }

    pub fn frame(&self) -> Option<Frame<'_>> {
        self.game.as_ref().map(Game::frame)
    }

    /// Moves the food to `cell`, for scripted games.
    pub fn set_food(&mut self, cell: Cell) {
        if let Some(game) = &mut self.game {
            game.food = cell;
        }
    }

    pub fn request_start(&mut self) -> Result<(), ConfigError> {
        if self.state != SessionState::NotStarted {
            debug!("start ignored while {:?}", self.state);
            return Ok(());
        }
        self.begin()
    }

    /// Throws the current game away and starts a fresh one. Ignored while
    /// running.
    pub fn request_restart(&mut self) -> Result<(), ConfigError> {
        if self.state == SessionState::Running {
            debug!("restart ignored while running");
            return Ok(());
        }
        self.begin()
    }

    pub fn request_pause(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        self.timer.cancel();
        self.state = SessionState::Paused;
        info!("paused at score {}", self.score());
    }

    pub fn request_resume(&mut self) {
        if self.state != SessionState::Paused {
            return;
        }
        let Some(game) = &self.game else { return };

        self.timer.cancel();
        self.timer.arm(game.speed);
        self.state = SessionState::Running;
        info!("resumed");
    }

    pub fn request_return_to_menu(&mut self) {
        if !matches!(self.state, SessionState::Paused | SessionState::Over) {
            return;
        }
        self.timer.cancel();
        self.state = SessionState::NotStarted;
        info!("back to main menu");
    }

    pub fn request_direction(&mut self, requested: Direction) {
        if self.state != SessionState::Running {
            return;
        }
        if let Some(game) = &mut self.game {
            if game.snake.set_direction(requested) {
                debug!("turning {:?}", requested);
            }
        }
    }

    pub fn pump<P: Presenter + ?Sized>(&mut self, now: Instant, presenter: &mut P) -> bool {
        if self.timer.fire_if_due(now) {
            self.tick(presenter)
        } else {
            false
        }
    }

    /// Advances the game by one step. Returns false, doing nothing, unless
    /// the session is running.
    pub fn tick<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        let Some(game) = &mut self.game else { return false };

        let step = game.snake.advance(game.food);
        let mut board_full = false;

        if step.grew() {
            game.score += 1;
            match place_food(&game.board, game.snake.body(), &mut self.rng) {
                Some(food) => {
                    debug!("food placed at ({}, {})", food.x, food.y);
                    game.food = food;
                }
                None => board_full = true,
            }
        }

        let outcome = match collision::check(game.snake.body(), &game.board) {
            Some(collision) => Some(Outcome::Crashed(collision)),
            None if board_full => Some(Outcome::Won),
            None => None,
        };

        if let Some(outcome) = outcome {
            self.timer.cancel();
            self.state = SessionState::Over;
            self.outcome = Some(outcome);
            info!("game over ({:?}) with score {}", outcome, game.score);
            presenter.game_over(GameOver { score: game.score, outcome });
        } else {
            presenter.render(&game.frame());
        }

        true
    }

    fn begin(&mut self) -> Result<(), ConfigError> {
        self.timer.cancel();

        let board = self.settings.board().map_err(|e| {
            warn!("refusing to start: {}", e);
            e
        })?;

        let snake = Snake::new(board.center(), INITIAL_DIRECTION, board.cell_size());
        let food = place_food(&board, snake.body(), &mut self.rng).ok_or(ConfigError::BoardTooSmall {
            board_size: board.board_size(),
            cell_size: board.cell_size(),
        })?;

        self.game = Some(Game {
            board,
            snake,
            food,
            score: 0,
            speed: self.settings.game_speed,
            snake_color: self.settings.snake_color.clone(),
        });
        self.outcome = None;
        self.state = SessionState::Running;
        self.timer.arm(self.settings.game_speed);

        info!(
            "started on a {0}x{0} board, tick every {1}ms",
            board.cells_per_side(),
            self.settings.game_speed.as_millis()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(Vec<Cell>, Cell, u32)>,
        overs: Vec<GameOver>,
    }

    impl Presenter for Recorder {
        fn render(&mut self, frame: &Frame<'_>) {
            self.frames.push((frame.snake.to_vec(), frame.food, frame.score));
        }

        fn game_over(&mut self, over: GameOver) {
            self.overs.push(over);
        }
    }

    fn small() -> Settings {
        Settings { board_size: 160, cell_size: 20, ..Settings::default() }
    }

    fn running() -> Session {
        let mut session = Session::with_seed(small(), 11);
        session.request_start().unwrap();
        session
    }

    #[test]
    fn starts_centered_and_ticking() {
        let session = running();
        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.snake(), Some(&[Cell::new(80, 80)][..]));
        assert_eq!(session.direction(), Some(Direction::Right));
        assert_eq!(session.score(), 0);
        assert_ne!(session.food(), Some(Cell::new(80, 80)));
        assert_eq!(session.timer().interval(), Some(small().game_speed));
    }

    #[test]
    fn bad_board_refuses_to_start() {
        let mut session = Session::with_seed(Settings { board_size: 150, ..small() }, 1);
        assert_eq!(
            session.request_start(),
            Err(ConfigError::BoardNotDivisible { board_size: 150, cell_size: 20 })
        );
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(!session.timer().is_armed());
    }

    #[test]
    fn ticks_are_ignored_unless_running() {
        let mut session = Session::with_seed(small(), 1);
        let mut recorder = Recorder::default();
        assert!(!session.tick(&mut recorder));

        session.request_start().unwrap();
        session.request_pause();
        assert!(!session.tick(&mut recorder));
        assert!(recorder.frames.is_empty());
    }

    #[test]
    fn duplicate_start_is_a_no_op() {
        let mut session = running();
        session.set_food(Cell::new(0, 0));
        let mut recorder = Recorder::default();
        session.tick(&mut recorder);

        session.request_start().unwrap();
        session.request_restart().unwrap();
        assert_eq!(session.snake(), Some(&[Cell::new(100, 80)][..]));
    }

    #[test]
    fn pause_and_resume_keep_state() {
        let mut session = running();
        let snake = session.snake().map(<[Cell]>::to_vec);
        let food = session.food();

        session.request_pause();
        assert_eq!(session.state(), SessionState::Paused);
        assert!(!session.timer().is_armed());

        session.request_resume();
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.timer().is_armed());
        assert_eq!(session.snake().map(<[Cell]>::to_vec), snake);
        assert_eq!(session.food(), food);
        assert_eq!(session.direction(), Some(Direction::Right));
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn turns_are_ignored_while_paused() {
        let mut session = running();
        session.request_pause();
        session.request_direction(Direction::Up);
        session.request_resume();
        assert_eq!(session.direction(), Some(Direction::Right));

        session.request_direction(Direction::Up);
        assert_eq!(session.direction(), Some(Direction::Up));
    }

    #[test]
    fn hitting_the_wall_ends_the_game_once() {
        let mut session = running();
        session.set_food(Cell::new(0, 0));
        let mut recorder = Recorder::default();

        // 80 -> 100, 120, 140, then off the board
        for _ in 0..3 {
            assert!(session.tick(&mut recorder));
        }
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.tick(&mut recorder));

        assert_eq!(session.state(), SessionState::Over);
        assert!(!session.timer().is_armed());
        assert_eq!(recorder.frames.len(), 3);
        assert_eq!(
            recorder.overs,
            vec![GameOver { score: 0, outcome: Outcome::Crashed(Collision::Wall) }]
        );

        assert!(!session.tick(&mut recorder));
        assert_eq!(recorder.overs.len(), 1);
    }

    #[test]
    fn menu_then_start_applies_new_settings() {
        let mut session = running();
        session.request_pause();
        session.configure(Settings { board_size: 200, game_speed: Duration::from_millis(250), ..small() });

        // Game in progress keeps its board
        assert_eq!(session.board().map(|b| b.board_size()), Some(160));

        session.request_return_to_menu();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(!session.timer().is_armed());

        session.request_start().unwrap();
        assert_eq!(session.board().map(|b| b.board_size()), Some(200));
        assert_eq!(session.snake(), Some(&[Cell::new(100, 100)][..]));
        assert_eq!(session.timer().interval(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn return_to_menu_is_ignored_while_running() {
        let mut session = running();
        session.request_return_to_menu();
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn pump_follows_the_timer() {
        let mut session = running();
        session.set_food(Cell::new(0, 0));
        let mut recorder = Recorder::default();

        assert!(!session.pump(Instant::now(), &mut recorder));
        let later = Instant::now() + small().game_speed * 2;
        assert!(session.pump(later, &mut recorder));
        assert_eq!(recorder.frames.len(), 1);
    }

    #[test]
    fn filling_the_board_wins() {
        // 2x2 board: snake of three cells about to eat the last free cell
        let settings = Settings { board_size: 40, cell_size: 20, ..Settings::default() };
        let mut session = Session::with_seed(settings, 5);
        session.request_start().unwrap();
        let mut recorder = Recorder::default();

        // Start at (20, 20) heading right: eat the way around the board
        session.request_direction(Direction::Up);
        session.set_food(Cell::new(20, 0));
        session.tick(&mut recorder);
        session.request_direction(Direction::Left);
        session.set_food(Cell::new(0, 0));
        session.tick(&mut recorder);
        session.request_direction(Direction::Down);
        session.set_food(Cell::new(0, 20));
        session.tick(&mut recorder);

        assert_eq!(session.state(), SessionState::Over);
        assert_eq!(recorder.overs, vec![GameOver { score: 3, outcome: Outcome::Won }]);
    }

    #[test]
    fn restart_from_pause_starts_fresh() {
        let mut session = running();
        session.set_food(Cell::new(100, 80));
        let mut recorder = Recorder::default();
        session.tick(&mut recorder);
        session.request_direction(Direction::Down);
        session.set_food(Cell::new(0, 0));
        session.tick(&mut recorder);
        assert_eq!(session.score(), 1);

        session.request_pause();
        session.request_restart().unwrap();

        assert_eq!(session.state(), SessionState::Running);
        assert_eq!(session.timer().interval(), Some(small().game_speed));
        assert_eq!(session.snake(), Some(&[Cell::new(80, 80)][..]));
        assert_eq!(session.direction(), Some(Direction::Right));
        assert_eq!(session.score(), 0);
        assert_eq!(session.outcome(), None);
    }
}
