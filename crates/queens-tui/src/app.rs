use crate::game::{Game, NewGameError};
use crate::stats::StatsManager;
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use queens_core::Position;
use std::path::PathBuf;
use std::time::Duration;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// Normal gameplay
    Playing,
    /// Solved overlay
    Win,
    /// Statistics screen
    Stats,
}

/// Generation settings carried across regenerations
pub struct GenSettings {
    pub size: usize,
    pub max_attempts: usize,
    /// Seed for the first board only; later boards draw fresh entropy
    pub seed: Option<u64>,
    /// Where accepted puzzles and the active hand-off file are persisted
    pub out_dir: Option<PathBuf>,
}

/// The main application state
pub struct App {
    /// Current game (replaced wholesale on regeneration)
    pub game: Game,
    /// Currently selected cell
    pub cursor: Position,
    /// Color theme
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Current screen state
    pub screen_state: ScreenState,
    /// Statistics manager
    pub stats: StatsManager,
    /// Whether the current game's outcome was recorded
    game_recorded: bool,
    /// Generation settings for the `n` action
    gen: GenSettings,
    /// Top-left grid cell of the last rendered frame (for mouse mapping)
    pub grid_origin: (u16, u16),
}

impl App {
    pub fn new(game: Game, gen: GenSettings) -> Self {
        let mut stats = StatsManager::load();
        stats.record_started(game.width());
        Self {
            game,
            cursor: Position::new(0, 0),
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            stats,
            game_recorded: false,
            gen,
            grid_origin: (0, 0),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(100)
    }

    /// Update the message timer (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Win => self.handle_win_key(key),
            ScreenState::Stats => self.handle_stats_key(key),
            ScreenState::Playing => self.handle_game_key(key),
        }
    }

    fn handle_win_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,
            KeyCode::Char('n') | KeyCode::Enter | KeyCode::Char(' ') => self.new_board(),
            KeyCode::Char('v') => self.screen_state = ScreenState::Stats,
            KeyCode::Esc => {
                // Back to the (finished) board view
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_stats_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('v') | KeyCode::Esc => {
                self.screen_state = if self.game.is_completed() {
                    ScreenState::Win
                } else {
                    ScreenState::Playing
                };
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            // Navigation
            KeyCode::Up | KeyCode::Char('w') => self.move_cursor(0, -1),
            KeyCode::Down | KeyCode::Char('s') => self.move_cursor(0, 1),
            KeyCode::Left | KeyCode::Char('a') => self.move_cursor(-1, 0),
            KeyCode::Right | KeyCode::Char('d') => self.move_cursor(1, 0),

            // Cycle the selected cell: empty -> excluded -> crown -> empty
            KeyCode::Enter | KeyCode::Char(' ') => self.cycle_cell(self.cursor),

            // Clear the selected cell
            KeyCode::Char('x') | KeyCode::Delete | KeyCode::Backspace => {
                self.game.clear_cell(self.cursor);
            }

            // Check the current board
            KeyCode::Char('c') => {
                let status = self.game.check();
                if status.is_complete() {
                    self.finish_game();
                } else {
                    self.show_message(&format!("Not solved yet: {}", status));
                }
            }

            // Count solutions exhaustively
            KeyCode::Char('u') => {
                let count = self.game.count_all_solutions();
                self.show_message(&format!(
                    "This board has exactly {} solution{}",
                    count,
                    if count == 1 { "" } else { "s" }
                ));
            }

            // Auto-solve from the unique solution
            KeyCode::Char('o') => {
                self.game.apply_solution();
                self.show_message("Board filled from the solution");
                self.finish_game();
            }

            // Reveal one correct crown
            KeyCode::Char('h') => {
                if let Some(crown) = self.game.hint() {
                    self.cursor = crown;
                    self.show_message(&format!("Hint: crown at {}", crown));
                    if self.game.is_completed() {
                        self.finish_game();
                    }
                } else {
                    self.show_message("No hint available");
                }
            }

            // Reset the board
            KeyCode::Char('r') => {
                self.game.reset();
                self.show_message("Board cleared");
            }

            // Generate a new board
            KeyCode::Char('n') => self.new_board(),

            // Cycle theme
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                self.show_message(&format!("Theme: {}", self.theme.name));
            }

            // Stats screen
            KeyCode::Char('v') => self.screen_state = ScreenState::Stats,

            _ => {}
        }
        AppAction::Continue
    }

    /// Handle a mouse event: left click cycles a cell, right click clears it
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen_state != ScreenState::Playing {
            return;
        }
        let button = match mouse.kind {
            MouseEventKind::Down(button) => button,
            _ => return,
        };
        let Some(pos) = self.cell_at(mouse.column, mouse.row) else {
            return;
        };
        self.cursor = pos;
        match button {
            MouseButton::Left => self.cycle_cell(pos),
            MouseButton::Right => self.game.clear_cell(pos),
            MouseButton::Middle => {}
        }
    }

    /// Map terminal coordinates to a grid cell using the last rendered
    /// layout: cells are 4 columns wide and 2 rows tall, offset one border
    /// char from the grid origin.
    fn cell_at(&self, column: u16, row: u16) -> Option<Position> {
        let (origin_x, origin_y) = self.grid_origin;
        let rel_x = column.checked_sub(origin_x)?;
        let rel_y = row.checked_sub(origin_y)?;
        if rel_x % 4 == 0 || rel_y % 2 == 0 {
            return None; // border
        }
        let pos = Position::new(usize::from(rel_x / 4), usize::from(rel_y / 2));
        (pos.x < self.game.width() && pos.y < self.game.height()).then_some(pos)
    }

    fn cycle_cell(&mut self, pos: Position) {
        match self.game.cycle_cell(pos) {
            Ok(_) => {
                if self.game.is_completed() {
                    self.finish_game();
                }
            }
            Err(violation) => self.show_message(&format!("Invalid placement: {}", violation)),
        }
    }

    fn move_cursor(&mut self, dx: isize, dy: isize) {
        let x = self.cursor.x.saturating_add_signed(dx).min(self.game.width() - 1);
        let y = self
            .cursor
            .y
            .saturating_add_signed(dy)
            .min(self.game.height() - 1);
        self.cursor = Position::new(x, y);
    }

    fn finish_game(&mut self) {
        if !self.game_recorded {
            self.game_recorded = true;
            self.stats.record_solved(
                self.game.width(),
                self.game.elapsed().as_secs(),
                self.game.hints_used(),
                self.game.was_assisted(),
            );
        }
        self.screen_state = ScreenState::Win;
    }

    fn new_board(&mut self) {
        let seed = self.gen.seed.take();
        match Game::generate(
            self.gen.size,
            self.gen.max_attempts,
            seed,
            self.gen.out_dir.as_deref(),
        ) {
            Ok(game) => {
                self.game = game;
                self.cursor = Position::new(0, 0);
                self.game_recorded = false;
                self.screen_state = ScreenState::Playing;
                self.stats.record_started(self.gen.size);
                self.show_message(&format!(
                    "New {0}x{0} puzzle ({1} attempts)",
                    self.gen.size,
                    self.game.attempts_taken()
                ));
            }
            Err(err @ NewGameError::NoUniquePuzzle { .. }) => {
                // Keep the current board; generation failure is non-fatal
                self.show_message(&err.to_string());
            }
            Err(err) => self.show_message(&format!("Generation failed: {}", err)),
        }
    }
}
