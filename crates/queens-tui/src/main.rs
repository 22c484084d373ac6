mod app;
mod game;
mod render;
mod stats;
mod theme;

use app::{App, AppAction, GenSettings};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Game, NewGameError};
use queens_core::{Generator, GeneratorConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// One-crown-per-row/column/region puzzles in the terminal
#[derive(Debug, Parser)]
#[command(name = "queens")]
struct Args {
    /// Board size (5-9)
    #[arg(short, long, default_value_t = 7)]
    size: usize,

    /// Partition attempts before giving up on a unique puzzle
    #[arg(long, default_value_t = 5000)]
    attempts: usize,

    /// RNG seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Play a previously saved active puzzle file instead of generating
    #[arg(long)]
    puzzle: Option<PathBuf>,

    /// Generate puzzles into the output directory and exit without a UI
    #[arg(long)]
    generate_only: bool,

    /// Number of puzzles to collect with --generate-only
    #[arg(long, default_value_t = 1)]
    want: usize,

    /// Directory for generated puzzle files
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // The 5-9 bound is this consumer's choice; the core is not limited to it
    if !(5..=9).contains(&args.size) {
        eprintln!("board size must be between 5 and 9, got {}", args.size);
        return ExitCode::FAILURE;
    }

    if args.generate_only {
        return generate_only(&args);
    }

    let game = match new_game(&args) {
        Ok(game) => game,
        Err(NewGameError::NoUniquePuzzle { attempts }) => {
            // Non-fatal by design: report and leave quietly
            println!("No unique-solution puzzle found after {} attempts.", attempts);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = App::new(
        game,
        GenSettings {
            size: args.size,
            max_attempts: args.attempts,
            seed: args.seed,
            out_dir: args.puzzle.is_none().then(|| args.out.clone()),
        },
    );

    match run_terminal(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Batch generation without a UI
fn generate_only(args: &Args) -> ExitCode {
    let config = GeneratorConfig {
        max_attempts: args.attempts,
        want: args.want,
    };
    let mut generator = match args.seed {
        Some(seed) => Generator::with_config_and_seed(config, seed),
        None => Generator::with_config(config),
    };

    let start = Instant::now();
    let report = match generator.find_unique_and_save(args.size, args.size, &args.out) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if report.is_empty() {
        println!(
            "No unique-solution puzzle found after {} attempts.",
            report.attempts
        );
    } else {
        println!(
            "Saved {} puzzle(s) to {} after {} attempts ({:.2}s).",
            report.found(),
            args.out.display(),
            report.attempts,
            start.elapsed().as_secs_f64()
        );
    }
    ExitCode::SUCCESS
}

fn new_game(args: &Args) -> Result<Game, NewGameError> {
    match &args.puzzle {
        Some(path) => {
            let matrix = queens_core::load_active_puzzle(path)
                .map_err(|e| NewGameError::Core(e.to_string()))?;
            Game::from_matrix(matrix)
        }
        None => {
            println!("Generating a {0}x{0} puzzle...", args.size);
            Game::generate(args.size, args.attempts, args.seed, Some(&args.out))
        }
    }
}

fn run_terminal(app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let result = run_app(&mut stdout, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    result
}

fn run_app(stdout: &mut io::Stdout, mut app: App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        render::render(stdout, &mut app)?;
        stdout.flush()?;

        let tick_rate = app.tick_rate();
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    match app.handle_key(key) {
                        AppAction::Continue => {}
                        AppAction::Quit => break,
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
