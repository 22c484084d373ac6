use crate::app::{App, ScreenState};
use crate::stats::format_time;
use crate::theme::{region_color, Theme};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use queens_core::{CellMark, Position};
use std::io;

/// Cell geometry: 4 columns per cell (border + 3 content), 2 rows per cell
/// (border + content). `App::cell_at` relies on these.
const CELL_W: u16 = 4;
const CELL_H: u16 = 2;

pub fn render(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(
        stdout,
        Hide,
        SetBackgroundColor(app.theme.bg),
        Clear(ClearType::All)
    )?;

    match app.screen_state {
        ScreenState::Stats => render_stats_screen(stdout, app, term_width)?,
        ScreenState::Playing => render_game_screen(stdout, app, term_width, term_height)?,
        ScreenState::Win => {
            render_game_screen(stdout, app, term_width, term_height)?;
            render_win_overlay(stdout, app, term_width, term_height)?;
        }
    }

    execute!(stdout, ResetColor, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &mut App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let grid_width = app.game.width() as u16 * CELL_W + 1;
    let grid_height = app.game.height() as u16 * CELL_H + 1;

    // Center the grid, leaving room for the info panel on the right
    let total_width = grid_width + 28;
    let grid_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let grid_y = if term_height > grid_height + 5 { 2 } else { 0 };
    app.grid_origin = (grid_x, grid_y);

    render_grid(stdout, app, grid_x, grid_y)?;
    render_info_panel(stdout, app, grid_x + grid_width + 3, grid_y)?;
    render_controls(stdout, app, grid_x, grid_y + grid_height + 1)?;

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, grid_x, grid_y + grid_height + 4)?;
    }
    Ok(())
}

/// Whether the edge between two cells (or a cell and the outside) separates
/// regions, which gets the emphasized border color.
fn region_edge(app: &App, a: Option<Position>, b: Option<Position>) -> bool {
    let matrix = app.game.regions();
    match (a, b) {
        (Some(a), Some(b)) => matrix.region_at(a) != matrix.region_at(b),
        _ => true, // outer edge
    }
}

fn border_color(theme: &Theme, edge: bool) -> Color {
    if edge {
        theme.region_border
    } else {
        theme.border
    }
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let width = app.game.width();
    let height = app.game.height();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    // Horizontal border lines, one above each cell row plus the bottom edge
    for border_row in 0..=height {
        execute!(stdout, MoveTo(x, y + border_row as u16 * CELL_H))?;
        for col in 0..width {
            let above = border_row
                .checked_sub(1)
                .map(|row| Position::new(col, row));
            let below = (border_row < height).then(|| Position::new(col, border_row));
            let edge = region_edge(app, above, below);
            let segment = if edge { "===" } else { "---" };
            execute!(
                stdout,
                SetForegroundColor(border_color(theme, edge)),
                Print("+"),
                Print(segment)
            )?;
        }
        execute!(stdout, Print("+"))?;
    }

    // Cell rows with vertical borders
    for row in 0..height {
        let cell_y = y + row as u16 * CELL_H + 1;
        execute!(stdout, MoveTo(x, cell_y))?;
        for col in 0..width {
            let left = col.checked_sub(1).map(|c| Position::new(c, row));
            let here = Position::new(col, row);
            let edge = region_edge(app, left, Some(here));
            execute!(
                stdout,
                SetBackgroundColor(theme.bg),
                SetForegroundColor(border_color(theme, edge)),
                Print("|")
            )?;
            render_cell(stdout, app, here)?;
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.region_border),
            Print("|")
        )?;
    }
    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;
    let fill = region_color(app.game.regions().region_at(pos));

    let (glyph, glyph_color) = match app.game.board().mark(pos) {
        Some(CellMark::Crown) => ('\u{265B}', theme.crown),
        Some(CellMark::Excluded) => ('x', theme.excluded),
        None => (' ', theme.crown),
    };

    let is_cursor = app.cursor == pos && app.screen_state == ScreenState::Playing;
    let (open, close) = if is_cursor { ('[', ']') } else { (' ', ' ') };

    execute!(
        stdout,
        SetBackgroundColor(fill),
        SetForegroundColor(glyph_color),
        Print(format!("{}{}{}", open, glyph, close))
    )?;
    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let game = &app.game;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("QUEENS"),
        MoveTo(x, y + 2),
        SetForegroundColor(theme.fg),
        Print(format!("Size    {}x{}", game.width(), game.height())),
        MoveTo(x, y + 3),
        Print(format!("Time    {}", format_time(game.elapsed().as_secs()))),
        MoveTo(x, y + 4),
        Print(format!(
            "Crowns  {}/{}",
            game.board().crown_count(),
            game.regions().region_count()
        )),
        MoveTo(x, y + 5),
        Print(format!("Hints   {}", game.hints_used())),
    )?;

    if game.attempts_taken() > 0 {
        execute!(
            stdout,
            MoveTo(x, y + 7),
            SetForegroundColor(theme.info),
            Print(format!("generated in {} tries", game.attempts_taken()))
        )?;
    }

    if game.is_completed() {
        execute!(
            stdout,
            MoveTo(x, y + 9),
            SetForegroundColor(theme.success),
            Print("Solved!")
        )?;
    }
    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let lines = [
        "arrows/wasd move  space cycle  x clear  c check",
        "u count  h hint  o solve  r reset  n new  t theme  v stats  q quit",
    ];
    execute!(stdout, SetBackgroundColor(theme.bg))?;
    for (index, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + index as u16),
            SetForegroundColor(theme.info),
            Print(line)
        )?;
    }
    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let color = if msg.starts_with("Invalid") || msg.starts_with("Not solved") {
        theme.error
    } else {
        theme.key
    };
    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, y),
        SetForegroundColor(color),
        Print(msg)
    )?;
    Ok(())
}

fn render_win_overlay(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let time = format_time(app.game.elapsed().as_secs());
    let headline = if app.game.was_assisted() {
        format!("Solved (with help) in {}", time)
    } else {
        format!("Solved in {}!", time)
    };
    let footer = "n new puzzle   v stats   q quit";

    let box_width = (headline.len().max(footer.len()) + 6) as u16;
    let box_x = term_width.saturating_sub(box_width) / 2;
    let box_y = term_height / 2;

    let border: String = "=".repeat(box_width as usize);
    let pad = |s: &str| {
        let inner = box_width as usize - 2;
        format!("|{:^inner$}|", s)
    };

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.success),
        MoveTo(box_x, box_y),
        Print(&border),
        MoveTo(box_x, box_y + 1),
        Print(pad(&headline)),
        MoveTo(box_x, box_y + 2),
        SetForegroundColor(theme.info),
        Print(pad(footer)),
        MoveTo(box_x, box_y + 3),
        SetForegroundColor(theme.success),
        Print(&border),
    )?;
    Ok(())
}

fn render_stats_screen(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let stats = &app.stats.stats;
    let x = term_width.saturating_sub(52) / 2;

    execute!(
        stdout,
        SetBackgroundColor(theme.bg),
        MoveTo(x, 2),
        SetForegroundColor(theme.key),
        Print("STATISTICS"),
        MoveTo(x, 4),
        SetForegroundColor(theme.fg),
        Print(format!(
            "Games {}   Solved {}",
            stats.total_games, stats.total_solved
        )),
    )?;

    let mut row = 6;
    execute!(
        stdout,
        MoveTo(x, row),
        SetForegroundColor(theme.info),
        Print(format!(
            "{:<6} {:>6} {:>7} {:>7} {:>7}",
            "size", "games", "solved", "best", "avg"
        ))
    )?;
    row += 1;

    for size in app.stats.sizes() {
        let entry = &stats.by_size[size];
        let best = entry.best_time_secs.map_or("-".to_string(), format_time);
        let avg = entry.avg_time_secs().map_or("-".to_string(), format_time);
        execute!(
            stdout,
            MoveTo(x, row),
            SetForegroundColor(theme.fg),
            Print(format!(
                "{:<6} {:>6} {:>7} {:>7} {:>7}",
                size, entry.games, entry.solved, best, avg
            ))
        )?;
        row += 1;
    }

    execute!(
        stdout,
        MoveTo(x, row + 2),
        SetForegroundColor(theme.info),
        Print("q/esc back")
    )?;
    Ok(())
}
