use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use fifteen_puzzle::{
    Cell, Direction, EngineConfig, GameSession, MoveResult, Puzzle, Settled, WinCondition, SIZE,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Screen row of the first board line.
const BOARD_TOP: u16 = 2;
/// Terminal columns taken by one rendered tile.
const CELL_WIDTH: u16 = 3;

const HELP: &str = "Arrows or click a tile to move, n: new game, q: quit";
const VICTORY: &str = "You have won this game. Congratulations!";

#[derive(Parser, Debug)]
struct Args {
    /// Path to the engine configuration file.
    #[arg(long, default_value = "puzzle.toml")]
    config: PathBuf,
    /// Seed for reproducible shuffles; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Require the empty slot in the last cell to win.
    #[arg(long)]
    classic: bool,
    /// Tracing filter, e.g. "info", "debug". Logs go to stderr.
    #[arg(long, default_value = "warn")]
    log: String,
}

enum Trigger {
    Direction(Direction),
    Cell(Cell),
}

enum Input {
    Move(Trigger),
    NewGame,
    Quit,
    Ignore,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = EngineConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if args.classic {
        config.win_condition = WinCondition::Classic;
    }
    info!(?config, "starting");

    let mut session = GameSession::new(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

    let res = play(&mut stdout, &mut session, config.settle_delay());

    // Restore terminal on every exit path
    let _ = disable_raw_mode();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, Show);

    res
}

fn play(out: &mut Stdout, session: &mut GameSession, settle_delay: Duration) -> Result<()> {
    let mut status = HELP;

    loop {
        draw(out, session.puzzle(), status)?;

        match read_input(event::read()?) {
            Input::Quit => return Ok(()),
            Input::NewGame => {
                session.new_game();
                status = HELP;
            }
            Input::Move(trigger) => {
                if !attempt(session, trigger).accepted {
                    continue;
                }
                draw(out, session.puzzle(), status)?;

                if wait_for_settle(session, settle_delay)? {
                    return Ok(());
                }
                match session.settle() {
                    Settled::Won => {
                        status = VICTORY;
                        session.new_game();
                    }
                    Settled::Continue | Settled::Idle => status = HELP,
                }
            }
            Input::Ignore => {}
        }
    }
}

/// Sits out the settle delay. Moves arriving meanwhile reach the session,
/// which drops them. Returns `true` if the player quit.
fn wait_for_settle(session: &mut GameSession, settle_delay: Duration) -> io::Result<bool> {
    let deadline = Instant::now() + settle_delay;

    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        if event::poll(deadline - now)? {
            match read_input(event::read()?) {
                Input::Move(trigger) => {
                    attempt(session, trigger);
                }
                Input::Quit => return Ok(true),
                Input::NewGame | Input::Ignore => {}
            }
        }
    }
}

fn attempt(session: &mut GameSession, trigger: Trigger) -> MoveResult {
    match trigger {
        Trigger::Direction(direction) => session.attempt_move_by_direction(direction),
        Trigger::Cell(cell) => session.attempt_move_by_cell(cell),
    }
}

fn read_input(event: Event) -> Input {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
            KeyCode::Left => Input::Move(Trigger::Direction(Direction::Left)),
            KeyCode::Right => Input::Move(Trigger::Direction(Direction::Right)),
            KeyCode::Up => Input::Move(Trigger::Direction(Direction::Up)),
            KeyCode::Down => Input::Move(Trigger::Direction(Direction::Down)),
            KeyCode::Char('n') => Input::NewGame,
            KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
            _ => Input::Ignore,
        },
        Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
            match clicked_cell(mouse.column, mouse.row) {
                Some(cell) => Input::Move(Trigger::Cell(cell)),
                None => Input::Ignore,
            }
        }
        _ => Input::Ignore,
    }
}

fn clicked_cell(column: u16, row: u16) -> Option<Cell> {
    let size = SIZE as u16;
    if row < BOARD_TOP || row >= BOARD_TOP + size || column >= size * CELL_WIDTH {
        return None;
    }
    Some(Cell::new(
        (row - BOARD_TOP) as usize,
        (column / CELL_WIDTH) as usize,
    ))
}

fn draw(out: &mut Stdout, puzzle: &Puzzle, status: &str) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0), Print("15-puzzle"))?;

    let rendered = puzzle.to_string();
    for (i, line) in rendered.lines().enumerate() {
        queue!(out, MoveTo(0, BOARD_TOP + i as u16), Print(line))?;
    }

    queue!(out, MoveTo(0, BOARD_TOP + SIZE as u16 + 1), Print(status))?;
    out.flush()
}
