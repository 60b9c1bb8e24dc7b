mod editor;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::mpsc::Receiver,
    time::Duration,
};

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::{
        editor::{EDIT_HELP, Editor},
        renderer::Renderer,
    },
    config::Config,
    error::MazeError,
    generators::MIN_EXCLUSIVE_SIZE,
    maze::{CellState, GridEvent},
    playback::{Notice, Phase, StepOutcome},
    results::{FileResultStore, MemoryResultStore, ResultStore, summarize},
    session::Session,
    solvers::Solver,
};

/// How often to poll for keys while no animation is running
const IDLE_POLL_TIMEOUT: Duration = Duration::from_millis(100);

const HELP: &str = "Space/→: step  Enter: animate  c: clear  n: new maze  m: edit  s: solver  r: results  x: clear results  Esc: quit";

/// What the first board of the session looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartingBoard {
    Maze,
    Empty,
}

impl std::fmt::Display for StartingBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartingBoard::Maze => write!(f, "Random maze"),
            StartingBoard::Empty => write!(f, "Empty board to design"),
        }
    }
}

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Entry point of the interactive app
pub fn run(stdout: &mut Stdout, config: &Config) -> std::io::Result<()> {
    let size = match ask_maze_size(stdout, config.default_size)? {
        Some(size) => size,
        None => return Ok(()),
    };

    let solver = match select_from_menu(
        stdout,
        "Select maze solving algorithm (use arrow keys and Enter, or Esc to exit):",
        &Solver::ALL,
    )? {
        Some(solver) => solver,
        None => return Ok(()),
    };

    let board = match select_from_menu(
        stdout,
        "Start from (use arrow keys and Enter, or Esc to exit):",
        &[StartingBoard::Maze, StartingBoard::Empty],
    )? {
        Some(board) => board,
        None => return Ok(()),
    };

    let mut store: Box<dyn ResultStore> = match FileResultStore::open(&config.results_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!("Results will not be saved: {}", e);
            Box::new(MemoryResultStore::default())
        }
    };

    let (grid_event_tx, grid_event_rx) = std::sync::mpsc::channel::<GridEvent>();
    let mut session = match Session::new(size, size, config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Cannot create session: {}", e);
            return Ok(());
        }
    };
    session.observe(grid_event_tx);
    let prepared = match board {
        StartingBoard::Maze => session
            .select_solver(solver)
            .and_then(|_| session.generate(size, None)),
        StartingBoard::Empty => session.select_solver(solver),
    };
    if let Err(e) = prepared {
        tracing::error!("Cannot prepare board: {}", e);
        return Ok(());
    }

    let mut renderer = Renderer::new();
    event_loop(
        &mut session,
        &mut renderer,
        &grid_event_rx,
        store.as_mut(),
        size,
        board == StartingBoard::Empty,
    )
}

fn event_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    grid_event_rx: &Receiver<GridEvent>,
    store: &mut dyn ResultStore,
    size: usize,
    start_editing: bool,
) -> std::io::Result<()> {
    tracing::info!("Started main app loop");
    let mut editor = Editor::default();
    let mut editing = start_editing;
    let mut message = if editing {
        "Design the board: press 1 for the start and 2 for the end.".to_string()
    } else {
        format!("Solver: {}. Press Space to step or Enter to animate.", session.solver())
    };

    loop {
        renderer.drain(grid_event_rx)?;
        if editing {
            let cursor = editor.cursor();
            renderer.draw_cursor(cursor, session.grid()[cursor])?;
        }
        renderer.status(&message, if editing { EDIT_HELP } else { HELP })?;

        let animating = session.playback().is_animating();
        let timeout = session.playback().tick_interval().unwrap_or(IDLE_POLL_TIMEOUT);

        if !event::poll(timeout)? {
            // Timer tick
            if animating {
                if let Some(outcome) = session.tick() {
                    if let Some(text) = describe_notice(&outcome) {
                        message = text;
                    }
                }
            }
            continue;
        }

        let key_code = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                key_event.code
            }
            event::Event::Resize(_, _) => {
                renderer.redraw(session.grid())?;
                continue;
            }
            _ => continue,
        };

        if editing {
            let before = editor.cursor();
            if matches!(key_code, KeyCode::Esc | KeyCode::Char('m')) {
                editing = false;
                renderer.draw_cell(before, session.grid()[before])?;
                message = "Edit mode off.".to_string();
                continue;
            }
            if let Some(result) = editor.handle_key(session, key_code) {
                if editor.cursor() != before {
                    renderer.draw_cell(before, session.grid()[before])?;
                }
                message = result.unwrap_or_else(|e| e.to_string());
                continue;
            }
        }

        message = match key_code {
            KeyCode::Esc => break,
            KeyCode::Char('m') => {
                editing = true;
                editor.describe(session)
            }
            KeyCode::Char(' ') | KeyCode::Right => {
                let before = session.phase();
                match session.step() {
                    Ok(outcome) => describe_step(before, &outcome),
                    Err(e) => e.to_string(),
                }
            }
            KeyCode::Enter => match session.start_animation() {
                Ok(record) => {
                    let text = format!(
                        "{} solved in {:.3} ms, path length {}",
                        record.algorithm_name,
                        record.execution_time_nanos as f64 / 1_000_000.0,
                        record.path_length
                    );
                    if record.path_length > 0 {
                        if let Err(e) = store.save_or_update(record) {
                            tracing::warn!("Could not save result: {}", e);
                        }
                    }
                    text
                }
                Err(e) => e.to_string(),
            },
            KeyCode::Char('c') => {
                session.clear_solution();
                "Solution cleared.".to_string()
            }
            KeyCode::Char('n') => match session.generate(size, None) {
                Ok(()) => "New maze generated.".to_string(),
                Err(e) => e.to_string(),
            },
            KeyCode::Char('s') => {
                let next = session.solver().next();
                match session.select_solver(next) {
                    Ok(()) => format!("Solver: {}", next),
                    Err(e) => e.to_string(),
                }
            }
            KeyCode::Char('r') => {
                show_results(renderer, store)?;
                renderer.redraw(session.grid())?;
                "Back to the maze.".to_string()
            }
            KeyCode::Char('x') => {
                if session.playback().is_animating() {
                    MazeError::PlaybackBusy.to_string()
                } else {
                    match store.clear_all() {
                        Ok(()) => "Results cleared.".to_string(),
                        Err(e) => e.to_string(),
                    }
                }
            }
            _ => continue,
        };
    }

    tracing::info!("Exiting main app loop");
    Ok(())
}

fn describe_notice(outcome: &StepOutcome) -> Option<String> {
    outcome.notice.map(|notice| match notice {
        Notice::NoSolution => "Exploration complete. No solution found.".to_string(),
        Notice::Finished => "Solution walked. Press c to clear.".to_string(),
    })
}

/// Label a manual step by the phase it was taken in. The step that consumes the
/// last explored cell already reports the solution phase.
fn describe_step(before: Phase, outcome: &StepOutcome) -> String {
    if let Some(text) = describe_notice(outcome) {
        return text;
    }
    match (before, outcome.cell) {
        (Phase::Idle | Phase::Exploring, Some(cell)) => format!("Exploring {:?}", cell),
        (Phase::WalkingSolution, Some(cell)) => format!("Walking solution {:?}", cell),
        (Phase::Done, _) => "Replay finished. Press c to clear.".to_string(),
        _ => "Nothing to replay.".to_string(),
    }
}

fn show_results(renderer: &mut Renderer, store: &dyn ResultStore) -> std::io::Result<()> {
    let text = match store.find_all() {
        Ok(results) => summarize(&results),
        Err(e) => format!("Could not read results: {}", e),
    };
    renderer.overlay(&text)?;
    // Wait for any key press
    loop {
        if let event::Event::Key(event::KeyEvent { kind, .. }) = event::read()? {
            if kind == event::KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

/// Get user input with real-time validation and feedback
/// Returns None if user cancels input with Esc
/// Returns Some(T) if user inputs a valid input and presses Enter, where T is the validated type
fn prompt_with_validation<F, T>(
    stdout: &mut Stdout,
    prompt: &str,
    validate: F,
) -> std::io::Result<Option<T>>
where
    F: Fn(&str) -> Result<T, String>,
{
    // Save cursor position so we can restore / redraw
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;
    stdout.flush()?;

    let mut input = String::new();

    let value = loop {
        // Re-render prompt line
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        stdout.queue(style::PrintStyledContent(
            prompt.with(Color::Cyan).attribute(Attribute::Bold),
        ))?;

        // Decide color based on validity
        let validation_result = validate(input.trim());
        let color = if validation_result.is_ok() {
            Color::Green
        } else {
            Color::Red
        };
        queue!(
            stdout,
            style::SetForegroundColor(color),
            style::Print(&input),
            style::ResetColor,
            style::Print(" \r\n")
        )?;

        // Error message line (if any)
        if let Err(msg) = validation_result {
            stdout.queue(style::PrintStyledContent(
                msg.with(Color::DarkGrey).attribute(Attribute::Dim),
            ))?;
        }

        stdout.flush()?;

        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if kind != event::KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter => {
                    if let Ok(value) = validate(input.trim()) {
                        break Some(value);
                    }
                }
                KeyCode::Char(c) if !c.is_whitespace() && !c.is_control() => input.push(c),
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Esc => break None,
                _ => {}
            }
        }
    };
    // Cleanup
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown),
        cursor::Show
    )?;
    stdout.flush()?;

    Ok(value)
}

/// Largest square maze the current terminal can show, if any.
fn max_maze_size() -> usize {
    match terminal::size() {
        Ok((term_width, term_height)) => {
            let by_width = term_width / CellState::CELL_WIDTH;
            let by_height = term_height.saturating_sub(Renderer::NUM_STATUS_ROWS);
            by_width.min(by_height) as usize
        }
        // Fallback when the terminal size cannot be determined
        Err(_) => 255,
    }
}

/// Ask for the maze side length. An empty answer takes the default, capped to
/// what fits the terminal.
fn ask_maze_size(stdout: &mut Stdout, default_size: usize) -> std::io::Result<Option<usize>> {
    let max_size = max_maze_size();
    if max_size <= MIN_EXCLUSIVE_SIZE {
        stdout.execute(style::PrintStyledContent(
            "Terminal is too small to show a maze. Please resize it and try again.\r\n"
                .with(Color::Red)
                .attribute(Attribute::Bold),
        ))?;
        return Ok(None);
    }

    stdout.execute(style::PrintStyledContent(
        format!(
            "Enter the maze size (greater than {}, at most {} for this terminal), or press Esc to exit.\r\n",
            MIN_EXCLUSIVE_SIZE, max_size
        )
        .with(Color::Blue),
    ))?;

    let validate = |s: &str| {
        if s.is_empty() {
            return Ok(default_size.min(max_size));
        }
        let error_msg = format!(
            "Please enter a whole number between {} and {}.",
            MIN_EXCLUSIVE_SIZE + 1,
            max_size
        );
        match s.parse::<usize>() {
            // Recheck the live terminal size, it may have changed since the prompt
            Ok(n) if n > MIN_EXCLUSIVE_SIZE && Renderer::fits(n, n).unwrap_or(n <= max_size) => {
                Ok(n)
            }
            _ => Err(error_msg),
        }
    };

    let size = prompt_with_validation(stdout, "Size: ", validate)?;
    if let Some(size) = size {
        stdout.execute(style::PrintStyledContent(
            format!("Size set to {}\r\n", size)
                .with(Color::Green)
                .attribute(Attribute::Bold),
        ))?;
    }
    Ok(size)
}

/// Present a menu of options to the user and let them select one using arrow keys
/// Returns None if user cancels input with Esc
/// Returns Some(T) if user selects an option and presses Enter, where T is the option type
fn select_from_menu<T: std::fmt::Display + Copy>(
    stdout: &mut Stdout,
    prompt: &str,
    options: &[T],
) -> std::io::Result<Option<T>> {
    if options.is_empty() {
        return Ok(None);
    }

    // Save cursor position so we can restore / redraw
    queue!(stdout, cursor::Hide, cursor::SavePosition)?;

    let mut selected = 0;

    let selected_option = loop {
        // Re-render prompt line
        queue!(
            stdout,
            cursor::RestorePosition,
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        stdout.queue(style::PrintStyledContent(prompt.with(Color::Yellow)))?;

        for (i, option) in options.iter().enumerate() {
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::Reverse))?;
            }
            stdout.queue(style::Print(format!("\r\n{}", option)))?;
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
            }
        }
        stdout.queue(style::Print("\r\n"))?;

        stdout.flush()?;

        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if kind != event::KeyEventKind::Press {
                // Only handle key press events
                continue;
            }
            match code {
                KeyCode::Up => {
                    selected = match selected {
                        0 => options.len() - 1,
                        _ => selected - 1,
                    };
                }
                KeyCode::Down => {
                    selected = (selected + 1) % options.len();
                }
                KeyCode::Enter => break Some(options[selected]),
                KeyCode::Esc => break None,
                _ => {}
            }
        }
    };
    // Cleanup
    queue!(
        stdout,
        cursor::RestorePosition,
        terminal::Clear(ClearType::FromCursorDown),
        cursor::Show
    )?;
    stdout.flush()?;

    Ok(selected_option)
}
