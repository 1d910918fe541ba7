use std::io::{self, BufRead, Write};

use anyhow::Context;
use wormsweeper_core::{GameOutcome, Level};

use crate::command::{Command, HELP};
use crate::hint::HintGate;
use crate::session::GameSession;
use crate::view::BoardView;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Reads commands line by line until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    mut output: W,
) -> anyhow::Result<()> {
    writeln!(output, "{}\n", HELP)?;
    print_board(session, &mut output)?;
    prompt(&mut output)?;

    for line in input.lines() {
        let line = line.context("Could not read command")?;

        if session.pump_detector() {
            writeln!(output, "Color detected! Type \"apply\" to reveal a worm.")?;
        }
        if line.trim().is_empty() {
            prompt(&mut output)?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                log::trace!("Command: {:?}", command);
                if execute(session, command, &mut output)? == Flow::Quit {
                    break;
                }
            }
            Err(err) => writeln!(output, "{}", err)?,
        }
        prompt(&mut output)?;
    }

    session.cancel_hint();
    output.flush().context("Could not flush output")?;
    Ok(())
}

pub fn execute<W: Write>(
    session: &mut GameSession,
    command: Command,
    output: &mut W,
) -> io::Result<Flow> {
    match command {
        Command::Reveal(coords) => match session.reveal(coords) {
            Ok(outcome) => {
                print_board(session, output)?;
                print_outcome(session, outcome, output)?;
            }
            Err(err) => writeln!(output, "{}", err)?,
        },
        Command::Mark(coords) => match session.toggle_marker(coords) {
            Ok(marker) if marker.has_update() => print_board(session, output)?,
            Ok(_) => {
                let unrevealed = session
                    .board()
                    .cell(coords)
                    .is_ok_and(|cell| cell.state.is_unrevealed());
                if unrevealed {
                    writeln!(output, "No hooks left")?
                } else {
                    writeln!(output, "That cell is already open")?
                }
            }
            Err(err) => writeln!(output, "{}", err)?,
        },
        Command::Hint => match session.begin_hint_unlock() {
            Ok(()) => writeln!(
                output,
                "Show the red color to the detector, then type \"apply\" or \"cancel\"."
            )?,
            Err(err) => writeln!(output, "{}", err)?,
        },
        Command::Apply => match session.apply_hint() {
            Ok(Some((row, col))) => {
                writeln!(output, "A worm hides at {} {}", row, col)?;
                print_board(session, output)?;
            }
            Ok(None) => writeln!(output, "No hidden worm left to show")?,
            Err(err) => writeln!(output, "{}", err)?,
        },
        Command::Cancel => {
            session.cancel_hint();
            writeln!(output, "Hint unlock cancelled")?;
        }
        Command::New(level) => {
            let config = level.map_or(session.config(), Level::config);
            match session.reset(config) {
                Ok(()) => print_board(session, output)?,
                Err(err) => writeln!(output, "{}", err)?,
            }
        }
        Command::Restart => match session.restart() {
            Ok(()) => print_board(session, output)?,
            Err(err) => writeln!(output, "{}", err)?,
        },
        Command::Show => print_board(session, output)?,
        Command::Help => writeln!(output, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_board<W: Write>(session: &GameSession, output: &mut W) -> io::Result<()> {
    let board = session.board();
    let hint = match session.hint_gate() {
        HintGate::Locked => "available",
        HintGate::Unlocking { color_seen: false } => "unlocking",
        HintGate::Unlocking { color_seen: true } => "ready",
        HintGate::Used => "used",
    };
    write!(output, "{}", BoardView::new(board))?;
    writeln!(
        output,
        "Hooks: {} | Safe cells left: {} | Time: {}s | Hint: {}",
        board.markers_remaining(),
        board.unrevealed_safe_remaining(),
        session.elapsed_secs(),
        hint
    )
}

fn print_outcome<W: Write>(
    session: &GameSession,
    outcome: GameOutcome,
    output: &mut W,
) -> io::Result<()> {
    match outcome {
        GameOutcome::InProgress => Ok(()),
        GameOutcome::Won => writeln!(
            output,
            "You cleared the field in {}s! Type \"new\" to play again.",
            session.elapsed_secs()
        ),
        GameOutcome::Lost => {
            if let Some((row, col)) = session.board().triggered_hazard() {
                write!(output, "Worm at {} {}! ", row, col)?;
            }
            writeln!(output, "Game over. Type \"new\" to play again.")
        }
    }
}

fn prompt<W: Write>(output: &mut W) -> io::Result<()> {
    write!(output, "> ")?;
    output.flush()
}
