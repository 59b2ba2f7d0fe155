//! Line-oriented terminal front end.

use crate::event::Event;
use crate::mode::GameMode;
use crate::presenter::{Cue, PresentError, Presenter};
use gridlock_tictactoe::{Board, Difficulty, Position};
use std::io::{BufRead, Write};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Help text listing the commands [`parse_command`] understands.
pub const HELP: &str = "\
Commands:
  1-9 or a cell name    place a mark (e.g. 5, center, top-left)
  r, restart            start over
  c, clear              clear the board
  p, pause              pause or resume
  mode local|computer   switch mode
  level beginner|amateur|pro
  say <text>            chat with your opponent
  h, help               this text
  q, quit               leave";

/// Turns one input line into an event.
pub fn parse_command(line: &str) -> Option<Event> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => Some(Event::Quit),
        "r" | "restart" => Some(Event::Restart),
        "c" | "clear" => Some(Event::Clear),
        "p" | "pause" | "resume" => Some(Event::TogglePause),
        "say" if !rest.is_empty() => Some(Event::SendChat(rest.to_string())),
        "mode" => match rest.to_ascii_lowercase().as_str() {
            "local" => Some(Event::SelectMode(GameMode::Local)),
            "computer" => Some(Event::SelectMode(GameMode::Computer(Difficulty::default()))),
            _ => None,
        },
        "level" => rest.parse().ok().map(Event::SelectDifficulty),
        _ => Position::parse(line).map(|pos| Event::CellSelected(pos.to_index())),
    }
}

/// Reads stdin on a plain thread and feeds parsed commands to the loop.
///
/// A blocking thread keeps a pending read from holding the runtime open on
/// shutdown. End of input sends `Quit`.
pub fn spawn_input(events: mpsc::UnboundedSender<Event>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            if matches!(line.trim(), "h" | "help" | "?") {
                println!("{HELP}");
                continue;
            }
            match parse_command(&line) {
                Some(event) => {
                    debug!(?event, "Input parsed");
                    if events.send(event).is_err() {
                        return;
                    }
                }
                None => println!("Unrecognized command. Type 'help'."),
            }
        }
        let _ = events.send(Event::Quit);
    })
}

/// Writes the match to a terminal-like stream.
#[derive(Debug, derive_new::new)]
pub struct TerminalPresenter<W> {
    out: W,
}

impl TerminalPresenter<std::io::Stdout> {
    /// Presenter on stdout.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Terminal write failed");
        }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_board(&mut self, board: &Board) {
        self.line(format_args!("\n{}\n", board.display()));
    }

    fn set_status(&mut self, text: &str) {
        self.line(format_args!("> {text}"));
    }

    fn set_link_status(&mut self, text: &str) {
        if !text.is_empty() {
            self.line(format_args!("[link] {text}"));
        }
    }

    fn show_result(&mut self, text: &str) {
        self.line(format_args!("*** {text} ***"));
    }

    fn append_chat(&mut self, line: &str) {
        self.line(format_args!("[chat] {line}"));
    }

    fn play(&mut self, cue: Cue) -> Result<(), PresentError> {
        if cue == Cue::Win {
            self.out
                .write_all(b"\x07")
                .and_then(|()| self.out.flush())
                .map_err(|e| PresentError::new(format!("Bell failed: {e}")))?;
        }
        Ok(())
    }
}
