//! Line-based chat loop.
//!
//! Input lines and session messages are multiplexed on one task. Messages
//! are rendered only from the session's feed, so immediate and delayed
//! replies reach the terminal through the same path and in transcript
//! order.

use crate::input::{self, Command, HELP};
use crate::render;
use helpdesk_conversation::{ChatSession, EscalationOutcome, MessageFeed};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Header shown when the chat starts.
pub const TITLE: &str = "AnyState IT Support";

/// Prompt shown when asking for a callback number.
pub const PHONE_PROMPT: &str = "Please enter your phone number for a callback:";

/// Warning for a blank or command-like callback number.
pub const INVALID_PHONE: &str = "Please enter a valid phone number.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Chat,
    CallbackNumber,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Runs the chat until `/quit`, end of input or Ctrl-C, then closes the
/// session and renders whatever it appended on the way out.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub async fn run<R, W>(
    session: &ChatSession,
    feed: &mut MessageFeed,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_line(&mut output, TITLE).await?;
    write_line(&mut output, &format!("Welcome, {}", session.user_name())).await?;
    write_line(&mut output, &render::format_notice("Type /help for commands.")).await?;

    let mut lines = input.lines();
    let mut mode = Mode::Chat;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            Some(message) = feed.recv() => {
                write_line(&mut output, &render::format_message(&message)).await?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("input closed");
                    break;
                };
                let (flow, notes) = handle_line(session, &mut mode, &line);
                for note in notes {
                    write_line(&mut output, &note).await?;
                }
                if flow == Flow::Quit {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                debug!("interrupted");
                break;
            }
        }
    }

    let report = session.close().await;
    debug!(?report, "chat ended");
    while let Some(message) = feed.try_recv() {
        write_line(&mut output, &render::format_message(&message)).await?;
    }
    output.flush().await
}

fn handle_line(session: &ChatSession, mode: &mut Mode, line: &str) -> (Flow, Vec<String>) {
    let command = input::parse(line);
    match *mode {
        Mode::Chat => handle_chat(session, mode, command),
        Mode::CallbackNumber => handle_callback_number(session, mode, command),
    }
}

fn handle_chat(session: &ChatSession, mode: &mut Mode, command: Command) -> (Flow, Vec<String>) {
    let notes = match command {
        Command::Chat(text) if text.is_empty() => Vec::new(),
        Command::Chat(text) => match session.submit(&text) {
            Ok(_) => Vec::new(),
            Err(e) => vec![render::format_warning(&e.to_string())],
        },
        Command::LiveAgent => match session.request_live_agent() {
            Ok(EscalationOutcome::Connecting) => Vec::new(),
            Ok(EscalationOutcome::AlreadyConnecting) => {
                vec![render::format_notice("Already connecting you to a live agent.")]
            }
            Ok(EscalationOutcome::AlreadyConnected) => {
                vec![render::format_notice("You are already connected with a live agent.")]
            }
            Err(e) => vec![render::format_warning(&e.to_string())],
        },
        Command::Callback(Some(number)) => match session.request_callback(&number) {
            Ok(_) => Vec::new(),
            Err(e) => vec![render::format_warning(&e.to_string())],
        },
        Command::Callback(None) => {
            *mode = Mode::CallbackNumber;
            vec![render::format_notice(PHONE_PROMPT)]
        }
        Command::Cancel => vec![render::format_notice("Nothing to cancel.")],
        Command::Help => HELP.lines().map(str::to_string).collect(),
        Command::Quit => return (Flow::Quit, Vec::new()),
        Command::Unknown(name) => vec![render::format_warning(&format!(
            "Unknown command /{name}. Type /help for commands."
        ))],
    };
    (Flow::Continue, notes)
}

/// Only `/cancel`, `/help` and `/quit` are commands at the phone prompt.
/// Any other `/word` is rejected rather than booked as a number.
fn handle_callback_number(
    session: &ChatSession,
    mode: &mut Mode,
    command: Command,
) -> (Flow, Vec<String>) {
    let number = match command {
        Command::Quit => return (Flow::Quit, Vec::new()),
        Command::Cancel => {
            *mode = Mode::Chat;
            return (
                Flow::Continue,
                vec![render::format_notice("Callback request cancelled.")],
            );
        }
        Command::Help => {
            let mut notes: Vec<String> = HELP.lines().map(str::to_string).collect();
            notes.push(render::format_notice(PHONE_PROMPT));
            return (Flow::Continue, notes);
        }
        Command::Chat(number) if !number.is_empty() => number,
        Command::Chat(_)
        | Command::LiveAgent
        | Command::Callback(_)
        | Command::Unknown(_) => {
            return (Flow::Continue, vec![render::format_warning(INVALID_PHONE)]);
        }
    };

    match session.request_callback(&number) {
        Ok(_) => {
            *mode = Mode::Chat;
            (Flow::Continue, Vec::new())
        }
        Err(e) => (Flow::Continue, vec![render::format_warning(&e.to_string())]),
    }
}

async fn write_line<W>(output: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
