use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

/// Bounds how long the listener takes to notice shutdown.
pub const LISTENER_POLL: Duration = Duration::from_millis(100);

pub const COMMAND_CAPACITY: usize = 1;

const MOUSE_SCROLL_STEP: isize = 3;

/// Requests sent from the listener to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Scroll(isize),
    /// Scroll by whole surface heights.
    Page(isize),
    ScrollToTop,
    ScrollToBottom,
    Resize { height: u16 },
    Quit,
}

/// Set once when the program should stop; checked ahead of any queued command.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn translate(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
            translate_key(key_event)
        }
        Event::Mouse(mouse_event) => translate_mouse(mouse_event),
        Event::Resize(_, height) => Some(Command::Resize { height: *height }),
        _ => None,
    }
}

fn translate_key(key_event: &KeyEvent) -> Option<Command> {
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        return match key_event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Scroll(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Scroll(1)),
        KeyCode::PageUp => Some(Command::Page(-1)),
        KeyCode::PageDown => Some(Command::Page(1)),
        KeyCode::Home | KeyCode::Char('g') => Some(Command::ScrollToTop),
        KeyCode::End | KeyCode::Char('G') => Some(Command::ScrollToBottom),
        _ => None,
    }
}

fn translate_mouse(mouse_event: &MouseEvent) -> Option<Command> {
    match mouse_event.kind {
        MouseEventKind::ScrollUp => Some(Command::Scroll(-MOUSE_SCROLL_STEP)),
        MouseEventKind::ScrollDown => Some(Command::Scroll(MOUSE_SCROLL_STEP)),
        _ => None,
    }
}

/// One wait on the terminal event source.
#[derive(Debug)]
pub enum Polled {
    Idle,
    Event(Event),
    /// An event arrived but could not be decoded; the listener skips it.
    Undecodable(io::Error),
}

/// Waits up to `timeout` for the next crossterm event. An `Err` means the
/// terminal itself is gone.
fn poll_terminal(timeout: Duration) -> io::Result<Polled> {
    if !event::poll(timeout)? {
        return Ok(Polled::Idle);
    }
    Ok(match event::read() {
        Ok(event) => Polled::Event(event),
        Err(e) => Polled::Undecodable(e),
    })
}

/// Runs the terminal event listener on its own thread. It never touches view
/// state; recognised input is forwarded as commands and a quit request also
/// raises `shutdown`.
pub fn spawn_listener(
    commands: SyncSender<Command>,
    shutdown: ShutdownSignal,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("terminal-events".into())
        .spawn(move || listen(poll_terminal, &commands, &shutdown))
}

fn listen<F>(mut next_event: F, commands: &SyncSender<Command>, shutdown: &ShutdownSignal)
where
    F: FnMut(Duration) -> io::Result<Polled>,
{
    while !shutdown.is_triggered() {
        let command = match next_event(LISTENER_POLL) {
            Ok(Polled::Idle) => continue,
            Ok(Polled::Event(event)) => translate(&event),
            Ok(Polled::Undecodable(e)) => {
                tracing::trace!("ignoring undecodable terminal event: {e}");
                None
            }
            Err(e) => {
                tracing::warn!("terminal event source failed: {e}");
                break;
            }
        };

        if let Some(command) = command {
            if command == Command::Quit {
                shutdown.trigger();
            }
            if commands.send(command).is_err() {
                break;
            }
        }
    }
    tracing::debug!("terminal event listener stopped");
}
