//! Keyboard input boundary.
//!
//! Components request keys through the [`InputSource`] trait, restricted to
//! an accepted [`KeySet`]; the source blocks until a matching key arrives.
//! [`TermInput`] reads from the real terminal via crossterm; [`ScriptedInput`]
//! replays a queue of keys for tests and headless runs.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use bitflags::bitflags;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState};
use tracing::warn;

/// Keys the UI components understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyId {
    Up,
    Down,
    Left,
    Right,
    Enter,
    NumpadEnter,
    Space,
    Escape,
    Backspace,
    /// Any other printable character (only delivered when letters are
    /// allowed or the accepted set was empty).
    Char,
}

/// One delivered key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Key {
    pub id: KeyId,
    pub ch: Option<char>,
}

impl Key {
    pub fn new(id: KeyId) -> Self {
        Self { id, ch: None }
    }

    pub fn ch(c: char) -> Self {
        Self {
            id: KeyId::Char,
            ch: Some(c),
        }
    }
}

bitflags! {
    /// The set of keys one input request will accept.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct KeySet: u16 {
        const UP = 0b0_0000_0001;
        const DOWN = 0b0_0000_0010;
        const LEFT = 0b0_0000_0100;
        const RIGHT = 0b0_0000_1000;
        const ENTER = 0b0_0001_0000;
        const NUMPAD_ENTER = 0b0_0010_0000;
        const SPACE = 0b0_0100_0000;
        const ESCAPE = 0b0_1000_0000;
        const BACKSPACE = 0b1_0000_0000;
        /// The keys that confirm a selection.
        const CONFIRM = Self::ENTER.bits() | Self::SPACE.bits() | Self::NUMPAD_ENTER.bits();
        /// The keys that cancel out of a prompt.
        const CANCEL = Self::ESCAPE.bits() | Self::BACKSPACE.bits();
    }
}

impl KeyId {
    /// The [`KeySet`] bit matching this key, if any.
    pub fn to_set(self) -> KeySet {
        match self {
            KeyId::Up => KeySet::UP,
            KeyId::Down => KeySet::DOWN,
            KeyId::Left => KeySet::LEFT,
            KeyId::Right => KeySet::RIGHT,
            KeyId::Enter => KeySet::ENTER,
            KeyId::NumpadEnter => KeySet::NUMPAD_ENTER,
            KeyId::Space => KeySet::SPACE,
            KeyId::Escape => KeySet::ESCAPE,
            KeyId::Backspace => KeySet::BACKSPACE,
            KeyId::Char => KeySet::empty(),
        }
    }
}

/// Whether `key` satisfies a request for `accepted` / `allow_letters`.
fn matches(key: &Key, accepted: KeySet, allow_letters: bool) -> bool {
    if accepted.intersects(key.id.to_set()) {
        return true;
    }
    allow_letters && key.ch.is_some_and(|c| c.is_alphabetic())
}

/// Blocking source of keyboard events.
///
/// An empty accepted set without `allow_letters` violates the contract; the
/// source logs a diagnostic and delivers the next key unconditionally rather
/// than blocking forever.
pub trait InputSource {
    fn next_key(&mut self, accepted: KeySet, allow_letters: bool) -> io::Result<Key>;
}

/// Crossterm-backed input reading from the attached terminal.
#[derive(Default)]
pub struct TermInput;

impl TermInput {
    pub fn new() -> Self {
        Self
    }

    /// Translate a crossterm key event, ignoring keys the engine does not
    /// model.
    fn translate(event: &KeyEvent) -> Option<Key> {
        let key = match event.code {
            KeyCode::Up => Key::new(KeyId::Up),
            KeyCode::Down => Key::new(KeyId::Down),
            KeyCode::Left => Key::new(KeyId::Left),
            KeyCode::Right => Key::new(KeyId::Right),
            KeyCode::Enter => {
                if event.state.contains(KeyEventState::KEYPAD) {
                    Key::new(KeyId::NumpadEnter)
                } else {
                    Key::new(KeyId::Enter)
                }
            }
            KeyCode::Esc => Key::new(KeyId::Escape),
            KeyCode::Backspace => Key::new(KeyId::Backspace),
            KeyCode::Char(' ') => Key {
                id: KeyId::Space,
                ch: Some(' '),
            },
            KeyCode::Char(c) => Key::ch(c),
            _ => return None,
        };
        Some(key)
    }

    /// Discard events buffered before the request was made.
    fn drain_pending() -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            let _ = event::read()?;
        }
        Ok(())
    }
}

impl InputSource for TermInput {
    fn next_key(&mut self, accepted: KeySet, allow_letters: bool) -> io::Result<Key> {
        Self::drain_pending()?;

        let unconditional = accepted.is_empty() && !allow_letters;
        if unconditional {
            warn!("next_key called with an empty accepted set; passing the next key through");
        }

        loop {
            if let Event::Key(event) = event::read()? {
                if event.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(key) = Self::translate(&event) else {
                    continue;
                };
                if unconditional || matches(&key, accepted, allow_letters) {
                    return Ok(key);
                }
            }
        }
    }
}

/// Replays a fixed key sequence; the headless counterpart of [`TermInput`].
///
/// Keys that would not match the request are skipped, like a user pressing
/// keys the caller ignores. Running out of keys is an error rather than a
/// hang.
#[derive(Default)]
pub struct ScriptedInput {
    queue: VecDeque<Key>,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            queue: keys.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_key(&mut self, accepted: KeySet, allow_letters: bool) -> io::Result<Key> {
        let unconditional = accepted.is_empty() && !allow_letters;
        if unconditional {
            warn!("next_key called with an empty accepted set; passing the next key through");
        }

        while let Some(key) = self.queue.pop_front() {
            if unconditional || matches(&key, accepted, allow_letters) {
                return Ok(key);
            }
        }
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "scripted input exhausted",
        ))
    }
}
