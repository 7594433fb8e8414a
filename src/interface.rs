//! Navigation: keeping a location (browser history or an in-memory stand-in)
//! in step with the codec.
//!
//! A [`Navigator`] owns a [`Codec`] and a [`LocationPort`]. Callers hand it a
//! state, a url, or both; it fills in whichever is missing and writes a new
//! history entry only when the url actually changes. [`MemoryLocation`] is a
//! history stack for hosts (and tests) without a browser.

use tracing::debug;

use crate::codec::Codec;
use crate::hooks::Hooks;
use crate::state::State;

/// The host's notion of "where we are".
pub trait LocationPort {
    fn current_url(&self) -> String;
    fn title(&self) -> String;
    /// Adds a history entry.
    fn push_state(&mut self, state: &State, title: &str, url: &str);
    /// Overwrites the current history entry.
    fn replace_state(&mut self, state: &State, title: &str, url: &str);
}

/// Where to navigate: a state, a url, or both when the caller already has them paired.
#[derive(Debug, Clone, PartialEq)]
pub enum Destination {
    State(State),
    Url(String),
    Both(State, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    pub state: State,
}

/// A history stack. Pushing drops any entries ahead of the cursor.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: url.into(),
                title: String::new(),
                state: State::default(),
            }],
            index: 0,
        }
    }
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }
    /// Steps back; returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }
    /// Steps forward; returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }
}

impl LocationPort for MemoryLocation {
    fn current_url(&self) -> String {
        self.current().url.clone()
    }
    fn title(&self) -> String {
        self.current().title.clone()
    }
    fn push_state(&mut self, state: &State, title: &str, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url: url.to_owned(),
            title: title.to_owned(),
            state: state.clone(),
        });
        self.index = self.entries.len() - 1;
    }
    fn replace_state(&mut self, state: &State, title: &str, url: &str) {
        self.entries[self.index] = HistoryEntry {
            url: url.to_owned(),
            title: title.to_owned(),
            state: state.clone(),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Push,
    Replace,
}

pub struct Navigator<H, L> {
    codec: Codec<H>,
    location: L,
}

impl<H: Hooks, L: LocationPort> Navigator<H, L> {
    pub fn new(codec: Codec<H>, location: L) -> Self {
        Self { codec, location }
    }
    pub fn codec(&self) -> &Codec<H> {
        &self.codec
    }
    pub fn location(&self) -> &L {
        &self.location
    }
    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }
    /// The state of the location's current url, e.g. after the user went back.
    pub async fn parse_current(&self) -> State {
        self.codec.parse(&self.location.current_url()).await
    }
    /// Navigates with a new history entry. Returns the state navigated to.
    pub async fn push(&mut self, destination: Destination, title: &str) -> State {
        self.navigate(destination, title, Mode::Push).await
    }
    /// Navigates in place of the current history entry. Returns the state navigated to.
    pub async fn replace(&mut self, destination: Destination, title: &str) -> State {
        self.navigate(destination, title, Mode::Replace).await
    }

    async fn navigate(&mut self, destination: Destination, title: &str, mode: Mode) -> State {
        let (state, url) = match destination {
            Destination::State(state) => {
                let url = self.codec.construct(&state);
                (state, url)
            }
            Destination::Url(url) => (self.codec.parse(&url).await, url),
            Destination::Both(state, url) => (state, url),
        };
        if url == self.location.current_url() {
            debug!(%url, "location unchanged");
            return state;
        }
        debug!(%url, ?mode, "navigate");
        match mode {
            Mode::Push => self.location.push_state(&state, title, &url),
            Mode::Replace => self.location.replace_state(&state, title, &url),
        }
        state
    }
}
