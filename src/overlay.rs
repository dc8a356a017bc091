//! Single-slot suspension: a pending question that intercepts the next Enter.
//!
//! A command that needs an answer before it can finish arms the channel with
//! a prompt and a one-shot continuation, then returns to the event loop.
//! Enter resolves the request instead of dispatching a command. The
//! continuation is moved out of the slot before it runs, so it can fire at
//! most once — and may arm the next question of a chain from inside itself.

use log::warn;

use crate::shell::Io;

/// One-shot continuation for a free-text prompt.
pub type TextCont = Box<dyn FnOnce(&str, &mut Io<'_>)>;

/// One-shot continuation for a multiple-choice prompt, given the chosen index.
pub type SelectCont = Box<dyn FnOnce(usize, &mut Io<'_>)>;

pub enum Overlay {
    Text { cont: TextCont },
    Select { choices: Vec<String>, cont: SelectCont },
}

#[derive(Default)]
pub struct OverlayChannel {
    slot: Option<Overlay>,
}

impl OverlayChannel {
    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Choice labels of an armed selection prompt, if that is what is armed.
    pub fn choices(&self) -> Option<&[String]> {
        match &self.slot {
            Some(Overlay::Select { choices, .. }) => Some(choices),
            _ => None,
        }
    }

    /// Arm a free-text request. Returns false (and keeps the outstanding
    /// request) if the slot is already occupied.
    pub fn arm_text(&mut self, cont: TextCont) -> bool {
        if self.slot.is_some() {
            warn!("overlay request dropped: a request is already outstanding");
            return false;
        }
        self.slot = Some(Overlay::Text { cont });
        true
    }

    /// Arm a selection request. Empty choice lists are rejected.
    pub fn arm_select(&mut self, choices: Vec<String>, cont: SelectCont) -> bool {
        if self.slot.is_some() {
            warn!("overlay request dropped: a request is already outstanding");
            return false;
        }
        if choices.is_empty() {
            warn!("overlay request dropped: selection prompt with no choices");
            return false;
        }
        self.slot = Some(Overlay::Select { choices, cont });
        true
    }

    /// Disarm and hand the request to the caller for resolution.
    pub fn take(&mut self) -> Option<Overlay> {
        self.slot.take()
    }
}
