//! Handoff queue between transport callbacks and the simulation tick
//!
//! Transport callbacks only ever push here; the tick drains the queue before
//! it updates anything, so snapshots land between ticks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::protocol::{NetMessage, decode};

/// Cloneable handle to one shared queue
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    queue: Rc<RefCell<VecDeque<NetMessage>>>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: NetMessage) {
        self.queue.borrow_mut().push_back(message);
    }

    /// Decode and queue raw text. Malformed input is logged and dropped.
    pub fn push_raw(&self, text: &str) -> bool {
        match decode(text) {
            Ok(message) => {
                self.push(message);
                true
            }
            Err(err) => {
                log::warn!("dropping malformed message: {}", err);
                false
            }
        }
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<NetMessage> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
