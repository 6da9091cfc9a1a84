#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use console_state::{ConsoleDocument, ConsoleSettings};
use std::{cell::RefCell, rc::Rc};

/// Document wired to recording collaborators.
pub struct Harness {
    pub doc: ConsoleDocument,
    pub evaluated: Rc<RefCell<Vec<String>>>,
    pub carets: Rc<RefCell<Vec<usize>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(ConsoleSettings::default())
    }

    pub fn with_settings(settings: ConsoleSettings) -> Self {
        let evaluated = Rc::new(RefCell::new(Vec::new()));
        let carets = Rc::new(RefCell::new(Vec::new()));
        let eval_log = evaluated.clone();
        let caret_log = carets.clone();
        let doc = ConsoleDocument::new(
            settings,
            move |command: String| eval_log.borrow_mut().push(command),
            move |offset: usize| caret_log.borrow_mut().push(offset),
        );
        Self {
            doc,
            evaluated,
            carets,
        }
    }

    /// Type `text` at the end of the buffer.
    pub fn type_text(&mut self, text: &str) {
        let end = self.doc.length();
        self.doc.user_insert(end, text);
    }

    pub fn last_caret(&self) -> Option<usize> {
        self.carets.borrow().last().copied()
    }

    pub fn evaluated(&self) -> Vec<String> {
        self.evaluated.borrow().clone()
    }

    /// Everything before the editable boundary.
    pub fn transcript(&self) -> String {
        self.doc.text_in(0, self.doc.editable_start()).unwrap()
    }
}
