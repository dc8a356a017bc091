//! Submitted-line history and recall navigation.
//!
//! Two cursors exist around history: the transcript (rendered lines, owned
//! by the session) and the recall offset kept here. The offset counts back
//! from the end of the submitted-line log; 0 means "not recalling".

#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    entries: Vec<String>,
    offset: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted line. Resets recall.
    pub fn push(&mut self, line: String) {
        self.entries.push(line);
        self.offset = 0;
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset_recall(&mut self) {
        self.offset = 0;
    }

    /// Swap in a saved log wholesale (frame restore). Resets recall.
    pub fn replace(&mut self, entries: Vec<String>) {
        self.entries = entries;
        self.offset = 0;
    }

    /// Move the log out (frame save), leaving an empty one. Resets recall.
    pub fn take_entries(&mut self) -> Vec<String> {
        self.offset = 0;
        std::mem::take(&mut self.entries)
    }

    /// Step toward older entries. Returns the line to load, or None when
    /// the offset lands back at 0 (nothing to recall).
    pub fn recall_older(&mut self) -> Option<&str> {
        self.offset = (self.offset + 1).min(self.entries.len());
        self.current()
    }

    /// Step toward newer entries. None means "clear the input line".
    pub fn recall_newer(&mut self) -> Option<&str> {
        self.offset = self.offset.saturating_sub(1);
        self.current()
    }

    fn current(&self) -> Option<&str> {
        if self.offset == 0 {
            None
        } else {
            Some(&self.entries[self.entries.len() - self.offset])
        }
    }
}
