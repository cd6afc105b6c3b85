//! Cursor over the catalog that decides which cards are on screen.

use shared::{catalog::Catalog, domain::Event};

/// Number of cards rendered at once. Slot 0 is the interactive top card.
pub const VISIBLE_CARDS: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct CardDeck {
    cursor: usize,
}

impl CardDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Up to `VISIBLE_CARDS` events starting at the cursor. The window does
    /// not wrap, so the last cards of the catalog show a shorter stack.
    pub fn visible<'a>(&self, catalog: &'a Catalog) -> &'a [Event] {
        let events = catalog.all();
        let start = self.cursor.min(events.len());
        let end = (start + VISIBLE_CARDS).min(events.len());
        &events[start..end]
    }

    pub fn current<'a>(&self, catalog: &'a Catalog) -> Option<&'a Event> {
        catalog.at(self.cursor)
    }

    /// Moves past the top card, wrapping to the start of the catalog.
    pub fn advance(&mut self, catalog_len: usize) -> usize {
        self.cursor += 1;
        if self.cursor >= catalog_len {
            self.cursor = 0;
        }
        self.cursor
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}
