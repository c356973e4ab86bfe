use crate::contract::model::Photo;

/// First index (inclusive) of the highlighted slice.
pub const HIGHLIGHTS_START: usize = 7;
/// Last index (exclusive) of the highlighted slice.
pub const HIGHLIGHTS_END: usize = 10;

/// Presentational view over a user's photos that exposes a fixed three-photo window.
///
/// Holds only a borrow of its input; everything it exposes is derived on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightsView<'a> {
    highlights: &'a [Photo],
}

impl<'a> HighlightsView<'a> {
    pub fn new(highlights: &'a [Photo]) -> Self {
        Self { highlights }
    }

    /// The full input sequence.
    pub fn highlights(&self) -> &'a [Photo] {
        self.highlights
    }

    /// Photos at indices 7, 8 and 9, in source order.
    ///
    /// Shorter inputs yield whatever part of the window exists; fewer than eight photos
    /// yield an empty slice.
    pub fn photos_from_7_to_10(&self) -> &'a [Photo] {
        let end = HIGHLIGHTS_END.min(self.highlights.len());
        self.highlights.get(HIGHLIGHTS_START..end).unwrap_or(&[])
    }
}
