//! Decorative emoji shown next to a profile.

use rand::Rng;

/// First code point of the range (U+1F600, "grinning face").
pub const EMOJI_BASE: u32 = 0x1F600;
/// Number of code points the pick is drawn from.
pub const EMOJI_SPAN: u32 = 68;

const FALLBACK: char = '\u{1F600}';

/// Code point at `offset` inside the range; offsets wrap around the span.
pub fn emoji_at(offset: u32) -> char {
    char::from_u32(EMOJI_BASE + offset % EMOJI_SPAN).unwrap_or(FALLBACK)
}

/// Uniform pick from `[EMOJI_BASE, EMOJI_BASE + EMOJI_SPAN)`.
pub fn random_emoji<R: Rng + ?Sized>(rng: &mut R) -> char {
    emoji_at(rng.random_range(0..EMOJI_SPAN))
}
