//! Byte-lane adapter between the 8-bit view of a transfer and the 32-bit word layout of the
//! buffers it touches.
//!
//! RDRAM and the flash backing buffer both hold big-endian 32-bit words stored in host order,
//! so byte `n` of the big-endian stream lives at `n ^ S8`. The same layout is what `.fla` save
//! files contain on disk; changing [`S8`] changes the persisted byte order.

/// Swap mask: reverses the byte lanes inside each 32-bit word.
pub const S8: usize = 3;

/// Map a logical (big-endian stream) byte index to its position in the word-swapped buffer.
///
/// Only individual byte indices go through here, never lengths or base offsets.
#[inline]
pub const fn physical_index(logical_index: usize) -> usize {
    logical_index ^ S8
}

/// End of the word-aligned span that covers `[start, start + len)`.
///
/// [`physical_index`] permutes bytes within a word, so a buffer must hold every byte of each
/// touched word for the whole range to be addressable.
pub(crate) fn word_span_end(start: usize, len: usize) -> Option<usize> {
    start.checked_add(len)?.checked_add(S8).map(|end| end & !S8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_lanes_within_a_word() {
        assert_eq!(physical_index(0), 3);
        assert_eq!(physical_index(1), 2);
        assert_eq!(physical_index(2), 1);
        assert_eq!(physical_index(3), 0);
        assert_eq!(physical_index(0x80), 0x83);
        assert_eq!(physical_index(0x1FFFF), 0x1FFFC);
    }

    #[test]
    fn is_its_own_inverse() {
        for i in 0..64 {
            assert_eq!(physical_index(physical_index(i)), i);
        }
    }

    #[test]
    fn word_span_rounds_up_to_whole_words() {
        assert_eq!(word_span_end(0, 128), Some(128));
        assert_eq!(word_span_end(1, 1), Some(4));
        assert_eq!(word_span_end(6, 3), Some(12));
        assert_eq!(word_span_end(usize::MAX, 1), None);
    }
}
