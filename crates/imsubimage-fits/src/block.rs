//! FITS block geometry.

/// FITS block size in bytes.
pub const BLOCK_SIZE: usize = 2880;

/// FITS card (keyword record) size in bytes.
pub const CARD_SIZE: usize = 80;

/// Number of cards in a single block.
pub const CARDS_PER_BLOCK: usize = BLOCK_SIZE / CARD_SIZE;

/// Header blocks are padded with ASCII spaces.
pub const HEADER_PAD_BYTE: u8 = b' ';

/// Data blocks are padded with zeros.
pub const DATA_PAD_BYTE: u8 = 0;

/// Number of whole blocks needed to hold `num_bytes`.
pub const fn blocks_needed(num_bytes: usize) -> usize {
    num_bytes.div_ceil(BLOCK_SIZE)
}

/// `num_bytes` rounded up to a whole number of blocks.
pub const fn padded_byte_len(num_bytes: usize) -> usize {
    blocks_needed(num_bytes) * BLOCK_SIZE
}

/// Pad `buf` in place with `pad_byte` up to the next block boundary.
pub fn pad_to_block(buf: &mut Vec<u8>, pad_byte: u8) {
    buf.resize(padded_byte_len(buf.len()), pad_byte);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_per_block_is_36() {
        assert_eq!(CARDS_PER_BLOCK, 36);
    }

    #[test]
    fn blocks_needed_boundaries() {
        assert_eq!(blocks_needed(0), 0);
        assert_eq!(blocks_needed(1), 1);
        assert_eq!(blocks_needed(BLOCK_SIZE), 1);
        assert_eq!(blocks_needed(BLOCK_SIZE + 1), 2);
    }

    #[test]
    fn padded_len_is_block_multiple() {
        for n in [0, 1, 79, 2880, 2881, 10_000] {
            assert_eq!(padded_byte_len(n) % BLOCK_SIZE, 0);
            assert!(padded_byte_len(n) >= n);
        }
    }

    #[test]
    fn pad_to_block_fills_tail() {
        let mut buf = vec![1u8; 100];
        pad_to_block(&mut buf, DATA_PAD_BYTE);
        assert_eq!(buf.len(), BLOCK_SIZE);
        assert!(buf[100..].iter().all(|&b| b == 0));

        let mut aligned = vec![b'A'; BLOCK_SIZE];
        pad_to_block(&mut aligned, HEADER_PAD_BYTE);
        assert_eq!(aligned.len(), BLOCK_SIZE);
    }
}
