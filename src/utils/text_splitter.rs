//! Splits long documents into overlapping chunks on a separator, so each chunk
//! fits a single completion request.

pub const DEFAULT_CHUNK_SIZE: usize = 512;
pub const DEFAULT_CHUNK_OVERLAP: usize = 24;

/// Greedily packs `separator`-delimited pieces into chunks of at most
/// `chunk_size` characters. Consecutive chunks share trailing pieces totalling
/// at most `overlap` characters. A single piece longer than `chunk_size` becomes
/// its own chunk.
pub fn split_text(text: &str, separator: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let pieces: Vec<&str> = text.split(separator).filter(|p| !p.is_empty()).collect();
    let sep_len = separator.chars().count();
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for piece in pieces {
        let piece_len = piece.chars().count();
        let added = if current.is_empty() { piece_len } else { piece_len + sep_len };

        if current_len + added > chunk_size && !current.is_empty() {
            chunks.push(current.join(separator));

            // Carry a tail of the previous chunk forward as overlap.
            while !current.is_empty() && (current_len > overlap || current_len + piece_len + sep_len > chunk_size) {
                let first_len = current[0].chars().count();
                current.remove(0);
                current_len = current_len.saturating_sub(first_len + if current.is_empty() { 0 } else { sep_len });
            }
        }

        current_len += if current.is_empty() { piece_len } else { piece_len + sep_len };
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join(separator));
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_text("one two three", " ", 512, 24), vec!["one two three"]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(split_text("", " ", 512, 24).is_empty());
        assert!(split_text("   ", " ", 512, 24).is_empty());
    }

    #[test]
    fn chunks_respect_size_and_overlap() {
        let chunks = split_text("aaaa bbbb cccc dddd eeee", " ", 9, 4);
        assert_eq!(chunks, vec!["aaaa bbbb", "bbbb cccc", "cccc dddd", "dddd eeee"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 9));
    }

    #[test]
    fn zero_overlap_partitions_text() {
        let chunks = split_text("a b c d", " ", 3, 0);
        assert_eq!(chunks, vec!["a b", "c d"]);
    }

    #[test]
    fn oversized_piece_stands_alone() {
        let chunks = split_text("tiny enormouspiece tiny", " ", 5, 0);
        assert_eq!(chunks, vec!["tiny", "enormouspiece", "tiny"]);
    }
}
