//! # Chunk Boundary Helper

/// Block size for the forward scan past a boundary guess.
const SCAN_BLOCK: usize = 4096;

/// Find special-token-aligned chunk boundaries for parallel pretokenization.
///
/// Starts from `desired_chunks` equispaced boundary guesses and moves each
/// interior guess forward to the start of the next `split_token` occurrence
/// (or the end of the corpus if none remains). Consecutive pairs of the
/// returned offsets define non-overlapping ranges that each begin and end at
/// a split-token-delimited cut, so chunks can be pretokenized independently.
///
/// ## Arguments
/// * `data` - the corpus bytes.
/// * `desired_chunks` - the number of chunks to aim for; the result may
///   define fewer when occurrences are sparse.
/// * `split_token` - the token bytes that boundaries must align to.
///
/// ## Returns
/// A sorted, deduplicated list of byte offsets, always starting at 0 and
/// ending at `data.len()`.
pub fn find_chunk_boundaries(
    data: &[u8],
    desired_chunks: usize,
    split_token: &[u8],
) -> Vec<usize> {
    let len = data.len();
    if desired_chunks <= 1 || split_token.is_empty() || len < desired_chunks {
        return vec![0, len];
    }

    let chunk_size = len / desired_chunks;

    let mut boundaries = Vec::with_capacity(desired_chunks + 1);
    boundaries.push(0);
    for i in 1..desired_chunks {
        let guess = i * chunk_size;
        boundaries.push(find_token_at_or_after(data, guess, split_token).unwrap_or(len));
    }
    boundaries.push(len);

    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries
}

/// Find the start of the first `token` occurrence at or after `from`.
///
/// Scans in fixed-size blocks, overlapping each block by `token.len() - 1`
/// bytes so occurrences straddling a block edge are still found.
fn find_token_at_or_after(
    data: &[u8],
    from: usize,
    token: &[u8],
) -> Option<usize> {
    let mut start = from;
    while start < data.len() {
        let end = (start + SCAN_BLOCK + token.len() - 1).min(data.len());
        if let Some(offset) = data[start..end]
            .windows(token.len())
            .position(|window| window == token)
        {
            return Some(start + offset);
        }
        start += SCAN_BLOCK;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const EOT: &[u8] = b"<|endoftext|>";

    fn doc_corpus(docs: usize, doc_len: usize) -> Vec<u8> {
        let mut data = Vec::new();
        for i in 0..docs {
            data.extend(vec![b'a' + (i % 26) as u8; doc_len]);
            data.extend_from_slice(EOT);
        }
        data
    }

    #[test]
    fn test_boundaries_align_to_token_starts() {
        let data = doc_corpus(40, 997);
        let boundaries = find_chunk_boundaries(&data, 8, EOT);

        assert_eq!(*boundaries.first().unwrap(), 0);
        assert_eq!(*boundaries.last().unwrap(), data.len());

        for &b in &boundaries[1..boundaries.len() - 1] {
            assert_eq!(&data[b..b + EOT.len()], EOT, "boundary {b} not at a token");
        }

        // Sorted and strictly increasing.
        assert!(boundaries.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_chunk_requests() {
        let data = doc_corpus(4, 100);
        assert_eq!(find_chunk_boundaries(&data, 1, EOT), vec![0, data.len()]);
        assert_eq!(find_chunk_boundaries(&data, 0, EOT), vec![0, data.len()]);
    }

    #[test]
    fn test_no_token_in_corpus() {
        let data = vec![b'x'; 10_000];
        assert_eq!(find_chunk_boundaries(&data, 4, EOT), vec![0, data.len()]);
    }

    #[test]
    fn test_empty_corpus() {
        assert_eq!(find_chunk_boundaries(&[], 4, EOT), vec![0, 0]);
    }

    #[test]
    fn test_token_straddles_scan_block() {
        // Place the only occurrence across the edge of the first scan block
        // after the midpoint guess.
        let mut data = vec![b'x'; 4 * SCAN_BLOCK];
        let guess = data.len() / 2;
        let at = guess + SCAN_BLOCK - 5;
        data[at..at + EOT.len()].copy_from_slice(EOT);

        let boundaries = find_chunk_boundaries(&data, 2, EOT);
        assert_eq!(boundaries, vec![0, at, data.len()]);
    }
}
