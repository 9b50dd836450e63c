use scriba_core::result::PageBatch;

/// Partition `[1, page_count]` into contiguous inclusive batches of
/// `batch_size` pages, the last batch possibly shorter. Pure and
/// deterministic.
pub fn plan_batches(page_count: u32, batch_size: u32) -> Vec<PageBatch> {
    debug_assert!(page_count >= 1);
    // A zero batch size would underflow the end-page arithmetic and never
    // terminate; treat it as one page per batch.
    let batch_size = batch_size.max(1);

    let mut batches = Vec::with_capacity(page_count.div_ceil(batch_size) as usize);
    let mut start = 1;
    while start <= page_count {
        let end = (start + batch_size - 1).min(page_count);
        batches.push(PageBatch::new(start, end));
        start = end + 1;
    }
    batches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(batches: &[PageBatch]) -> Vec<(u32, u32)> {
        batches.iter().map(|b| (b.start_page, b.end_page)).collect()
    }

    #[test]
    fn test_eleven_pages_batch_size_two() {
        let batches = plan_batches(11, 2);
        assert_eq!(
            ranges(&batches),
            vec![(1, 2), (3, 4), (5, 6), (7, 8), (9, 10), (11, 11)]
        );
    }

    #[test]
    fn test_seven_pages_batch_size_two() {
        let batches = plan_batches(7, 2);
        assert_eq!(ranges(&batches), vec![(1, 2), (3, 4), (5, 6), (7, 7)]);
    }

    #[test]
    fn test_exact_multiple() {
        let batches = plan_batches(6, 2);
        assert_eq!(ranges(&batches), vec![(1, 2), (3, 4), (5, 6)]);
    }

    #[test]
    fn test_single_batch_when_count_equals_size() {
        let batches = plan_batches(4, 4);
        assert_eq!(ranges(&batches), vec![(1, 4)]);
    }

    #[test]
    fn test_single_page() {
        let batches = plan_batches(1, 2);
        assert_eq!(ranges(&batches), vec![(1, 1)]);
    }

    #[test]
    fn test_zero_batch_size_clamps_to_single_pages() {
        let batches = plan_batches(3, 0);
        assert_eq!(ranges(&batches), vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_coverage_is_contiguous_and_gap_free() {
        for page_count in 1..=40 {
            for batch_size in 1..=7 {
                let batches = plan_batches(page_count, batch_size);
                assert_eq!(batches[0].start_page, 1);
                assert_eq!(batches.last().unwrap().end_page, page_count);
                for pair in batches.windows(2) {
                    assert_eq!(pair[1].start_page, pair[0].end_page + 1);
                }
                for batch in &batches[..batches.len() - 1] {
                    assert_eq!(batch.end_page - batch.start_page + 1, batch_size);
                }
                let last = batches.last().unwrap();
                assert!(last.end_page - last.start_page + 1 <= batch_size);
            }
        }
    }
}
