//! Splits an ordered sequence into fixed-size pages for overview listings.

/// One page of a paginated listing. `number` runs from 1 to `total`.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// The page's items, newest first.
    pub items: Vec<T>,
    pub number: usize,
    pub total: usize,
}

/// How a chronological (oldest first) sequence is split into pages.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Order {
    /// Page `k` holds the chunk `[(k-1) * page_size, k * page_size)` of the
    /// input, reversed. Page 1 holds the oldest posts. Used for the main blog
    /// overview.
    ChunksReversed,

    /// The whole input is reversed before it is chunked, so page 1 holds the
    /// newest posts. Used for topic and year overviews.
    NewestFirst,
}

/// Returns `ceil(len / page_size)`. A page size of zero is treated as one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    (len + page_size - 1) / page_size
}

/// Paginates `items`, which must be in chronological (oldest first) order.
/// The last page holds whatever remains, so every item is on exactly one page
/// and every page lists its items newest first. An empty input yields no
/// pages.
pub fn paginate<T: Clone>(items: &[T], page_size: usize, order: Order) -> Vec<Page<T>> {
    let page_size = page_size.max(1);
    let total = total_pages(items.len(), page_size);
    let chunks: Vec<Vec<T>> = match order {
        Order::ChunksReversed => items
            .chunks(page_size)
            .map(|chunk| chunk.iter().rev().cloned().collect())
            .collect(),
        Order::NewestFirst => {
            let newest_first: Vec<T> = items.iter().rev().cloned().collect();
            newest_first.chunks(page_size).map(<[T]>::to_vec).collect()
        }
    };
    chunks
        .into_iter()
        .enumerate()
        .map(|(i, items)| Page {
            items,
            number: i + 1,
            total,
        })
        .collect()
}
