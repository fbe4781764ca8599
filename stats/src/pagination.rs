use std::ops::Range;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::error::StatsError;

/// One page of a listing. Pages are zero-based; a page past the end has no
/// items but still reports the listing's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, page: usize, per_page: usize) -> Self {
        let pages = if per_page == 0 {
            0
        } else {
            total.div_ceil(per_page)
        };
        Self {
            items,
            total,
            page,
            per_page,
            pages,
            has_prev: page > 0,
            has_next: page.saturating_add(1) < pages,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
            has_prev: self.has_prev,
            has_next: self.has_next,
        }
    }
}

/// Index range of `page` in a listing of `len` items. Without a page size the
/// whole listing is selected; pages past the end select nothing.
pub fn page_bounds(len: usize, page: usize, pagesize: Option<usize>) -> Range<usize> {
    match pagesize {
        None => 0..len,
        Some(size) => {
            let start = page.saturating_mul(size).min(len);
            let end = start.saturating_add(size).min(len);
            start..end
        }
    }
}

pub fn page_slice<T>(items: &[T], page: usize, pagesize: Option<usize>) -> &[T] {
    &items[page_bounds(items.len(), page, pagesize)]
}

/// Anything that can be listed a page at a time.
#[async_trait]
pub trait PageSource: Sync {
    type Item: Send;

    async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        page: usize,
        pagesize: usize,
    ) -> Result<Vec<Self::Item>, StatsError>;

    async fn count(&self, conn: &mut SqliteConnection) -> Result<usize, StatsError>;
}

pub async fn paginate<S: PageSource>(
    conn: &mut SqliteConnection,
    source: &S,
    page: usize,
    per_page: usize,
) -> Result<Page<S::Item>, StatsError> {
    let items = source.fetch(conn, page, per_page).await?;
    let total = source.count(conn).await?;
    Ok(Page::new(items, total, page, per_page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(10, 0, None), 0..10);
        assert_eq!(page_bounds(10, 3, None), 0..10);
        assert_eq!(page_bounds(10, 0, Some(4)), 0..4);
        assert_eq!(page_bounds(10, 2, Some(4)), 8..10);
        assert_eq!(page_bounds(10, 3, Some(4)), 10..10);
        assert_eq!(page_bounds(10, usize::MAX, Some(4)), 10..10);
        assert_eq!(page_bounds(0, 0, Some(4)), 0..0);
    }

    #[test]
    fn test_page_slice_matches_full_listing() {
        let items: Vec<usize> = (0..7).collect();
        for size in 1..=8 {
            for page in 0..=8 {
                let expected: Vec<usize> = items
                    .iter()
                    .copied()
                    .skip(page * size)
                    .take(size)
                    .collect();
                assert_eq!(page_slice(&items, page, Some(size)), expected.as_slice());
            }
        }
    }

    #[test]
    fn test_page_flags() {
        let first = Page::new(vec![1, 2], 5, 0, 2);
        assert_eq!(first.pages, 3);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = Page::new(vec![5], 5, 2, 2);
        assert!(last.has_prev);
        assert!(!last.has_next);

        let beyond: Page<i32> = Page::new(vec![], 5, 7, 2);
        assert_eq!(beyond.total, 5);
        assert!(!beyond.has_next);

        let empty: Page<i32> = Page::new(vec![], 0, 0, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_page_map_keeps_counts() {
        let page = Page::new(vec![1, 2], 5, 1, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
    }
}
