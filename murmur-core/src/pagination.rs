//! Pagination types

use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub limit: u32,
}

impl<T> Paginated<T> {
    /// Map the items, keeping the page bookkeeping.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }

    /// Calculate total number of pages.
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            1
        } else {
            ((self.total as u32 + self.limit - 1) / self.limit).max(1)
        }
    }

    /// Check if there's a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Query parameters for pagination (`?page=2&limit=20`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageParams> for Pagination {
    fn from(params: PageParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);

        let p = Pagination::new(2, 10);
        assert_eq!(p.offset(), 10);

        let p = Pagination::new(3, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn clamps_page_and_limit() {
        let p = Pagination::new(0, 10);
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 0);
        assert_eq!(p.limit, 1);

        let p = Pagination::new(1, 999);
        assert_eq!(p.limit, 100);
    }

    #[test]
    fn default_limit_is_ten() {
        let p = Pagination::from(PageParams::default());
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn total_pages() {
        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(paginated.total_pages(), 1);

        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 25,
            page: 1,
            limit: 10,
        };
        assert_eq!(paginated.total_pages(), 3);
    }

    #[test]
    fn has_next_prev() {
        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 30,
            page: 2,
            limit: 10,
        };
        assert!(paginated.has_next());
        assert!(paginated.has_prev());

        let paginated: Paginated<()> = Paginated {
            items: vec![],
            total: 30,
            page: 3,
            limit: 10,
        };
        assert!(!paginated.has_next());
        assert!(paginated.has_prev());
    }

    #[test]
    fn map_keeps_bookkeeping() {
        let paginated = Paginated {
            items: vec![1, 2, 3],
            total: 3,
            page: 1,
            limit: 10,
        };
        let mapped = paginated.map(|n| n * 2);
        assert_eq!(mapped.items, vec![2, 4, 6]);
        assert_eq!(mapped.total, 3);
    }
}
