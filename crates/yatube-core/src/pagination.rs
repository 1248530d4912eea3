//! Page-number pagination with clamping.
//!
//! A feed always has at least one page, even when it is empty. Requested page
//! numbers never produce an error: anything unparsable or below one resolves
//! to the first page and anything past the end resolves to the last page.

use serde::Serialize;

/// Page geometry for a result set of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self) -> u64 {
        self.count.div_ceil(self.per_page).max(1)
    }

    /// Clamp a requested page number into `1..=num_pages`.
    pub fn resolve(&self, requested: Option<i64>) -> u64 {
        match requested {
            Some(n) if n >= 1 => (n as u64).min(self.num_pages()),
            _ => 1,
        }
    }

    /// Row offset of the first item on page `number`.
    pub fn offset(&self, number: u64) -> u64 {
        (number.max(1) - 1) * self.per_page
    }

    pub fn page<T>(&self, number: u64, items: Vec<T>) -> Page<T> {
        Page {
            number,
            num_pages: self.num_pages(),
            count: self.count,
            per_page: self.per_page,
            items,
        }
    }
}

/// Parse the raw `page` query value. Non-numeric input yields `None`.
pub fn parse_page_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
