//! Page-number pagination with clamping and orphan folding.

use serde::Serialize;

/// A requested page number as it arrived from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRequest(Option<i64>);

impl PageRequest {
    /// Parse an untrusted page parameter. Anything that is not an integer
    /// is treated as "no preference" and lands on the first page. Integers
    /// too large to represent saturate, so they clamp to the last page.
    pub fn parse(raw: Option<&str>) -> Self {
        Self(raw.and_then(|s| parse_saturating(s.trim())))
    }

    pub fn number(n: i64) -> Self {
        Self(Some(n))
    }

    pub fn first() -> Self {
        Self(None)
    }
}

fn parse_saturating(s: &str) -> Option<i64> {
    if let Ok(n) = s.parse() {
        return Some(n);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Slice of an ordered result set selected by a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Splits `count` ordered items into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
    orphans: u64,
}

impl Paginator {
    /// `orphans` is capped below `per_page`; `per_page` is at least 1.
    pub fn new(per_page: u64, orphans: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            per_page,
            orphans: orphans.min(per_page - 1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages; an empty result still has one (empty) page.
    pub fn num_pages(&self, count: u64) -> u64 {
        if count == 0 {
            return 1;
        }
        let hits = count.saturating_sub(self.orphans).max(1);
        hits.div_ceil(self.per_page)
    }

    /// Resolve `request` to a valid page, clamping to the first or last page
    /// instead of failing.
    pub fn window(&self, count: u64, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match request.0 {
            None => 1,
            Some(n) if n < 1 => 1,
            Some(n) => (n as u64).min(num_pages),
        };

        let offset = (number - 1) * self.per_page;
        let mut top = offset + self.per_page;
        if top + self.orphans >= count {
            top = count;
        }

        PageWindow {
            number,
            num_pages,
            offset,
            limit: top.saturating_sub(offset),
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub total: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, window: PageWindow, total: u64, per_page: u64) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            total,
            per_page,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            total: self.total,
            per_page: self.per_page,
        }
    }
}
