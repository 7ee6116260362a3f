//! Fixed-size page arithmetic shared by the server and the table model.

use crate::error::AppError;

/// Rows per page in every listing.
pub const PAGE_SIZE: u32 = 10;

/// 1-indexed page number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page(u32);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Page number clamped to a minimum of 1.
    pub fn new(n: u32) -> Self {
        Page(n.max(1))
    }

    /// Parse the optional `page` query value. Absent means the first page.
    pub fn from_query(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Page::FIRST),
            Some(s) => s
                .parse::<u32>()
                .map(Page::new)
                .map_err(|_| AppError::BadRequest(format!("invalid page: {}", s))),
        }
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn offset(self) -> u64 {
        (self.0 as u64 - 1) * PAGE_SIZE as u64
    }

    pub fn limit(self) -> u32 {
        PAGE_SIZE
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}

/// Number of pages needed to show `count` rows; never less than one.
pub fn page_count(count: u64) -> u32 {
    let pages = count.div_ceil(PAGE_SIZE as u64);
    pages.max(1).min(u32::MAX as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Page::new(1).offset(), 0);
        assert_eq!(Page::new(2).offset(), 10);
        assert_eq!(Page::new(7).offset(), 60);
    }

    #[test]
    fn clamps_page() {
        assert_eq!(Page::new(0), Page::FIRST);
    }

    #[test]
    fn parses_query_value() {
        assert_eq!(Page::from_query(None).unwrap(), Page::FIRST);
        assert_eq!(Page::from_query(Some("")).unwrap(), Page::FIRST);
        assert_eq!(Page::from_query(Some("3")).unwrap().number(), 3);
        assert_eq!(Page::from_query(Some("0")).unwrap(), Page::FIRST);
        assert!(matches!(Page::from_query(Some("two")), Err(AppError::BadRequest(_))));
        assert!(matches!(Page::from_query(Some("-1")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn page_counts() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(10), 1);
        assert_eq!(page_count(11), 2);
        assert_eq!(page_count(95), 10);
    }
}
