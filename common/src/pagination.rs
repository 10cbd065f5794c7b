//! Abstractions for offset pagination.
//!
//! Listings are windowed with 1-indexed pages and report the total number
//! of matching items, so callers can render page counts that stay correct
//! under concurrent inserts (the total is computed by the same filtered
//! query that produces the window).

/// Validated pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// 1-indexed page number.
    page: u32,

    /// Number of items per page.
    page_size: u32,
}

impl Arguments {
    /// Creates new [`Arguments`] from the optional raw inputs.
    ///
    /// The `page` defaults to 1 and the `page_size` to `default_size`.
    /// [`None`] is returned if the page is 0 or the page size lies outside
    /// `1..=max_size`.
    #[must_use]
    pub fn new(
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
        max_size: u32,
    ) -> Option<Self> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(default_size);
        (page >= 1 && (1..=max_size).contains(&page_size)).then_some(Self {
            page,
            page_size,
        })
    }

    /// Returns the 1-indexed page number of these [`Arguments`].
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size of these [`Arguments`].
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the number of items to skip before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }

    /// Returns the maximum number of items on this page.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

/// A single page of a listing, along with the total count of items
/// matching its filter.
#[derive(Clone, Debug)]
pub struct Page<I> {
    /// Items on this [`Page`].
    pub items: Vec<I>,

    /// Total number of items matching the filter, across all pages.
    pub total: u64,

    /// 1-indexed number of this [`Page`].
    pub page: u32,

    /// Requested page size (the page itself may hold fewer items).
    pub page_size: u32,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] from the provided window.
    #[must_use]
    pub fn new(
        args: &Arguments,
        items: impl IntoIterator<Item = impl Into<I>>,
        total: u64,
    ) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            total,
            page: args.page(),
            page_size: args.page_size(),
        }
    }

    /// Indicates whether more items follow this [`Page`].
    #[must_use]
    pub fn has_more(&self) -> bool {
        let seen = (u64::from(self.page) - 1) * u64::from(self.page_size)
            + self.items.len() as u64;
        seen < self.total
    }
}

/// Pagination selector.
#[derive(Clone, Copy, Debug)]
pub struct Selector<F> {
    /// Pagination [`Arguments`].
    pub arguments: Arguments,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "Arguments for selecting a [`Page`]."]
        pub type Arguments = $crate::pagination::Arguments;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use super::{Arguments, Page};

    #[test]
    fn validates_arguments() {
        assert!(Arguments::new(Some(0), None, 100, 1000).is_none());
        assert!(Arguments::new(None, Some(0), 100, 1000).is_none());
        assert!(Arguments::new(None, Some(1001), 100, 1000).is_none());

        let defaults = Arguments::new(None, None, 100, 1000).unwrap();
        assert_eq!(defaults.page(), 1);
        assert_eq!(defaults.page_size(), 100);
        assert_eq!(defaults.offset(), 0);

        let third = Arguments::new(Some(3), Some(20), 100, 1000).unwrap();
        assert_eq!(third.offset(), 40);
        assert_eq!(third.limit(), 20);
    }

    #[test]
    fn tracks_remaining_items() {
        let args = Arguments::new(Some(1), Some(2), 100, 1000).unwrap();
        let first: Page<u8> = Page::new(&args, [1_u8, 2], 5);
        assert!(first.has_more());

        let args = Arguments::new(Some(3), Some(2), 100, 1000).unwrap();
        let last: Page<u8> = Page::new(&args, [5_u8], 5);
        assert!(!last.has_more());
    }
}
