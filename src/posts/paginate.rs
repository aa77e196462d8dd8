//! Filter-and-paginate derivation.

use std::ops::Range;

use crate::domain::Post;

/// Visible subset of the records for one `(query, page)` pair.
///
/// Derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedView<'a> {
    /// Records matching the query, in source order.
    pub filtered: Vec<&'a Post>,
    /// `max(1, ceil(filtered.len() / page_size))`.
    pub total_pages: usize,
    window: Range<usize>,
}

impl<'a> DerivedView<'a> {
    /// Records on the requested page. Empty when the page is out of range.
    #[must_use]
    pub fn paged(&self) -> &[&'a Post] {
        &self.filtered[self.window.clone()]
    }

    /// Zero-based index of the first paged record within `filtered`.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.window.start
    }
}

/// Number of pages needed for `len` items, never less than one.
#[must_use]
pub const fn page_count(len: usize, page_size: usize) -> usize {
    let page_size = if page_size == 0 { 1 } else { page_size };
    let pages = (len + page_size - 1) / page_size;
    if pages == 0 {
        1
    } else {
        pages
    }
}

/// Derives the filtered list, page count and page slice.
///
/// Matching is a case-insensitive substring test on title or body; surrounding
/// whitespace of `query` is ignored and an empty query matches everything.
/// `page` is one-based; the slice is half-open and clamped to the filtered
/// list. A `page_size` of zero is treated as one.
#[must_use]
pub fn derive_view<'a>(
    records: &'a [Post],
    query: &str,
    page: usize,
    page_size: usize,
) -> DerivedView<'a> {
    let _span = tracing::debug_span!("derive_view", records = records.len(), page).entered();

    let needle = query.trim().to_lowercase();
    let filtered: Vec<&Post> = records
        .iter()
        .filter(|post| post.matches_lowercase(&needle))
        .collect();

    let page_size = page_size.max(1);
    let total_pages = page_count(filtered.len(), page_size);
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(filtered.len());
    let end = start.saturating_add(page_size).min(filtered.len());

    tracing::debug!(filtered = filtered.len(), total_pages, "Derived posts view");

    DerivedView {
        filtered,
        total_pages,
        window: start..end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config;

    fn numbered(n: usize) -> Vec<Post> {
        (1..=n)
            .map(|i| Post::new(i as i64, format!("title {i}"), format!("body {i}")))
            .collect()
    }

    #[test]
    fn twenty_five_records_make_three_pages() {
        let records = numbered(25);
        let view = derive_view(&records, "", 1, 10);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.paged().len(), 10);

        let last = derive_view(&records, "", 3, 10);
        let ids: Vec<i64> = last.paged().iter().map(|p| p.id).collect();
        assert_eq!(ids, (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn no_match_still_has_one_page() {
        let records = numbered(25);
        let view = derive_view(&records, "zzz-no-match", 1, 10);
        assert_eq!(view.total_pages, 1);
        assert!(view.paged().is_empty());
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let records = numbered(5);
        assert!(derive_view(&records, "", 4, 10).paged().is_empty());
        assert!(derive_view(&records, "", 0, 10).paged().len() == 5);
    }

    #[test]
    fn matches_body_ignoring_case_and_padding() {
        let records = vec![
            Post::new(1, "alpha", "Quick brown fox"),
            Post::new(2, "beta", "lazy dog"),
        ];
        let view = derive_view(&records, "  QUICK ", 1, 10);
        let ids: Vec<i64> = view.filtered.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Post>> {
        prop::collection::vec(("[a-c ]{0,6}", "[a-c ]{0,6}"), 0..40).prop_map(|pairs| {
            pairs
                .into_iter()
                .enumerate()
                .map(|(i, (title, body))| Post::new(i as i64, title, body))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(Config::with_cases(128))]
        #[test]
        fn pagination_stays_in_bounds(
            records in records_strategy(),
            query in "[a-cA-C ]{0,3}",
            page in 0_usize..8,
            page_size in 1_usize..12,
        ) {
            let view = derive_view(&records, &query, page, page_size);
            prop_assert!(view.total_pages >= 1);
            prop_assert!(view.paged().len() <= page_size);
            prop_assert!(view.filtered.len() <= records.len());
            if page >= 1 && page <= view.total_pages && !view.filtered.is_empty() {
                prop_assert!(!view.paged().is_empty());
            }
            if page > view.total_pages {
                prop_assert!(view.paged().is_empty());
            }
        }

        #[test]
        fn filter_is_exact(
            records in records_strategy(),
            query in "[a-cA-C]{0,2}",
        ) {
            let view = derive_view(&records, &query, 1, 10);
            let needle = query.to_lowercase();
            let expected: Vec<i64> = records
                .iter()
                .filter(|p| {
                    p.title.to_lowercase().contains(&needle) || p.body.to_lowercase().contains(&needle)
                })
                .map(|p| p.id)
                .collect();
            let actual: Vec<i64> = view.filtered.iter().map(|p| p.id).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
