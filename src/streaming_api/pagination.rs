//! Draining cursor-paginated listings.

use super::models::Page;

/// Collect every item reachable from `first`, following `next` cursors with
/// `fetch_next` until a page has none.
///
/// Items come out in page order, then in-page order. The first fetch error
/// aborts the whole listing.
pub fn collect_pages<T, E, F>(first: Page<T>, mut fetch_next: F) -> Result<Vec<T>, E>
where
    F: FnMut(&str) -> Result<Page<T>, E>,
{
    let mut items = first.items;
    let mut next = first.next;
    while let Some(cursor) = next {
        let page = fetch_next(&cursor)?;
        items.extend(page.items);
        next = page.next;
    }
    Ok(items)
}

/// Fetch the first page with `fetch(None)` and drain the rest with
/// `fetch(Some(cursor))`.
pub fn drain_pages<T, E, F>(mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
{
    let first = fetch(None)?;
    collect_pages(first, |cursor| fetch(Some(cursor)))
}

/// Like [`drain_pages`], but stops requesting pages once `cap` items are in
/// hand and returns at most `cap` items.
pub fn drain_pages_capped<T, E, F>(cap: usize, mut fetch: F) -> Result<Vec<T>, E>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, E>,
{
    let first = fetch(None)?;
    let mut items = first.items;
    let mut next = first.next;
    while items.len() < cap {
        let Some(cursor) = next else { break };
        let page = fetch(Some(&cursor))?;
        items.extend(page.items);
        next = page.next;
    }
    items.truncate(cap);
    Ok(items)
}
