//! Splitting id lists into request-sized batches.

/// Maximum ids per `/tracks` lookup.
pub const TRACK_BATCH_SIZE: usize = 50;
/// Maximum ids per `/albums` lookup.
pub const ALBUM_BATCH_SIZE: usize = 20;
/// Maximum ids per `/artists` lookup.
pub const ARTIST_BATCH_SIZE: usize = 50;

/// Split `items` into contiguous batches of at most `size` elements.
///
/// Order is preserved and only the last batch may be short. A `size` of 0 is
/// treated as 1.
pub fn chunked<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    items.chunks(size.max(1)).map(|c| c.to_vec()).collect()
}
