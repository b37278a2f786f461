// ── Title search ──

use std::sync::Arc;

use sphere_api::Publication;

/// Case-insensitive substring match over `title`, preserving snapshot order.
///
/// Pure: no I/O, never touches the snapshot it reads from. An empty term
/// matches everything.
pub fn filter_by_title(items: &[Arc<Publication>], term: &str) -> Vec<Arc<Publication>> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
