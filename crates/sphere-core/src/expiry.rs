// ── Expired publication selection ──

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use sphere_api::Publication;

use crate::date;

/// Publications whose conference date is strictly before `today`.
///
/// Records without a conference date, or with one that does not parse,
/// are never selected.
pub fn expired(items: &[Arc<Publication>], today: NaiveDate) -> Vec<Arc<Publication>> {
    items
        .iter()
        .filter(|p| {
            let Some(raw) = p.conference_date.as_deref() else {
                return false;
            };
            match date::parse_wire_date(raw) {
                Ok(held_on) => held_on < today,
                Err(e) => {
                    warn!(uuid = %p.uuid, error = %e, "skipping publication with unreadable conference date");
                    false
                }
            }
        })
        .cloned()
        .collect()
}
