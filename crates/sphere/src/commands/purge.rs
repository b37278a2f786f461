//! Expired-publication purge.

use chrono::Local;

use sphere_core::{PublicationStore, PublicationsClient};

use crate::cli::{GlobalOpts, PurgeArgs};
use crate::error::CliError;
use crate::output;

use super::{publications, util};

pub async fn handle(
    store: &PublicationStore<PublicationsClient>,
    args: PurgeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let today = match args.today {
        Some(raw) => util::parse_date("today", &raw)?,
        None => Local::now().date_naive(),
    };

    util::load(store).await?;
    let expired = store.expired(today);

    if args.dry_run {
        let out = publications::render_publications(&expired, global)?;
        output::print_output(&out, global.quiet);
        return Ok(());
    }

    if expired.is_empty() {
        output::print_output("No expired publications.", global.quiet);
        return Ok(());
    }

    let prompt = format!(
        "Delete {} publication(s) held before {today}?",
        expired.len()
    );
    if !util::confirm(&prompt, "purge-expired", global.yes)? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let report = store.purge_expired(today).await;
    for (uuid, reason) in &report.failed {
        output::print_warning(&format!("{uuid}: {reason}"), &global.color);
    }
    if !report.deleted.is_empty() {
        output::print_output(&report.deleted.join("\n"), global.quiet);
    }
    util::finish(&report.notification, global)
}
