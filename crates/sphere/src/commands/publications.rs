//! Publication command handlers.

use std::sync::Arc;

use tabled::Tabled;

use sphere_core::{Publication, PublicationForm, PublicationStore, PublicationsClient};

use crate::cli::{CreateArgs, DeleteArgs, GlobalOpts, ListArgs, ShowArgs, UpdateArgs};
use crate::error::CliError;
use crate::output;

use super::util;

type Store = PublicationStore<PublicationsClient>;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct PublicationRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Type")]
    publication_type: String,
    #[tabled(rename = "Submission")]
    submission: String,
    #[tabled(rename = "Conference")]
    conference: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Rank")]
    rank: String,
}

impl From<&Publication> for PublicationRow {
    fn from(p: &Publication) -> Self {
        Self {
            uuid: p.uuid.clone(),
            title: p.title.clone(),
            publication_type: p.publication_type.to_string(),
            submission: p.paper_submission_date.clone().unwrap_or_default(),
            conference: p.conference_date.clone().unwrap_or_default(),
            location: p.location.clone(),
            rank: p.conference_rank.clone().unwrap_or_default(),
        }
    }
}

pub(super) fn render_publications(
    items: &[Arc<Publication>],
    global: &GlobalOpts,
) -> Result<String, CliError> {
    output::render_list(
        &global.output,
        items,
        |p| PublicationRow::from(p.as_ref()),
        |p| p.uuid.clone(),
    )
}

fn detail(p: &Publication) -> String {
    let dash = || "-".to_owned();
    [
        format!("UUID:        {}", p.uuid),
        format!("ID:          {}", p.id),
        format!("Title:       {}", p.title),
        format!("Type:        {}", p.publication_type),
        format!("Description: {}", p.description),
        format!("Location:    {}", p.location),
        format!(
            "Submission:  {}",
            p.paper_submission_date.clone().unwrap_or_else(dash)
        ),
        format!(
            "Conference:  {}",
            p.conference_date.clone().unwrap_or_else(dash)
        ),
        format!("Rank:        {}", p.conference_rank.clone().unwrap_or_else(dash)),
        format!("Link:        {}", p.external_link.clone().unwrap_or_else(dash)),
    ]
    .join("\n")
}

fn find(store: &Store, uuid: &str) -> Result<Arc<Publication>, CliError> {
    store.find(uuid).ok_or_else(|| CliError::NotFound { uuid: uuid.into() })
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn list(store: &Store, args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(store).await?;
    let view = match args.search {
        Some(term) => store.set_search(term),
        None => store.view(),
    };
    let out = render_publications(&view, global)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn show(store: &Store, args: ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(store).await?;
    let publication = find(store, &args.uuid)?;
    let out = output::render_single(
        &global.output,
        publication.as_ref(),
        detail,
        |p| p.uuid.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn create(store: &Store, args: CreateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut form = PublicationForm::default();
    util::apply_fields(&mut form, args.fields)?;

    let notification = store.create(&form).await;
    util::finish(&notification, global)
}

pub async fn update(store: &Store, args: UpdateArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(store).await?;
    let existing = find(store, &args.uuid)?;

    let mut form = PublicationForm::from_publication(&existing);
    util::apply_fields(&mut form, args.fields)?;
    if args.clear_link {
        form.external_link = None;
    }
    if args.clear_rank {
        form.conference_rank = None;
    }

    let notification = store.update(&args.uuid, &form).await;
    util::finish(&notification, global)
}

pub async fn delete(store: &Store, args: DeleteArgs, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(store).await?;
    let existing = find(store, &args.uuid)?;

    let prompt = format!("Delete '{}' ({})?", existing.title, existing.uuid);
    if !util::confirm(&prompt, "delete", global.yes)? {
        output::print_output("Aborted.", global.quiet);
        return Ok(());
    }

    let notification = store.delete(&args.uuid).await;
    util::finish(&notification, global)
}
