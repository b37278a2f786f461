//! Command dispatch: bridges CLI args -> store intents -> output formatting.

pub mod config_cmd;
pub mod publications;
pub mod purge;
pub mod util;

use sphere_core::{PublicationStore, PublicationsClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    store: &PublicationStore<PublicationsClient>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => publications::list(store, args, global).await,
        Command::Show(args) => publications::show(store, args, global).await,
        Command::Create(args) => publications::create(store, args, global).await,
        Command::Update(args) => publications::update(store, args, global).await,
        Command::Delete(args) => publications::delete(store, args, global).await,
        Command::PurgeExpired(args) => purge::handle(store, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
