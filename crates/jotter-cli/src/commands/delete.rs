use jotter_core::NoteCard;

use crate::commands::common::{normalize_note_identifier, resolve_note, Session};
use crate::error::CliError;

pub async fn run_delete(id: &str, session: &Session) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let note = resolve_note(&normalized_id, &session.list_notes().await?)?;

    let card = NoteCard::new(note, &session.context);
    let outcome = card.activate().await.delete().await;
    let deleted = card.note().id;
    session.settle(outcome).await?;
    println!("{deleted}");
    Ok(())
}
