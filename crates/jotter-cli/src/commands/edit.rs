use jotter_core::NoteCard;

use crate::commands::common::{
    capture_editor_draft, normalize_note_identifier, resolve_note, Session,
};
use crate::error::CliError;

pub async fn run_edit(
    id: &str,
    title: Option<String>,
    content: Option<String>,
    session: &Session,
) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let note = resolve_note(&normalized_id, &session.list_notes().await?)?;
    let original = note.draft();

    let card = NoteCard::new(note, &session.context);
    let dialog = card.activate().await;

    if title.is_none() && content.is_none() {
        let edited = capture_editor_draft(&original)?;
        if edited == original {
            println!("{}", card.note().id);
            return Ok(());
        }
        dialog.set_title(edited.title).await;
        dialog.set_content(edited.content).await;
    } else {
        if let Some(title) = title {
            dialog.set_title(title).await;
        }
        if let Some(content) = content {
            dialog.set_content(content).await;
        }
    }

    session.settle(dialog.submit().await).await
}
