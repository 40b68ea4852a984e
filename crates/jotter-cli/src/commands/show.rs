use jotter_core::CardView;

use crate::commands::common::{
    format_card_detail, normalize_note_identifier, resolve_note, Session,
};
use crate::error::CliError;

pub async fn run_show(id: &str, session: &Session) -> Result<(), CliError> {
    let normalized_id = normalize_note_identifier(id)?;
    let note = resolve_note(&normalized_id, &session.list_notes().await?)?;

    for line in format_card_detail(&CardView::render(&note)) {
        println!("{line}");
    }
    Ok(())
}
