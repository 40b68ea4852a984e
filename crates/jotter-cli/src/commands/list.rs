use crate::commands::common::{format_card_lines, note_to_list_item, NoteListItem, Session};
use crate::error::CliError;

pub async fn run_list(limit: usize, as_json: bool, session: &Session) -> Result<(), CliError> {
    let mut notes = session.list_notes().await?;
    notes.truncate(limit);

    if as_json {
        let json_items = notes
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_card_lines(&notes) {
            println!("{line}");
        }
    }

    Ok(())
}
