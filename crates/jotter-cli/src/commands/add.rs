use std::io::{self, IsTerminal};

use jotter_core::{EditorMode, NoteDraft};

use crate::commands::common::{capture_editor_draft, Session};
use crate::error::CliError;

pub async fn run_add(
    title: Option<String>,
    content_parts: &[String],
    session: &Session,
) -> Result<(), CliError> {
    let content = content_parts.join(" ");
    let mut draft = NoteDraft::new(title.unwrap_or_default(), content);

    let incomplete = draft.title.trim().is_empty() || draft.content.trim().is_empty();
    if incomplete && io::stdin().is_terminal() {
        draft = capture_editor_draft(&draft)?;
    }

    let dialog = session.context.dialog();
    dialog.open(EditorMode::Create).await;
    dialog.set_title(draft.title).await;
    dialog.set_content(draft.content).await;
    session.settle(dialog.submit().await).await
}
