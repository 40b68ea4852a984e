use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use jotter_core::util::short_id;
use jotter_core::{
    CardView, EditorContext, FailureNotifier, HttpNoteStorage, Note, NoteDraft, NoteId,
    NoteStorage, Outcome, ViewRefresh,
};
use serde::Serialize;

use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

const TITLE_COLUMN: usize = 32;

/// Records the refresh signal so the command can re-fetch once it settles.
#[derive(Default)]
pub struct RefreshFlag(AtomicBool);

impl RefreshFlag {
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl ViewRefresh for RefreshFlag {
    fn refresh(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct StderrNotifier;

impl FailureNotifier for StderrNotifier {
    fn notify_failure(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Storage client plus the collaborators one command's dialogs share.
pub struct Session {
    pub context: EditorContext<HttpNoteStorage>,
    pub refresh: Arc<RefreshFlag>,
}

impl Session {
    pub fn connect(profile: Option<&str>) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let profile_name = profiles.resolve_profile_name(profile);
        let client_config = profiles
            .profile(&profile_name)
            .cloned()
            .unwrap_or_default()
            .client_config(|name| env::var(name).ok())?;
        tracing::debug!(
            "Using profile '{}' with {:?}",
            profile_name,
            client_config
        );

        let storage = HttpNoteStorage::new(&client_config)?;
        let refresh = Arc::new(RefreshFlag::default());
        let context = EditorContext::new(
            Arc::new(storage),
            Arc::clone(&refresh) as Arc<dyn ViewRefresh>,
            Arc::new(StderrNotifier) as Arc<dyn FailureNotifier>,
        );
        Ok(Self { context, refresh })
    }

    pub fn storage(&self) -> &HttpNoteStorage {
        self.context.storage()
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, CliError> {
        Ok(self.storage().list().await?)
    }

    /// Turn a settled dialog operation into command output.
    pub async fn settle(&self, outcome: Outcome) -> Result<(), CliError> {
        match outcome {
            Outcome::Saved(note) => {
                let current = if self.refresh.take() {
                    self.list_notes()
                        .await?
                        .into_iter()
                        .find(|listed| listed.id == note.id)
                        .unwrap_or(note)
                } else {
                    note
                };
                for line in format_card_detail(&CardView::render(&current)) {
                    println!("{line}");
                }
                Ok(())
            }
            Outcome::Deleted => {
                if self.refresh.take() {
                    let remaining = self.list_notes().await?.len();
                    println!("Deleted. {remaining} notes remaining");
                }
                Ok(())
            }
            Outcome::Invalid(errors) => {
                for (field, message) in errors.iter() {
                    eprintln!("{field}: {message}");
                }
                Err(CliError::Invalid(errors))
            }
            Outcome::Failed(failure) => {
                tracing::debug!("Operation failed: {}", failure.diagnostic_cause());
                Err(CliError::Operation(failure))
            }
            Outcome::Blocked(blocked) => Err(CliError::Refused(format!("{blocked:?}"))),
            Outcome::Discarded => Err(CliError::Refused("request outlived its dialog".into())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub timestamp_label: String,
    pub is_edited: bool,
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let view = CardView::render(note);
    NoteListItem {
        id: note.id.to_string(),
        title: view.title,
        content: view.content,
        created_at: note.created_at.to_rfc3339(),
        updated_at: note.updated_at.to_rfc3339(),
        timestamp_label: view.timestamp_label,
        is_edited: view.is_edited,
    }
}

/// One line per card: short id, title, date label.
pub fn format_card_lines(notes: &[Note]) -> Vec<String> {
    notes
        .iter()
        .map(|note| {
            let view = CardView::render(note);
            let id = short_id(&view.id.to_string());
            let title = truncate_chars(&view.title, TITLE_COLUMN);
            format!(
                "{id:<13}  {title:<width$}  {}",
                view.timestamp_label,
                width = TITLE_COLUMN
            )
        })
        .collect()
}

pub fn format_card_detail(view: &CardView) -> Vec<String> {
    let mut lines = vec![
        format!("{}  {}", view.id, view.timestamp_label),
        view.title.clone(),
        String::new(),
    ];
    lines.extend(view.content.lines().map(str::to_string));
    lines
}

pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find a note by full id or unique id prefix.
pub fn resolve_note(note_query: &str, notes: &[Note]) -> Result<Note, CliError> {
    if let Ok(note_id) = note_query.parse::<NoteId>() {
        if let Some(note) = notes.iter().find(|note| note.id == note_id) {
            return Ok(note.clone());
        }
    }

    let query = note_query.to_ascii_lowercase();
    let matching = notes
        .iter()
        .filter(|note| note.id.to_string().starts_with(&query))
        .collect::<Vec<_>>();

    match matching.as_slice() {
        [] => Err(CliError::NoteNotFound(note_query.to_string())),
        [note] => Ok((*note).clone()),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|note| short_id(&note.id.to_string()))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{note_query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Editor document: title on the first line, a blank line, then content.
pub fn render_editor_document(draft: &NoteDraft) -> String {
    format!("{}\n\n{}\n", draft.title, draft.content)
}

pub fn parse_editor_document(document: &str) -> NoteDraft {
    let (title, rest) = document.split_once('\n').unwrap_or((document, ""));
    let content = rest.strip_prefix('\n').unwrap_or(rest);
    NoteDraft::new(
        title.trim_end_matches('\r'),
        content.trim_end_matches(['\n', '\r']),
    )
}

pub fn capture_editor_draft(initial: &NoteDraft) -> Result<NoteDraft, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, render_editor_document(initial))?;

    let launch_result = launch_editor(&editor, &temp_file);
    let document = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(parse_editor_document(&document))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("jotter-note-{}-{now}.txt", std::process::id()))
}
