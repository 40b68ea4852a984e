//! Editor dialog state machine
//!
//! Pure state: no I/O happens here. An operation is split into a `begin_*`
//! step that claims the editor and yields the request to send, and a
//! [`NoteEditor::complete`] step that applies whatever the storage answered.
//! The async driver in [`super::dialog`] glues the two around the network call.

use std::fmt;

use crate::error::OperationFailure;
use crate::models::{
    CreateNoteRequest, DeleteNoteRequest, Note, NoteDraft, NoteRequest, UpdateNoteRequest,
};
use crate::validation::{Field, FieldErrors, NoteSchema};

/// Whether the dialog creates a new note or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(Note),
}

impl EditorMode {
    #[must_use]
    pub const fn existing(&self) -> Option<&Note> {
        match self {
            Self::Create => None,
            Self::Edit(note) => Some(note),
        }
    }

    #[must_use]
    pub const fn heading(&self) -> &'static str {
        match self {
            Self::Create => "Add Note",
            Self::Edit(_) => "Edit Note",
        }
    }

    fn initial_draft(&self) -> NoteDraft {
        self.existing().map(Note::draft).unwrap_or_default()
    }
}

/// Lifecycle of the dialog's single in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Validating,
    Submitting,
    Deleting,
    Failed(OperationFailure),
    Success,
}

impl EditorState {
    /// Controls are interactive and a new request may start.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed(_))
    }

    #[must_use]
    pub const fn in_flight(&self) -> Option<RequestKind> {
        match self {
            Self::Validating | Self::Submitting => Some(RequestKind::Submit),
            Self::Deleting => Some(RequestKind::Delete),
            _ => None,
        }
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Deleting => "deleting",
            Self::Failed(_) => "failed",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for EditorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Submit,
    Delete,
}

/// Identifies one open lifetime of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionToken(u64);

impl SessionToken {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Proof that a request was started by a given session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    session: SessionToken,
    kind: RequestKind,
}

impl RequestTicket {
    #[must_use]
    pub const fn kind(&self) -> RequestKind {
        self.kind
    }
}

/// A request the dialog has committed to sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub request: NoteRequest,
}

/// Why an operation did not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// The dialog is not open
    Closed,
    /// Another request of this session is still in flight
    InFlight(RequestKind),
    /// Create mode has no identity to delete
    DeleteUnavailable,
}

/// Result of one submit or delete, as reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Note created or updated; the dialog closed
    Saved(Note),
    /// Note deleted; the dialog closed
    Deleted,
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// The request failed; the dialog stays open and ready
    Failed(OperationFailure),
    /// The operation was refused before anything was sent
    Blocked(Blocked),
    /// The request settled after its session ended and was ignored
    Discarded,
}

/// Everything a surface needs to draw the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct EditorView {
    pub open: bool,
    pub heading: &'static str,
    pub title: String,
    pub content: String,
    pub title_error: Option<String>,
    pub content_error: Option<String>,
    pub submit_enabled: bool,
    pub submit_loading: bool,
    pub delete_visible: bool,
    pub delete_enabled: bool,
    pub delete_loading: bool,
}

/// The note editor dialog.
///
/// One instance is reused across opens; each [`NoteEditor::open`] starts a new
/// session and resets the form.
#[derive(Debug, Clone)]
pub struct NoteEditor {
    schema: NoteSchema,
    mode: EditorMode,
    form: NoteDraft,
    errors: FieldErrors,
    state: EditorState,
    session: SessionToken,
    open: bool,
}

impl Default for NoteEditor {
    fn default() -> Self {
        Self::new(NoteSchema::new())
    }
}

impl NoteEditor {
    #[must_use]
    pub fn new(schema: NoteSchema) -> Self {
        Self {
            schema,
            mode: EditorMode::Create,
            form: NoteDraft::default(),
            errors: FieldErrors::default(),
            state: EditorState::Idle,
            session: SessionToken::default(),
            open: false,
        }
    }

    /// Start a new session, discarding whatever the previous one left behind.
    pub fn open(&mut self, mode: EditorMode) -> SessionToken {
        self.session = self.session.next();
        self.form = mode.initial_draft();
        self.mode = mode;
        self.errors = FieldErrors::default();
        self.state = EditorState::Idle;
        self.open = true;
        tracing::debug!(
            session = self.session.0,
            mode = self.mode.heading(),
            "Opened note editor"
        );
        self.session
    }

    /// Close without saving. Requests still in flight will be discarded.
    pub fn dismiss(&mut self) {
        if !self.open {
            return;
        }
        if let Some(kind) = self.state.in_flight() {
            tracing::debug!(
                session = self.session.0,
                ?kind,
                "Dismissed note editor with a request in flight"
            );
        }
        self.open = false;
        self.state = EditorState::Idle;
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        if self.open {
            self.form.title = title.into();
            self.errors.remove(Field::Title);
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        if self.open {
            self.form.content = content.into();
            self.errors.remove(Field::Content);
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> &EditorMode {
        &self.mode
    }

    #[must_use]
    pub const fn form(&self) -> &NoteDraft {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub const fn session(&self) -> SessionToken {
        self.session
    }

    /// Validate the form and claim the editor for a create or update.
    pub fn begin_submit(&mut self) -> Result<PendingRequest, Outcome> {
        self.ensure_ready()?;

        self.transition(EditorState::Validating);
        let draft = match self.schema.validate(&self.form) {
            Ok(draft) => draft,
            Err(errors) => {
                self.errors = errors.clone();
                self.transition(EditorState::Idle);
                return Err(Outcome::Invalid(errors));
            }
        };
        self.errors = FieldErrors::default();

        let request = match &self.mode {
            EditorMode::Create => NoteRequest::Create(CreateNoteRequest::from(draft)),
            EditorMode::Edit(note) => NoteRequest::Update(UpdateNoteRequest::new(note.id, draft)),
        };
        self.transition(EditorState::Submitting);
        Ok(self.pending(RequestKind::Submit, request))
    }

    /// Claim the editor for deleting the note being edited.
    pub fn begin_delete(&mut self) -> Result<PendingRequest, Outcome> {
        let id = match &self.mode {
            EditorMode::Edit(note) => note.id,
            EditorMode::Create => return Err(Outcome::Blocked(Blocked::DeleteUnavailable)),
        };
        self.ensure_ready()?;

        self.transition(EditorState::Deleting);
        Ok(self.pending(
            RequestKind::Delete,
            NoteRequest::Delete(DeleteNoteRequest { id }),
        ))
    }

    /// Apply the settled result of a request started by `begin_*`.
    ///
    /// Results for a session that is no longer open are discarded untouched.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<Option<Note>, OperationFailure>,
    ) -> Outcome {
        if !self.owns(ticket) {
            tracing::debug!(
                ticket_session = ticket.session.0,
                current_session = self.session.0,
                open = self.open,
                "Discarding late note request completion"
            );
            return Outcome::Discarded;
        }

        match (ticket.kind, result) {
            (RequestKind::Submit, Ok(Some(note))) => {
                if matches!(self.mode, EditorMode::Create) {
                    self.form = NoteDraft::default();
                }
                self.finish();
                Outcome::Saved(note)
            }
            (RequestKind::Submit, Ok(None)) => {
                self.fail(OperationFailure::new("storage returned no note for submit"))
            }
            (RequestKind::Delete, Ok(_)) => {
                self.finish();
                Outcome::Deleted
            }
            (_, Err(failure)) => self.fail(failure),
        }
    }

    #[must_use]
    pub fn view(&self) -> EditorView {
        let busy = self.state.in_flight();
        let settled = matches!(self.state, EditorState::Success);
        let delete_visible = matches!(self.mode, EditorMode::Edit(_));

        EditorView {
            open: self.open,
            heading: self.mode.heading(),
            title: self.form.title.clone(),
            content: self.form.content.clone(),
            title_error: self.errors.get(Field::Title).map(str::to_string),
            content_error: self.errors.get(Field::Content).map(str::to_string),
            submit_enabled: self.open && busy.is_none() && !settled,
            submit_loading: busy == Some(RequestKind::Submit),
            delete_visible,
            delete_enabled: delete_visible && self.open && busy.is_none() && !settled,
            delete_loading: busy == Some(RequestKind::Delete),
        }
    }

    fn ensure_ready(&self) -> Result<(), Outcome> {
        if !self.open {
            return Err(Outcome::Blocked(Blocked::Closed));
        }
        if let Some(kind) = self.state.in_flight() {
            return Err(Outcome::Blocked(Blocked::InFlight(kind)));
        }
        if !self.state.is_ready() {
            return Err(Outcome::Blocked(Blocked::Closed));
        }
        Ok(())
    }

    fn owns(&self, ticket: RequestTicket) -> bool {
        self.open
            && ticket.session == self.session
            && self.state.in_flight() == Some(ticket.kind)
    }

    fn pending(&self, kind: RequestKind, request: NoteRequest) -> PendingRequest {
        PendingRequest {
            ticket: RequestTicket {
                session: self.session,
                kind,
            },
            request,
        }
    }

    fn finish(&mut self) {
        self.transition(EditorState::Success);
        self.open = false;
    }

    fn fail(&mut self, failure: OperationFailure) -> Outcome {
        self.transition(EditorState::Failed(failure.clone()));
        Outcome::Failed(failure)
    }

    fn transition(&mut self, next: EditorState) {
        tracing::debug!(
            session = self.session.0,
            from = %self.state,
            to = %next,
            "Note editor transition"
        );
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::NoteId;

    fn existing_note() -> Note {
        let mut note = Note::new("X", "Y");
        note.id = "01890a5d-ac96-774b-bcce-b302099a8057".parse::<NoteId>().unwrap();
        note
    }

    fn opened(mode: EditorMode) -> NoteEditor {
        let mut editor = NoteEditor::default();
        editor.open(mode);
        editor
    }

    #[test]
    fn create_mode_starts_empty_without_delete() {
        let editor = opened(EditorMode::Create);
        let view = editor.view();
        assert!(view.open);
        assert_eq!(view.heading, "Add Note");
        assert_eq!(view.title, "");
        assert_eq!(view.content, "");
        assert!(view.submit_enabled);
        assert!(!view.delete_visible);
        assert!(!view.delete_enabled);
    }

    #[test]
    fn edit_mode_starts_from_note() {
        let editor = opened(EditorMode::Edit(existing_note()));
        let view = editor.view();
        assert_eq!(view.heading, "Edit Note");
        assert_eq!(view.title, "X");
        assert_eq!(view.content, "Y");
        assert!(view.delete_visible);
        assert!(view.delete_enabled);
    }

    #[test]
    fn reopening_on_same_note_initializes_identically() {
        let note = existing_note();
        let mut editor = NoteEditor::default();

        editor.open(EditorMode::Edit(note.clone()));
        let first = editor.view();
        editor.set_title("scratch");
        editor.dismiss();

        editor.open(EditorMode::Edit(note));
        assert_eq!(editor.view(), first);
    }

    #[test]
    fn create_submit_builds_post_body() {
        let mut editor = opened(EditorMode::Create);
        editor.set_title("A");
        editor.set_content("B");

        let pending = editor.begin_submit().unwrap();
        assert_eq!(
            pending.request,
            NoteRequest::Create(CreateNoteRequest {
                title: "A".to_string(),
                content: "B".to_string(),
            })
        );
        assert_eq!(editor.state(), &EditorState::Submitting);
        assert!(editor.view().submit_loading);
    }

    #[test]
    fn edit_submit_builds_put_body_with_id() {
        let note = existing_note();
        let mut editor = opened(EditorMode::Edit(note.clone()));
        editor.set_title("X2");

        let pending = editor.begin_submit().unwrap();
        assert_eq!(
            pending.request,
            NoteRequest::Update(UpdateNoteRequest::new(note.id, NoteDraft::new("X2", "Y")))
        );
    }

    #[test]
    fn invalid_submit_records_field_error_and_stays_idle() {
        let mut editor = opened(EditorMode::Create);
        editor.set_content("anything");

        let outcome = editor.begin_submit().unwrap_err();
        let Outcome::Invalid(errors) = outcome else {
            panic!("expected validation failure, got {outcome:?}");
        };
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(editor.state(), &EditorState::Idle);
        assert_eq!(
            editor.view().title_error.as_deref(),
            Some("Title is required")
        );

        editor.set_title("fixed");
        assert_eq!(editor.view().title_error, None);
    }

    #[test]
    fn create_success_resets_and_closes() {
        let mut editor = opened(EditorMode::Create);
        editor.set_title("A");
        editor.set_content("B");
        let pending = editor.begin_submit().unwrap();

        let created = Note::new("A", "B");
        let outcome = editor.complete(pending.ticket, Ok(Some(created.clone())));
        assert_eq!(outcome, Outcome::Saved(created));
        assert!(!editor.is_open());
        assert_eq!(editor.state(), &EditorState::Success);
        assert_eq!(editor.form(), &NoteDraft::default());
    }

    #[test]
    fn edit_success_closes_without_reset() {
        let note = existing_note();
        let mut editor = opened(EditorMode::Edit(note.clone()));
        editor.set_title("X2");
        let pending = editor.begin_submit().unwrap();

        let outcome = editor.complete(pending.ticket, Ok(Some(note)));
        assert!(matches!(outcome, Outcome::Saved(_)));
        assert!(!editor.is_open());
        assert_eq!(editor.form(), &NoteDraft::new("X2", "Y"));
    }

    #[test]
    fn failed_submit_keeps_values_and_reenables_controls() {
        let mut editor = opened(EditorMode::Create);
        editor.set_title("A");
        editor.set_content("B");
        let pending = editor.begin_submit().unwrap();

        let outcome = editor.complete(pending.ticket, Err(OperationFailure::new("HTTP 500")));
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(editor.is_open());
        assert!(editor.state().is_ready());
        let view = editor.view();
        assert_eq!((view.title.as_str(), view.content.as_str()), ("A", "B"));
        assert!(view.submit_enabled);
        assert!(!view.submit_loading);

        assert!(editor.begin_submit().is_ok());
    }

    #[test]
    fn delete_is_unavailable_in_create_mode() {
        let mut editor = opened(EditorMode::Create);
        assert_eq!(
            editor.begin_delete(),
            Err(Outcome::Blocked(Blocked::DeleteUnavailable))
        );
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[test]
    fn delete_builds_body_and_closes_on_success() {
        let note = existing_note();
        let mut editor = opened(EditorMode::Edit(note.clone()));

        let pending = editor.begin_delete().unwrap();
        assert_eq!(
            pending.request,
            NoteRequest::Delete(DeleteNoteRequest { id: note.id })
        );
        assert!(editor.view().delete_loading);

        assert_eq!(editor.complete(pending.ticket, Ok(None)), Outcome::Deleted);
        assert!(!editor.is_open());
    }

    #[test]
    fn failed_delete_reenables_delete_control() {
        let mut editor = opened(EditorMode::Edit(existing_note()));
        let pending = editor.begin_delete().unwrap();
        assert!(!editor.view().delete_enabled);

        let outcome = editor.complete(pending.ticket, Err(OperationFailure::new("timeout")));
        assert!(matches!(outcome, Outcome::Failed(_)));
        let view = editor.view();
        assert!(view.open);
        assert!(view.delete_enabled);
        assert!(!view.delete_loading);
    }

    #[test]
    fn submit_and_delete_exclude_each_other() {
        let mut editor = opened(EditorMode::Edit(existing_note()));

        editor.begin_submit().unwrap();
        assert!(!editor.view().delete_enabled);
        assert_eq!(
            editor.begin_delete(),
            Err(Outcome::Blocked(Blocked::InFlight(RequestKind::Submit)))
        );

        let mut editor = opened(EditorMode::Edit(existing_note()));
        editor.begin_delete().unwrap();
        assert!(!editor.view().submit_enabled);
        assert_eq!(
            editor.begin_submit(),
            Err(Outcome::Blocked(Blocked::InFlight(RequestKind::Delete)))
        );
    }

    #[test]
    fn operations_on_closed_editor_are_blocked() {
        let mut editor = NoteEditor::default();
        assert_eq!(
            editor.begin_submit(),
            Err(Outcome::Blocked(Blocked::Closed))
        );
    }

    #[test]
    fn completion_after_dismiss_is_discarded() {
        let mut editor = opened(EditorMode::Create);
        editor.set_title("A");
        editor.set_content("B");
        let pending = editor.begin_submit().unwrap();
        editor.dismiss();

        let outcome = editor.complete(pending.ticket, Ok(Some(Note::new("A", "B"))));
        assert_eq!(outcome, Outcome::Discarded);
        assert_eq!(editor.state(), &EditorState::Idle);
        assert_eq!(editor.form(), &NoteDraft::new("A", "B"));
    }

    #[test]
    fn completion_from_previous_session_does_not_touch_new_session() {
        let note = existing_note();
        let mut editor = opened(EditorMode::Edit(note.clone()));
        let stale = editor.begin_delete().unwrap();
        editor.dismiss();

        editor.open(EditorMode::Edit(note));
        let fresh = editor.begin_delete().unwrap();

        assert_eq!(editor.complete(stale.ticket, Ok(None)), Outcome::Discarded);
        assert!(editor.is_open());
        assert_eq!(editor.state(), &EditorState::Deleting);

        assert_eq!(editor.complete(fresh.ticket, Ok(None)), Outcome::Deleted);
    }
}
