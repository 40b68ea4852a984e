//! Note editor dialog: the pure state machine and its async driver.

mod dialog;
mod machine;

pub use dialog::{EditorContext, EditorDialog, FailureNotifier, ViewRefresh};
pub use machine::{
    Blocked, EditorMode, EditorState, EditorView, NoteEditor, Outcome, PendingRequest,
    RequestKind, RequestTicket, SessionToken,
};
