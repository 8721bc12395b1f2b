//! The list controller shared by every entity screen.
//!
//! An [`EntityList`] owns one [`EntityStore`], the screen's current search
//! and filter state, and at most one open form editor.

use log::{debug, info, warn};

use crate::entity::{Entity, SubmitContext};
use crate::error::{ConsoleError, ConsoleResult};
use crate::models::RecordId;
use crate::store::{EntityStore, ListQuery};

/// Whether the editor creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(RecordId),
}

/// An open form
#[derive(Debug, Clone, PartialEq)]
pub struct Editor<F> {
    pub mode: EditorMode,
    pub form: F,
}

impl<F> Editor<F> {
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    /// Label of the submit button ("Create" / "Update")
    pub fn submit_label(&self) -> &'static str {
        if self.is_edit() {
            "Update"
        } else {
            "Create"
        }
    }
}

/// Result of a successful submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    pub id: RecordId,
    pub created: bool,
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<E> {
    Deleted(E),
    Declined,
}

/// Store, view state and editor of one entity screen
#[derive(Debug, Clone)]
pub struct EntityList<E: Entity> {
    store: EntityStore<E>,
    query: ListQuery<E::Filter>,
    editor: Option<Editor<E::Form>>,
}

impl<E: Entity> EntityList<E> {
    pub fn new(store: EntityStore<E>) -> Self {
        Self {
            store,
            query: ListQuery::default(),
            editor: None,
        }
    }

    pub fn store(&self) -> &EntityStore<E> {
        &self.store
    }

    // =========================================================================
    // Filter view
    // =========================================================================

    /// The screen's current search and filters
    pub fn query(&self) -> &ListQuery<E::Filter> {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut ListQuery<E::Filter> {
        &mut self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_filter(&mut self, filter: E::Filter) {
        self.query.filter = filter;
    }

    /// Records matching an arbitrary query
    pub fn list(&self, query: &ListQuery<E::Filter>) -> Vec<&E> {
        self.store.list(query)
    }

    /// Records matching the screen's current query
    pub fn visible(&self) -> Vec<&E> {
        self.store.list(&self.query)
    }

    // =========================================================================
    // Form editor
    // =========================================================================

    /// Opens a blank form
    pub fn open_create(&mut self) -> &mut E::Form {
        debug!("{} editor opened for create", E::KIND);
        &mut self
            .editor
            .insert(Editor {
                mode: EditorMode::Create,
                form: E::Form::default(),
            })
            .form
    }

    /// Opens a form prefilled from the record with identity `id`.
    ///
    /// The form is a copy; the stored record is untouched until submit.
    pub fn open_edit(&mut self, id: RecordId) -> ConsoleResult<&mut E::Form> {
        let record = self
            .store
            .get(id)
            .ok_or(ConsoleError::NotFound { kind: E::KIND, id })?;
        let form = record.to_form();
        debug!("{} editor opened for {}", E::KIND, id);
        Ok(&mut self
            .editor
            .insert(Editor {
                mode: EditorMode::Edit(id),
                form,
            })
            .form)
    }

    pub fn editor(&self) -> Option<&Editor<E::Form>> {
        self.editor.as_ref()
    }

    /// The open form, if any
    pub fn form_mut(&mut self) -> Option<&mut E::Form> {
        self.editor.as_mut().map(|e| &mut e.form)
    }

    /// Dialog title for the open editor ("Add New Task" / "Edit Task")
    pub fn editor_title(&self) -> Option<String> {
        self.editor.as_ref().map(|e| match e.mode {
            EditorMode::Create => format!("Add New {}", E::KIND),
            EditorMode::Edit(_) => format!("Edit {}", E::KIND),
        })
    }

    /// Closes the editor without saving
    pub fn cancel(&mut self) {
        if self.editor.take().is_some() {
            debug!("{} editor cancelled", E::KIND);
        }
    }

    /// Saves the open form and closes the editor.
    ///
    /// On failure the editor stays open with the form as submitted and the
    /// store is unchanged.
    pub fn submit(&mut self, ctx: &SubmitContext) -> ConsoleResult<Submitted> {
        let editor = self.editor.as_ref().ok_or(ConsoleError::EditorClosed)?;
        let form = editor.form.clone();

        let result = match editor.mode {
            EditorMode::Create => self.store.insert(form, ctx).map(|r| Submitted {
                id: r.id(),
                created: true,
            }),
            EditorMode::Edit(id) => self.store.update(id, form, ctx).map(|r| Submitted {
                id: r.id(),
                created: false,
            }),
        };

        match result {
            Ok(submitted) => {
                self.editor = None;
                info!(
                    "{} {} {}",
                    E::KIND,
                    submitted.id,
                    if submitted.created { "created" } else { "updated" }
                );
                Ok(submitted)
            }
            Err(e) => {
                warn!("{} not saved: {}", E::KIND, e);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Confirmation question asked before a delete
    pub fn delete_prompt(&self) -> String {
        format!("Are you sure you want to delete this {}?", E::KIND.noun())
    }

    /// Asks `confirm` with the delete prompt and removes the record if it agrees
    pub fn delete<F>(&mut self, id: RecordId, confirm: F) -> ConsoleResult<DeleteOutcome<E>>
    where
        F: FnOnce(&str) -> bool,
    {
        if self.store.get(id).is_none() {
            return Err(ConsoleError::NotFound { kind: E::KIND, id });
        }
        if !confirm(&self.delete_prompt()) {
            debug!("{} {} delete declined", E::KIND, id);
            return Ok(DeleteOutcome::Declined);
        }
        self.remove(id).map(DeleteOutcome::Deleted)
    }

    /// Removes a record whose deletion was already confirmed
    pub fn remove(&mut self, id: RecordId) -> ConsoleResult<E> {
        let removed = self.store.remove(id)?;
        // An editor still pointing at the removed record has nothing to save into
        if matches!(self.editor.as_ref().map(|e| e.mode), Some(EditorMode::Edit(edit_id)) if edit_id == id)
        {
            self.editor = None;
        }
        info!("{} {} deleted", E::KIND, id);
        Ok(removed)
    }
}
