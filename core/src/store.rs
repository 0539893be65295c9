//! Client-side todo list, kept in step with the service.
//!
//! # Design
//! `Store` owns the list as last confirmed by the service plus the view
//! state that never leaves the client (filter, edit state, input buffer).
//! Every mutating operation is two steps:
//!
//! - `begin_*` looks at local state and returns a [`Pending`] holding the
//!   requests to execute, or `None` when the action is a no-op. Local state
//!   is not touched.
//! - [`Store::complete`] takes the pending action back with the responses
//!   and reconciles. On any failure the list is left as it was.
//!
//! The list is never updated ahead of a response. Hosts may hold several
//! `Pending` values at once; they reconcile last-write-wins by id, and a
//! response for a todo that has since left the list is dropped.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{CreateTodo, Todo, UpdateTodo};

/// Which part of the list is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const VARIANTS: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !todo.completed,
            Filter::Completed => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter {0:?}, expected all, active or completed")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// At most one todo is being edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    NoEdit,
    Editing { id: Uuid, buffer: String },
}

impl EditState {
    pub fn editing_id(&self) -> Option<Uuid> {
        match self {
            EditState::NoEdit => None,
            EditState::Editing { id, .. } => Some(*id),
        }
    }
}

/// The reconciliation a pending round trip will perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Refresh,
    Add,
    Toggle { id: Uuid },
    SaveEdit { id: Uuid },
    Remove { id: Uuid },
    /// One delete request per id, in this order.
    ClearCompleted { ids: Vec<Uuid> },
}

/// An action waiting for its responses.
#[derive(Debug, Clone)]
#[must_use = "a pending action does nothing until its requests are executed and completed"]
pub struct Pending {
    action: Action,
    requests: Vec<HttpRequest>,
}

impl Pending {
    fn single(action: Action, request: HttpRequest) -> Self {
        Self {
            action,
            requests: vec![request],
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Requests to execute; `complete` expects one response per request, in
    /// the same order.
    pub fn requests(&self) -> &[HttpRequest] {
        &self.requests
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    client: TodoClient,
    todos: Vec<Todo>,
    filter: Filter,
    edit: EditState,
    input: String,
}

impl Store {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            filter: Filter::default(),
            edit: EditState::default(),
            input: String::new(),
        }
    }

    /// Every todo, in service order (newest first).
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: Uuid) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    /// The todos matching `filter`, in list order.
    pub fn view(&self, filter: Filter) -> impl Iterator<Item = &Todo> + '_ {
        self.todos.iter().filter(move |todo| filter.matches(todo))
    }

    /// The todos matching the current filter.
    pub fn visible(&self) -> Vec<&Todo> {
        self.view(self.filter).collect()
    }

    pub fn active_count(&self) -> usize {
        self.view(Filter::Active).count()
    }

    pub fn completed_count(&self) -> usize {
        self.view(Filter::Completed).count()
    }

    pub fn begin_refresh(&self) -> Pending {
        Pending::single(Action::Refresh, self.client.build_list_todos())
    }

    /// `None` when `text` is blank.
    pub fn begin_add(&self, text: &str) -> Result<Option<Pending>, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let request = self.client.build_create_todo(&CreateTodo {
            text: text.to_string(),
        })?;
        Ok(Some(Pending::single(Action::Add, request)))
    }

    /// Flips the locally known `completed` flag. `None` when `id` is not in
    /// the list.
    pub fn begin_toggle(&self, id: Uuid) -> Result<Option<Pending>, ApiError> {
        let Some(todo) = self.get(id) else {
            return Ok(None);
        };
        let request = self
            .client
            .build_update_todo(id, &UpdateTodo::completed(!todo.completed))?;
        Ok(Some(Pending::single(Action::Toggle { id }, request)))
    }

    /// Enter edit mode for `id`, dropping any other edit in progress.
    pub fn start_edit(&mut self, id: Uuid, text: impl Into<String>) {
        self.edit = EditState::Editing {
            id,
            buffer: text.into(),
        };
    }

    /// Replace the edit buffer. Ignored outside edit mode.
    pub fn set_edit_buffer(&mut self, text: impl Into<String>) {
        if let EditState::Editing { buffer, .. } = &mut self.edit {
            *buffer = text.into();
        }
    }

    /// `None` outside edit mode or when the buffer is blank.
    pub fn begin_save_edit(&self) -> Result<Option<Pending>, ApiError> {
        let EditState::Editing { id, buffer } = &self.edit else {
            return Ok(None);
        };
        let text = buffer.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let request = self.client.build_update_todo(*id, &UpdateTodo::text(text))?;
        Ok(Some(Pending::single(Action::SaveEdit { id: *id }, request)))
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::NoEdit;
    }

    /// Always sends: an id unknown locally may still exist on the service.
    pub fn begin_remove(&self, id: Uuid) -> Pending {
        Pending::single(Action::Remove { id }, self.client.build_delete_todo(id))
    }

    /// One delete per completed todo. `None` when nothing is completed.
    pub fn begin_clear_completed(&self) -> Option<Pending> {
        let ids: Vec<Uuid> = self.view(Filter::Completed).map(|todo| todo.id).collect();
        if ids.is_empty() {
            return None;
        }
        let requests = ids
            .iter()
            .map(|id| self.client.build_delete_todo(*id))
            .collect();
        Some(Pending {
            action: Action::ClearCompleted { ids },
            requests,
        })
    }

    /// Reconcile local state from the responses to `pending.requests()`.
    pub fn complete(
        &mut self,
        pending: Pending,
        responses: Vec<Result<HttpResponse, ApiError>>,
    ) -> Result<(), ApiError> {
        match pending.action {
            Action::Refresh => {
                self.todos = self.client.parse_list_todos(first(responses)?)?;
                tracing::debug!(count = self.todos.len(), "refreshed todos");
            }
            Action::Add => {
                let todo = self.client.parse_create_todo(first(responses)?)?;
                if !self.replace(todo.clone()) {
                    self.todos.insert(0, todo);
                }
                self.input.clear();
            }
            Action::Toggle { .. } => {
                let todo = self.client.parse_update_todo(first(responses)?)?;
                self.replace(todo);
            }
            Action::SaveEdit { id } => {
                let todo = self.client.parse_update_todo(first(responses)?)?;
                self.replace(todo);
                if self.edit.editing_id() == Some(id) {
                    self.edit = EditState::NoEdit;
                }
            }
            Action::Remove { id } => {
                self.client.parse_delete_todo(first(responses)?)?;
                self.todos.retain(|todo| todo.id != id);
            }
            Action::ClearCompleted { ids } => {
                let attempted = ids.len();
                let mut removed = HashSet::with_capacity(attempted);
                for (id, response) in ids.into_iter().zip(responses) {
                    match response.and_then(|r| self.client.parse_delete_todo(r)) {
                        Ok(_) => {
                            removed.insert(id);
                        }
                        Err(err) => tracing::warn!(%id, "delete failed: {err}"),
                    }
                }
                self.todos.retain(|todo| !removed.contains(&todo.id));

                let failed = attempted - removed.len();
                if failed > 0 {
                    return Err(ApiError::Batch { failed, attempted });
                }
            }
        }
        Ok(())
    }

    /// Swap in `todo` for the entry with the same id. False when absent.
    fn replace(&mut self, todo: Todo) -> bool {
        match self.todos.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => {
                *slot = todo;
                true
            }
            None => false,
        }
    }
}

fn first(responses: Vec<Result<HttpResponse, ApiError>>) -> Result<HttpResponse, ApiError> {
    responses
        .into_iter()
        .next()
        .unwrap_or_else(|| Err(ApiError::Transport("no response".to_string())))
}
