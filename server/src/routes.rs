//! Handlers for the `/api/todos` collection.

use axum::{
    body::Bytes,
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode, Uri},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::error::{AppError, MessageBody, Result};
use crate::store::{Todo, TodoPatch, TodoStore};

/// `POST /api/todos` body. `text` stays optional here so a missing field is
/// answered with the service's own 400 rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTodo {
    #[serde(default)]
    pub text: Option<String>,
}

/// A JSON request body that reads as `T::default()` when it is absent or not
/// sent as `application/json`. Malformed JSON is a validation error, so every
/// rejection carries a `{message}` body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        if !is_json(&req) {
            return Ok(Self(T::default()));
        }
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|err| AppError::Validation(format!("Invalid JSON body: {err}")))
    }
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|essence| {
            let essence = essence.trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
}

/// GET /api/todos
pub async fn list_todos(State(store): State<TodoStore>) -> Json<Vec<Todo>> {
    let todos = store.list().await;
    tracing::debug!(count = todos.len(), "listed todos");
    Json(todos)
}

/// POST /api/todos
pub async fn create_todo(
    State(store): State<TodoStore>,
    JsonBody(input): JsonBody<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>)> {
    let todo = store.create(input.text).await?;
    tracing::info!(id = %todo.id, "created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/todos/{id}
pub async fn update_todo(
    State(store): State<TodoStore>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<TodoPatch>,
) -> Result<Json<Todo>> {
    let id = parse_id(&id)?;
    let todo = store.update(id, patch).await?;
    tracing::info!(id = %todo.id, completed = todo.completed, "updated todo");
    Ok(Json(todo))
}

/// DELETE /api/todos/{id}
pub async fn delete_todo(
    State(store): State<TodoStore>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>> {
    let id = parse_id(&id)?;
    store.delete(id).await?;
    tracing::info!(%id, "deleted todo");
    Ok(Json(MessageBody::new("Todo removed")))
}

/// Fallback for every unrouted path.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Not Found - {uri}"))
}

/// An id that cannot name any stored todo is reported like an unknown one.
fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Todo not found".to_string()))
}
