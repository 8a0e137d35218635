use crate::{
    auth::Authenticated,
    error::AppError,
    models::{CreateTodo, Todo, UpdateTodo},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Parses a path segment as a todo id.
///
/// Ids are validated for shape only, never for existence: a string that is
/// not a well-formed UUID is a 400, regardless of whether any record could
/// match it. Absent or foreign records are a 404 decided by the query.
fn parse_todo_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid todo id".into()))
}

/// Creates a new to-do owned by the authenticated user.
///
/// The body accepts exactly one field, `text`, which must be non-empty and
/// is stored verbatim. The created record is returned as the bare response
/// body.
///
/// ## Responses:
/// - `200 OK`: the created to-do.
/// - `400 Bad Request`: empty `text`, missing `text`, or unknown body fields.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_todo(
    pool: web::Data<PgPool>,
    todo_data: web::Json<CreateTodo>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = Todo::new(todo_data.into_inner(), auth.user.id);

    let created = sqlx::query_as::<_, Todo>(
        "INSERT INTO todos (id, text, completed, completed_at, creator_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id, text, completed, completed_at, creator_id, created_at",
    )
    .bind(todo.id)
    .bind(&todo.text)
    .bind(todo.completed)
    .bind(todo.completed_at)
    .bind(todo.creator_id)
    .bind(todo.created_at)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Lists the authenticated user's to-dos as `{"todos": [...]}`.
///
/// Only records whose creator matches the requesting user are returned;
/// other users' items never appear here.
#[get("")]
pub async fn list_todos(
    pool: web::Data<PgPool>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    let todos = sqlx::query_as::<_, Todo>(
        "SELECT id, text, completed, completed_at, creator_id, created_at
         FROM todos WHERE creator_id = $1
         ORDER BY created_at",
    )
    .bind(auth.user.id)
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "todos": todos })))
}

/// Fetches one of the authenticated user's to-dos as `{"todo": ...}`.
///
/// The query matches on both id and creator, so a well-formed id belonging
/// to another user answers 404 exactly like a nonexistent one.
///
/// ## Responses:
/// - `200 OK`: the to-do.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no record with that id owned by the requesting user.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&path)?;

    let todo = sqlx::query_as::<_, Todo>(
        "SELECT id, text, completed, completed_at, creator_id, created_at
         FROM todos WHERE id = $1 AND creator_id = $2",
    )
    .bind(todo_id)
    .bind(auth.user.id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}

/// Partially updates one of the authenticated user's to-dos.
///
/// Accepts `text` and `completed` only. Setting `completed` to true stamps
/// `completedAt` with the request time; setting it to false, or omitting it
/// entirely, forces the item back to incomplete with a null `completedAt`,
/// regardless of anything the client supplied.
///
/// ## Responses:
/// - `200 OK`: `{"todo": ...}` with the updated record.
/// - `400 Bad Request`: malformed id, empty `text`, or unknown body fields.
/// - `404 Not Found`: no record with that id owned by the requesting user.
#[patch("/{id}")]
pub async fn update_todo(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    todo_data: web::Json<UpdateTodo>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&path)?;
    todo_data.validate()?;

    let (completed, completed_at) = todo_data.completion_state();

    let todo = sqlx::query_as::<_, Todo>(
        "UPDATE todos
         SET text = COALESCE($1, text), completed = $2, completed_at = $3
         WHERE id = $4 AND creator_id = $5
         RETURNING id, text, completed, completed_at, creator_id, created_at",
    )
    .bind(&todo_data.text)
    .bind(completed)
    .bind(completed_at)
    .bind(todo_id)
    .bind(auth.user.id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}

/// Deletes one of the authenticated user's to-dos and returns the deleted
/// record as `{"todo": ...}`.
///
/// Same id-shape and ownership rules as `get_todo`.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    auth: Authenticated,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&path)?;

    let todo = sqlx::query_as::<_, Todo>(
        "DELETE FROM todos
         WHERE id = $1 AND creator_id = $2
         RETURNING id, text, completed, completed_at, creator_id, created_at",
    )
    .bind(todo_id)
    .bind(auth.user.id)
    .fetch_optional(&**pool)
    .await?;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(json!({ "todo": todo }))),
        None => Err(AppError::NotFound("Todo not found".into())),
    }
}
