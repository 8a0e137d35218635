use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A to-do item as stored in the database and returned by the API.
///
/// `completed_at` is epoch milliseconds so it serializes as a JSON number,
/// and it is only ever non-null while `completed` is true.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub completed_at: Option<i64>,
    /// The owning user's id. Every read and mutation is filtered on it.
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a to-do. `text` is the only accepted field; anything
/// else in the body is rejected at deserialization.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateTodo {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

/// Payload for partially updating a to-do. Only `text` and `completed` are
/// accepted; unknown fields are rejected rather than silently dropped.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTodo {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl Todo {
    /// Builds a new, incomplete to-do owned by `creator_id`.
    pub fn new(input: CreateTodo, creator_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: input.text,
            completed: false,
            completed_at: None,
            creator_id,
            created_at: Utc::now(),
        }
    }
}

impl UpdateTodo {
    /// Derives the `(completed, completed_at)` pair this update should
    /// persist. Completing a to-do stamps the current time; anything else,
    /// including an update that omits `completed`, forces the item back to
    /// incomplete with a null timestamp regardless of its prior state.
    pub fn completion_state(&self) -> (bool, Option<i64>) {
        match self.completed {
            Some(true) => (true, Some(Utc::now().timestamp_millis())),
            _ => (false, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_todo_defaults() {
        let input = CreateTodo {
            text: "buy milk".to_string(),
        };
        let creator = Uuid::new_v4();

        let todo = Todo::new(input, creator);
        assert_eq!(todo.text, "buy milk");
        assert_eq!(todo.creator_id, creator);
        assert!(!todo.completed);
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn test_create_todo_validation() {
        let valid = CreateTodo {
            text: "buy milk".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateTodo {
            text: "".to_string(),
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_update_todo_rejects_unknown_fields() {
        let err = serde_json::from_str::<UpdateTodo>(
            r#"{"text": "x", "completed": true, "creatorId": "someone-else"}"#,
        );
        assert!(err.is_err());

        let ok = serde_json::from_str::<UpdateTodo>(r#"{"completed": true}"#).unwrap();
        assert_eq!(ok.completed, Some(true));
        assert!(ok.text.is_none());
    }

    #[test]
    fn test_completion_state_derivation() {
        let completing = UpdateTodo {
            text: None,
            completed: Some(true),
        };
        let (completed, completed_at) = completing.completion_state();
        assert!(completed);
        assert!(completed_at.is_some());

        let clearing = UpdateTodo {
            text: None,
            completed: Some(false),
        };
        assert_eq!(clearing.completion_state(), (false, None));

        // Omitting `completed` behaves like setting it to false.
        let text_only = UpdateTodo {
            text: Some("new text".to_string()),
            completed: None,
        };
        assert_eq!(text_only.completion_state(), (false, None));
    }

    #[test]
    fn test_todo_serializes_camel_case() {
        let todo = Todo {
            id: Uuid::new_v4(),
            text: "buy milk".to_string(),
            completed: true,
            completed_at: Some(333),
            creator_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&todo).unwrap();
        assert!(value.get("completedAt").unwrap().is_number());
        assert!(value.get("creatorId").is_some());
        assert!(value.get("completed_at").is_none());
    }
}
