pub mod todo;
pub mod user;

pub use todo::{CreateTodo, Todo, UpdateTodo};
pub use user::User;
