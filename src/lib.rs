#![doc = "The `todovault` library crate."]
#![doc = ""]
#![doc = "A minimal multi-user to-do list REST service: users register, authenticate"]
#![doc = "with a signed token carried in the `x-auth` header, and manage their own"]
#![doc = "to-do items through owner-scoped CRUD endpoints. The binary (`main.rs`)"]
#![doc = "builds the application from these modules."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
