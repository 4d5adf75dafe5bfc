//! # blogs-api
//!
//! A small JSON REST API over an in-memory collection of blog posts,
//! optionally saved to a JSON file after every change.
//!
//! The pieces, leaves first:
//!
//! - [`Blog`] / [`BlogData`]: the stored record and the client payload.
//! - [`BlogStore`]: ordered records with id assignment and CRUD.
//! - [`App`]: the store behind one lock plus its [`Persistence`] hook.
//! - [`Router`]: one radix tree per method, via [`matchit`].
//! - [`api`]: the `/blogs` handlers and error-to-status translation.
//! - [`Server`]: hyper on tokio, with graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use blogs_api::{App, BlogStore, Server, api};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = App::in_memory(BlogStore::new()).into_shared();
//!
//!     Server::bind("127.0.0.1:4000".parse().unwrap())
//!         .serve(api::routes(app))
//!         .await
//!         .unwrap();
//! }
//! ```

mod app;
mod blog;
mod config;
mod error;
mod handler;
mod method;
mod persist;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod api;
pub mod health;

pub use app::App;
pub use blog::{Blog, BlogData, Field};
pub use config::{Config, PersistMode};
pub use error::{ApiError, Error, PersistenceError, StoreError};
pub use handler::Handler;
pub use method::Method;
pub use persist::{JsonFile, Persistence, TempFile, read_blogs};
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder, to_pretty_json};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::BlogStore;
