//! The blog endpoints.
//!
//! | Method | Path          | Success       |
//! |--------|---------------|---------------|
//! | GET    | `/blogs`      | 200 + array   |
//! | POST   | `/blogs`      | 201 + object  |
//! | GET    | `/blogs/{id}` | 200 + object  |
//! | PUT    | `/blogs/{id}` | 200 + object  |
//! | DELETE | `/blogs/{id}` | 200 + object  |
//!
//! Store and routing failures are turned into responses by the
//! [`IntoResponse`] impls at the bottom of this file.

use std::future::Future;
use std::sync::Arc;

use http::header::{HeaderValue, LOCATION};

use crate::app::App;
use crate::blog::{Blog, BlogData};
use crate::error::{ApiError, StoreError};
use crate::handler::Handler;
use crate::health;
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;

/// The full route table: blog CRUD plus health checks.
pub fn routes(app: Arc<App>) -> Router {
    Router::new()
        .on_each(Method::Get, &["/blogs", "/blogs/"], with_app(&app, list_blogs))
        .on_each(Method::Post, &["/blogs", "/blogs/"], with_app(&app, create_blog))
        .on(Method::Get, "/blogs/{id}", with_app(&app, view_blog))
        .on(Method::Put, "/blogs/{id}", with_app(&app, update_blog))
        .on(Method::Delete, "/blogs/{id}", with_app(&app, delete_blog))
        .on(Method::Get, "/healthz", health::liveness)
        .on(Method::Get, "/readyz", health::readiness)
}

/// Adapts a handler that needs the shared [`App`] to the router's
/// `Fn(Request)` shape.
fn with_app<F, Fut, R>(app: &Arc<App>, f: F) -> impl Handler + Clone
where
    F: Fn(Arc<App>, Request) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    let app = Arc::clone(app);
    move |req: Request| f(Arc::clone(&app), req)
}

// GET /blogs
async fn list_blogs(app: Arc<App>, _req: Request) -> Result<Json<Vec<Blog>>, ApiError> {
    let blogs = app.read(|s| s.get_all().map(|blogs| blogs.to_vec())).await?;
    Ok(Json::ok(blogs))
}

// GET /blogs/{id}
async fn view_blog(app: Arc<App>, req: Request) -> Result<Json<Blog>, ApiError> {
    let id = req.id()?;
    let blog = app.read(|s| s.get(id).cloned()).await?;
    Ok(Json::ok(blog))
}

// POST /blogs
async fn create_blog(app: Arc<App>, req: Request) -> Result<Response, ApiError> {
    let data: BlogData = req.json()?;
    let blog = app.write(|s| s.create(data).cloned()).await?;

    let mut res = Json::created(&blog).into_response();
    if let Ok(location) = HeaderValue::try_from(format!("/blogs/{}", blog.id)) {
        res.headers.insert(LOCATION, location);
    }
    Ok(res)
}

// PUT /blogs/{id}
async fn update_blog(app: Arc<App>, req: Request) -> Result<Json<Blog>, ApiError> {
    let id = req.id()?;
    let data: BlogData = req.json()?;
    let blog = app.write(|s| s.update(id, data).cloned()).await?;
    Ok(Json::ok(blog))
}

// DELETE /blogs/{id}
async fn delete_blog(app: Arc<App>, req: Request) -> Result<Json<Blog>, ApiError> {
    let id = req.id()?;
    let blog = app.write(|s| s.delete(id)).await?;
    Ok(Json::ok(blog))
}

// ── Error translation ─────────────────────────────────────────────────────────

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation { .. } => Status::BadRequest,
            Self::NotFound(_) | Self::Empty => Status::NotFound,
            Self::IdsExhausted => Status::InternalServerError,
        };
        Response::builder().status(status).text(self.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Store(e) => return e.into_response(),
            Self::MalformedId(_) | Self::InvalidBody(_) => Status::BadRequest,
            Self::RouteNotFound => Status::NotFound,
        };
        Response::builder().status(status).text(self.to_string())
    }
}
