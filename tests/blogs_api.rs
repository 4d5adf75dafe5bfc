use blogs_api::{App, Blog, BlogStore, JsonFile, Method, Request, Response, Router, Status, api, read_blogs};
use chrono::Local;
use serde_json::{Value, json};

fn router() -> Router {
    api::routes(App::in_memory(BlogStore::new()).into_shared())
}

async fn send(router: &Router, method: Method, path: &str, body: Value) -> Response {
    let body = if body.is_null() { Vec::new() } else { serde_json::to_vec(&body).unwrap() };
    router.handle(Request::new(method, path, body)).await
}

fn json_of(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

fn today() -> String {
    Local::now().date_naive().format("%d-%m-%Y").to_string()
}

fn valid() -> Value {
    json!({ "title": "T", "body": "B", "author": "A", "tags": ["x"] })
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let router = router();

    let res = send(&router, Method::Post, "/blogs", valid()).await;
    assert_eq!(res.status_code(), Status::Created);
    assert_eq!(res.header("location"), Some("/blogs/1"));
    let created = json_of(&res);
    assert_eq!(
        created,
        json!({ "id": 1, "title": "T", "body": "B", "author": "A", "created": today(), "tags": ["x"] })
    );

    let res = send(&router, Method::Put, "/blogs/1", json!({ "title": "T2" })).await;
    assert_eq!(res.status_code(), Status::Ok);
    let mut expected = created.clone();
    expected["title"] = json!("T2");
    assert_eq!(json_of(&res), expected);

    let res = send(&router, Method::Delete, "/blogs/1", Value::Null).await;
    assert_eq!(res.status_code(), Status::Ok);
    assert_eq!(json_of(&res), expected);

    let res = send(&router, Method::Get, "/blogs/1", Value::Null).await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn list_is_not_found_when_empty() {
    let router = router();
    let res = send(&router, Method::Get, "/blogs", Value::Null).await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn list_returns_records_in_insertion_order() {
    let router = router();
    for title in ["first", "second"] {
        let mut body = valid();
        body["title"] = json!(title);
        send(&router, Method::Post, "/blogs", body).await;
    }

    for path in ["/blogs", "/blogs/"] {
        let res = send(&router, Method::Get, path, Value::Null).await;
        assert_eq!(res.status_code(), Status::Ok);
        assert_eq!(res.header("content-type"), Some("application/json"));
        let blogs: Vec<Blog> = serde_json::from_slice(res.body()).unwrap();
        let titles: Vec<&str> = blogs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }
}

#[tokio::test]
async fn create_rejects_missing_fields_in_order() {
    let router = router();

    let res = send(&router, Method::Post, "/blogs", json!({ "body": "B", "author": "A" })).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert_eq!(res.body(), b"blog title is required");

    let res = send(&router, Method::Post, "/blogs", json!({ "title": "T", "body": "B", "author": "A", "tags": [] })).await;
    assert_eq!(res.status_code(), Status::BadRequest);
    assert_eq!(res.body(), b"blog must contain at least one tag");

    let res = send(&router, Method::Get, "/blogs", Value::Null).await;
    assert_eq!(res.status_code(), Status::NotFound);
}

#[tokio::test]
async fn create_ignores_client_ids() {
    let router = router();
    let mut body = valid();
    body["id"] = json!(42);

    let res = send(&router, Method::Post, "/blogs", body).await;
    assert_eq!(json_of(&res)["id"], 1);
}

#[tokio::test]
async fn bad_json_is_a_client_error() {
    let router = router();
    send(&router, Method::Post, "/blogs", valid()).await;

    let res = router.handle(Request::new(Method::Post, "/blogs", "{nope")).await;
    assert_eq!(res.status_code(), Status::BadRequest);

    let res = router.handle(Request::new(Method::Put, "/blogs/1", "")).await;
    assert_eq!(res.status_code(), Status::BadRequest);
}

#[tokio::test]
async fn update_changes_only_the_first_supplied_field() {
    let router = router();
    send(&router, Method::Post, "/blogs", valid()).await;

    let res = send(&router, Method::Put, "/blogs/1", json!({ "title": "T2", "body": "B2" })).await;
    let blog = json_of(&res);
    assert_eq!(blog["title"], "T2");
    assert_eq!(blog["body"], "B");
}

#[tokio::test]
async fn malformed_ids_are_bad_requests_and_unknown_ids_are_not_found() {
    let router = router();
    send(&router, Method::Post, "/blogs", valid()).await;

    for method in [Method::Get, Method::Put, Method::Delete] {
        let res = send(&router, method, "/blogs/abc", json!({ "title": "x" })).await;
        assert_eq!(res.status_code(), Status::BadRequest, "{method}");

        let res = send(&router, method, "/blogs/99", json!({ "title": "x" })).await;
        assert_eq!(res.status_code(), Status::NotFound, "{method}");
    }
}

#[tokio::test]
async fn unrouted_requests_are_not_found() {
    let router = router();
    let cases = [
        (Method::Delete, "/blogs"),
        (Method::Put, "/blogs"),
        (Method::Post, "/blogs/1"),
        (Method::Patch, "/blogs/1"),
        (Method::Get, "/blogs/1/comments"),
        (Method::Get, "/"),
    ];
    for (method, path) in cases {
        let res = send(&router, method, path, Value::Null).await;
        assert_eq!(res.status_code(), Status::NotFound, "{method} {path}");
    }
}

#[tokio::test]
async fn deleting_keeps_other_ids() {
    let router = router();
    for _ in 0..3 {
        send(&router, Method::Post, "/blogs", valid()).await;
    }

    send(&router, Method::Delete, "/blogs/2", Value::Null).await;

    let res = send(&router, Method::Get, "/blogs", Value::Null).await;
    let ids: Vec<u64> = serde_json::from_slice::<Vec<Blog>>(res.body())
        .unwrap()
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, [1, 3]);

    let res = send(&router, Method::Post, "/blogs", valid()).await;
    assert_eq!(json_of(&res)["id"], 4);
}

#[tokio::test]
async fn mutations_are_saved_and_reads_are_not() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blogs.json");
    let router = api::routes(App::load(JsonFile::new(&path)).into_shared());

    send(&router, Method::Get, "/blogs", Value::Null).await;
    assert!(!path.exists());

    send(&router, Method::Post, "/blogs", valid()).await;
    send(&router, Method::Post, "/blogs", valid()).await;
    assert_eq!(read_blogs(&path).unwrap().len(), 2);

    send(&router, Method::Put, "/blogs/2", json!({ "author": "Z" })).await;
    assert_eq!(read_blogs(&path).unwrap()[1].author, "Z");

    send(&router, Method::Delete, "/blogs/1", Value::Null).await;
    let saved = read_blogs(&path).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, 2);
}

#[tokio::test]
async fn health_checks() {
    let router = router();
    let res = send(&router, Method::Get, "/healthz", Value::Null).await;
    assert_eq!((res.status_code(), res.body()), (Status::Ok, &b"ok"[..]));
    let res = send(&router, Method::Get, "/readyz", Value::Null).await;
    assert_eq!((res.status_code(), res.body()), (Status::Ok, &b"ready"[..]));
}

#[tokio::test]
async fn create_is_a_server_error_once_ids_run_out() {
    let last: Blog = serde_json::from_value(json!({
        "id": u64::MAX, "title": "T", "body": "B", "author": "A", "created": "01-01-2024", "tags": ["x"]
    }))
    .unwrap();
    let router = api::routes(App::in_memory(BlogStore::from_blogs(vec![last])).into_shared());

    let res = send(&router, Method::Post, "/blogs", valid()).await;
    assert_eq!(res.status_code(), Status::InternalServerError);
    assert_eq!(res.body(), b"no blog ids left");

    let res = send(&router, Method::Get, "/blogs", Value::Null).await;
    assert_eq!(json_of(&res).as_array().map(Vec::len), Some(1));
}
