use std::time::Duration;

use blogs_api::{App, BlogStore, Server, TempFile, api};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

async fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        let n = stream.read(&mut byte).await.unwrap();
        assert_eq!(n, 1, "connection closed before the response head ended");
        head.push(byte[0]);
    }
    String::from_utf8(head).unwrap()
}

#[tokio::test]
async fn shutdown_closes_idle_keep_alive_connections_and_removes_temp_file() {
    let temp = TempFile::new().unwrap();
    let temp_path = temp.path().to_owned();
    let app = App::persisted(BlogStore::new(), temp).into_shared();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(Server::serve_on(listener, api::routes(app), async {
        let _ = stopped.await;
    }));

    let mut client = TcpStream::connect(addr).await.unwrap();
    let body = r#"{"title":"T","body":"B","author":"A","tags":["x"]}"#;
    let request = format!(
        "POST /blogs HTTP/1.1\r\nhost: {addr}\r\ncontent-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
        body.len()
    );
    client.write_all(request.as_bytes()).await.unwrap();

    let head = read_head(&mut client).await;
    assert!(head.starts_with("HTTP/1.1 201"), "{head}");
    assert!(temp_path.exists());

    // The client keeps its connection open and sends nothing more.
    stop.send(()).unwrap();

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop with an idle connection open")
        .unwrap()
        .unwrap();

    assert!(!temp_path.exists());
}
