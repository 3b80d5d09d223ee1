//! Integration tests for the WebSocket transport: a real server and client
//! exchanging frames over a loopback socket.

#![cfg(feature = "websocket")]

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use wyrmgate_transport::{Connection, WebSocketListener};

async fn connect_client(
    addr: std::net::SocketAddr,
) -> tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
> {
    let url = format!("ws://{addr}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("client should connect");
    ws
}

#[tokio::test]
async fn test_websocket_send_and_receive_round_trip() {
    // Port 0: let the OS pick, then read it back for the client.
    let listener = WebSocketListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr");

    let server = tokio::spawn(async move {
        listener.accept().await.expect("should accept")
    });
    let mut client = connect_client(addr).await;
    let conn = server.await.expect("accept task");

    assert!(conn.id().into_inner() > 0);

    conn.send(b"hello from server").await.expect("send");
    let msg = client.next().await.unwrap().unwrap();
    assert_eq!(msg.into_data().as_ref(), b"hello from server");

    client
        .send(Message::Binary(b"hello from client".to_vec().into()))
        .await
        .unwrap();
    let received = conn.recv().await.expect("recv").expect("some data");
    assert_eq!(received, b"hello from client");

    conn.close().await.expect("close");
}

#[tokio::test]
async fn test_websocket_recv_returns_none_on_client_close() {
    let listener = WebSocketListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr");

    let server = tokio::spawn(async move {
        listener.accept().await.expect("should accept")
    });
    let mut client = connect_client(addr).await;
    let conn = server.await.expect("accept task");

    client.send(Message::Close(None)).await.unwrap();

    let result = conn.recv().await.expect("recv should not error");
    assert!(result.is_none(), "clean close should surface as None");
}

#[tokio::test]
async fn test_websocket_text_frames_surface_as_bytes() {
    // Browser clients send JSON as text frames; the codec layer only sees
    // bytes either way.
    let listener = WebSocketListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let addr = listener.local_addr().expect("should have local addr");

    let server = tokio::spawn(async move {
        listener.accept().await.expect("should accept")
    });
    let mut client = connect_client(addr).await;
    let conn = server.await.expect("accept task");

    client
        .send(Message::Text(r#"{"type":"attach"}"#.into()))
        .await
        .unwrap();

    let received = conn.recv().await.expect("recv").expect("some data");
    assert_eq!(received, br#"{"type":"attach"}"#);
}
