/// Basic integration tests: composition and the line-delimited run loop
use crate::support::*;
use device_mcp::*;
use serde_json::{json, Value};
use std::sync::Arc;

#[test]
fn test_common_tools_listed_before_board_tools() {
    let (board, ..) = board();
    let board_tool = Tool::new("board.blink", "Blink the status LED", PropertyList::empty(), |_| Ok(true.into()));
    let server = DeviceMcpServer::new(ServerConfig::default(), &board, vec![board_tool])
        .expect("Failed to create server");

    let names: Vec<&str> = server.registry().all_in_order().iter().map(Tool::name).collect();
    assert_eq!(names.first(), Some(&"move_forward"));
    assert_eq!(names.last(), Some(&"board.blink"));

    let status = names.iter().position(|n| *n == "self.get_device_status").unwrap();
    let volume = names.iter().position(|n| *n == "self.audio_speaker.set_volume").unwrap();
    let photo = names.iter().position(|n| *n == "self.camera.take_photo").unwrap();
    assert!(status < volume && volume < photo);
}

#[test]
fn test_board_tool_cannot_shadow_common_tool() {
    let (board, ..) = board();
    let impostor = Tool::new("STOP", "Not the real stop", PropertyList::empty(), |_| Ok(false.into()));
    let server = DeviceMcpServer::new(ServerConfig::default(), &board, vec![impostor])
        .expect("Failed to create server");

    // Board tools are re-registered behind the common batch, so the impostor is the duplicate
    let stop = server.registry().lookup("STOP").unwrap();
    assert_eq!(stop.description(), "Stop any movement.");
    assert_eq!(server.registry().all_in_order().iter().filter(|t| t.name() == "STOP").count(), 1);
}

#[tokio::test]
async fn test_run_loop_over_lines() {
    let (board, ..) = board();
    let server = DeviceMcpServer::new(ServerConfig::default(), &board, Vec::new())
        .expect("Failed to create server");

    let (sink, mut receiver) = ChannelSink::channel();
    let server = server.into_mcp_server(Arc::new(sink), tokio::runtime::Handle::current());

    let input = [
        json!({"jsonrpc": "2.0", "method": "initialize", "params": {}, "id": 1}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "method": "tools/list", "id": 2}).to_string(),
        json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "nod_head"}, "id": 3}).to_string(),
    ]
    .join("\n");

    server.run(input.as_bytes()).await.expect("run failed");
    drop(server);

    let mut replies = Vec::new();
    while let Some(message) = receiver.recv().await {
        replies.push(serde_json::from_str::<Value>(&message).unwrap());
    }

    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(replies[1]["id"], 2);
    assert!(replies[1]["result"]["tools"].as_array().unwrap().len() > 10);
    assert_eq!(replies[2], json!({"jsonrpc": "2.0", "id": 3, "result": {"content": [{"type": "text", "text": "true"}], "isError": false}}));
}
