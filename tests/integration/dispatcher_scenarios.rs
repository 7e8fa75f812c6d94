/// JSON-RPC scenarios against a composed device server
use crate::support::*;
use device_mcp::board::AudioCodec;
use device_mcp::*;
use serde_json::json;
use std::time::Duration;

fn echo_tool() -> Tool {
    Tool::new(
        "slow_echo",
        "Waits a little, then echoes its number",
        PropertyList::new(vec![
            Property::new("n", PropertyType::Integer),
            Property::ranged_with_default("delay_ms", 0, 0, 500).unwrap(),
        ])
        .unwrap(),
        |args| {
            let delay = args.integer("delay_ms").unwrap_or(0) as u64;
            std::thread::sleep(Duration::from_millis(delay));
            Ok(ReturnValue::Integer(args.integer("n").unwrap_or(-1)))
        },
    )
}

#[tokio::test]
async fn test_initialize_reply_and_vision_capability() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    h.send(json!({
        "jsonrpc": "2.0",
        "method": "initialize",
        "params": {"capabilities": {"vision": {"url": "http://vision.local/explain", "token": "abc"}}},
        "id": 1
    }));
    let reply = h.reply().await;
    assert_eq!(
        reply,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "serverInfo": {"name": "device-mcp", "version": env!("CARGO_PKG_VERSION")}
            }
        })
    );
    assert_eq!(
        h.camera.explain_endpoint(),
        Some(("http://vision.local/explain".to_string(), "abc".to_string()))
    );

    h.send(json!({
        "jsonrpc": "2.0",
        "method": "tools/call",
        "params": {"name": "self.camera.take_photo", "arguments": {"question": "what is on the desk?"}},
        "id": 2
    }));
    let reply = h.reply().await;
    assert_eq!(reply["id"], 2);
    let payload: serde_json::Value = serde_json::from_str(result_text(&reply)).unwrap();
    assert_eq!(payload["question"], "what is on the desk?");
}

#[tokio::test]
async fn test_unknown_tool_keeps_id() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "x"}, "id": 42}));
    let reply = h.reply().await;
    assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 42, "error": {"message": "Unknown tool: x"}}));
}

#[tokio::test]
async fn test_concurrent_calls_correlate_by_id() {
    let mut h = harness(ServerConfig::default(), vec![echo_tool()]);

    // The first call is slower, so replies usually arrive out of order
    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "slow_echo", "arguments": {"n": 100, "delay_ms": 200}}, "id": 10}));
    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "slow_echo", "arguments": {"n": 200}}, "id": 11}));

    let mut replies = vec![h.reply().await, h.reply().await];
    replies.sort_by_key(|r| r["id"].as_i64());

    assert_eq!(replies[0]["id"], 10);
    assert_eq!(result_text(&replies[0]), "100");
    assert_eq!(replies[1]["id"], 11);
    assert_eq!(result_text(&replies[1]), "200");
}

#[tokio::test]
async fn test_list_pages_follow_cursor() {
    let names = ["a", "b", "c"];
    let board_tools: Vec<Tool> = names
        .iter()
        .map(|n| Tool::new(*n, "paged", PropertyList::empty(), |_| Ok(true.into())))
        .collect();

    // Measure the full first page, then shrink the budget to cut it in two
    let mut h = harness(ServerConfig::default(), board_tools.clone());
    h.send(json!({"jsonrpc": "2.0", "method": "tools/list", "id": 1}));
    let full = h.reply().await;
    let all: Vec<String> = full["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert!(full["result"].get("nextCursor").is_none());
    assert_eq!(&all[all.len() - 3..], &["a", "b", "c"]);

    let config = ServerConfig { payload_limit: 1200, ..ServerConfig::default() };
    let mut h = harness(config, board_tools);
    let mut seen = Vec::new();
    let mut cursor = String::new();
    for id in 0..all.len() as i64 {
        h.send(json!({"jsonrpc": "2.0", "method": "tools/list", "params": {"cursor": cursor}, "id": id}));
        let raw = h.raw_reply().await;
        assert!(raw.len() <= 1200, "reply of {} bytes exceeds the payload limit", raw.len());
        let reply: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(reply["id"], id);
        for tool in reply["result"]["tools"].as_array().unwrap() {
            seen.push(tool["name"].as_str().unwrap().to_string());
        }
        match reply["result"]["nextCursor"].as_str() {
            Some(next) => cursor = next.to_string(),
            None => break,
        }
    }
    assert_eq!(seen, all);
}

#[tokio::test]
async fn test_oversized_descriptor_reports_error() {
    let config = ServerConfig { payload_limit: 100, ..ServerConfig::default() };
    let mut h = harness(config, Vec::new());

    h.send(json!({"jsonrpc": "2.0", "method": "tools/list", "params": {}, "id": 5}));
    let reply = h.reply().await;
    assert_eq!(reply["id"], 5);
    assert_eq!(
        error_message(&reply),
        "Failed to add tool move_forward because of payload size limit"
    );
}

#[tokio::test]
async fn test_volume_range_is_enforced() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    for (id, volume) in [(1, 0), (2, 100)] {
        h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
            "params": {"name": "self.audio_speaker.set_volume", "arguments": {"volume": volume}}, "id": id}));
        let reply = h.reply().await;
        assert_eq!(result_text(&reply), "true");
    }
    assert_eq!(h.audio.output_volume(), 100);

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "self.audio_speaker.set_volume", "arguments": {"volume": 101}}, "id": 3}));
    let reply = h.reply().await;
    assert_eq!(error_message(&reply), "Invalid argument: volume (value 101 is above maximum 100)");

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "self.audio_speaker.set_volume", "arguments": {"volume": -1}}, "id": 4}));
    let reply = h.reply().await;
    assert_eq!(error_message(&reply), "Invalid argument: volume (value -1 is below minimum 0)");

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "self.audio_speaker.set_volume", "arguments": {}}, "id": 5}));
    let reply = h.reply().await;
    assert_eq!(error_message(&reply), "Missing valid argument: volume");
    assert_eq!(h.audio.output_volume(), 100);
}

#[tokio::test]
async fn test_all_default_arguments_round_trip() {
    let defaults = Tool::new(
        "describe",
        "All arguments have defaults",
        PropertyList::new(vec![
            Property::with_default("verbose", false),
            Property::with_default("label", "desk"),
            Property::ranged_with_default("count", 2, 1, 3).unwrap(),
        ])
        .unwrap(),
        |args| {
            Ok(format!(
                "{}:{}:{}",
                args.boolean("verbose").unwrap_or(true),
                args.string("label").unwrap_or_default(),
                args.integer("count").unwrap_or_default()
            )
            .into())
        },
    );
    let mut h = harness(ServerConfig::default(), vec![defaults]);

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "describe", "arguments": {}}, "id": 8}));
    let reply = h.reply().await;
    assert_eq!(result_text(&reply), "false:desk:2");
}

#[tokio::test]
async fn test_tools_call_validation_errors() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    let cases = [
        (json!({"jsonrpc": "2.0", "method": "tools/call", "id": 1}), "Missing params"),
        (json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": 3}, "id": 2}), "Missing name"),
        (json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "STOP", "arguments": [1]}, "id": 3}), "Invalid arguments"),
        (json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "STOP", "stackSize": "big"}, "id": 4}), "Invalid stackSize"),
        (json!({"jsonrpc": "2.0", "method": "resources/list", "id": 5}), "Method not implemented: resources/list"),
        (json!({"jsonrpc": "2.0", "method": "tools/list", "params": "c", "id": 6}), "Invalid params"),
        (json!({"jsonrpc": "1.0", "method": "tools/list", "id": 7}), "Invalid JSON-RPC version"),
    ];

    for (request, message) in cases {
        let id = request["id"].clone();
        h.send(request);
        let reply = h.reply().await;
        assert_eq!(reply["id"], id);
        assert_eq!(error_message(&reply), message);
    }

    h.send(json!({"jsonrpc": "2.0", "method": "tools/list", "id": "seven"}));
    let reply = h.reply().await;
    assert_eq!(reply, json!({"jsonrpc": "2.0", "id": null, "error": {"message": "Invalid id"}}));
}

#[tokio::test]
async fn test_notifications_and_garbage_get_no_reply() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    h.send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}));
    h.server.handle_message("{not json");
    h.server.handle_message("[1, 2, 3]");
    h.server.handle_message("   ");
    assert!(h.is_silent());

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call", "params": {"name": "STOP", "stackSize": 8192}, "id": 9}));
    let reply = h.reply().await;
    assert_eq!(result_text(&reply), "true");
    assert_eq!(h.motion.sent(), b"0".to_vec());
}

#[tokio::test]
async fn test_theme_fault_is_execution_error() {
    let mut h = harness(ServerConfig::default(), Vec::new());

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "self.screen.set_theme", "arguments": {"theme": "neon"}}, "id": 12}));
    let reply = h.reply().await;
    assert_eq!(reply, json!({"jsonrpc": "2.0", "id": 12, "error": {"message": "Invalid theme: neon"}}));

    h.send(json!({"jsonrpc": "2.0", "method": "tools/call",
        "params": {"name": "self.get_device_status"}, "id": 13}));
    let reply = h.reply().await;
    let status: serde_json::Value = serde_json::from_str(result_text(&reply)).unwrap();
    assert_eq!(status["screen"]["theme"], "light");
}
