/// Integration tests driving the MCP server end to end
use habitflow_mcp::mcp::protocol::{error_codes, JsonRpcResponse};
use habitflow_mcp::*;
use serde_json::{json, Value};
use tempfile::TempDir;

#[cfg(test)]
mod server_integration_tests {
    use super::*;

    fn memory_server(dir: &TempDir) -> McpServer<MemoryStorage> {
        let habit_flow = HabitFlowServer::with_storage(
            MemoryStorage::new(),
            Box::new(FixedClock::at(2026, 10, 19, 9, 15, 0)),
            dir.path().to_path_buf(),
        )
        .expect("Failed to create server");
        McpServer::new(habit_flow)
    }

    async fn call(server: &mut McpServer<MemoryStorage>, id: u64, tool: &str, args: Value) -> JsonRpcResponse {
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": tool, "arguments": args }
        });
        server
            .process_line(&request.to_string())
            .await
            .expect("Requests with an id get a response")
    }

    fn text(response: &JsonRpcResponse) -> String {
        let result = response.result.as_ref().expect("Expected a result");
        result["content"][0]["text"].as_str().unwrap_or_default().to_string()
    }

    fn is_error(response: &JsonRpcResponse) -> bool {
        response.result.as_ref().map_or(true, |r| r["isError"] == json!(true))
    }

    #[tokio::test]
    async fn test_initialize_handshake() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#)
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "HabitFlow MCP");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);

        let ack = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(ack.is_none());
        assert!(server.is_initialized());

        let tools = server
            .process_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
            .await
            .unwrap()
            .result
            .unwrap();
        let tools = tools["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 16);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        let garbage = server.process_line("{not json").await.unwrap();
        assert_eq!(garbage.error.unwrap().code, error_codes::PARSE_ERROR);

        let unknown = server
            .process_line(r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(unknown.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        assert!(server.process_line("   \n").await.is_none());
    }

    #[tokio::test]
    async fn test_habit_workflow() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        let created = call(
            &mut server,
            1,
            "habit_create",
            json!({"name": "Read", "kind": "constructive", "mode": "counted", "unit": "pages"}),
        )
        .await;
        assert!(!is_error(&created));
        let id = server.habit_flow().ledger().habits()[0].id.to_string();

        let logged = call(&mut server, 2, "habit_log", json!({"habit_id": id, "amount": 12})).await;
        assert!(text(&logged).contains("Streak: 1 day"));
        call(&mut server, 3, "habit_log", json!({"habit_id": id, "amount": "8"})).await;

        let habit = &server.habit_flow().ledger().habits()[0];
        assert_eq!(habit.total_logs, 20);
        assert_eq!(habit.day_buckets[0].entries.len(), 2);

        // Counted undo removes the most recent entry only
        call(&mut server, 4, "habit_undo", json!({"habit_id": id})).await;
        assert_eq!(server.habit_flow().ledger().habits()[0].total_logs, 12);

        let status = call(&mut server, 5, "habit_status", json!({})).await;
        assert!(!is_error(&status));

        let saved = server.habit_flow().storage().load_habits().unwrap();
        assert_eq!(saved[0].total_logs, 12);

        let deleted = call(&mut server, 6, "habit_delete", json!({"habit_id": id})).await;
        assert!(!is_error(&deleted));
        assert!(server.habit_flow().storage().load_habits().unwrap().is_empty());

        let missing = call(&mut server, 7, "habit_log", json!({"habit_id": id})).await;
        assert!(is_error(&missing));
    }

    #[tokio::test]
    async fn test_export_writes_csv() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        call(&mut server, 1, "habit_create", json!({"name": "Snacking", "kind": "bad"})).await;
        let id = server.habit_flow().ledger().habits()[0].id.to_string();
        call(&mut server, 2, "habit_log", json!({"habit_id": id, "amount": 2})).await;

        let exported = call(&mut server, 3, "habit_export", json!({"flow": "daily_summary"})).await;
        assert!(!is_error(&exported));

        let path = dir.path().join("habitflow_pro_logs_2026-10-19.csv");
        let csv = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Snacking,2026-10-19,2,Bad");
    }

    #[tokio::test]
    async fn test_sqlite_ledger_survives_restart() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("habitflow.db");

        {
            let habit_flow = HabitFlowServer::new(db_path.clone(), dir.path().to_path_buf())
                .await
                .expect("Failed to create first server");
            let mut server = McpServer::new(habit_flow);
            let created = server
                .call_tool("habit_create", json!({"name": "Stretch", "kind": "good"}))
                .unwrap();
            assert!(!created.is_error);
            let id = server.habit_flow().ledger().habits()[0].id.to_string();
            server.call_tool("habit_log", json!({"habit_id": id})).unwrap();
            server
                .call_tool("profile_update", json!({"name": "Robin"}))
                .unwrap();
        }

        let reopened = HabitFlowServer::new(db_path, dir.path().to_path_buf())
            .await
            .expect("Failed to reopen server");
        assert_eq!(reopened.ledger().habits().len(), 1);
        assert_eq!(reopened.ledger().habits()[0].name, "Stretch");
        assert_eq!(reopened.ledger().habits()[0].total_logs, 1);
        assert_eq!(reopened.profile().name, "Robin");
    }

    #[test]
    fn test_fresh_database_starts_empty() {
        let dir = TempDir::new().unwrap();
        let server = tokio_test::block_on(HabitFlowServer::new(
            dir.path().join("fresh.db"),
            dir.path().to_path_buf(),
        ))
        .expect("Failed to create server");

        assert!(server.ledger().is_empty());
        assert!(server.profile().name.is_empty());
        assert_eq!(server.export_dir(), dir.path());
    }

    #[tokio::test]
    async fn test_persistence_off_keeps_changes_in_memory() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        call(&mut server, 1, "profile_update", json!({"persistence": false})).await;
        call(&mut server, 2, "habit_create", json!({"name": "Walk", "kind": "good"})).await;

        assert_eq!(server.habit_flow().ledger().habits().len(), 1);
        assert!(server.habit_flow().storage().load_habits().unwrap().is_empty());
        assert!(!server.habit_flow().storage().load_profile().unwrap().settings.persistence);
    }

    #[tokio::test]
    async fn test_serve_over_buffers() {
        let dir = TempDir::new().unwrap();
        let mut server = memory_server(&dir);

        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"habit_list","arguments":{}}}"#,
            "\n"
        );
        let mut output = Vec::new();
        server.serve(input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["isError"], false);
    }
}
