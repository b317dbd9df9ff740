//! MCP server implementation that handles JSON-RPC communication
//!
//! This module implements the actual MCP server that:
//! 1. Reads JSON-RPC requests line by line (stdin in production)
//! 2. Routes tool calls to the habit ledger
//! 3. Writes JSON-RPC responses line by line (stdout in production)

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::{HabitStorage, SqliteStorage};
use crate::tools::{self, ToolError};
use crate::{HabitFlowServer, Mutation, ServerError};

/// MCP server that handles communication with an MCP client
pub struct McpServer<S: HabitStorage = SqliteStorage> {
    /// The underlying habit tracker state
    habit_flow: HabitFlowServer<S>,
    /// Whether the client has completed the handshake
    initialized: bool,
}

impl<S: HabitStorage> McpServer<S> {
    /// Create a new MCP server
    pub fn new(habit_flow: HabitFlowServer<S>) -> Self {
        Self {
            habit_flow,
            initialized: false,
        }
    }

    pub fn habit_flow(&self) -> &HabitFlowServer<S> {
        &self.habit_flow
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve newline-delimited JSON-RPC until the reader is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        // Write response + newline
                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.id.is_null() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            );
        }

        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "HabitFlow MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(request.id, &result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        JsonRpcResponse::success(request.id, json!({ "tools": tool_definitions() }))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let args = Value::Object(tool_params.arguments.into_iter().collect());
        match self.call_tool(&tool_params.name, args) {
            Ok(result) => respond(request.id, &result),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_PARAMS,
                format!("Invalid arguments for '{}': {}", tool_params.name, e),
                None,
            ),
        }
    }

    /// Run one tool against the ledger and persist what it changed
    ///
    /// Argument errors are returned as `Err`; tool failures become error
    /// results.
    pub fn call_tool(&mut self, name: &str, args: Value) -> Result<ToolCallResult, serde_json::Error> {
        let server = &mut self.habit_flow;
        let today = server.clock.today();

        let outcome: Result<(String, Mutation), ToolError> = match name {
            "habit_create" => tools::create_habit(&mut server.ledger, parse(args)?)
                .map(|r| (r.message, Mutation::Habits)),
            "habit_log" => tools::log_habit(&mut server.ledger, server.clock.as_ref(), parse(args)?)
                .map(|r| (r.message, habits_if(r.changed))),
            "habit_undo" => tools::undo_log(&mut server.ledger, server.clock.as_ref(), parse(args)?)
                .map(|r| (r.message, habits_if(r.changed))),
            "habit_list" => tools::list_habits(&server.ledger, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_rename" => tools::rename_habit(&mut server.ledger, parse(args)?)
                .map(|r| (r.message, habits_if(r.changed))),
            "habit_delete" => tools::delete_habit(&mut server.ledger, parse(args)?)
                .map(|r| (r.message, habits_if(r.changed))),
            "habit_status" => tools::get_habit_status(&server.ledger, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_logs" => tools::get_logs(&server.ledger, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_logs_clear" => tools::clear_logs(&mut server.ledger, parse(args)?)
                .map(|r| (r.message, habits_if(r.changed))),
            "habit_analytics" => tools::get_analytics(&server.ledger, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_calendar" => tools::get_calendar(&server.ledger, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_export" => tools::export_logs(&server.ledger, &server.export_dir, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_insights" => tools::get_habit_insights(&server.ledger, today, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "habit_reminders" => tools::check_reminders(
                &server.ledger,
                &mut server.reminders,
                &server.profile.settings,
                today,
                parse(args)?,
            )
            .map(|r| (r.message, Mutation::None)),
            "profile_get" => tools::get_profile(&server.profile, parse(args)?)
                .map(|r| (r.message, Mutation::None)),
            "profile_update" => tools::update_profile(&mut server.profile, parse(args)?)
                .map(|r| (r.message, if r.changed { Mutation::Profile } else { Mutation::None })),
            _ => return Ok(ToolCallResult::error(format!("Unknown tool: {}", name))),
        };

        Ok(match outcome {
            Ok((mut message, mutation)) => {
                let persisted = server.commit(name, mutation);
                if server.profile.settings.dev_console {
                    message.push_str(&server.diagnostics(name, mutation, persisted));
                }
                ToolCallResult::success(message)
            }
            Err(e) => {
                warn!("Tool {} failed (code {}): {}", name, tool_error_code(&e), e);
                ToolCallResult::error(e.to_string())
            }
        })
    }
}

fn habits_if(changed: bool) -> Mutation {
    if changed {
        Mutation::Habits
    } else {
        Mutation::None
    }
}

fn parse<P: DeserializeOwned>(args: Value) -> Result<P, serde_json::Error> {
    serde_json::from_value(args)
}

fn respond<T: Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}

fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schemars::schema_for!(P))
        .unwrap_or_else(|_| json!({ "type": "object" }));
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Every tool this server offers
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new habit. Kind is constructive or destructive; counted habits take an amount and unit per log",
        ),
        tool::<tools::LogHabitParams>("habit_log", "Log activity on a habit for today"),
        tool::<tools::UndoLogParams>(
            "habit_undo",
            "Undo today's activity on a habit: the last entry for counted habits, or a number of units for tally habits",
        ),
        tool::<tools::ListHabitsParams>("habit_list", "List habits with totals and the last 7 days of activity"),
        tool::<tools::RenameHabitParams>("habit_rename", "Rename a habit"),
        tool::<tools::DeleteHabitParams>("habit_delete", "Delete a habit and its whole log history"),
        tool::<tools::StatusParams>("habit_status", "Dashboard summary: activity counts and the current streak"),
        tool::<tools::LogsParams>("habit_logs", "Recent log entries across habits, newest first"),
        tool::<tools::ClearLogsParams>("habit_logs_clear", "Clear the log history of every habit"),
        tool::<tools::AnalyticsParams>(
            "habit_analytics",
            "Daily, weekly, monthly or yearly activity series comparing up to 5 habits",
        ),
        tool::<tools::CalendarParams>("habit_calendar", "Month calendar marking the days with any activity"),
        tool::<tools::ExportParams>("habit_export", "Export logs to a CSV file (log feed or daily summary)"),
        tool::<tools::InsightsParams>("habit_insights", "Today's habit-building tip"),
        tool::<tools::RemindersParams>(
            "habit_reminders",
            "Check for constructive habits not logged today (reminds at most once a day)",
        ),
        tool::<tools::ProfileGetParams>("profile_get", "Show the user profile and settings"),
        tool::<tools::ProfileUpdateParams>("profile_update", "Update the user profile and settings"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FixedClock;
    use crate::storage::MemoryStorage;

    fn server() -> McpServer<MemoryStorage> {
        let habit_flow = HabitFlowServer::with_storage(
            MemoryStorage::new(),
            Box::new(FixedClock::at(2026, 10, 19, 8, 30, 0)),
            std::env::temp_dir(),
        )
        .unwrap();
        McpServer::new(habit_flow)
    }

    #[test]
    fn test_every_tool_is_listed_once() {
        let definitions = tool_definitions();
        assert_eq!(definitions.len(), 16);

        let mut names: Vec<&str> = definitions.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 16);

        let create = definitions.iter().find(|t| t.name == "habit_create").unwrap();
        assert!(create.input_schema["properties"]["name"].is_object());
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let mut server = server();
        let response = server
            .process_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_bad_arguments_are_invalid_params() {
        let mut server = server();
        let response = server
            .process_line(r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"habit_create","arguments":{"kind":"good"}}}"#)
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
    }

    #[test]
    fn test_log_persists_only_real_changes() {
        let mut server = server();
        let created = server
            .call_tool("habit_create", json!({"name": "Walk", "kind": "good"}))
            .unwrap();
        assert!(!created.is_error);
        let id = server.habit_flow().ledger().habits()[0].id.to_string();

        let undo = server.call_tool("habit_undo", json!({"habit_id": id})).unwrap();
        assert!(!undo.is_error);
        assert_eq!(server.habit_flow().storage().load_habits().unwrap()[0].total_logs, 0);

        server.call_tool("habit_log", json!({"habit_id": id, "amount": "3"})).unwrap();
        assert_eq!(server.habit_flow().storage().load_habits().unwrap()[0].total_logs, 3);
    }

    #[test]
    fn test_dev_console_adds_diagnostics() {
        let mut server = server();
        let plain = server.call_tool("habit_list", json!({})).unwrap();
        assert!(!plain.content[0].text.contains("[dev]"));

        let enabled = server.call_tool("profile_update", json!({"dev_console": true})).unwrap();
        assert!(enabled.content[0].text.contains("[dev] tool=profile_update mutation=Profile persisted=true"));

        server.call_tool("habit_create", json!({"name": "Walk", "kind": "good"})).unwrap();
        let listed = server.call_tool("habit_list", json!({})).unwrap();
        assert!(listed.content[0].text.contains("habits=1 entries=0"));
    }

    #[test]
    fn test_unknown_tool_and_habit() {
        let mut server = server();
        let unknown = server.call_tool("habit_teleport", json!({})).unwrap();
        assert!(unknown.is_error);

        let missing = server.call_tool("habit_log", json!({"habit_id": "nope"})).unwrap();
        assert!(missing.is_error);
        assert!(missing.content[0].text.contains("Habit not found"));
    }
}
