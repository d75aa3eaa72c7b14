//! MCP server implementation
//!
//! Exposes the entry, user, and stats services as MCP tools over stdio.
//! This layer only maps tool parameters onto the services; everything with
//! behavior lives below it.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::Database;
use crate::store::{EntryStore, StoreError, UserStore};
use crate::tools::stats::StatsService;
use crate::tools::{entries, status, users, ServiceError};

/// Profile used when tools are called without an explicit user_id
const DEFAULT_PROFILE_EMAIL: &str = "default@local";

/// TDEE Tracker MCP service
#[derive(Clone)]
pub struct TrackerService {
    database: Database,
    entry_store: EntryStore,
    user_store: UserStore,
    stats: StatsService,
    default_user_id: i64,
    tool_router: ToolRouter<TrackerService>,
}

impl TrackerService {
    /// Build the service, ensuring the default profile exists
    pub async fn new(config: &Config, database: Database) -> Result<Self, StoreError> {
        let entry_store = EntryStore::new(database.clone());
        let user_store = UserStore::new(database.clone());
        let default_user = user_store
            .get_or_create(DEFAULT_PROFILE_EMAIL.to_string())
            .await?;
        let stats = StatsService::new(entry_store.clone(), config.stats);

        Ok(Self {
            database,
            entry_store,
            user_store,
            stats,
            default_user_id: default_user.id,
            tool_router: Self::tool_router(),
        })
    }

    fn resolve_user(&self, user_id: Option<i64>) -> i64 {
        user_id.unwrap_or(self.default_user_id)
    }
}

fn to_mcp_error(err: ServiceError) -> McpError {
    match err {
        ServiceError::Validation(e) => McpError::invalid_params(e.to_string(), None),
        ServiceError::Store(
            e @ (StoreError::DuplicateEntry { .. } | StoreError::DuplicateEmail { .. }),
        ) => McpError::invalid_params(e.to_string(), None),
        ServiceError::Store(e) => McpError::internal_error(e.to_string(), None),
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Response Structs
// ============================================================================

#[derive(Debug, Serialize)]
struct DeleteEntryResponse {
    id: i64,
    deleted: bool,
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateUserParams {
    /// Email address identifying the new user
    pub email: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUserParams {
    /// User ID
    pub id: i64,
}

// ============================================================================
// Entry Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogEntryParams {
    /// User ID (defaults to the local profile)
    pub user_id: Option<i64>,
    /// Calendar day being logged (YYYY-MM-DD)
    pub date: String,
    /// Body weight in lbs
    pub weight: f64,
    /// Total calorie intake for the day
    pub calories: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetEntryParams {
    /// Entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEntriesParams {
    /// User ID (defaults to the local profile)
    pub user_id: Option<i64>,
    /// Maximum results (default 50, max 200)
    pub limit: Option<i64>,
    /// Offset for pagination (default 0)
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListEntriesByDateRangeParams {
    /// User ID (defaults to the local profile)
    pub user_id: Option<i64>,
    /// Start date, inclusive (YYYY-MM-DD)
    pub start_date: String,
    /// End date, inclusive (YYYY-MM-DD)
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateEntryParams {
    /// Entry ID
    pub id: i64,
    /// New calendar day (YYYY-MM-DD)
    pub date: Option<String>,
    /// New body weight in lbs
    pub weight: Option<f64>,
    /// New calorie intake
    pub calories: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteEntryParams {
    /// Entry ID
    pub id: i64,
}

// ============================================================================
// Stats Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TdeeStatsParams {
    /// User ID (defaults to the local profile)
    pub user_id: Option<i64>,
    /// Analysis window in days (default 28)
    pub window_days: Option<i64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl TrackerService {
    // --- Status ---

    #[tool(
        description = "Get service status: database connectivity, schema version, and build info"
    )]
    async fn status(&self) -> Result<CallToolResult, McpError> {
        let report = status::status_report(&self.database).await;
        json_result(&report)
    }

    // --- Users ---

    #[tool(description = "Create a user profile for tracking entries")]
    async fn create_user(
        &self,
        Parameters(p): Parameters<CreateUserParams>,
    ) -> Result<CallToolResult, McpError> {
        let user = users::create_user(&self.user_store, &p.email)
            .await
            .map_err(to_mcp_error)?;
        json_result(&user)
    }

    #[tool(description = "Get a user profile by ID")]
    async fn get_user(
        &self,
        Parameters(p): Parameters<GetUserParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = users::get_user(&self.user_store, p.id)
            .await
            .map_err(to_mcp_error)?;
        match result {
            Some(user) => json_result(&user),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "User not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List all user profiles")]
    async fn list_users(&self) -> Result<CallToolResult, McpError> {
        let result = users::list_users(&self.user_store)
            .await
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Entries ---

    #[tool(
        description = "Log the daily entry (body weight in lbs and calorie intake) for a date. Replaces the stored values if that date is already logged."
    )]
    async fn log_entry(
        &self,
        Parameters(p): Parameters<LogEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let user_id = self.resolve_user(p.user_id);
        let entry = entries::log_entry(&self.entry_store, user_id, &p.date, p.weight, p.calories)
            .await
            .map_err(to_mcp_error)?;
        json_result(&entry)
    }

    #[tool(description = "Get an entry by ID")]
    async fn get_entry(
        &self,
        Parameters(p): Parameters<GetEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = entries::get_entry(&self.entry_store, p.id)
            .await
            .map_err(to_mcp_error)?;
        match result {
            Some(entry) => json_result(&entry),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Entry not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "List a user's entries, newest first, with pagination")]
    async fn list_entries(
        &self,
        Parameters(p): Parameters<ListEntriesParams>,
    ) -> Result<CallToolResult, McpError> {
        let user_id = self.resolve_user(p.user_id);
        let result = entries::list_entries(&self.entry_store, user_id, p.limit, p.offset)
            .await
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "List a user's entries within a date range (inclusive), newest first")]
    async fn list_entries_by_date_range(
        &self,
        Parameters(p): Parameters<ListEntriesByDateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        let user_id = self.resolve_user(p.user_id);
        let result = entries::list_entries_in_range(
            &self.entry_store,
            user_id,
            &p.start_date,
            &p.end_date,
        )
        .await
        .map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Update an entry's date, weight, or calories")]
    async fn update_entry(
        &self,
        Parameters(p): Parameters<UpdateEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = entries::update_entry(
            &self.entry_store,
            p.id,
            p.date.as_deref(),
            p.weight,
            p.calories,
        )
        .await
        .map_err(to_mcp_error)?;
        match result {
            Some(entry) => json_result(&entry),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Entry not found", "id": {}}}"#,
                p.id
            ))])),
        }
    }

    #[tool(description = "Delete an entry")]
    async fn delete_entry(
        &self,
        Parameters(p): Parameters<DeleteEntryParams>,
    ) -> Result<CallToolResult, McpError> {
        let deleted = entries::delete_entry(&self.entry_store, p.id)
            .await
            .map_err(to_mcp_error)?;
        json_result(&DeleteEntryResponse { id: p.id, deleted })
    }

    // --- Stats ---

    #[tool(
        description = "Estimate TDEE (total daily energy expenditure) and weight trend from the user's daily entries over a rolling window (default 28 days). Needs at least 3 logged days in the window."
    )]
    async fn get_tdee_stats(
        &self,
        Parameters(p): Parameters<TdeeStatsParams>,
    ) -> Result<CallToolResult, McpError> {
        let user_id = self.resolve_user(p.user_id);
        let report = self
            .stats
            .tdee_stats(user_id, p.window_days)
            .await
            .map_err(to_mcp_error)?;
        json_result(&report)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for TrackerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "tdee-tracker".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("TDEE Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "TDEE Tracker - daily weight and calorie logging with TDEE estimation. \
                 Log one entry per day with log_entry (logging the same date again replaces it). \
                 Entries: log_entry, get_entry, list_entries, list_entries_by_date_range, \
                 update_entry, delete_entry. \
                 Stats: get_tdee_stats estimates maintenance calories and the weight trend \
                 (gaining/losing/maintaining) from the last N days; it needs at least 3 logged \
                 days in the window. \
                 Users: create_user/get_user/list_users; tools fall back to the local profile \
                 when user_id is omitted. \
                 Service: status."
                    .into(),
            ),
        }
    }
}
