//! MCP Server for library-mcp
//!
//! MCP Protocol (stdio) <-> application::LibraryService / LibraryView
//!
//! 5 tools: add_book, remove_book, search_books, view_library, statistics

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::{
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
    ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;
use crate::application::render::{LibraryView, EMPTY_LIBRARY};
use crate::application::service::{LibraryService, RemoveOutcome};
use crate::domain::model::book::AddBookRequest;
use crate::domain::model::catalog::SearchField;
use crate::infra::json_store::JsonCatalogRepository;

// =============================================================================
// Public entry point
// =============================================================================

/// MCP Serverを起動する。library_pathは蔵書JSONファイル。
pub async fn run(library_path: PathBuf) -> anyhow::Result<()> {
    tracing::info!(path = %library_path.display(), "starting library-mcp");
    let service = LibraryService::open(JsonCatalogRepository::new(library_path))?;
    let server = LibraryMcpServer::new(service);
    let running = server.serve(stdio()).await?;
    running.waiting().await?;
    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

type SharedService = Arc<Mutex<LibraryService<JsonCatalogRepository>>>;

#[derive(Clone)]
struct LibraryMcpServer {
    service: SharedService,
    tool_router: ToolRouter<Self>,
}

impl LibraryMcpServer {
    fn new(service: LibraryService<JsonCatalogRepository>) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
            tool_router: Self::tool_router(),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, LibraryService<JsonCatalogRepository>>, McpError> {
        self.service
            .lock()
            .map_err(|_| McpError::internal_error("Lock poisoned", None))
    }

    /// ドメイン違反は入力ミス、それ以外はサーバ側の失敗として返す。
    fn to_mcp_error(e: AppError) -> McpError {
        match e {
            AppError::Domain(_) => McpError::invalid_params(format!("{e}"), None),
            AppError::Storage(_) => {
                tracing::error!(error = %e, "library operation failed");
                McpError::internal_error(format!("{e}"), None)
            }
        }
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LibraryMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "library-mcp".to_string(),
                title: Some("Personal Library Manager".to_string()),
                description: Some(
                    "Personal book catalog stored in a JSON file. \
                     Add, remove, search, and list books, and track how many you have read."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Manage a personal book library.\n\
                 \n\
                 Tools: `add_book` to record a book, `view_library` to list all books with \
                 their positions, `search_books` by title or author, `remove_book` by exact \
                 title (removes every copy with that title), `statistics` for the read ratio."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

fn parse_search_field(s: &str) -> Result<SearchField, McpError> {
    match s.to_lowercase().as_str() {
        "title" => Ok(SearchField::Title),
        "author" => Ok(SearchField::Author),
        other => Err(McpError::invalid_params(
            format!("Unknown search field: '{other}'. Use: title, author"),
            None,
        )),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpAddBookRequest {
    #[schemars(description = "Book title")]
    pub title: String,
    #[schemars(description = "Author name")]
    pub author: String,
    #[schemars(description = "Publication year (0-2100)")]
    pub year: i64,
    #[schemars(description = "Genre (free text)")]
    pub genre: String,
    #[schemars(description = "Have you read this book? (default: false)")]
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpRemoveBookRequest {
    #[schemars(
        description = "Exact title of the book to remove (case-sensitive). Every book with this title is removed."
    )]
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpSearchRequest {
    #[schemars(description = "Text to search for (case-insensitive substring)")]
    pub term: String,
    #[schemars(description = "Field to search: 'title' (default) or 'author'")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpEmptyRequest {}

// =============================================================================
// Tool implementations
// =============================================================================

#[tool_router]
impl LibraryMcpServer {
    #[tool(
        name = "add_book",
        description = "Add a new book to the library. Duplicate titles are allowed.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = false
        )
    )]
    async fn add_book(
        &self,
        Parameters(req): Parameters<McpAddBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let book = svc
            .add_book(AddBookRequest {
                title: req.title,
                author: req.author,
                year: req.year,
                genre: req.genre,
                read: req.read,
            })
            .map_err(Self::to_mcp_error)?;

        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_added(&book),
        )]))
    }

    #[tool(
        name = "remove_book",
        description = "Remove every book whose title exactly matches the given title. Use `view_library` to see titles.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_book(
        &self,
        Parameters(req): Parameters<McpRemoveBookRequest>,
    ) -> Result<CallToolResult, McpError> {
        let mut svc = self.service()?;
        let outcome = svc.remove_book(&req.title).map_err(Self::to_mcp_error)?;

        let text = match outcome {
            RemoveOutcome::EmptyLibrary => EMPTY_LIBRARY.to_string(),
            RemoveOutcome::Removed(0) => format!(
                "No book titled '{}'. Available titles: {}",
                req.title,
                svc.titles().join(", ")
            ),
            RemoveOutcome::Removed(n) => {
                format!("Book removed successfully! ({n} removed: '{}')", req.title)
            }
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(
        name = "search_books",
        description = "Search books by title or author (case-insensitive substring).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn search_books(
        &self,
        Parameters(req): Parameters<McpSearchRequest>,
    ) -> Result<CallToolResult, McpError> {
        let field = req
            .field
            .as_deref()
            .map(parse_search_field)
            .transpose()?
            .unwrap_or(SearchField::Title);
        if req.term.is_empty() {
            return Ok(CallToolResult::success(vec![Content::text(
                LibraryView::render_search_prompt(field),
            )]));
        }

        let svc = self.service()?;
        let results = svc.search(&req.term, field);
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_search_results(&results),
        )]))
    }

    #[tool(
        name = "view_library",
        description = "List every book in insertion order with its position (1-based).",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn view_library(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        let listing = svc.list_all();
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_library(&listing),
        )]))
    }

    #[tool(
        name = "statistics",
        description = "Show the total number of books and the percentage read.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn statistics(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpEmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let svc = self.service()?;
        let stats = svc.statistics();
        Ok(CallToolResult::success(vec![Content::text(
            LibraryView::render_statistics(&stats),
        )]))
    }
}

// =============================================================================
// Tests
// =============================================================================
