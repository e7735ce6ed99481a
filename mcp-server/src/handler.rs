use crate::config::McpServerConfig;
use crate::{prompt, resource};
use app::app::photo_search::{PhotoSearchApp, PhotoSearchAppImpl, PhotoSearchResult};
use base64::Engine;
use debug_stub_derive::DebugStub;
use immich_search_base::error::ImmichSearchError;
use immich_search_base::MCP_SERVER_NAME;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, ListPromptsResult, ListResourcesResult, PaginatedRequestParam, RawResource,
    ReadResourceRequestParam, ReadResourceResult, ResourceContents, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, RoleServer};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const INSTRUCTIONS: &str = "Immich photo search server. Use the 'search' tool with a natural \
language query (a person, place, or thing) to get the best matching photos from the Immich \
library as inline images.";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchArgs {
    #[schemars(description = "the query used to find photos")]
    pub query: String,
}

/// MCP handler exposing Immich smart search.
#[derive(Clone, DebugStub)]
pub struct McpHandler {
    photo_search_app: Arc<PhotoSearchAppImpl>,
    config: McpServerConfig,
    #[debug_stub = "ToolRouter<McpHandler>"]
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl McpHandler {
    pub fn new(photo_search_app: Arc<PhotoSearchAppImpl>, config: McpServerConfig) -> Self {
        Self {
            photo_search_app,
            config,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "search",
        description = "Find my photos using a query. The query will work best with locations - such as 'San Francisco', or a person's name - such as 'Mitchell'. Descriptions of the photo such as 'forest' may also work."
    )]
    async fn search(
        &self,
        Parameters(args): Parameters<SearchArgs>,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!("mcp request: tools/call search {:?}", args);
        tracing::info!("search tool called: query={:?}", args.query);
        match self.search_with_timeout(&args.query, context.ct.clone()).await {
            Ok(result) => {
                // image payloads are too large to dump
                tracing::debug!(
                    "mcp response: tools/call search images={:?} failures={:?}",
                    result
                        .assets
                        .iter()
                        .map(|a| (a.id, a.mime_type.as_str(), a.data.len()))
                        .collect::<Vec<_>>(),
                    result.failures
                );
                Ok(to_call_tool_result(&result))
            }
            Err(e) => {
                tracing::warn!("search tool failed: query={:?}, error={:?}", args.query, e);
                let res = CallToolResult::error(vec![Content::text(e.to_string())]);
                tracing::debug!("mcp response: tools/call search {:?}", res);
                Ok(res)
            }
        }
    }
}

impl McpHandler {
    /// Run the pipeline under the configured invocation timeout.
    /// On timeout the child token is cancelled and all in-flight work is dropped.
    pub async fn search_with_timeout(
        &self,
        query: &str,
        cancellation_token: CancellationToken,
    ) -> anyhow::Result<PhotoSearchResult> {
        let token = cancellation_token.child_token();
        let _guard = token.clone().drop_guard();
        let timeout = self.config.timeout();
        tokio::time::timeout(timeout, self.photo_search_app.search_photos(query, token))
            .await
            .map_err(|_| {
                ImmichSearchError::CancelledError(format!(
                    "search timed out after {} sec",
                    timeout.as_secs()
                ))
            })?
    }
}

/// One image item per hydrated asset, in order. A trailing text item lists
/// failures when any were tolerated.
pub fn to_call_tool_result(result: &PhotoSearchResult) -> CallToolResult {
    let mut contents: Vec<Content> = result
        .assets
        .iter()
        .map(|asset| {
            Content::image(
                base64::engine::general_purpose::STANDARD.encode(&asset.data),
                asset.mime_type.clone(),
            )
        })
        .collect();
    if !result.failures.is_empty() {
        let lines: Vec<String> = result
            .failures
            .iter()
            .map(|f| format!("#{} {}: {}", f.index, f.asset_id, f.message))
            .collect();
        contents.push(Content::text(format!(
            "failed to load {} asset(s):\n{}",
            result.failures.len(),
            lines.join("\n")
        )));
    }
    CallToolResult::success(contents)
}

fn log_response<T: std::fmt::Debug>(method: &str, res: &Result<T, McpError>) {
    match res {
        Ok(r) => tracing::debug!("mcp response: {} {:?}", method, r),
        Err(e) => tracing::debug!("mcp error response: {} {:?}", method, e),
    }
}

/// Map a resource error to the protocol error kind.
fn resource_error(err: anyhow::Error) -> McpError {
    match err.downcast_ref::<ImmichSearchError>() {
        Some(ImmichSearchError::UnknownResource(_)) => {
            McpError::resource_not_found(err.to_string(), None)
        }
        Some(ImmichSearchError::InvalidUriScheme(_)) | Some(ImmichSearchError::ParseError(_)) => {
            McpError::invalid_params(err.to_string(), None)
        }
        _ => McpError::internal_error(err.to_string(), None),
    }
}

#[tool_handler]
impl rmcp::ServerHandler for McpHandler {
    fn get_info(&self) -> ServerInfo {
        let mut server_info = Implementation::from_build_env();
        server_info.name = MCP_SERVER_NAME.to_string();
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .build(),
            server_info,
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        tracing::debug!("mcp request: resources/list {:?}", request);
        let resources = resource::list_embedded_resources()
            .into_iter()
            .map(|r| {
                let mut raw = RawResource::new(r.uri, r.name);
                raw.mime_type = Some(r.mime_type);
                raw.no_annotation()
            })
            .collect();
        let res = Ok(ListResourcesResult::with_all_items(resources));
        log_response("resources/list", &res);
        res
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        tracing::debug!("mcp request: resources/read {:?}", request);
        let res = resource::read_embedded_resource(&request.uri)
            .map(|r| {
                let mut contents = ResourceContents::text(r.text, r.uri);
                if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
                    *mime_type = Some(r.mime_type);
                }
                ReadResourceResult {
                    contents: vec![contents],
                }
            })
            .map_err(|e| {
                tracing::info!("cannot read resource {}: {:?}", request.uri, e);
                resource_error(e)
            });
        log_response("resources/read", &res);
        res
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        tracing::debug!("mcp request: prompts/list {:?}", request);
        let res = Ok(ListPromptsResult::with_all_items(prompt::list_prompts()));
        log_response("prompts/list", &res);
        res
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        tracing::debug!("mcp request: prompts/get {:?}", request);
        let res = prompt::get_prompt(&request.name).ok_or_else(|| {
            McpError::invalid_params(format!("unknown prompt: {}", request.name), None)
        });
        log_response("prompts/get", &res);
        res
    }
}
