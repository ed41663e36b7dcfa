//! Personal book catalog: a JSON-file backed list of books served as MCP tools.

pub mod application;
pub mod domain;
pub mod infra;
pub mod interface;
