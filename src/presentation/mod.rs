//! Presentation layer: MCP tool-invocation schemas, handlers, and error
//! response shaping (MODULE L).

pub mod error_formatter;
pub mod handlers;
pub mod schemas;
