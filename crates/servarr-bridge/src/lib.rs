//! Servarr bridge: MCP and REST surfaces over Sonarr and Radarr
//!
//! The bridge exposes the same set of named operations through two
//! transports: a JSON-RPC stdio protocol for tool-calling clients and a
//! small REST API for deployments behind an HTTP ingress. Both are stateless
//! pass-throughs over the per-backend facades.

pub mod context;
pub mod dispatch;
pub mod facade;
pub mod http_api;
pub mod mcp;
pub mod tools;

pub use context::AppContext;
pub use dispatch::ToolRequest;
pub use facade::{MediaFacade, ServiceKind};
