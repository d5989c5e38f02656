//! Research tools exposed to the agent

mod fetch_page;
mod registry;
mod traits;
mod web_search;

pub use fetch_page::FetchPageTool;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolOutput, ToolSchema};
pub use web_search::WebSearchTool;
