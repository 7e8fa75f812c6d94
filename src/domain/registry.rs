/// Ordered registry of tools
///
/// Tools are kept in registration order, which drives listing and
/// pagination. The registry is only mutated during startup composition and
/// is shared read-only (behind an `Arc`) once the server is running.

use tracing::{info, warn};
use crate::domain::Tool;

#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Append a tool unless one with the same name is already registered
    ///
    /// Returns `false` (and logs a warning) for a duplicate; the existing tool
    /// is left untouched.
    pub fn register(&mut self, tool: Tool) -> bool {
        if self.contains(tool.name()) {
            warn!("Tool {} already added", tool.name());
            return false;
        }

        info!("Add tool: {}", tool.name());
        self.tools.push(tool);
        true
    }

    /// Exact-name lookup
    pub fn lookup(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All tools in registration order
    pub fn all_in_order(&self) -> &[Tool] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Remove and return every tool, leaving the registry empty
    ///
    /// Composition uses this to register a batch of tools ahead of the ones
    /// already present, then re-registers the earlier ones behind them.
    pub fn take_all(&mut self) -> Vec<Tool> {
        std::mem::take(&mut self.tools)
    }
}
