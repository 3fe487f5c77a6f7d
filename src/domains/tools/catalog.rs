//! Operation catalog - the single source of truth for available tools.
//!
//! Maps each tool name to its descriptor and the builder that prepares the
//! outbound call. Built once and never mutated.

use std::sync::LazyLock;

use rmcp::model::{JsonObject, Tool};

use super::credentials::Credential;
use super::definitions::{
    ApiSettings, CategorySearchTool, PreparedCall, ProductSearchTool, StoreSearchTool,
};
use super::error::ToolError;
use super::schema::OperationDescriptor;

/// Builder entry point shared by every operation.
pub type PrepareFn = fn(&JsonObject, &Credential, &ApiSettings) -> Result<PreparedCall, ToolError>;

/// A registered operation.
#[derive(Clone)]
pub struct Operation {
    pub descriptor: OperationDescriptor,
    /// Human label used in failure messages, e.g. "store search".
    pub label: &'static str,
    pub prepare: PrepareFn,
}

/// Immutable registry of operations, in discovery order.
pub struct OperationCatalog {
    operations: Vec<Operation>,
}

static CATALOG: LazyLock<OperationCatalog> = LazyLock::new(OperationCatalog::build);

impl OperationCatalog {
    /// The process-wide catalog.
    pub fn global() -> &'static OperationCatalog {
        &CATALOG
    }

    fn build() -> Self {
        Self {
            operations: vec![
                Operation {
                    descriptor: ProductSearchTool::descriptor(),
                    label: ProductSearchTool::LABEL,
                    prepare: ProductSearchTool::prepare,
                },
                Operation {
                    descriptor: StoreSearchTool::descriptor(),
                    label: StoreSearchTool::LABEL,
                    prepare: StoreSearchTool::prepare,
                },
                Operation {
                    descriptor: CategorySearchTool::descriptor(),
                    label: CategorySearchTool::LABEL,
                    prepare: CategorySearchTool::prepare,
                },
            ],
        }
    }

    /// All operations, in discovery order.
    pub fn list(&self) -> &[Operation] {
        &self.operations
    }

    /// Look up an operation by tool name.
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.descriptor.name == name)
    }

    /// Tool models for `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        self.operations.iter().map(|op| op.descriptor.to_tool()).collect()
    }
}
