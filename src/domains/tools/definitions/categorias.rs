//! Category tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::common::FinanceTool;
use crate::core::backend::{BackendClient, EndpointKey, RemoteCall};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::schema::{self, CATEGORY_NAME_MAX_LEN};

pub const CATEGORIAS_CREAR: EndpointKey = EndpointKey::new("categorias", "crear");
pub const CATEGORIAS_LISTAR: EndpointKey = EndpointKey::new("categorias", "listar");

/// Reference to an existing category as the backend expects it nested in
/// other payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoriaRef {
    pub id: i64,
}

/// Find the entry with the given id in a category list response.
///
/// `Some(None)` means the list has no such entry; `None` means the response
/// is not a list at all.
pub fn find_category(categorias: &Value, id: i64) -> Option<Option<&Value>> {
    let list = categorias.as_array()?;
    Some(
        list.iter()
            .find(|c| c.get("id").and_then(Value::as_i64) == Some(id)),
    )
}

// ============================================================================
// categorias_crear
// ============================================================================

/// Parameters for category creation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CategoriasCrearParams {
    #[schemars(description = "Unique category name (1-80 characters)")]
    pub nombre: String,
}

#[derive(Debug, Clone, Serialize)]
struct CategoriaPayload {
    nombre: String,
}

/// Create a category.
pub struct CategoriasCrearTool;

impl CategoriasCrearTool {
    pub fn prepare(params: CategoriasCrearParams) -> ToolResult<RemoteCall> {
        let nombre = schema::text("nombre", &params.nombre, 1, CATEGORY_NAME_MAX_LEN)?;
        Ok(RemoteCall::post(CATEGORIAS_CREAR).with_json(&CategoriaPayload { nombre })?)
    }
}

#[async_trait::async_trait]
impl FinanceTool for CategoriasCrearTool {
    const NAME: &'static str = "categorias_crear";
    const DESCRIPTION: &'static str = "Create a category with a unique 'nombre'. \
        Categories classify movements and fixed expenses.";
    const ENDPOINTS: &'static [EndpointKey] = &[CATEGORIAS_CREAR];
    type Params = CategoriasCrearParams;

    async fn execute(params: CategoriasCrearParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(nombre = %params.nombre, "Creating category");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// categorias_listar
// ============================================================================

/// No parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CategoriasListarParams {}

/// List every category.
pub struct CategoriasListarTool;

impl CategoriasListarTool {
    pub fn prepare(_params: CategoriasListarParams) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::get(CATEGORIAS_LISTAR))
    }
}

#[async_trait::async_trait]
impl FinanceTool for CategoriasListarTool {
    const NAME: &'static str = "categorias_listar";
    const DESCRIPTION: &'static str = "List all categories. \
        Useful to populate selectors and check for duplicates.";
    const ENDPOINTS: &'static [EndpointKey] = &[CATEGORIAS_LISTAR];
    type Params = CategoriasListarParams;

    async fn execute(params: CategoriasListarParams, backend: &BackendClient) -> ToolResult<Value> {
        info!("Listing categories");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}
