//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The list of every tool and its metadata
//! - The endpoint keys the tools need, for startup checks
//! - Dispatch by tool name (used by the HTTP transport)

use std::collections::BTreeSet;
use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde_json::Value;
use tracing::warn;

use super::definitions::common::{run, to_tool};
use super::definitions::{
    BalanceAcumuladoTool, BalanceMensualTool, BalanceTool, CategoriasCrearTool,
    CategoriasListarTool, FinanceTool, GastoFijoCrearMovimientosTool, GastoFijoCrearTool,
    GastoFijoListarTool, MovimientosActualizarTool, MovimientosBuscarPorCategoriaTool,
    MovimientosBuscarPorFechasTool, MovimientosCrearTool, ProyeccionMesSiguienteTool,
    TendenciasMesTool,
};
use super::error::{ToolError, ToolResult};
use crate::core::backend::{BackendClient, EndpointKey};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - knows every tool and dispatches calls by name.
pub struct ToolRegistry {
    backend: Arc<BackendClient>,
}

impl ToolRegistry {
    /// Create a new tool registry over a shared backend client.
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// The HTTP transport lists tools from here; the tool router carries the
    /// same set for STDIO/TCP.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            to_tool::<BalanceTool>(),
            to_tool::<BalanceMensualTool>(),
            to_tool::<BalanceAcumuladoTool>(),
            to_tool::<CategoriasCrearTool>(),
            to_tool::<CategoriasListarTool>(),
            to_tool::<TendenciasMesTool>(),
            to_tool::<ProyeccionMesSiguienteTool>(),
            to_tool::<GastoFijoCrearTool>(),
            to_tool::<GastoFijoListarTool>(),
            to_tool::<GastoFijoCrearMovimientosTool>(),
            to_tool::<MovimientosCrearTool>(),
            to_tool::<MovimientosBuscarPorCategoriaTool>(),
            to_tool::<MovimientosBuscarPorFechasTool>(),
            to_tool::<MovimientosActualizarTool>(),
        ]
    }

    /// Every endpoint key some tool resolves, deduplicated.
    pub fn required_endpoints() -> BTreeSet<EndpointKey> {
        [
            BalanceTool::ENDPOINTS,
            BalanceMensualTool::ENDPOINTS,
            BalanceAcumuladoTool::ENDPOINTS,
            CategoriasCrearTool::ENDPOINTS,
            CategoriasListarTool::ENDPOINTS,
            TendenciasMesTool::ENDPOINTS,
            ProyeccionMesSiguienteTool::ENDPOINTS,
            GastoFijoCrearTool::ENDPOINTS,
            GastoFijoListarTool::ENDPOINTS,
            GastoFijoCrearMovimientosTool::ENDPOINTS,
            MovimientosCrearTool::ENDPOINTS,
            MovimientosBuscarPorCategoriaTool::ENDPOINTS,
            MovimientosBuscarPorFechasTool::ENDPOINTS,
            MovimientosActualizarTool::ENDPOINTS,
        ]
        .into_iter()
        .flatten()
        .copied()
        .collect()
    }

    /// Required endpoint keys absent from the configured map.
    ///
    /// A missing mapping only fails the tools that use it, at call time, so
    /// this is reported as a warning at startup rather than refused.
    pub fn missing_endpoints(&self) -> Vec<EndpointKey> {
        let required = Self::required_endpoints();
        let missing = self.backend.endpoints().missing(&required);
        for key in &missing {
            warn!(endpoint = %key, "No path configured for endpoint; tools using it will fail");
        }
        missing
    }

    /// Dispatch a tool call by name.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => JsonObject::new(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be a JSON object, got {}",
                    other
                )));
            }
        };
        let backend = self.backend.as_ref();

        match name {
            BalanceTool::NAME => run::<BalanceTool>(arguments, backend).await,
            BalanceMensualTool::NAME => run::<BalanceMensualTool>(arguments, backend).await,
            BalanceAcumuladoTool::NAME => run::<BalanceAcumuladoTool>(arguments, backend).await,
            CategoriasCrearTool::NAME => run::<CategoriasCrearTool>(arguments, backend).await,
            CategoriasListarTool::NAME => run::<CategoriasListarTool>(arguments, backend).await,
            TendenciasMesTool::NAME => run::<TendenciasMesTool>(arguments, backend).await,
            ProyeccionMesSiguienteTool::NAME => {
                run::<ProyeccionMesSiguienteTool>(arguments, backend).await
            }
            GastoFijoCrearTool::NAME => run::<GastoFijoCrearTool>(arguments, backend).await,
            GastoFijoListarTool::NAME => run::<GastoFijoListarTool>(arguments, backend).await,
            GastoFijoCrearMovimientosTool::NAME => {
                run::<GastoFijoCrearMovimientosTool>(arguments, backend).await
            }
            MovimientosCrearTool::NAME => run::<MovimientosCrearTool>(arguments, backend).await,
            MovimientosBuscarPorCategoriaTool::NAME => {
                run::<MovimientosBuscarPorCategoriaTool>(arguments, backend).await
            }
            MovimientosBuscarPorFechasTool::NAME => {
                run::<MovimientosBuscarPorFechasTool>(arguments, backend).await
            }
            MovimientosActualizarTool::NAME => {
                run::<MovimientosActualizarTool>(arguments, backend).await
            }
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}
