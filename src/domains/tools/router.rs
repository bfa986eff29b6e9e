//! Tool Router - builds the rmcp ToolRouter for STDIO/TCP transport.
//!
//! Every route shares one backend client; routes are derived from each
//! tool's `FinanceTool` implementation.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::common::create_route;
use super::definitions::{
    BalanceAcumuladoTool, BalanceMensualTool, BalanceTool, CategoriasCrearTool,
    CategoriasListarTool, GastoFijoCrearMovimientosTool, GastoFijoCrearTool, GastoFijoListarTool,
    MovimientosActualizarTool, MovimientosBuscarPorCategoriaTool, MovimientosBuscarPorFechasTool,
    MovimientosCrearTool, ProyeccionMesSiguienteTool, TendenciasMesTool,
};
use crate::core::backend::BackendClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(backend: Arc<BackendClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(create_route::<BalanceTool, S>(backend.clone()))
        .with_route(create_route::<BalanceMensualTool, S>(backend.clone()))
        .with_route(create_route::<BalanceAcumuladoTool, S>(backend.clone()))
        .with_route(create_route::<CategoriasCrearTool, S>(backend.clone()))
        .with_route(create_route::<CategoriasListarTool, S>(backend.clone()))
        .with_route(create_route::<TendenciasMesTool, S>(backend.clone()))
        .with_route(create_route::<ProyeccionMesSiguienteTool, S>(backend.clone()))
        .with_route(create_route::<GastoFijoCrearTool, S>(backend.clone()))
        .with_route(create_route::<GastoFijoListarTool, S>(backend.clone()))
        .with_route(create_route::<GastoFijoCrearMovimientosTool, S>(backend.clone()))
        .with_route(create_route::<MovimientosCrearTool, S>(backend.clone()))
        .with_route(create_route::<MovimientosBuscarPorCategoriaTool, S>(backend.clone()))
        .with_route(create_route::<MovimientosBuscarPorFechasTool, S>(backend.clone()))
        .with_route(create_route::<MovimientosActualizarTool, S>(backend))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::config::BackendConfig;

    struct TestServer {}

    fn test_backend() -> Arc<BackendClient> {
        Arc::new(BackendClient::new(&BackendConfig::default()).unwrap())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_backend());
        let tools = router.list_all();
        assert_eq!(tools.len(), 14);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"balance"));
        assert!(names.contains(&"gasto_fijo_crear"));
        assert!(names.contains(&"movimientos_actualizar"));
        assert!(names.contains(&"estadisticas_proyeccion_mes_siguiente"));
    }

    #[test]
    fn test_registry_matches_router() {
        let registry_tools = ToolRegistry::get_all_tools();
        let registry_names: Vec<&str> = registry_tools.iter().map(|t| t.name.as_ref()).collect();

        let router: ToolRouter<TestServer> = build_tool_router(test_backend());
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
