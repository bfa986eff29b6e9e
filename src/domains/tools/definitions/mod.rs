//! Tool definitions, grouped by backend section.
//!
//! Each file holds the tools of one section: their parameter structs, the
//! endpoint keys they resolve and their `FinanceTool` implementations.

pub mod balance;
pub mod categorias;
pub mod common;
pub mod estadisticas;
pub mod gasto_fijo;
pub mod movimientos;

pub use balance::{BalanceAcumuladoTool, BalanceMensualTool, BalanceTool};
pub use categorias::{CategoriasCrearTool, CategoriasListarTool};
pub use common::FinanceTool;
pub use estadisticas::{ProyeccionMesSiguienteTool, TendenciasMesTool};
pub use gasto_fijo::{GastoFijoCrearMovimientosTool, GastoFijoCrearTool, GastoFijoListarTool};
pub use movimientos::{
    MovimientosActualizarTool, MovimientosBuscarPorCategoriaTool, MovimientosBuscarPorFechasTool,
    MovimientosCrearTool,
};
