//! Fixed expense tools: recurring monthly charges and the movements they
//! generate.
//!
//! Creation is the one place where the boundary shape differs from the
//! backend's: callers pass a flat `categoria_id`, the backend wants a nested
//! `categoria` object, and the category must exist before anything is posted.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::categorias::{CATEGORIAS_LISTAR, CategoriaRef, find_category};
use super::common::FinanceTool;
use crate::core::backend::{BackendClient, BackendError, EndpointKey, RemoteCall};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::schema;

pub const GASTO_FIJO_CREAR: EndpointKey = EndpointKey::new("gasto_fijo", "crear");
pub const GASTO_FIJO_LISTAR: EndpointKey = EndpointKey::new("gasto_fijo", "listar");
pub const GASTO_FIJO_CREAR_MOVIMIENTOS: EndpointKey =
    EndpointKey::new("gasto_fijo", "crear_movimientos");

fn default_activo() -> bool {
    true
}

// ============================================================================
// gasto_fijo_crear
// ============================================================================

/// Parameters for fixed expense creation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GastoFijoCrearParams {
    #[schemars(with = "f64", description = "Monthly amount, greater than 0")]
    pub monto: Value,

    #[schemars(description = "Id of an existing category (>= 1)")]
    pub categoria_id: i64,

    #[schemars(description = "Billing day of the month, 1-31")]
    pub dia_cobro: i64,

    #[serde(default = "default_activo")]
    #[schemars(description = "Whether the expense is active (default: true)")]
    pub activo: bool,

    #[serde(default)]
    #[schemars(description = "Optional note, up to 500 characters")]
    pub nota: Option<String>,
}

/// Validated fixed expense, before the category has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoGastoFijo {
    pub monto: Decimal,
    pub categoria_id: i64,
    pub dia_cobro: u8,
    pub activo: bool,
    pub nota: Option<String>,
}

/// Body of the backend's creation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GastoFijoPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub categoria: CategoriaRef,
    #[serde(rename = "diaCobro")]
    pub dia_cobro: u8,
    pub activo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,
}

impl From<NuevoGastoFijo> for GastoFijoPayload {
    fn from(gasto: NuevoGastoFijo) -> Self {
        Self {
            monto: gasto.monto,
            categoria: CategoriaRef {
                id: gasto.categoria_id,
            },
            dia_cobro: gasto.dia_cobro,
            activo: gasto.activo,
            nota: gasto.nota,
        }
    }
}

/// Create a recurring monthly expense.
pub struct GastoFijoCrearTool;

impl GastoFijoCrearTool {
    /// Check every field; nothing is sent if this fails.
    pub fn validate(params: GastoFijoCrearParams) -> ToolResult<NuevoGastoFijo> {
        Ok(NuevoGastoFijo {
            monto: schema::amount("monto", &params.monto)?,
            categoria_id: schema::positive_id("categoria_id", params.categoria_id)?,
            dia_cobro: schema::day_of_month("dia_cobro", params.dia_cobro)?,
            activo: params.activo,
            nota: schema::note("nota", params.nota)?,
        })
    }

    /// Creation call for a gasto whose category is known to exist.
    pub fn prepare(gasto: NuevoGastoFijo) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::post(GASTO_FIJO_CREAR).with_json(&GastoFijoPayload::from(gasto))?)
    }

    /// Make sure `categoria_id` is present in the backend's category list.
    async fn ensure_category(backend: &BackendClient, categoria_id: i64) -> ToolResult<()> {
        let categorias = backend.execute(RemoteCall::get(CATEGORIAS_LISTAR)).await?;
        match find_category(&categorias, categoria_id) {
            Some(Some(_)) => Ok(()),
            Some(None) => {
                warn!(categoria_id, "Category not found, fixed expense not created");
                Err(ToolError::domain(format!(
                    "Category with id {} not found",
                    categoria_id
                )))
            }
            None => Err(BackendError::protocol(format!(
                "expected a list from {}",
                CATEGORIAS_LISTAR
            ))
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl FinanceTool for GastoFijoCrearTool {
    const NAME: &'static str = "gasto_fijo_crear";
    const DESCRIPTION: &'static str = "Create a monthly fixed expense (dia_cobro 1-31) such as \
        rent, utilities or subscriptions. The category must already exist.";
    const ENDPOINTS: &'static [EndpointKey] = &[CATEGORIAS_LISTAR, GASTO_FIJO_CREAR];
    type Params = GastoFijoCrearParams;

    async fn execute(params: GastoFijoCrearParams, backend: &BackendClient) -> ToolResult<Value> {
        let gasto = Self::validate(params)?;
        info!(
            categoria_id = gasto.categoria_id,
            dia_cobro = gasto.dia_cobro,
            "Creating fixed expense"
        );

        // Resolve before the lookup so a missing mapping fails without any request.
        backend.endpoints().template(GASTO_FIJO_CREAR)?;
        Self::ensure_category(backend, gasto.categoria_id).await?;

        Ok(backend.execute(Self::prepare(gasto)?).await?)
    }
}

// ============================================================================
// gasto_fijo_listar
// ============================================================================

/// No parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct GastoFijoListarParams {}

/// List all fixed expenses.
pub struct GastoFijoListarTool;

impl GastoFijoListarTool {
    pub fn prepare(_params: GastoFijoListarParams) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::get(GASTO_FIJO_LISTAR))
    }
}

#[async_trait::async_trait]
impl FinanceTool for GastoFijoListarTool {
    const NAME: &'static str = "gasto_fijo_listar";
    const DESCRIPTION: &'static str = "List all fixed expenses. \
        Useful to review recurring costs and find savings.";
    const ENDPOINTS: &'static [EndpointKey] = &[GASTO_FIJO_LISTAR];
    type Params = GastoFijoListarParams;

    async fn execute(params: GastoFijoListarParams, backend: &BackendClient) -> ToolResult<Value> {
        info!("Listing fixed expenses");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// gasto_fijo_crear_movimientos
// ============================================================================

/// No parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct CrearMovimientosParams {}

/// Ask the backend to book this month's movements from the fixed expenses.
pub struct GastoFijoCrearMovimientosTool;

impl GastoFijoCrearMovimientosTool {
    pub fn prepare(_params: CrearMovimientosParams) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::post(GASTO_FIJO_CREAR_MOVIMIENTOS))
    }
}

#[async_trait::async_trait]
impl FinanceTool for GastoFijoCrearMovimientosTool {
    const NAME: &'static str = "gasto_fijo_crear_movimientos";
    const DESCRIPTION: &'static str = "Generate movements from the configured fixed expenses \
        (as implemented by the backend). Populates monthly entries automatically.";
    const ENDPOINTS: &'static [EndpointKey] = &[GASTO_FIJO_CREAR_MOVIMIENTOS];
    type Params = CrearMovimientosParams;

    async fn execute(params: CrearMovimientosParams, backend: &BackendClient) -> ToolResult<Value> {
        info!("Generating movements from fixed expenses");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}
