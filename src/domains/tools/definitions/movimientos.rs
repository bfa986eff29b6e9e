//! Movement tools: create, search and update ledger entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::info;

use super::common::FinanceTool;
use crate::core::backend::{BackendClient, EndpointKey, RemoteCall};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::schema::{self, MovementType, ValidationError, ValidationResult};

pub const MOVIMIENTOS_CREAR: EndpointKey = EndpointKey::new("movimientos", "crear");
pub const MOVIMIENTOS_BUSCAR_POR_CATEGORIA: EndpointKey =
    EndpointKey::new("movimientos", "buscar_por_categoria");
pub const MOVIMIENTOS_BUSCAR_POR_FECHAS: EndpointKey =
    EndpointKey::new("movimientos", "buscar_por_fechas");
pub const MOVIMIENTOS_ACTUALIZAR: EndpointKey = EndpointKey::new("movimientos", "actualizar");

// ============================================================================
// movimientos_crear
// ============================================================================

/// Category of a new movement: a bare id or an object carrying one.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CategoriaArg {
    Id(i64),
    Objeto(Map<String, Value>),
}

impl CategoriaArg {
    /// Backend representation, always an object with a positive `id`.
    fn into_reference(self) -> ValidationResult<Value> {
        match self {
            Self::Id(id) => Ok(json!({ "id": schema::positive_id("categoria", id)? })),
            Self::Objeto(map) => {
                let id = map.get("id").ok_or_else(|| {
                    ValidationError::new("categoria", "must contain an 'id' field")
                })?;
                integer_id("categoria.id", id)?;
                Ok(Value::Object(map))
            }
        }
    }
}

/// Parameters for movement creation.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MovimientosCrearParams {
    #[schemars(with = "f64", description = "Amount, greater than 0")]
    pub monto: Value,

    #[schemars(description = "Category id, or an object like {\"id\": 3}")]
    pub categoria: CategoriaArg,

    #[schemars(description = "INGRESO or EGRESO")]
    pub tipo: String,

    #[schemars(description = "Movement date, yyyy-MM-dd")]
    pub fecha: String,

    #[serde(default)]
    #[schemars(description = "Optional note, up to 500 characters")]
    pub nota: Option<String>,
}

/// Body of the backend's movement creation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MovimientoPayload {
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub categoria: Value,
    pub tipo: MovementType,
    pub fecha: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nota: Option<String>,
}

/// Record an income or expense on a given date.
pub struct MovimientosCrearTool;

impl MovimientosCrearTool {
    pub fn payload(params: MovimientosCrearParams) -> ToolResult<MovimientoPayload> {
        Ok(MovimientoPayload {
            monto: schema::amount("monto", &params.monto)?,
            categoria: params.categoria.into_reference()?,
            tipo: schema::movement_type("tipo", &params.tipo)?,
            fecha: schema::date("fecha", &params.fecha)?,
            nota: schema::note("nota", params.nota)?,
        })
    }

    pub fn prepare(params: MovimientosCrearParams) -> ToolResult<RemoteCall> {
        let payload = Self::payload(params)?;
        Ok(RemoteCall::post(MOVIMIENTOS_CREAR).with_json(&payload)?)
    }
}

#[async_trait::async_trait]
impl FinanceTool for MovimientosCrearTool {
    const NAME: &'static str = "movimientos_crear";
    const DESCRIPTION: &'static str = "Create a movement (INGRESO/EGRESO) dated yyyy-MM-dd. \
        Records income and spending for analysis and reports.";
    const ENDPOINTS: &'static [EndpointKey] = &[MOVIMIENTOS_CREAR];
    type Params = MovimientosCrearParams;

    async fn execute(params: MovimientosCrearParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(tipo = %params.tipo, fecha = %params.fecha, "Creating movement");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// movimientos_buscar_por_categoria
// ============================================================================

/// Parameters for searching by category name.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuscarPorCategoriaParams {
    #[schemars(description = "Exact category name as stored by the backend")]
    pub categoria: String,
}

/// Movements of one category.
pub struct MovimientosBuscarPorCategoriaTool;

impl MovimientosBuscarPorCategoriaTool {
    pub fn prepare(params: BuscarPorCategoriaParams) -> ToolResult<RemoteCall> {
        if params.categoria.trim().is_empty() {
            return Err(ValidationError::new("categoria", "must not be empty").into());
        }
        Ok(RemoteCall::get(MOVIMIENTOS_BUSCAR_POR_CATEGORIA)
            .with_query("categoria", params.categoria))
    }
}

#[async_trait::async_trait]
impl FinanceTool for MovimientosBuscarPorCategoriaTool {
    const NAME: &'static str = "movimientos_buscar_por_categoria";
    const DESCRIPTION: &'static str = "List movements filtered by category name \
        (exact match, as the backend defines it).";
    const ENDPOINTS: &'static [EndpointKey] = &[MOVIMIENTOS_BUSCAR_POR_CATEGORIA];
    type Params = BuscarPorCategoriaParams;

    async fn execute(params: BuscarPorCategoriaParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(categoria = %params.categoria, "Searching movements by category");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// movimientos_buscar_por_fechas
// ============================================================================

/// Parameters for searching by date range.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuscarPorFechasParams {
    #[schemars(description = "Start date, yyyy-MM-dd")]
    pub desde: String,

    #[schemars(description = "End date, yyyy-MM-dd")]
    pub hasta: String,
}

/// Movements between two dates.
pub struct MovimientosBuscarPorFechasTool;

impl MovimientosBuscarPorFechasTool {
    pub fn prepare(params: BuscarPorFechasParams) -> ToolResult<RemoteCall> {
        schema::date("desde", &params.desde)?;
        schema::date("hasta", &params.hasta)?;

        Ok(RemoteCall::get(MOVIMIENTOS_BUSCAR_POR_FECHAS)
            .with_query("desde", params.desde)
            .with_query("hasta", params.hasta))
    }
}

#[async_trait::async_trait]
impl FinanceTool for MovimientosBuscarPorFechasTool {
    const NAME: &'static str = "movimientos_buscar_por_fechas";
    const DESCRIPTION: &'static str = "List movements between two dates (yyyy-MM-dd), \
        both inclusive as the backend applies them.";
    const ENDPOINTS: &'static [EndpointKey] = &[MOVIMIENTOS_BUSCAR_POR_FECHAS];
    type Params = BuscarPorFechasParams;

    async fn execute(params: BuscarPorFechasParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(desde = %params.desde, hasta = %params.hasta, "Searching movements by date");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// movimientos_actualizar
// ============================================================================

/// Parameters for updating a movement.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MovimientosActualizarParams {
    #[schemars(
        with = "Map<String, Value>",
        description = "Movement object as the backend expects it, including its 'id'"
    )]
    pub movimiento: Value,
}

/// Correct an existing movement's amount, date, note or category.
pub struct MovimientosActualizarTool;

impl MovimientosActualizarTool {
    /// Check the fields that are present; the object itself is sent as given.
    pub fn validate(movimiento: &Value) -> ValidationResult<()> {
        let fields = movimiento
            .as_object()
            .ok_or_else(|| ValidationError::new("movimiento", "must be a JSON object"))?;

        for (name, value) in fields {
            match name.as_str() {
                "id" | "categoria_id" => {
                    integer_id(name, value)?;
                }
                "monto" => {
                    schema::amount(name, value)?;
                }
                "fecha" => {
                    schema::date(name, string_field(name, value)?)?;
                }
                "tipo" => {
                    schema::movement_type(name, string_field(name, value)?)?;
                }
                "nota" if !value.is_null() => {
                    schema::note(name, Some(string_field(name, value)?.to_string()))?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn prepare(params: MovimientosActualizarParams) -> ToolResult<RemoteCall> {
        Self::validate(&params.movimiento)?;
        let mut call = RemoteCall::post(MOVIMIENTOS_ACTUALIZAR);
        call.body = Some(params.movimiento);
        Ok(call)
    }
}

#[async_trait::async_trait]
impl FinanceTool for MovimientosActualizarTool {
    const NAME: &'static str = "movimientos_actualizar";
    const DESCRIPTION: &'static str = "Update an existing movement. Fixes amount, date, \
        note or category of a previously recorded entry.";
    const ENDPOINTS: &'static [EndpointKey] = &[MOVIMIENTOS_ACTUALIZAR];
    type Params = MovimientosActualizarParams;

    async fn execute(
        params: MovimientosActualizarParams,
        backend: &BackendClient,
    ) -> ToolResult<Value> {
        info!(id = ?params.movimiento.get("id"), "Updating movement");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

fn integer_id(field: &str, value: &Value) -> ValidationResult<i64> {
    let id = value
        .as_i64()
        .ok_or_else(|| ValidationError::new(field, "must be an integer"))?;
    schema::positive_id(field, id)
}

fn string_field<'a>(field: &str, value: &'a Value) -> ValidationResult<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::new(field, "must be a string"))
}
