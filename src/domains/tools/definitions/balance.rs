//! Balance tools: totals for a date range, a single month, or all time.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::common::FinanceTool;
use crate::core::backend::{BackendClient, EndpointKey, RemoteCall};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::schema;

pub const BALANCE: EndpointKey = EndpointKey::new("balance", "balance");
pub const BALANCE_MENSUAL: EndpointKey = EndpointKey::new("balance", "mensual");
pub const BALANCE_ACUMULADO: EndpointKey = EndpointKey::new("balance", "acumulado");

// ============================================================================
// balance
// ============================================================================

/// Parameters for the date-range balance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BalanceParams {
    /// First day of the range.
    #[schemars(description = "Start date, yyyy-MM-dd")]
    pub desde: String,

    /// Last day of the range.
    #[schemars(description = "End date, yyyy-MM-dd")]
    pub hasta: String,
}

/// Income, expenses and net between two dates.
pub struct BalanceTool;

impl BalanceTool {
    pub fn prepare(params: BalanceParams) -> ToolResult<RemoteCall> {
        schema::date("desde", &params.desde)?;
        schema::date("hasta", &params.hasta)?;

        Ok(RemoteCall::get(BALANCE)
            .with_query("desde", params.desde)
            .with_query("hasta", params.hasta))
    }
}

#[async_trait::async_trait]
impl FinanceTool for BalanceTool {
    const NAME: &'static str = "balance";
    const DESCRIPTION: &'static str = "Get the balance between two dates (yyyy-MM-dd). \
        Returns aggregated income, expenses and net for reporting.";
    const ENDPOINTS: &'static [EndpointKey] = &[BALANCE];
    type Params = BalanceParams;

    async fn execute(params: BalanceParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(desde = %params.desde, hasta = %params.hasta, "Balance requested");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// balance_mensual
// ============================================================================

/// Parameters for the monthly balance.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BalanceMensualParams {
    #[schemars(description = "Year, e.g. 2025")]
    pub ano: i64,

    #[schemars(description = "Month number, 1-12")]
    pub mes: i64,
}

/// Consolidated balance for one calendar month.
pub struct BalanceMensualTool;

impl BalanceMensualTool {
    pub fn prepare(params: BalanceMensualParams) -> ToolResult<RemoteCall> {
        let ano = schema::in_range("ano", params.ano, 1, 9999)?;
        let mes = schema::in_range("mes", params.mes, 1, 12)?;

        Ok(RemoteCall::get(BALANCE_MENSUAL)
            .with_path_var("ano", ano)
            .with_path_var("mes", mes))
    }
}

#[async_trait::async_trait]
impl FinanceTool for BalanceMensualTool {
    const NAME: &'static str = "balance_mensual";
    const DESCRIPTION: &'static str = "Get the balance for a specific month (ano, mes). \
        Consolidated monthly view, e.g. 2025-11.";
    const ENDPOINTS: &'static [EndpointKey] = &[BALANCE_MENSUAL];
    type Params = BalanceMensualParams;

    async fn execute(params: BalanceMensualParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(ano = params.ano, mes = params.mes, "Monthly balance requested");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

// ============================================================================
// balance_acumulado
// ============================================================================

/// Parameters for the accumulated balance.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct BalanceAcumuladoParams {
    /// Restrict to one category; omitted means global.
    #[serde(default)]
    #[schemars(description = "Optional category name to filter by")]
    pub categoria: Option<String>,
}

/// Running total, globally or for one category.
pub struct BalanceAcumuladoTool;

impl BalanceAcumuladoTool {
    pub fn prepare(params: BalanceAcumuladoParams) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::get(BALANCE_ACUMULADO)
            .with_optional_query("categoria", schema::optional_filter(params.categoria)))
    }
}

#[async_trait::async_trait]
impl FinanceTool for BalanceAcumuladoTool {
    const NAME: &'static str = "balance_acumulado";
    const DESCRIPTION: &'static str = "Get the accumulated balance, globally or for one \
        category when given. Useful for dashboards and comparisons.";
    const ENDPOINTS: &'static [EndpointKey] = &[BALANCE_ACUMULADO];
    type Params = BalanceAcumuladoParams;

    async fn execute(params: BalanceAcumuladoParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(categoria = ?params.categoria, "Accumulated balance requested");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}
