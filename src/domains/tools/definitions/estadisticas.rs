//! Statistics tools: monthly trends and next-month projection.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::common::FinanceTool;
use crate::core::backend::{BackendClient, EndpointKey, RemoteCall};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::schema;

pub const TENDENCIAS_MES: EndpointKey = EndpointKey::new("estadisticas", "tendencias_mes");
pub const PROYECCION_MES_SIGUIENTE: EndpointKey =
    EndpointKey::new("estadisticas", "proyeccion_mes_siguiente");

/// Parameters for monthly trends.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TendenciasMesParams {
    #[serde(rename = "desdeMes")]
    #[schemars(description = "First month of the range, yyyy-MM")]
    pub desde_mes: String,

    #[serde(rename = "hastaMes")]
    #[schemars(description = "Last month of the range, yyyy-MM")]
    pub hasta_mes: String,

    #[serde(default)]
    #[schemars(description = "Optional category name to filter by")]
    pub categoria: Option<String>,
}

/// Per-month trends over a range of months.
pub struct TendenciasMesTool;

impl TendenciasMesTool {
    pub fn prepare(params: TendenciasMesParams) -> ToolResult<RemoteCall> {
        let desde = schema::year_month("desdeMes", &params.desde_mes)?;
        let hasta = schema::year_month("hastaMes", &params.hasta_mes)?;

        Ok(RemoteCall::get(TENDENCIAS_MES)
            .with_query("desdeMes", desde)
            .with_query("hastaMes", hasta)
            .with_optional_query("categoria", schema::optional_filter(params.categoria)))
    }
}

#[async_trait::async_trait]
impl FinanceTool for TendenciasMesTool {
    const NAME: &'static str = "estadisticas_tendencias_mes";
    const DESCRIPTION: &'static str = "Monthly trends in the range [desdeMes, hastaMes] \
        (yyyy-MM). Detects spending/income patterns; optionally filtered by category.";
    const ENDPOINTS: &'static [EndpointKey] = &[TENDENCIAS_MES];
    type Params = TendenciasMesParams;

    async fn execute(params: TendenciasMesParams, backend: &BackendClient) -> ToolResult<Value> {
        info!(
            desde = %params.desde_mes,
            hasta = %params.hasta_mes,
            "Monthly trends requested"
        );
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

/// No parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ProyeccionParams {}

/// Projection of next month's income, spending and savings.
pub struct ProyeccionMesSiguienteTool;

impl ProyeccionMesSiguienteTool {
    pub fn prepare(_params: ProyeccionParams) -> ToolResult<RemoteCall> {
        Ok(RemoteCall::get(PROYECCION_MES_SIGUIENTE))
    }
}

#[async_trait::async_trait]
impl FinanceTool for ProyeccionMesSiguienteTool {
    const NAME: &'static str = "estadisticas_proyeccion_mes_siguiente";
    const DESCRIPTION: &'static str = "Projection for next month as computed by the backend: \
        expected income, spending and savings from history and fixed expenses.";
    const ENDPOINTS: &'static [EndpointKey] = &[PROYECCION_MES_SIGUIENTE];
    type Params = ProyeccionParams;

    async fn execute(params: ProyeccionParams, backend: &BackendClient) -> ToolResult<Value> {
        info!("Next month projection requested");
        Ok(backend.execute(Self::prepare(params)?).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::ToolError;

    fn params(desde: &str, hasta: &str, categoria: Option<&str>) -> TendenciasMesParams {
        TendenciasMesParams {
            desde_mes: desde.to_string(),
            hasta_mes: hasta.to_string(),
            categoria: categoria.map(str::to_string),
        }
    }

    #[test]
    fn test_tendencias_query() {
        let call = TendenciasMesTool::prepare(params("2025-01", "2025-06", None)).unwrap();
        assert_eq!(call.query_value("desdeMes"), Some("2025-01"));
        assert_eq!(call.query_value("hastaMes"), Some("2025-06"));
        assert_eq!(call.query_value("categoria"), None);

        let call = TendenciasMesTool::prepare(params("2025-01", "2025-06", Some("Hogar"))).unwrap();
        assert_eq!(call.query_value("categoria"), Some("Hogar"));
    }

    #[test]
    fn test_tendencias_rejects_full_date() {
        let err = TendenciasMesTool::prepare(params("2025-01", "2025-06-01", None)).unwrap_err();
        match err {
            ToolError::Validation(v) => assert_eq!(v.field, "hastaMes"),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_params_use_camel_case_names() {
        let params: TendenciasMesParams =
            serde_json::from_str(r#"{"desdeMes": "2025-01", "hastaMes": "2025-02"}"#).unwrap();
        assert_eq!(params.desde_mes, "2025-01");
        assert!(params.categoria.is_none());
    }

    #[test]
    fn test_proyeccion_is_plain_get() {
        let call = ProyeccionMesSiguienteTool::prepare(ProyeccionParams::default()).unwrap();
        assert_eq!(call, RemoteCall::get(PROYECCION_MES_SIGUIENTE));
    }
}
