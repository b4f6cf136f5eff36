use actix_web::{HttpResponse, Responder, web};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use utoipa::ToSchema;

use super::AppState;
use crate::error::{PayrollError, PayrollResult};
use crate::model::employee::{lenient_decimal, lenient_text};
use crate::model::payroll::{NewPayrollEntry, PayrollEntryWithEmployee};

/// A payroll entry captured by hand for an existing employee.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePayroll {
    /// Employee credential; numbers are accepted too.
    #[serde(rename = "IdEmpleado", default, deserialize_with = "lenient_text")]
    #[schema(example = "EMP001", value_type = String)]
    pub external_id: Option<String>,

    #[serde(rename = "IdDepartamento", default, deserialize_with = "lenient_text")]
    #[schema(example = "DEP-SEN", value_type = Option<String>)]
    pub department_code: Option<String>,

    #[serde(rename = "Supervisor", default, deserialize_with = "lenient_text")]
    #[schema(example = "Gerente de Área", value_type = Option<String>)]
    pub supervisor_name: Option<String>,

    #[serde(rename = "Dias_Trabajados", default, deserialize_with = "lenient_decimal")]
    #[schema(example = 20.0, value_type = Option<f64>)]
    pub days_worked: Option<Decimal>,

    #[serde(rename = "TotalPercepciones", default, deserialize_with = "lenient_decimal")]
    #[schema(example = 10000.0, value_type = Option<f64>)]
    pub gross_pay: Option<Decimal>,

    #[serde(rename = "TotalDeducciones", default, deserialize_with = "lenient_decimal")]
    #[schema(example = 3800.0, value_type = Option<f64>)]
    pub total_deductions: Option<Decimal>,

    #[serde(rename = "TotalNetoPagado", default, deserialize_with = "lenient_decimal")]
    #[schema(example = 6200.0, value_type = Option<f64>)]
    pub net_pay: Option<Decimal>,
}

/// Save a payroll entry for an existing employee
#[utoipa::path(
    post,
    path = "/api/nominas",
    request_body = CreatePayroll,
    responses(
        (status = 200, description = "Payroll saved", body = Object, example = json!({
            "message": "Nómina guardada exitosamente"
        })),
        (status = 400, description = "IdEmpleado missing", body = Object, example = json!({
            "error": "IdEmpleado es requerido"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "El empleado con ID EMP999 no existe en la base de datos."
        })),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Error al guardar nómina",
            "details": "storage unavailable: pool timed out while waiting for an open connection"
        }))
    ),
    tag = "Payroll"
)]
pub async fn create_payroll(
    state: web::Data<AppState>,
    payload: web::Json<CreatePayroll>,
) -> impl Responder {
    match save_payroll(&state, payload.into_inner()).await {
        Ok(payroll_id) => {
            info!(payroll_id, "Payroll saved");
            HttpResponse::Ok().json(json!({
                "message": "Nómina guardada exitosamente"
            }))
        }
        Err(e) => {
            error!(error = %e, "Failed to save payroll");
            e.with_details("Error al guardar nómina")
        }
    }
}

async fn save_payroll(state: &AppState, payload: CreatePayroll) -> PayrollResult<u64> {
    let external_id = payload
        .external_id
        .ok_or_else(|| PayrollError::Validation("IdEmpleado es requerido".to_string()))?;

    let employee = state
        .employees
        .find_by_external_id(&external_id)
        .await?
        .ok_or_else(|| {
            PayrollError::NotFound(format!(
                "El empleado con ID {} no existe en la base de datos.",
                external_id
            ))
        })?;

    let entry = NewPayrollEntry {
        employee_internal_id: employee.id,
        employee_external_id: external_id,
        department_code: payload.department_code,
        supervisor_name: payload.supervisor_name,
        days_worked: payload.days_worked,
        gross_pay: payload.gross_pay,
        total_deductions: payload.total_deductions,
        net_pay: payload.net_pay,
        period_start: None,
        period_end: None,
    };

    state.payrolls.insert(&entry).await
}

/// List payroll entries with employee name and position, newest first
#[utoipa::path(
    get,
    path = "/api/nominas",
    responses(
        (status = 200, description = "All payroll entries", body = [PayrollEntryWithEmployee]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn list_payrolls(state: web::Data<AppState>) -> Result<HttpResponse, PayrollError> {
    let rows = state
        .payrolls
        .list_all_with_employee_info()
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list payrolls");
            e
        })?;
    Ok(HttpResponse::Ok().json(rows))
}
