use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};
use utoipa::ToSchema;

use super::AppState;
use crate::error::PayrollError;
use crate::model::employee::{Employee, EmployeeInput};
use crate::service::ingestion::{BatchSummary, ItemError};

#[derive(Deserialize, ToSchema)]
pub struct SaveEmployees {
    pub employees: Vec<EmployeeInput>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveEmployeesResponse {
    #[schema(example = "Empleados procesados correctamente")]
    pub message: String,
    /// Employees inserted or updated.
    #[schema(example = 1)]
    pub procesados: usize,
    #[serde(rename = "nominasCreadas")]
    #[schema(example = 1)]
    pub nominas_creadas: usize,
    /// Employees that could not be saved.
    #[schema(example = 0)]
    pub omitidos: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errores: Option<Vec<ItemError>>,
}

impl From<BatchSummary> for SaveEmployeesResponse {
    fn from(summary: BatchSummary) -> Self {
        Self {
            message: "Empleados procesados correctamente".to_string(),
            procesados: summary.succeeded,
            nominas_creadas: summary.payrolls_created,
            omitidos: summary.skipped,
            errores: (!summary.errors.is_empty()).then_some(summary.errors),
        }
    }
}

/// List employees, newest first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees", body = [Employee]),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "storage unavailable: pool timed out while waiting for an open connection"
        }))
    ),
    tag = "Employee"
)]
pub async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse, PayrollError> {
    let employees = state.employees.list_all().await.map_err(|e| {
        error!(error = %e, "Failed to list employees");
        e
    })?;
    info!(count = employees.len(), "Employees listed");
    Ok(HttpResponse::Ok().json(employees))
}

/// Save a batch of employees and generate their payroll
///
/// Each employee is upserted by `IdEmpleado` (generated when missing) and gets
/// a payroll entry for the current month. Failures are reported per employee.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = SaveEmployees,
    responses(
        (status = 200, description = "Batch processed", body = SaveEmployeesResponse),
        (status = 400, description = "`employees` missing or not an array", body = Object, example = json!({
            "error": "Se espera un array 'employees'"
        }))
    ),
    tag = "Employee"
)]
pub async fn save_employees(
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, PayrollError> {
    let records = match body.into_inner() {
        Value::Object(mut map) => match map.remove("employees") {
            Some(Value::Array(items)) => items,
            _ => return Err(missing_employees()),
        },
        _ => return Err(missing_employees()),
    };

    let summary = state
        .ingestion
        .ingest(records, Local::now().date_naive())
        .await;

    Ok(HttpResponse::Ok().json(SaveEmployeesResponse::from(summary)))
}

fn missing_employees() -> PayrollError {
    error!("Request body has no 'employees' array");
    PayrollError::Validation("Se espera un array 'employees'".to_string())
}

/// Delete an employee and its payroll
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal id or IdEmpleado")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Empleado eliminado"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "error": "Empleado no encontrado"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    let deleted = state.employees.delete_by_id(&id).await.map_err(|e| {
        error!(error = %e, id = %id, "Failed to delete employee");
        e
    })?;

    if deleted == 0 {
        return Err(PayrollError::NotFound("Empleado no encontrado".to_string()).into());
    }

    info!(id = %id, deleted, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Empleado eliminado"
    })))
}
