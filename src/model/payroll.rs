use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

/// A row of the `Nominas` table. Rows are append-only; they disappear only
/// when their employee is deleted.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PayrollEntry {
    #[serde(rename = "IdNomina")]
    #[sqlx(rename = "IdNomina")]
    #[schema(example = 1)]
    pub id: u64,

    /// FK to `empleados.id`.
    #[serde(rename = "id_empleado_interno")]
    #[sqlx(rename = "id_empleado_interno")]
    #[schema(example = 1)]
    pub employee_internal_id: u64,

    /// Copy of the employee's credential at creation time.
    #[serde(rename = "IdEmpleadoCredencial")]
    #[sqlx(rename = "IdEmpleadoCredencial")]
    #[schema(example = "EMP001")]
    pub employee_external_id: Option<String>,

    #[serde(rename = "IdDepartamento")]
    #[sqlx(rename = "IdDepartamento")]
    #[schema(example = "DEP-SEN")]
    pub department_code: Option<String>,

    #[serde(rename = "Supervisor")]
    #[sqlx(rename = "Supervisor")]
    #[schema(example = "Gerente de Área")]
    pub supervisor_name: Option<String>,

    #[serde(rename = "Dias_Trabajados")]
    #[sqlx(rename = "Dias_Trabajados")]
    #[schema(example = 20.0, value_type = Option<f64>)]
    pub days_worked: Option<Decimal>,

    #[serde(rename = "TotalPercepciones")]
    #[sqlx(rename = "TotalPercepciones")]
    #[schema(example = 10000.0, value_type = Option<f64>)]
    pub gross_pay: Option<Decimal>,

    #[serde(rename = "TotalDeducciones")]
    #[sqlx(rename = "TotalDeducciones")]
    #[schema(example = 3800.0, value_type = Option<f64>)]
    pub total_deductions: Option<Decimal>,

    #[serde(rename = "TotalNetoPagado")]
    #[sqlx(rename = "TotalNetoPagado")]
    #[schema(example = 6200.0, value_type = Option<f64>)]
    pub net_pay: Option<Decimal>,

    #[serde(rename = "fechaCreacion")]
    #[sqlx(rename = "fechaCreacion")]
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "fechaInicioPeriodo")]
    #[sqlx(rename = "fechaInicioPeriodo")]
    #[schema(example = "2026-01-01", format = "date", value_type = Option<String>)]
    pub period_start: Option<NaiveDate>,

    #[serde(rename = "fechaFinPeriodo")]
    #[sqlx(rename = "fechaFinPeriodo")]
    #[schema(example = "2026-01-31", format = "date", value_type = Option<String>)]
    pub period_end: Option<NaiveDate>,
}

/// Payroll row joined with the owning employee's descriptive fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct PayrollEntryWithEmployee {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entry: PayrollEntry,

    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub employee_name: Option<String>,

    #[serde(rename = "puesto")]
    #[sqlx(rename = "puesto")]
    pub employee_position: Option<String>,
}

/// Values for a payroll insert. Manual entries may leave any derived field empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPayrollEntry {
    pub employee_internal_id: u64,
    pub employee_external_id: String,
    pub department_code: Option<String>,
    pub supervisor_name: Option<String>,
    pub days_worked: Option<Decimal>,
    pub gross_pay: Option<Decimal>,
    pub total_deductions: Option<Decimal>,
    pub net_pay: Option<Decimal>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}
