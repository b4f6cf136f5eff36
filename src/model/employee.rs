use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::PayrollError;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "nombre": "Ana López",
        "IdEmpleado": "EMP001",
        "rfc": "LOAA800101XX1",
        "nss": "12345678901",
        "puesto": "Senior Dev",
        "fechaIngreso": "2024-01-15",
        "sueldo": 10000.0,
        "horas": 160
    })
)]
pub struct Employee {
    /// Surrogate key, assigned once by the database.
    #[schema(example = 1)]
    pub id: u64,

    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: Option<String>,

    /// Caller-facing credential, unique across employees.
    #[serde(rename = "IdEmpleado")]
    #[sqlx(rename = "IdEmpleado")]
    #[schema(example = "EMP001")]
    pub external_id: String,

    #[serde(rename = "rfc")]
    #[sqlx(rename = "rfc")]
    pub tax_id: Option<String>,

    #[serde(rename = "nss")]
    #[sqlx(rename = "nss")]
    pub social_security_id: Option<String>,

    #[serde(rename = "puesto")]
    #[sqlx(rename = "puesto")]
    pub position: Option<String>,

    #[serde(rename = "fechaIngreso")]
    #[sqlx(rename = "fechaIngreso")]
    #[schema(example = "2024-01-15", value_type = Option<String>, format = "date")]
    pub hire_date: Option<NaiveDate>,

    #[serde(rename = "sueldo")]
    #[sqlx(rename = "sueldo")]
    #[schema(example = 10000.0, value_type = f64)]
    pub base_salary: Decimal,

    #[serde(rename = "horas")]
    #[sqlx(rename = "horas")]
    #[schema(example = 160)]
    pub monthly_hours: u32,
}

/// A validated employee ready to be upserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub external_id: String,
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub social_security_id: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub base_salary: Decimal,
    pub monthly_hours: u32,
}

/// Result of an upsert keyed by external id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub internal_id: u64,
    pub was_inserted: bool,
}

// Column widths of the `empleados` table.
const MAX_EXTERNAL_ID: usize = 50;
const MAX_NAME: usize = 255;
const MAX_TAX_ID: usize = 13;
const MAX_SOCIAL_SECURITY_ID: usize = 20;
const MAX_POSITION: usize = 100;

/// One element of the `employees` array in `POST /api/employees`.
///
/// Every field is optional. Numbers may arrive as JSON numbers or numeric
/// strings; any other shape is read as absent.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeeInput {
    #[serde(rename = "IdEmpleado", default, deserialize_with = "lenient_text")]
    #[schema(example = "EMP001", value_type = Option<String>)]
    pub external_id: Option<String>,

    #[serde(rename = "nombre", default, deserialize_with = "lenient_text")]
    #[schema(example = "Ana López", value_type = Option<String>)]
    pub name: Option<String>,

    #[serde(rename = "rfc", default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>)]
    pub tax_id: Option<String>,

    #[serde(rename = "nss", default, deserialize_with = "lenient_text")]
    #[schema(value_type = Option<String>)]
    pub social_security_id: Option<String>,

    #[serde(rename = "puesto", default, deserialize_with = "lenient_text")]
    #[schema(example = "Senior Dev", value_type = Option<String>)]
    pub position: Option<String>,

    #[serde(rename = "fechaIngreso", default, deserialize_with = "lenient_text")]
    #[schema(example = "2024-01-15", value_type = Option<String>, format = "date")]
    pub hire_date: Option<String>,

    #[serde(rename = "sueldo", default, deserialize_with = "lenient_decimal")]
    #[schema(example = 10000.0, value_type = Option<f64>)]
    pub base_salary: Option<Decimal>,

    #[serde(rename = "horas", default, deserialize_with = "lenient_integer")]
    #[schema(example = 160, value_type = Option<i64>)]
    pub monthly_hours: Option<i64>,
}

impl EmployeeInput {
    /// Name used to tag per-item errors: the employee's name, else the external id.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.external_id.clone())
            .unwrap_or_else(|| "(sin identificador)".to_string())
    }
}

impl TryFrom<EmployeeInput> for NewEmployee {
    type Error = PayrollError;

    fn try_from(input: EmployeeInput) -> Result<Self, Self::Error> {
        let external_id = input
            .external_id
            .ok_or_else(|| PayrollError::Validation("IdEmpleado es requerido".to_string()))?;

        check_len("IdEmpleado", &external_id, MAX_EXTERNAL_ID)?;
        check_opt_len("nombre", &input.name, MAX_NAME)?;
        check_opt_len("rfc", &input.tax_id, MAX_TAX_ID)?;
        check_opt_len("nss", &input.social_security_id, MAX_SOCIAL_SECURITY_ID)?;
        check_opt_len("puesto", &input.position, MAX_POSITION)?;

        let hire_date = input.hire_date.as_deref().map(parse_date).transpose()?;

        let base_salary = input.base_salary.unwrap_or(Decimal::ZERO);
        if base_salary < Decimal::ZERO {
            return Err(PayrollError::Validation(
                "sueldo no puede ser negativo".to_string(),
            ));
        }

        let monthly_hours = match input.monthly_hours.unwrap_or(0) {
            h if h < 0 => {
                return Err(PayrollError::Validation(
                    "horas no puede ser negativo".to_string(),
                ));
            }
            h => u32::try_from(h)
                .map_err(|_| PayrollError::Validation("horas fuera de rango".to_string()))?,
        };

        Ok(NewEmployee {
            external_id,
            name: input.name,
            tax_id: input.tax_id,
            social_security_id: input.social_security_id,
            position: input.position,
            hire_date,
            base_salary,
            monthly_hours,
        })
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), PayrollError> {
    if value.chars().count() > max {
        return Err(PayrollError::Validation(format!(
            "{} excede {} caracteres",
            field, max
        )));
    }
    Ok(())
}

fn check_opt_len(field: &str, value: &Option<String>, max: usize) -> Result<(), PayrollError> {
    match value {
        Some(v) => check_len(field, v, max),
        None => Ok(()),
    }
}

/// Accepts `YYYY-MM-DD` or an ISO timestamp whose date part is used.
fn parse_date(raw: &str) -> Result<NaiveDate, PayrollError> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| PayrollError::Validation(format!("fechaIngreso inválida: {}", raw)))
}

pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    })
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn lenient_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let from_float = |f: f64| f.is_finite().then(|| f.round() as i64);
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    })
}
