//! Derivation of a payroll period from an employee record.
//!
//! Pure: no I/O, no randomness. The only ambient input is `today`, which the
//! caller supplies.

use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::employee::NewEmployee;
use crate::model::payroll::NewPayrollEntry;

/// Income-tax equivalent (ISR), 25% of gross.
pub const INCOME_TAX_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
/// Social-security equivalent (IMSS), 13% of gross.
pub const SOCIAL_SECURITY_RATE: Decimal = Decimal::from_parts(13, 0, 0, false, 2);

pub const DEFAULT_DAYS_WORKED: Decimal = Decimal::from_parts(20, 0, 0, false, 0);
const HOURS_PER_DAY: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

const DEFAULT_POSITION: &str = "General";
const DEPARTMENT_PREFIX: &str = "DEP-";

pub const JUNIOR_SUPERVISOR: &str = "Supervisor de Desarrollo";
pub const SENIOR_SUPERVISOR: &str = "Gerente de Área";
pub const DEFAULT_SUPERVISOR: &str = "Supervisor General";

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPayroll {
    pub department_code: String,
    pub supervisor_name: String,
    pub days_worked: Decimal,
    pub gross_pay: Decimal,
    pub income_tax: Decimal,
    pub social_security: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl DerivedPayroll {
    /// Binds the derived values to a resolved employee row.
    pub fn into_entry(self, employee_internal_id: u64, employee_external_id: &str) -> NewPayrollEntry {
        NewPayrollEntry {
            employee_internal_id,
            employee_external_id: employee_external_id.to_string(),
            department_code: Some(self.department_code),
            supervisor_name: Some(self.supervisor_name),
            days_worked: Some(self.days_worked),
            gross_pay: Some(self.gross_pay),
            total_deductions: Some(self.total_deductions),
            net_pay: Some(self.net_pay),
            period_start: Some(self.period_start),
            period_end: Some(self.period_end),
        }
    }
}

pub fn compute(employee: &NewEmployee, today: NaiveDate) -> DerivedPayroll {
    let gross_pay = employee.base_salary;
    let income_tax = gross_pay * INCOME_TAX_RATE;
    let social_security = gross_pay * SOCIAL_SECURITY_RATE;
    let total_deductions = income_tax + social_security;
    let (period_start, period_end) = month_bounds(today);

    DerivedPayroll {
        department_code: department_code(employee.position.as_deref()),
        supervisor_name: supervisor_for(employee.position.as_deref()).to_string(),
        days_worked: days_worked(employee.monthly_hours),
        gross_pay,
        income_tax,
        social_security,
        total_deductions,
        net_pay: gross_pay - total_deductions,
        period_start,
        period_end,
    }
}

/// `hours / 8` rounded half-up to two places, or 20 when no hours were reported.
pub fn days_worked(monthly_hours: u32) -> Decimal {
    if monthly_hours == 0 {
        return DEFAULT_DAYS_WORKED;
    }
    (Decimal::from(monthly_hours) / HOURS_PER_DAY)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn department_code(position: Option<&str>) -> String {
    let position = position.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_POSITION);
    let prefix: String = position.chars().take(3).collect();
    format!("{}{}", DEPARTMENT_PREFIX, prefix.to_uppercase())
}

/// Case-sensitive tiering; the junior check runs first.
pub fn supervisor_for(position: Option<&str>) -> &'static str {
    let position = position.unwrap_or(DEFAULT_POSITION);
    if position.contains("Jr") || position.contains("Junior") {
        JUNIOR_SUPERVISOR
    } else if position.contains("Senior") || position.contains("Sr") {
        SENIOR_SUPERVISOR
    } else {
        DEFAULT_SUPERVISOR
    }
}

/// First and last calendar day of `today`'s month, inclusive.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Days::new(u64::from(today.day0()));
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);
    (start, end)
}
