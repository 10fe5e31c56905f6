use serde::Serialize;
use utoipa::ToSchema;

use crate::model::worker::CompensationMode;
use crate::payroll::month::YearMonth;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SalaryStatus {
    Paid,
    Partial,
    Pending,
}

impl SalaryStatus {
    /// Settlement status rule, checked in order: anything paid up to (or
    /// past) the net amount is settled, a nonzero shortfall is partial,
    /// nothing paid is pending.
    pub fn from_amounts(net_salary: f64, paid_amount: f64) -> Self {
        if paid_amount >= net_salary {
            SalaryStatus::Paid
        } else if paid_amount > 0.0 {
            SalaryStatus::Partial
        } else {
            SalaryStatus::Pending
        }
    }
}

/// A worker's payroll snapshot for one calendar month.
///
/// Always derived on demand from the attendance, advance and payment
/// ledgers; never stored, so it cannot go stale. The adjustment fields are
/// the sums recorded on the month's payment events (plus any preview
/// adjustments the caller supplied to the computation).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[schema(
    example = json!({
        "worker_id": 2,
        "worker_name": "Shyam Lal",
        "month": "2026-08",
        "compensation_mode": "daily",
        "days_worked": 25.0,
        "total_days": 31,
        "overtime_hours": 4.0,
        "base_salary": 10000.0,
        "bonus": 0.0,
        "deductions": 0.0,
        "advance_deducted": 0.0,
        "net_salary": 10000.0,
        "paid_amount": 9000.0,
        "status": "partial"
    })
)]
pub struct MonthlySalary {
    pub worker_id: i64,
    #[schema(example = "Shyam Lal")]
    pub worker_name: String,
    #[schema(value_type = String, example = "2026-08")]
    pub month: YearMonth,
    pub compensation_mode: CompensationMode,
    #[schema(example = 25.0)]
    pub days_worked: f64,
    #[schema(example = 31)]
    pub total_days: u32,
    #[schema(example = 4.0)]
    pub overtime_hours: f64,
    #[schema(example = 10000.0)]
    pub base_salary: f64,
    #[schema(example = 0.0)]
    pub bonus: f64,
    #[schema(example = 0.0)]
    pub deductions: f64,
    #[schema(example = 0.0)]
    pub advance_deducted: f64,
    #[schema(example = 10000.0)]
    pub net_salary: f64,
    #[schema(example = 9000.0)]
    pub paid_amount: f64,
    pub status: SalaryStatus,
}
