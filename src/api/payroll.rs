use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::model::salary::{MonthlySalary, SalaryStatus};
use crate::payroll::engine::{Adjustments, compute_monthly_salary, month_payroll};
use crate::payroll::month::YearMonth;
use crate::utils::worker_cache::WorkerCache;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayrollQuery {
    /// Payroll month, `YYYY-MM`
    #[param(example = "2026-08")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollTotals {
    #[schema(example = 54000.0)]
    pub total_net: f64,
    #[schema(example = 30000.0)]
    pub total_paid: f64,
    /// Shortfall still owed across the listed workers
    #[schema(example = 24000.0)]
    pub total_due: f64,
    #[schema(example = 2)]
    pub paid: u32,
    #[schema(example = 1)]
    pub partial: u32,
    #[schema(example = 3)]
    pub pending: u32,
}

impl PayrollTotals {
    fn from_snapshots(snapshots: &[MonthlySalary]) -> Self {
        let mut totals = PayrollTotals {
            total_net: 0.0,
            total_paid: 0.0,
            total_due: 0.0,
            paid: 0,
            partial: 0,
            pending: 0,
        };
        for salary in snapshots {
            totals.total_net += salary.net_salary;
            totals.total_paid += salary.paid_amount;
            totals.total_due += (salary.net_salary - salary.paid_amount).max(0.0);
            match salary.status {
                SalaryStatus::Paid => totals.paid += 1,
                SalaryStatus::Partial => totals.partial += 1,
                SalaryStatus::Pending => totals.pending += 1,
            }
        }
        totals
    }
}

#[derive(Serialize, ToSchema)]
pub struct PayrollListResponse {
    #[schema(example = "2026-08")]
    pub month: String,
    pub data: Vec<MonthlySalary>,
    pub totals: PayrollTotals,
}

/// Monthly payroll
///
/// Salary snapshot for every worker relevant to the month: all currently
/// active workers plus anyone with attendance or payments inside it (so a
/// worker who resigned mid-month still appears until settled).
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "Per-worker snapshots plus totals", body = PayrollListResponse),
        (status = 400, description = "Malformed month", body = Object, example = json!({
            "message": "invalid month '2026-13': expected YYYY-MM"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_monthly_payroll(
    pool: web::Data<SqlitePool>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    let month: YearMonth = query.month.parse().map_err(ApiError::from)?;

    let data = month_payroll(pool.get_ref(), month).await?;
    let totals = PayrollTotals::from_snapshots(&data);

    Ok(HttpResponse::Ok().json(PayrollListResponse {
        month: month.to_string(),
        data,
        totals,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SalaryQuery {
    /// Payroll month, `YYYY-MM`
    #[param(example = "2026-08")]
    pub month: String,
    /// Preview deduction on top of recorded payment adjustments
    #[param(example = 500.0)]
    pub deductions: Option<f64>,
    #[param(example = 0.0)]
    pub bonus: Option<f64>,
    #[param(example = 400.0)]
    pub advance_deducted: Option<f64>,
}

/// Compute Monthly Salary
///
/// Read-only: derives the snapshot from the ledgers without persisting
/// anything. Optional adjustment parameters preview what the month would
/// look like if a payment carried them.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}/salary",
    params(
        ("worker_id", Path, description = "Worker ID"),
        SalaryQuery
    ),
    responses(
        (status = 200, description = "Salary snapshot", body = MonthlySalary),
        (status = 400, description = "Malformed month or negative adjustment"),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "worker 9 not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_worker_salary(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    query: web::Query<SalaryQuery>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();
    let month: YearMonth = query.month.parse().map_err(ApiError::from)?;

    for (name, value) in [
        ("deductions", query.deductions),
        ("bonus", query.bonus),
        ("advance_deducted", query.advance_deducted),
    ] {
        if value.is_some_and(|v| v < 0.0) {
            return Err(ApiError::validation(format!("{name} must not be negative")).into());
        }
    }

    let adjustments = Adjustments {
        deductions: query.deductions.unwrap_or(0.0),
        bonus: query.bonus.unwrap_or(0.0),
        advance_deducted: query.advance_deducted.unwrap_or(0.0),
    };
    let preview = if adjustments.is_zero() {
        None
    } else {
        Some(&adjustments)
    };

    let salary =
        compute_monthly_salary(pool.get_ref(), cache.get_ref(), worker_id, month, preview).await?;

    Ok(HttpResponse::Ok().json(salary))
}
