use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::Local;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::ToSchema;

use crate::model::worker::LifecycleStatus;
use crate::payroll::engine::month_payroll;
use crate::payroll::month::YearMonth;

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    #[schema(example = 18)]
    pub active_workers: i64,
    /// Workers marked present or half-day today
    #[schema(example = 15)]
    pub present_today: i64,
    #[schema(example = "2026-08")]
    pub month: String,
    /// Net payroll across the current month's snapshots
    #[schema(example = 185000.0)]
    pub monthly_salary_total: f64,
    #[schema(example = 7400.0)]
    pub outstanding_advance_total: f64,
}

/// Stats overview
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    responses(
        (status = 200, description = "Aggregate counts for the dashboard", body = StatsResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Stats"
)]
pub async fn get_stats(pool: web::Data<SqlitePool>) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();
    let month = YearMonth::of(today);

    let active_workers =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM workers WHERE status = ?")
            .bind(LifecycleStatus::Active)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to count active workers");
                ErrorInternalServerError("Internal Server Error")
            })?;

    let present_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status IN ('present', 'half-day')",
    )
    .bind(today)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count today's attendance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let snapshots = month_payroll(pool.get_ref(), month).await?;
    let monthly_salary_total = snapshots.iter().map(|s| s.net_salary).sum();

    let advanced: f64 = sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM advances")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to sum advances");
            ErrorInternalServerError("Internal Server Error")
        })?;
    let settled: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(advance_deducted), 0.0) FROM payments")
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to sum advance deductions");
                ErrorInternalServerError("Internal Server Error")
            })?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        active_workers,
        present_today,
        month: month.to_string(),
        monthly_salary_total,
        outstanding_advance_total: advanced - settled,
    }))
}
