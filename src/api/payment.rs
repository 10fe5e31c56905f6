use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::payment::{PaymentEvent, PaymentMethod};
use crate::model::salary::MonthlySalary;
use crate::payroll::engine::{compute_for_worker, outstanding_advance};
use crate::payroll::month::YearMonth;
use crate::utils::worker_cache::WorkerCache;

#[derive(Deserialize, ToSchema)]
pub struct RecordPayment {
    #[schema(example = 1)]
    pub worker_id: i64,
    #[schema(example = "2026-08")]
    pub month: String,
    #[schema(example = 9000.0)]
    pub paid_amount: f64,
    pub method: PaymentMethod,
    #[serde(default)]
    #[schema(example = 0.0)]
    pub deductions: f64,
    #[serde(default)]
    #[schema(example = 400.0)]
    pub advance_deducted: f64,
    #[serde(default)]
    #[schema(example = 0.0)]
    pub bonus: f64,
    #[schema(nullable = true)]
    pub notes: Option<String>,
}

/// The appended event together with the month's recomputed snapshot.
#[derive(Serialize, ToSchema)]
pub struct PaymentReceipt {
    pub payment: PaymentEvent,
    pub salary: MonthlySalary,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentQuery {
    /// Restrict to one payroll month, `YYYY-MM`
    #[param(example = "2026-08")]
    pub month: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentListResponse {
    pub data: Vec<PaymentEvent>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 2)]
    pub total: i64,
}

/// Record Payment
///
/// Appends a settlement event and recomputes the month. Events are never
/// updated or reversed; a mistake is corrected by a compensating event.
/// The advance deduction is checked against the worker's outstanding
/// balance so the advance ledger can never go negative.
#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = RecordPayment,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentReceipt),
        (status = 400, description = "Negative amount or malformed month"),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "worker 9 not found"
        })),
        (status = 409, description = "Advance deduction exceeds outstanding balance", body = Object, example = json!({
            "message": "advance deduction 500.00 exceeds outstanding balance 100.00"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payment"
)]
pub async fn record_payment(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    payload: web::Json<RecordPayment>,
) -> actix_web::Result<impl Responder> {
    let month: YearMonth = payload.month.parse().map_err(ApiError::from)?;

    for (name, value) in [
        ("paid_amount", payload.paid_amount),
        ("deductions", payload.deductions),
        ("advance_deducted", payload.advance_deducted),
        ("bonus", payload.bonus),
    ] {
        if value < 0.0 {
            return Err(ApiError::validation(format!("{name} must not be negative")).into());
        }
    }

    let worker = cache
        .get(pool.get_ref(), payload.worker_id)
        .await
        .map_err(ApiError::Db)?
        .ok_or(ApiError::UnknownWorker(payload.worker_id))?;

    if payload.advance_deducted > 0.0 {
        let outstanding = outstanding_advance(pool.get_ref(), worker.id)
            .await
            .map_err(ApiError::Db)?;
        if payload.advance_deducted > outstanding {
            return Err(ApiError::AdvanceOverdrawn {
                requested: payload.advance_deducted,
                outstanding,
            }
            .into());
        }
    }

    let event = PaymentEvent {
        id: Uuid::new_v4().to_string(),
        worker_id: worker.id,
        month: month.to_string(),
        paid_amount: payload.paid_amount,
        method: payload.method,
        deductions: payload.deductions,
        advance_deducted: payload.advance_deducted,
        bonus: payload.bonus,
        notes: payload.notes.clone(),
        paid_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO payments
        (id, worker_id, month, paid_amount, method, deductions, advance_deducted, bonus, notes, paid_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&event.id)
    .bind(event.worker_id)
    .bind(&event.month)
    .bind(event.paid_amount)
    .bind(event.method)
    .bind(event.deductions)
    .bind(event.advance_deducted)
    .bind(event.bonus)
    .bind(&event.notes)
    .bind(event.paid_at)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, worker_id = worker.id, month = %event.month, "Failed to record payment");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // Re-read the committed sums rather than trusting any earlier snapshot
    let salary = compute_for_worker(pool.get_ref(), &worker, month, None).await?;

    Ok(HttpResponse::Created().json(PaymentReceipt {
        payment: event,
        salary,
    }))
}

/// List Payments
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}/payments",
    params(
        ("worker_id", Path, description = "Worker ID"),
        PaymentQuery
    ),
    responses(
        (status = 200, description = "Paginated settlement history", body = PaymentListResponse),
        (status = 400, description = "Malformed month"),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payment"
)]
pub async fn list_payments(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    query: web::Query<PaymentQuery>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    cache
        .get(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?
        .ok_or(ApiError::UnknownWorker(worker_id))?;

    let month = match &query.month {
        Some(raw) => {
            let ym: YearMonth = raw.parse().map_err(ApiError::from)?;
            Some(ym.to_string())
        }
        None => None,
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page as i64 - 1) * per_page as i64;

    let mut conditions = vec!["worker_id = ?"];
    if month.is_some() {
        conditions.push("month = ?");
    }
    let where_clause = conditions.join(" AND ");

    let count_sql = format!("SELECT COUNT(*) FROM payments WHERE {}", where_clause);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(worker_id);
    if let Some(m) = &month {
        count_query = count_query.bind(m);
    }
    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, worker_id, "Failed to count payments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data_sql = format!(
        r#"
        SELECT id, worker_id, month, paid_amount, method, deductions,
               advance_deducted, bonus, notes, paid_at
        FROM payments
        WHERE {}
        ORDER BY paid_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_clause
    );
    let mut data_query = sqlx::query_as::<_, PaymentEvent>(&data_sql).bind(worker_id);
    if let Some(m) = &month {
        data_query = data_query.bind(m);
    }
    data_query = data_query.bind(per_page as i64).bind(offset);

    let data = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, worker_id, "Failed to fetch payments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(PaymentListResponse {
        data,
        page,
        per_page,
        total,
    }))
}
