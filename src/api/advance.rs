use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::advance::AdvancePayment;
use crate::payroll::engine::outstanding_advance;
use crate::utils::worker_cache::WorkerCache;

#[derive(Deserialize, ToSchema)]
pub struct RecordAdvance {
    #[schema(example = 1000.0)]
    pub amount: f64,
    /// Defaults to today when omitted
    #[schema(example = "2026-08-05", format = "date", value_type = String, nullable = true)]
    pub date: Option<NaiveDate>,
    #[schema(example = "festival advance", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdvanceQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Serialize, ToSchema)]
pub struct AdvanceListResponse {
    pub data: Vec<AdvancePayment>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

#[derive(Serialize, ToSchema)]
pub struct AdvanceBalance {
    #[schema(example = 1)]
    pub worker_id: i64,
    /// Everything advanced minus everything deducted on payments so far
    #[schema(example = 600.0)]
    pub outstanding_advance: f64,
}

/// Record Advance
///
/// Appends to the advance ledger. Advances are never edited or deleted;
/// they are settled through `advance_deducted` on later payments.
#[utoipa::path(
    post,
    path = "/api/v1/workers/{worker_id}/advances",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    request_body = RecordAdvance,
    responses(
        (status = 201, description = "Advance recorded", body = AdvancePayment),
        (status = 400, description = "Non-positive amount", body = Object, example = json!({
            "message": "advance amount must be positive"
        })),
        (status = 404, description = "Worker not found"),
        (status = 409, description = "Worker not active"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Advance"
)]
pub async fn record_advance(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    payload: web::Json<RecordAdvance>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    if payload.amount <= 0.0 {
        return Err(ApiError::validation("advance amount must be positive").into());
    }

    let worker = cache
        .get(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?
        .ok_or(ApiError::UnknownWorker(worker_id))?;
    if !worker.is_active() {
        return Err(ApiError::WorkerInactive(worker_id).into());
    }

    let advance = AdvancePayment {
        id: Uuid::new_v4().to_string(),
        worker_id,
        amount: payload.amount,
        date: payload.date.unwrap_or_else(|| Local::now().date_naive()),
        notes: payload.notes.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO advances (id, worker_id, amount, date, notes)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&advance.id)
    .bind(advance.worker_id)
    .bind(advance.amount)
    .bind(advance.date)
    .bind(&advance.notes)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, worker_id, "Failed to record advance");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(advance))
}

/// List Advances
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}/advances",
    params(
        ("worker_id", Path, description = "Worker ID"),
        AdvanceQuery
    ),
    responses(
        (status = 200, description = "Paginated advance history", body = AdvanceListResponse),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Advance"
)]
pub async fn list_advances(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    query: web::Query<AdvanceQuery>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    cache
        .get(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?
        .ok_or(ApiError::UnknownWorker(worker_id))?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page as i64 - 1) * per_page as i64;

    let total =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM advances WHERE worker_id = ?")
            .bind(worker_id)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, worker_id, "Failed to count advances");
                ErrorInternalServerError("Internal Server Error")
            })?;

    let data = sqlx::query_as::<_, AdvancePayment>(
        r#"
        SELECT id, worker_id, amount, date, notes
        FROM advances
        WHERE worker_id = ?
        ORDER BY date DESC, id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(worker_id)
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, worker_id, "Failed to fetch advances");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(AdvanceListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Outstanding Balance
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}/advances/balance",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    responses(
        (status = 200, description = "Unsettled advance balance", body = AdvanceBalance),
        (status = 404, description = "Worker not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Advance"
)]
pub async fn get_advance_balance(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    cache
        .get(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?
        .ok_or(ApiError::UnknownWorker(worker_id))?;

    let outstanding = outstanding_advance(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?;

    Ok(HttpResponse::Ok().json(AdvanceBalance {
        worker_id,
        outstanding_advance: outstanding,
    }))
}
