use crate::{
    error::ApiError,
    model::worker::{CompensationMode, LifecycleStatus, Worker},
    utils::db_utils::{build_worker_update, execute_update},
    utils::worker_cache::WorkerCache,
};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_json::json;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateWorker {
    #[schema(example = "Ram Kumar")]
    pub name: String,
    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "milker")]
    pub role: String,
    #[schema(example = "Basantpur", nullable = true)]
    pub village: Option<String>,
    pub compensation_mode: CompensationMode,
    #[schema(example = 12000.0, nullable = true)]
    pub monthly_salary: Option<f64>,
    #[schema(example = 500.0, nullable = true)]
    pub daily_wage: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub join_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WorkerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub status: Option<String>,
    pub mode: Option<String>,
    pub village: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct WorkerListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "name": "Ram Kumar",
        "phone": "+919812345678",
        "role": "milker",
        "village": "Basantpur",
        "compensation_mode": "daily",
        "monthly_salary": null,
        "daily_wage": 500.0,
        "join_date": "2024-06-01",
        "status": "active"
    }])
)]
    pub data: Vec<Worker>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 35)]
    pub total: i64,
}

/// Documents the partial-update body; the handler takes raw JSON so only
/// the supplied fields are touched.
#[derive(Deserialize, ToSchema)]
pub struct UpdateWorker {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub village: Option<String>,
    pub compensation_mode: Option<String>,
    pub monthly_salary: Option<f64>,
    pub daily_wage: Option<f64>,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub join_date: Option<NaiveDate>,
    #[schema(example = "on-leave")]
    pub status: Option<String>,
}

/// The rate matching the compensation mode must be present and positive.
fn validate_rates(
    mode: CompensationMode,
    monthly_salary: Option<f64>,
    daily_wage: Option<f64>,
) -> Result<(), ApiError> {
    match mode {
        CompensationMode::Monthly if monthly_salary.is_some_and(|v| v > 0.0) => Ok(()),
        CompensationMode::Monthly => Err(ApiError::validation(
            "monthly_salary must be a positive number for monthly workers",
        )),
        CompensationMode::Daily if daily_wage.is_some_and(|v| v > 0.0) => Ok(()),
        CompensationMode::Daily => Err(ApiError::validation(
            "daily_wage must be a positive number for daily workers",
        )),
    }
}

/// Create Worker
#[utoipa::path(
    post,
    path = "/api/v1/workers",
    request_body = CreateWorker,
    responses(
        (status = 201, description = "Worker created", body = Worker),
        (status = 400, description = "Validation failed", body = Object, example = json!({
            "message": "daily_wage must be a positive number for daily workers"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn create_worker(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    payload: web::Json<CreateWorker>,
) -> actix_web::Result<impl Responder> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("name must not be empty").into());
    }
    if payload.role.trim().is_empty() {
        return Err(ApiError::validation("role must not be empty").into());
    }
    validate_rates(
        payload.compensation_mode,
        payload.monthly_salary,
        payload.daily_wage,
    )?;

    let result = sqlx::query(
        r#"
        INSERT INTO workers
        (name, phone, role, village, compensation_mode, monthly_salary, daily_wage, join_date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.phone)
    .bind(&payload.role)
    .bind(&payload.village)
    .bind(payload.compensation_mode)
    .bind(payload.monthly_salary)
    .bind(payload.daily_wage)
    .bind(payload.join_date)
    .bind(LifecycleStatus::Active)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create worker");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let payload = payload.into_inner();
    let worker = Worker {
        id: result.last_insert_rowid(),
        name: payload.name,
        phone: payload.phone,
        role: payload.role,
        village: payload.village,
        compensation_mode: payload.compensation_mode,
        monthly_salary: payload.monthly_salary,
        daily_wage: payload.daily_wage,
        join_date: payload.join_date,
        status: LifecycleStatus::Active,
    };
    cache.insert(worker.clone()).await;

    Ok(HttpResponse::Created().json(worker))
}

// -------------------- Listing --------------------

#[utoipa::path(
    get,
    path = "/api/v1/workers",
    params(
        ("page",  Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("status", Query, description = "Filter by lifecycle status"),
        ("mode", Query, description = "Filter by compensation mode"),
        ("village", Query, description = "Filter by village"),
        ("search", Query, description = "Search by name, phone or role")
    ),
    responses(
        (status = 200, description = "Paginated worker list", body = WorkerListResponse),
        (status = 400, description = "Bad filter value")
    ),
    tag = "Worker"
)]
pub async fn list_workers(
    pool: web::Data<SqlitePool>,
    query: web::Query<WorkerQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    // i64 so the multiply cannot overflow for huge page numbers
    let offset = (page as i64 - 1) * per_page as i64;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<String> = Vec::new();

    if let Some(status) = &query.status {
        let status = LifecycleStatus::from_str(status)
            .map_err(|_| ApiError::validation(format!("invalid status '{status}'")))?;
        conditions.push("status = ?");
        bindings.push(status.to_string());
    }

    if let Some(mode) = &query.mode {
        let mode = CompensationMode::from_str(mode)
            .map_err(|_| ApiError::validation(format!("invalid mode '{mode}'")))?;
        conditions.push("compensation_mode = ?");
        bindings.push(mode.to_string());
    }

    if let Some(village) = &query.village {
        conditions.push("village = ?");
        bindings.push(village.clone());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR phone LIKE ? OR role LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone());
        bindings.push(like.clone());
        bindings.push(like);
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM workers {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting workers");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count workers");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM workers {} ORDER BY name, id LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching workers");

    let mut data_query = sqlx::query_as::<_, Worker>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset);

    let workers = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch workers");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(WorkerListResponse {
        data: workers,
        page,
        per_page,
        total,
    }))
}

/// Get Worker by ID
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    responses(
        (status = 200, description = "Worker found", body = Worker),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn get_worker(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    let worker = cache.get(pool.get_ref(), worker_id).await.map_err(|e| {
        tracing::error!(error = %e, worker_id, "Failed to fetch worker");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match worker {
        Some(worker) => Ok(HttpResponse::Ok().json(worker)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Worker not found"
        }))),
    }
}

/// Update Worker
#[utoipa::path(
    put,
    path = "/api/v1/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    request_body = UpdateWorker,
    responses(
        (status = 200, description = "Worker updated", body = Worker),
        (status = 400, description = "Unknown field or bad value"),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn update_worker(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    let update = build_worker_update(&body, worker_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(ApiError::Db)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Worker not found"
        })));
    }

    // Serve the fresh row, and drop the stale cache entry
    cache.invalidate(worker_id).await;
    let worker = sqlx::query_as::<_, Worker>("SELECT * FROM workers WHERE id = ?")
        .bind(worker_id)
        .fetch_one(pool.get_ref())
        .await
        .map_err(ApiError::Db)?;

    Ok(HttpResponse::Ok().json(worker))
}

/// Delete Worker
///
/// Destructive: removes the worker together with all attendance, advance
/// and payment history, all-or-nothing.
#[utoipa::path(
    delete,
    path = "/api/v1/workers/{worker_id}",
    params(
        ("worker_id", Path, description = "Worker ID")
    ),
    responses(
        (status = 200, description = "Worker and history deleted", body = Object, example = json!({
            "message": "Worker and history deleted"
        })),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Worker"
)]
pub async fn delete_worker(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(ApiError::Db)?;

    sqlx::query("DELETE FROM attendance WHERE worker_id = ?")
        .bind(worker_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Db)?;
    sqlx::query("DELETE FROM advances WHERE worker_id = ?")
        .bind(worker_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Db)?;
    sqlx::query("DELETE FROM payments WHERE worker_id = ?")
        .bind(worker_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Db)?;

    let result = sqlx::query("DELETE FROM workers WHERE id = ?")
        .bind(worker_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::Db)?;

    if result.rows_affected() == 0 {
        tx.rollback().await.map_err(ApiError::Db)?;
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Worker not found"
        })));
    }

    tx.commit().await.map_err(ApiError::Db)?;
    cache.invalidate(worker_id).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Worker and history deleted"
    })))
}
