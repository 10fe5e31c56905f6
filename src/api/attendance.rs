use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::model::worker::{CompensationMode, LifecycleStatus};
use crate::utils::worker_cache::WorkerCache;

#[derive(Debug, Deserialize, IntoParams)]
pub struct RosterQuery {
    /// Roster day, `YYYY-MM-DD`
    #[param(example = "2026-08-14", value_type = String)]
    pub date: NaiveDate,
}

/// One line of the daily sheet: an active worker plus whatever was recorded
/// for the day, if anything.
#[derive(Serialize, ToSchema)]
pub struct RosterEntry {
    #[schema(example = 1)]
    pub worker_id: i64,
    #[schema(example = "Ram Kumar")]
    pub name: String,
    #[schema(example = "milker")]
    pub role: String,
    pub compensation_mode: CompensationMode,
    #[schema(nullable = true)]
    pub status: Option<AttendanceStatus>,
    #[schema(nullable = true, value_type = Option<String>, example = "07:30:00")]
    pub check_in: Option<NaiveTime>,
    #[schema(nullable = true, value_type = Option<String>, example = "17:00:00")]
    pub check_out: Option<NaiveTime>,
    #[schema(example = 0.0)]
    pub overtime_hours: f64,
    #[schema(nullable = true)]
    pub notes: Option<String>,
    /// false when no record exists yet for this worker and day
    pub recorded: bool,
}

#[derive(Serialize, ToSchema)]
pub struct RosterResponse {
    #[schema(example = "2026-08-14", value_type = String)]
    pub date: NaiveDate,
    pub data: Vec<RosterEntry>,
}

#[derive(sqlx::FromRow)]
struct RosterRow {
    worker_id: i64,
    name: String,
    role: String,
    compensation_mode: CompensationMode,
    status: Option<AttendanceStatus>,
    check_in: Option<NaiveTime>,
    check_out: Option<NaiveTime>,
    overtime_hours: Option<f64>,
    notes: Option<String>,
}

/// Daily roster
///
/// Every active worker, joined with the day's attendance record where one
/// exists. Workers without a record come back with `recorded = false` so
/// the sheet shows who is still unmarked.
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(RosterQuery),
    responses(
        (status = 200, description = "Roster for the day", body = RosterResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_daily_roster(
    pool: web::Data<SqlitePool>,
    query: web::Query<RosterQuery>,
) -> actix_web::Result<impl Responder> {
    let date = query.date;

    let rows = sqlx::query_as::<_, RosterRow>(
        r#"
        SELECT w.id AS worker_id, w.name, w.role, w.compensation_mode,
               a.status, a.check_in, a.check_out, a.overtime_hours, a.notes
        FROM workers w
        LEFT JOIN attendance a ON a.worker_id = w.id AND a.date = ?
        WHERE w.status = ?
        ORDER BY w.name, w.id
        "#,
    )
    .bind(date)
    .bind(LifecycleStatus::Active)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, %date, "Failed to fetch daily roster");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let data = rows
        .into_iter()
        .map(|row| RosterEntry {
            worker_id: row.worker_id,
            name: row.name,
            role: row.role,
            compensation_mode: row.compensation_mode,
            recorded: row.status.is_some(),
            status: row.status,
            check_in: row.check_in,
            check_out: row.check_out,
            overtime_hours: row.overtime_hours.unwrap_or(0.0),
            notes: row.notes,
        })
        .collect();

    Ok(HttpResponse::Ok().json(RosterResponse { date, data }))
}

#[derive(Deserialize, ToSchema)]
pub struct SheetEntry {
    #[schema(example = 1)]
    pub worker_id: i64,
    /// Null means unmarked; the entry is skipped, not recorded
    #[schema(nullable = true)]
    pub status: Option<AttendanceStatus>,
    #[schema(nullable = true, value_type = Option<String>, example = "07:30:00")]
    pub check_in: Option<NaiveTime>,
    #[schema(nullable = true, value_type = Option<String>, example = "17:00:00")]
    pub check_out: Option<NaiveTime>,
    #[serde(default)]
    #[schema(example = 1.5)]
    pub overtime_hours: f64,
    #[schema(nullable = true)]
    pub notes: Option<String>,
}

/// A whole day's attendance in one submission.
#[derive(Deserialize, ToSchema)]
pub struct DailySheet {
    #[schema(example = "2026-08-14", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub entries: Vec<SheetEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct SkippedEntry {
    #[schema(example = 9)]
    pub worker_id: i64,
    #[schema(example = "unknown worker")]
    pub reason: String,
}

#[derive(Serialize, ToSchema)]
pub struct SheetResult {
    /// Echo of the submitted sheet date
    #[schema(example = "2026-08-14", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 12)]
    pub saved: u32,
    pub skipped: Vec<SkippedEntry>,
}

/// Bulk attendance upsert
///
/// Replaces any existing record per (worker, date), so resubmitting the
/// same sheet is a no-op. Best-effort per entry: bad entries are skipped
/// with a reason and the rest still commit.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = DailySheet,
    responses(
        (status = 200, description = "Sheet processed", body = SheetResult),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn submit_daily_sheet(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    payload: web::Json<DailySheet>,
) -> actix_web::Result<impl Responder> {
    let mut saved: u32 = 0;
    let mut skipped: Vec<SkippedEntry> = Vec::new();

    for entry in &payload.entries {
        let skip = |reason: &str| SkippedEntry {
            worker_id: entry.worker_id,
            reason: reason.to_string(),
        };

        let Some(status) = entry.status else {
            skipped.push(skip("unmarked"));
            continue;
        };
        if entry.overtime_hours < 0.0 {
            skipped.push(skip("overtime_hours must not be negative"));
            continue;
        }

        match cache.get(pool.get_ref(), entry.worker_id).await {
            Ok(Some(worker)) if worker.is_active() => {}
            Ok(Some(_)) => {
                skipped.push(skip("worker not active"));
                continue;
            }
            Ok(None) => {
                skipped.push(skip("unknown worker"));
                continue;
            }
            Err(e) => {
                error!(error = %e, worker_id = entry.worker_id, "Worker lookup failed");
                skipped.push(skip("database error"));
                continue;
            }
        }

        let result = sqlx::query(
            r#"
            INSERT INTO attendance
            (worker_id, date, status, check_in, check_out, overtime_hours, notes)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (worker_id, date) DO UPDATE SET
                status = excluded.status,
                check_in = excluded.check_in,
                check_out = excluded.check_out,
                overtime_hours = excluded.overtime_hours,
                notes = excluded.notes
            "#,
        )
        .bind(entry.worker_id)
        .bind(payload.date)
        .bind(status)
        .bind(entry.check_in)
        .bind(entry.check_out)
        .bind(entry.overtime_hours)
        .bind(&entry.notes)
        .execute(pool.get_ref())
        .await;

        match result {
            Ok(_) => saved += 1,
            Err(e) => {
                error!(error = %e, worker_id = entry.worker_id, date = %payload.date,
                       "Failed to save attendance entry");
                skipped.push(skip("database error"));
            }
        }
    }

    Ok(HttpResponse::Ok().json(SheetResult {
        date: payload.date,
        saved,
        skipped,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Range start, `YYYY-MM-DD`, inclusive
    #[param(example = "2026-08-01", value_type = String)]
    pub from: NaiveDate,
    /// Range end, `YYYY-MM-DD`, inclusive
    #[param(example = "2026-08-31", value_type = String)]
    pub to: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub data: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}

/// Attendance history
///
/// Date-ordered records for one worker plus the rollup counts the payroll
/// view shows.
#[utoipa::path(
    get,
    path = "/api/v1/workers/{worker_id}/attendance",
    params(
        ("worker_id", Path, description = "Worker ID"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Records and summary", body = HistoryResponse),
        (status = 400, description = "Bad date range"),
        (status = 404, description = "Worker not found", body = Object, example = json!({
            "message": "Worker not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance_history(
    pool: web::Data<SqlitePool>,
    cache: web::Data<WorkerCache>,
    path: web::Path<i64>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let worker_id = path.into_inner();

    if query.from > query.to {
        return Err(ApiError::validation("'from' must not be after 'to'").into());
    }

    let worker = cache
        .get(pool.get_ref(), worker_id)
        .await
        .map_err(ApiError::Db)?;
    if worker.is_none() {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Worker not found"
        })));
    }

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, worker_id, date, status, check_in, check_out, overtime_hours, notes
        FROM attendance
        WHERE worker_id = ? AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(worker_id)
    .bind(query.from)
    .bind(query.to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, worker_id, "Failed to fetch attendance history");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let summary = AttendanceSummary::from_records(&records);

    Ok(HttpResponse::Ok().json(HistoryResponse { data: records, summary }))
}
