use actix_web::http::StatusCode;
use actix_web::web::Data;
use actix_web::{App, test};
use chrono::Local;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;

use crate::config::Config;
use crate::payroll::month::YearMonth;
use crate::utils::worker_cache::WorkerCache;

/// Fresh in-memory database per test. The shared-cache URI keeps the
/// database alive for every pooled connection with the same name.
pub(crate) async fn test_pool() -> SqlitePool {
    let url = format!(
        "sqlite:file:memdb_{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4().simple()
    );
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("connect test db");
    crate::db::apply_schema(&pool).await.expect("apply schema");
    pool
}

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        server_addr: String::new(),
        worker_cache_capacity: 1_000,
        worker_cache_ttl_secs: 60,
        cache_warmup_batch: 100,
        api_prefix: "/api/v1".to_string(),
    }
}

fn test_cache() -> WorkerCache {
    WorkerCache::new(1_000, Duration::from_secs(60))
}

macro_rules! app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(Data::new($pool.clone()))
                .app_data(Data::new(test_cache()))
                .configure(|cfg| crate::routes::configure(cfg, test_config())),
        )
        .await
    };
}

async fn seed_worker(
    pool: &SqlitePool,
    name: &str,
    mode: &str,
    monthly_salary: Option<f64>,
    daily_wage: Option<f64>,
) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO workers (name, role, compensation_mode, monthly_salary, daily_wage, join_date, status)
        VALUES (?, 'laborer', ?, ?, ?, '2026-01-01', 'active')
        "#,
    )
    .bind(name)
    .bind(mode)
    .bind(monthly_salary)
    .bind(daily_wage)
    .execute(pool)
    .await
    .expect("seed worker")
    .last_insert_rowid()
}

async fn seed_attendance(pool: &SqlitePool, worker_id: i64, date: &str, status: &str) {
    sqlx::query(
        r#"
        INSERT INTO attendance (worker_id, date, status, overtime_hours)
        VALUES (?, ?, ?, 0)
        "#,
    )
    .bind(worker_id)
    .bind(date)
    .bind(status)
    .execute(pool)
    .await
    .expect("seed attendance");
}

async fn table_count(pool: &SqlitePool, table: &str, worker_id: i64) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE worker_id = ?", table);
    sqlx::query_scalar(&sql)
        .bind(worker_id)
        .fetch_one(pool)
        .await
        .expect("count rows")
}

// ------- Worker directory -------

#[actix_web::test]
async fn create_worker_requires_the_rate_for_its_mode() {
    let pool = test_pool().await;
    let app = app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/workers")
        .set_json(json!({
            "name": "Shyam Lal",
            "role": "field hand",
            "compensation_mode": "daily",
            "join_date": "2026-01-15"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/workers")
        .set_json(json!({
            "name": "Shyam Lal",
            "role": "field hand",
            "compensation_mode": "daily",
            "daily_wage": 500.0,
            "join_date": "2026-01-15"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["id"].as_i64().unwrap() > 0);
    assert_eq!(body["status"], "active");
    assert_eq!(body["daily_wage"], 500.0);
}

#[actix_web::test]
async fn worker_update_is_whitelisted_and_visible_immediately() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;

    // identity is immutable
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/workers/{id}"))
        .set_json(json!({"id": 99}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // prime the cache, then update through the API
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/workers/{id}"))
        .set_json(json!({"daily_wage": 450.0, "village": "Basantpur"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["daily_wage"], 450.0);

    // the cached profile must not survive the update
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["daily_wage"], 450.0);
    assert_eq!(body["village"], "Basantpur");

    let req = test::TestRequest::put()
        .uri("/api/v1/workers/9999")
        .set_json(json!({"village": "Basantpur"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_rejects_wrongly_typed_values_without_touching_the_row() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    for payload in [
        json!({"status": 5}),
        json!({"monthly_salary": "abc"}),
        json!({"name": null}),
        json!({"join_date": null}),
    ] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/workers/{id}"))
            .set_json(&payload)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    // the row is untouched and still decodes wherever it is read
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["status"], "active");
    assert_eq!(body["monthly_salary"], 12000.0);

    let req = test::TestRequest::get().uri("/api/v1/workers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/payroll?month=2026-04")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn worker_list_filters_and_paginates() {
    let pool = test_pool().await;
    let app = app!(pool);
    let a = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;
    seed_worker(&pool, "Shyam Lal", "daily", None, Some(500.0)).await;
    seed_worker(&pool, "Sita Devi", "daily", None, Some(450.0)).await;

    // one worker resigns
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/workers/{a}"))
        .set_json(json!({"status": "resigned"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/workers?status=active")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/workers?search=Sita")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["name"], "Sita Devi");

    let req = test::TestRequest::get()
        .uri("/api/v1/workers?per_page=2&page=2")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // a page index at u32::MAX still pages cleanly past the end
    let req = test::TestRequest::get()
        .uri("/api/v1/workers?per_page=100&page=4294967295")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/workers?status=retired")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ------- Attendance ledger -------

#[actix_web::test]
async fn daily_sheet_is_idempotent_and_last_write_wins() {
    let pool = test_pool().await;
    let app = app!(pool);
    let a = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;
    let b = seed_worker(&pool, "Shyam Lal", "daily", None, Some(500.0)).await;

    let sheet = json!({
        "date": "2026-04-01",
        "entries": [
            {"worker_id": a, "status": "present", "check_in": "07:30:00", "overtime_hours": 1.5},
            {"worker_id": b, "status": "half-day"}
        ]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .set_json(&sheet)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["date"], "2026-04-01");
    assert_eq!(body["saved"], 2);
    assert_eq!(body["skipped"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?date=2026-04-01")
        .to_request();
    let first: Value = test::read_body_json(test::call_service(&app, req).await).await;

    // resubmitting the identical sheet leaves the roster unchanged
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .set_json(&sheet)
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["saved"], 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?date=2026-04-01")
        .to_request();
    let second: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(first, second);

    // a corrected entry replaces the earlier one
    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .set_json(json!({
            "date": "2026-04-01",
            "entries": [{"worker_id": b, "status": "present"}]
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["saved"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?date=2026-04-01")
        .to_request();
    let roster: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let entry = roster["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["worker_id"] == b)
        .unwrap();
    assert_eq!(entry["status"], "present");
}

#[actix_web::test]
async fn daily_sheet_skips_bad_entries_but_commits_the_rest() {
    let pool = test_pool().await;
    let app = app!(pool);
    let a = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;
    let b = seed_worker(&pool, "Shyam Lal", "daily", None, Some(500.0)).await;
    sqlx::query("UPDATE workers SET status = 'resigned' WHERE id = ?")
        .bind(b)
        .execute(&pool)
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/api/v1/attendance")
        .set_json(json!({
            "date": "2026-04-02",
            "entries": [
                {"worker_id": a, "status": "present"},
                {"worker_id": a + 100, "status": "present"},
                {"worker_id": b, "status": "present"},
                {"worker_id": a, "status": null}
            ]
        }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["date"], "2026-04-02");
    assert_eq!(body["saved"], 1);
    let skipped = body["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 3);
    let reasons: Vec<&str> = skipped.iter().map(|s| s["reason"].as_str().unwrap()).collect();
    assert!(reasons.contains(&"unknown worker"));
    assert!(reasons.contains(&"worker not active"));
    assert!(reasons.contains(&"unmarked"));

    assert_eq!(table_count(&pool, "attendance", a).await, 1);
    assert_eq!(table_count(&pool, "attendance", b).await, 0);
}

#[actix_web::test]
async fn roster_lists_every_active_worker_with_recorded_flag() {
    let pool = test_pool().await;
    let app = app!(pool);
    let a = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;
    let b = seed_worker(&pool, "Shyam Lal", "daily", None, Some(500.0)).await;
    let c = seed_worker(&pool, "Sita Devi", "daily", None, Some(450.0)).await;
    sqlx::query("UPDATE workers SET status = 'resigned' WHERE id = ?")
        .bind(c)
        .execute(&pool)
        .await
        .unwrap();
    seed_attendance(&pool, a, "2026-04-03", "present").await;

    let req = test::TestRequest::get()
        .uri("/api/v1/attendance?date=2026-04-03")
        .to_request();
    let roster: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let data = roster["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    let row_a = data.iter().find(|e| e["worker_id"] == a).unwrap();
    let row_b = data.iter().find(|e| e["worker_id"] == b).unwrap();
    assert_eq!(row_a["recorded"], true);
    assert_eq!(row_a["status"], "present");
    assert_eq!(row_b["recorded"], false);
    assert_eq!(row_b["status"], Value::Null);
}

#[actix_web::test]
async fn attendance_history_returns_ordered_records_and_summary() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;
    seed_attendance(&pool, id, "2026-04-02", "half-day").await;
    seed_attendance(&pool, id, "2026-04-01", "present").await;
    seed_attendance(&pool, id, "2026-04-03", "absent").await;
    seed_attendance(&pool, id, "2026-05-01", "present").await; // outside the range

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/workers/{id}/attendance?from=2026-04-01&to=2026-04-30"
        ))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["date"], "2026-04-01");
    assert_eq!(data[2]["date"], "2026-04-03");
    assert_eq!(body["summary"]["present"], 1);
    assert_eq!(body["summary"]["half_day"], 1);
    assert_eq!(body["summary"]["absent"], 1);
    assert_eq!(body["summary"]["days_worked"], 1.5);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/workers/{id}/attendance?from=2026-04-30&to=2026-04-01"
        ))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

// ------- Advance ledger -------

#[actix_web::test]
async fn advance_balance_tracks_deductions() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{id}/advances"))
        .set_json(json!({"amount": 1000.0, "notes": "festival advance"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/advances/balance"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["outstanding_advance"], 1000.0);

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 5000.0,
            "method": "cash",
            "advance_deducted": 400.0
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/advances/balance"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["outstanding_advance"], 600.0);
}

#[actix_web::test]
async fn advances_validate_amount_and_worker_state() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{id}/advances"))
        .set_json(json!({"amount": 0.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/workers/9999/advances")
        .set_json(json!({"amount": 500.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    sqlx::query("UPDATE workers SET status = 'resigned' WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{id}/advances"))
        .set_json(json!({"amount": 500.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

// ------- Payroll engine over the API -------

#[actix_web::test]
async fn monthly_worker_with_no_attendance_is_owed_the_full_salary() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/salary?month=2026-04"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["base_salary"], 12000.0);
    assert_eq!(body["net_salary"], 12000.0);
    assert_eq!(body["days_worked"], 0.0);
    assert_eq!(body["total_days"], 30);
    assert_eq!(body["paid_amount"], 0.0);
    assert_eq!(body["status"], "pending");
}

#[actix_web::test]
async fn daily_worker_salary_follows_payments_to_paid() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Shyam Lal", "daily", None, Some(400.0)).await;
    for day in 1..=25 {
        seed_attendance(&pool, id, &format!("2026-04-{:02}", day), "present").await;
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/salary?month=2026-04"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["days_worked"], 25.0);
    assert_eq!(body["base_salary"], 10000.0);
    assert_eq!(body["status"], "pending");

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 9000.0,
            "method": "cash"
        }))
        .to_request();
    let receipt: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(receipt["salary"]["net_salary"], 10000.0);
    assert_eq!(receipt["salary"]["paid_amount"], 9000.0);
    assert_eq!(receipt["salary"]["status"], "partial");

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 1000.0,
            "method": "upi"
        }))
        .to_request();
    let receipt: Value = test::read_body_json(test::call_service(&app, req).await).await;

    // paid amounts accumulate across events
    assert_eq!(receipt["salary"]["paid_amount"], 10000.0);
    assert_eq!(receipt["salary"]["status"], "paid");
}

#[actix_web::test]
async fn salary_preview_adjustments_are_not_persisted() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/workers/{id}/salary?month=2026-04&deductions=1000&bonus=500"
        ))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["deductions"], 1000.0);
    assert_eq!(body["bonus"], 500.0);
    assert_eq!(body["net_salary"], 11500.0);

    // the plain read is untouched
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/salary?month=2026-04"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["deductions"], 0.0);
    assert_eq!(body["net_salary"], 12000.0);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/workers/{id}/salary?month=2026-04&deductions=-5"
        ))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/salary?month=2026-13"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::get()
        .uri("/api/v1/workers/9999/salary?month=2026-04")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn payment_adjustments_accumulate_into_the_snapshot() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 5000.0,
            "method": "cash",
            "deductions": 300.0
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 6000.0,
            "method": "bank",
            "deductions": 200.0,
            "bonus": 500.0
        }))
        .to_request();
    let receipt: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let salary = &receipt["salary"];
    assert_eq!(salary["deductions"], 500.0);
    assert_eq!(salary["bonus"], 500.0);
    // 12000 + 500 - 500
    assert_eq!(salary["net_salary"], 12000.0);
    assert_eq!(salary["paid_amount"], 11000.0);
    assert_eq!(salary["status"], "partial");
}

// ------- Payment ledger -------

#[actix_web::test]
async fn overdrawing_the_advance_balance_is_rejected() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{id}/advances"))
        .set_json(json!({"amount": 100.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 5000.0,
            "method": "cash",
            "advance_deducted": 500.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "advance deduction 500.00 exceeds outstanding balance 100.00"
    );

    // nothing was appended
    assert_eq!(table_count(&pool, "payments", id).await, 0);
}

#[actix_web::test]
async fn payments_reject_negative_amounts_and_unknown_workers() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": -100.0,
            "method": "cash"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": 9999,
            "month": "2026-04",
            "paid_amount": 100.0,
            "method": "cash"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "04-2026",
            "paid_amount": 100.0,
            "method": "cash"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn payment_history_filters_by_month() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;

    for (month, amount) in [("2026-03", 12000.0), ("2026-04", 5000.0)] {
        let req = test::TestRequest::post()
            .uri("/api/v1/payments")
            .set_json(json!({
                "worker_id": id,
                "month": month,
                "paid_amount": amount,
                "method": "cash"
            }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::CREATED
        );
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/payments"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 2);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}/payments?month=2026-03"))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["paid_amount"], 12000.0);
}

// ------- Monthly payroll listing -------

#[actix_web::test]
async fn monthly_payroll_covers_relevant_workers_and_totals() {
    let pool = test_pool().await;
    let app = app!(pool);
    let a = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;
    let b = seed_worker(&pool, "Shyam Lal", "daily", None, Some(400.0)).await;
    for day in 1..=10 {
        seed_attendance(&pool, b, &format!("2026-04-{:02}", day), "present").await;
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": b,
            "month": "2026-04",
            "paid_amount": 4000.0,
            "method": "cash"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    // resigned after settling, but keeps the month's history
    sqlx::query("UPDATE workers SET status = 'resigned' WHERE id = ?")
        .bind(b)
        .execute(&pool)
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/payroll?month=2026-04")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    let row_a = data.iter().find(|s| s["worker_id"] == a).unwrap();
    let row_b = data.iter().find(|s| s["worker_id"] == b).unwrap();
    assert_eq!(row_a["net_salary"], 12000.0);
    assert_eq!(row_b["net_salary"], 4000.0);
    assert_eq!(row_b["status"], "paid");

    let totals = &body["totals"];
    assert_eq!(totals["total_net"], 16000.0);
    assert_eq!(totals["total_paid"], 4000.0);
    assert_eq!(totals["total_due"], 12000.0);
    assert_eq!(totals["paid"], 1);
    assert_eq!(totals["pending"], 1);

    // next month the resigned worker has no history and drops out
    let req = test::TestRequest::get()
        .uri("/api/v1/payroll?month=2026-05")
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["worker_id"], a);
}

// ------- Cascade delete -------

#[actix_web::test]
async fn deleting_a_worker_removes_all_history() {
    let pool = test_pool().await;
    let app = app!(pool);
    let id = seed_worker(&pool, "Ram Kumar", "daily", None, Some(400.0)).await;
    seed_attendance(&pool, id, "2026-04-01", "present").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{id}/advances"))
        .set_json(json!({"amount": 300.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/payments")
        .set_json(json!({
            "worker_id": id,
            "month": "2026-04",
            "paid_amount": 400.0,
            "method": "cash"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/workers/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    assert_eq!(table_count(&pool, "attendance", id).await, 0);
    assert_eq!(table_count(&pool, "advances", id).await, 0);
    assert_eq!(table_count(&pool, "payments", id).await, 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/workers/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::delete()
        .uri("/api/v1/workers/9999")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

// ------- Stats -------

#[actix_web::test]
async fn stats_aggregate_the_current_month() {
    let pool = test_pool().await;
    let app = app!(pool);
    let today = Local::now().date_naive();
    let month = YearMonth::of(today);

    let a = seed_worker(&pool, "Ram Kumar", "monthly", Some(12000.0), None).await;
    let b = seed_worker(&pool, "Shyam Lal", "daily", None, Some(500.0)).await;
    seed_attendance(&pool, b, &today.to_string(), "present").await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workers/{a}/advances"))
        .set_json(json!({"amount": 700.0}))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(body["active_workers"], 2);
    assert_eq!(body["present_today"], 1);
    assert_eq!(body["month"], month.to_string());
    // 12000 for the monthly worker plus one day of daily wage
    assert_eq!(body["monthly_salary_total"], 12500.0);
    assert_eq!(body["outstanding_advance_total"], 700.0);
}
