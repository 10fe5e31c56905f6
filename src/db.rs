use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Sqlite, SqlitePool};

/// One statement per entry, sqlite prepares them individually.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS workers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        phone TEXT,
        role TEXT NOT NULL,
        village TEXT,
        compensation_mode TEXT NOT NULL,
        monthly_salary REAL,
        daily_wage REAL,
        join_date TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'active'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        worker_id INTEGER NOT NULL REFERENCES workers(id),
        date TEXT NOT NULL,
        status TEXT NOT NULL,
        check_in TEXT,
        check_out TEXT,
        overtime_hours REAL NOT NULL DEFAULT 0,
        notes TEXT,
        UNIQUE (worker_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS advances (
        id TEXT PRIMARY KEY,
        worker_id INTEGER NOT NULL REFERENCES workers(id),
        amount REAL NOT NULL,
        date TEXT NOT NULL,
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS payments (
        id TEXT PRIMARY KEY,
        worker_id INTEGER NOT NULL REFERENCES workers(id),
        month TEXT NOT NULL,
        paid_amount REAL NOT NULL,
        method TEXT NOT NULL,
        deductions REAL NOT NULL DEFAULT 0,
        advance_deducted REAL NOT NULL DEFAULT 0,
        bonus REAL NOT NULL DEFAULT 0,
        notes TEXT,
        paid_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance (date)",
    "CREATE INDEX IF NOT EXISTS idx_advances_worker ON advances (worker_id)",
    "CREATE INDEX IF NOT EXISTS idx_payments_worker_month ON payments (worker_id, month)",
    "CREATE INDEX IF NOT EXISTS idx_payments_month ON payments (month)",
];

pub async fn apply_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn init_db(database_url: &str) -> SqlitePool {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url)
            .await
            .expect("Failed to create database");
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .expect("Failed to connect to database");

    apply_schema(&pool).await.expect("Failed to apply schema");
    pool
}
