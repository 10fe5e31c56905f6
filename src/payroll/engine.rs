use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, AttendanceSummary};
use crate::model::payment::PaymentEvent;
use crate::model::salary::{MonthlySalary, SalaryStatus};
use crate::model::worker::{CompensationMode, LifecycleStatus, Worker};
use crate::payroll::month::YearMonth;
use crate::utils::worker_cache::WorkerCache;

/// Operator-supplied adjustments for a prospective settlement. These stack
/// on top of whatever the month's recorded payment events already carry.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Adjustments {
    pub deductions: f64,
    pub bonus: f64,
    pub advance_deducted: f64,
}

impl Adjustments {
    pub fn is_zero(&self) -> bool {
        self.deductions == 0.0 && self.bonus == 0.0 && self.advance_deducted == 0.0
    }
}

/// Assemble a worker's salary snapshot for one month out of the raw facts.
///
/// Pure: the caller fetches the month's attendance records and payment
/// events, this folds them. Adjustment fields accumulate across payment
/// events the same way paid amounts do, which keeps `net_salary` consistent
/// with the advance ledger (which sums `advance_deducted` across events) and
/// keeps payment events commutative.
pub fn compute(
    worker: &Worker,
    month: YearMonth,
    records: &[AttendanceRecord],
    payments: &[PaymentEvent],
    preview: Option<&Adjustments>,
) -> MonthlySalary {
    let summary = AttendanceSummary::from_records(records);

    // A monthly worker with no attendance rows still earns the fixed salary;
    // absence only reduces pay through an explicit deduction. A daily worker
    // with no rows simply earns nothing.
    let base_salary = match worker.compensation_mode {
        CompensationMode::Monthly => worker.monthly_salary.unwrap_or(0.0),
        CompensationMode::Daily => worker.daily_wage.unwrap_or(0.0) * summary.days_worked,
    };

    let mut paid_amount = 0.0;
    let mut deductions = 0.0;
    let mut bonus = 0.0;
    let mut advance_deducted = 0.0;
    for payment in payments {
        paid_amount += payment.paid_amount;
        deductions += payment.deductions;
        bonus += payment.bonus;
        advance_deducted += payment.advance_deducted;
    }
    if let Some(extra) = preview {
        deductions += extra.deductions;
        bonus += extra.bonus;
        advance_deducted += extra.advance_deducted;
    }

    let net_salary = base_salary + bonus - deductions - advance_deducted;

    MonthlySalary {
        worker_id: worker.id,
        worker_name: worker.name.clone(),
        month,
        compensation_mode: worker.compensation_mode,
        days_worked: summary.days_worked,
        total_days: month.days_in_month(),
        overtime_hours: summary.overtime_hours,
        base_salary,
        bonus,
        deductions,
        advance_deducted,
        net_salary,
        paid_amount,
        status: SalaryStatus::from_amounts(net_salary, paid_amount),
    }
}

/// Attendance rows inside the month's calendar window, oldest first.
/// Days before a mid-month hire simply have no rows and weigh nothing.
pub async fn month_attendance(
    pool: &SqlitePool,
    worker_id: i64,
    month: YearMonth,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, worker_id, date, status, check_in, check_out, overtime_hours, notes
        FROM attendance
        WHERE worker_id = ? AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(worker_id)
    .bind(month.first_day())
    .bind(month.last_day())
    .fetch_all(pool)
    .await
}

/// Settlement events recorded against the month, oldest first.
pub async fn month_payments(
    pool: &SqlitePool,
    worker_id: i64,
    month: YearMonth,
) -> Result<Vec<PaymentEvent>, sqlx::Error> {
    sqlx::query_as::<_, PaymentEvent>(
        r#"
        SELECT id, worker_id, month, paid_amount, method, deductions,
               advance_deducted, bonus, notes, paid_at
        FROM payments
        WHERE worker_id = ? AND month = ?
        ORDER BY paid_at
        "#,
    )
    .bind(worker_id)
    .bind(month.to_string())
    .fetch_all(pool)
    .await
}

/// Unsettled advance balance: everything ever advanced minus everything
/// ever deducted against advances on payment events, across all months.
/// Always recomputed from the two ledgers, never stored.
pub async fn outstanding_advance(pool: &SqlitePool, worker_id: i64) -> Result<f64, sqlx::Error> {
    let advanced: f64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(amount), 0.0) FROM advances WHERE worker_id = ?")
            .bind(worker_id)
            .fetch_one(pool)
            .await?;

    let settled: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(advance_deducted), 0.0) FROM payments WHERE worker_id = ?",
    )
    .bind(worker_id)
    .fetch_one(pool)
    .await?;

    Ok(advanced - settled)
}

/// Snapshot for a worker already in hand (saves the directory lookup when
/// iterating a payroll listing).
pub async fn compute_for_worker(
    pool: &SqlitePool,
    worker: &Worker,
    month: YearMonth,
    preview: Option<&Adjustments>,
) -> Result<MonthlySalary, ApiError> {
    let records = month_attendance(pool, worker.id, month).await?;
    let payments = month_payments(pool, worker.id, month).await?;
    Ok(compute(worker, month, &records, &payments, preview))
}

/// Workers relevant to a month's payroll: everyone currently active, plus
/// anyone with attendance or payments recorded inside the month (a worker
/// who resigned mid-month stays listed until the month is settled).
pub async fn month_workers(
    pool: &SqlitePool,
    month: YearMonth,
) -> Result<Vec<Worker>, sqlx::Error> {
    sqlx::query_as::<_, Worker>(
        r#"
        SELECT DISTINCT w.*
        FROM workers w
        LEFT JOIN attendance a ON a.worker_id = w.id AND a.date BETWEEN ? AND ?
        LEFT JOIN payments p ON p.worker_id = w.id AND p.month = ?
        WHERE w.status = ? OR a.id IS NOT NULL OR p.id IS NOT NULL
        ORDER BY w.name, w.id
        "#,
    )
    .bind(month.first_day())
    .bind(month.last_day())
    .bind(month.to_string())
    .bind(LifecycleStatus::Active)
    .fetch_all(pool)
    .await
}

/// Snapshot every relevant worker for the month.
pub async fn month_payroll(
    pool: &SqlitePool,
    month: YearMonth,
) -> Result<Vec<MonthlySalary>, ApiError> {
    let workers = month_workers(pool, month).await?;
    let mut snapshots = Vec::with_capacity(workers.len());
    for worker in &workers {
        snapshots.push(compute_for_worker(pool, worker, month, None).await?);
    }
    Ok(snapshots)
}

/// Resolve the worker through the directory cache, then derive the
/// snapshot from the month's ledgers.
pub async fn compute_monthly_salary(
    pool: &SqlitePool,
    cache: &WorkerCache,
    worker_id: i64,
    month: YearMonth,
    preview: Option<&Adjustments>,
) -> Result<MonthlySalary, ApiError> {
    let worker = cache
        .get(pool, worker_id)
        .await?
        .ok_or(ApiError::UnknownWorker(worker_id))?;
    compute_for_worker(pool, &worker, month, preview).await
}
