use crate::api::advance::{AdvanceBalance, AdvanceListResponse, RecordAdvance};
use crate::api::attendance::{
    DailySheet, HistoryResponse, RosterEntry, RosterResponse, SheetEntry, SheetResult,
    SkippedEntry,
};
use crate::api::payment::{
    PaymentListResponse, PaymentReceipt, RecordPayment,
};
use crate::api::payroll::{PayrollListResponse, PayrollTotals};
use crate::api::stats::StatsResponse;
use crate::api::worker::{CreateWorker, UpdateWorker, WorkerListResponse};
use crate::model::advance::AdvancePayment;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::model::payment::{PaymentEvent, PaymentMethod};
use crate::model::salary::{MonthlySalary, SalaryStatus};
use crate::model::worker::{CompensationMode, LifecycleStatus, Worker};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FarmStaff API",
        version = "1.0.0",
        description = r#"
## Farm Workforce Attendance & Payroll

This API runs the **workforce side of a farm**: the worker directory, the
daily attendance sheet, cash advances and monthly payroll settlement.

### 🔹 Key Features
- **Worker Directory**
  - Create, update, list and view worker profiles with monthly or daily pay
- **Daily Attendance**
  - One roster call per day, one bulk submission per day, idempotent
- **Advances**
  - Append-only cash advance ledger with a live outstanding balance
- **Payroll**
  - Salary snapshots derived on demand from attendance + payments, never stored
- **Payments**
  - Append-only settlement events driving paid / partial / pending status

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

### 🚀 Usage
Use this API to build:
- Farm office dashboards
- Payday reconciliation screens
- Attendance kiosks

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::worker::create_worker,
        crate::api::worker::list_workers,
        crate::api::worker::get_worker,
        crate::api::worker::update_worker,
        crate::api::worker::delete_worker,

        crate::api::attendance::get_daily_roster,
        crate::api::attendance::submit_daily_sheet,
        crate::api::attendance::get_attendance_history,

        crate::api::advance::record_advance,
        crate::api::advance::list_advances,
        crate::api::advance::get_advance_balance,

        crate::api::payroll::get_monthly_payroll,
        crate::api::payroll::get_worker_salary,

        crate::api::payment::record_payment,
        crate::api::payment::list_payments,

        crate::api::stats::get_stats
    ),
    components(
        schemas(
            Worker,
            CompensationMode,
            LifecycleStatus,
            CreateWorker,
            UpdateWorker,
            WorkerListResponse,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceSummary,
            RosterEntry,
            RosterResponse,
            DailySheet,
            SheetEntry,
            SheetResult,
            SkippedEntry,
            HistoryResponse,
            RecordAdvance,
            AdvancePayment,
            AdvanceListResponse,
            AdvanceBalance,
            MonthlySalary,
            SalaryStatus,
            PayrollTotals,
            PayrollListResponse,
            RecordPayment,
            PaymentMethod,
            PaymentEvent,
            PaymentReceipt,
            PaymentListResponse,
            StatsResponse
        )
    ),
    tags(
        (name = "Worker", description = "Worker directory APIs"),
        (name = "Attendance", description = "Daily sheet and history APIs"),
        (name = "Advance", description = "Cash advance ledger APIs"),
        (name = "Payroll", description = "Derived monthly salary APIs"),
        (name = "Payment", description = "Settlement ledger APIs"),
        (name = "Stats", description = "Dashboard aggregate APIs"),
    )
)]
pub struct ApiDoc;
