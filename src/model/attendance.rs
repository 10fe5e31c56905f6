use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Daily attendance status. One record per (worker, date); a later upsert
/// for the same key replaces the earlier one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
    strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    Leave,
    Holiday,
}

impl AttendanceStatus {
    /// Weight of one day under this status when counting days worked.
    /// Leave and holidays are unpaid for wage purposes, same as absence.
    pub fn day_weight(self) -> f64 {
        match self {
            AttendanceStatus::Present => 1.0,
            AttendanceStatus::HalfDay => 0.5,
            AttendanceStatus::Absent | AttendanceStatus::Leave | AttendanceStatus::Holiday => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "worker_id": 1,
        "date": "2026-08-14",
        "status": "present",
        "check_in": "07:30:00",
        "check_out": "17:00:00",
        "overtime_hours": 1.5,
        "notes": null
    })
)]
pub struct AttendanceRecord {
    pub id: i64,
    pub worker_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(nullable = true)]
    pub check_in: Option<NaiveTime>,
    #[schema(nullable = true)]
    pub check_out: Option<NaiveTime>,
    #[schema(example = 1.5)]
    pub overtime_hours: f64,
    #[schema(nullable = true)]
    pub notes: Option<String>,
}

/// Rollup over a set of attendance records. Returned with the history view
/// and reused by the payroll engine for the month's day counting.
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = 20)]
    pub present: u32,
    #[schema(example = 8)]
    pub absent: u32,
    #[schema(example = 2)]
    pub half_day: u32,
    #[schema(example = 0)]
    pub leave: u32,
    #[schema(example = 0)]
    pub holiday: u32,
    /// Weighted day count: present 1.0, half-day 0.5, everything else 0.
    #[schema(example = 21.0)]
    pub days_worked: f64,
    #[schema(example = 3.5)]
    pub overtime_hours: f64,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let mut summary = AttendanceSummary::default();
        for record in records {
            match record.status {
                AttendanceStatus::Present => summary.present += 1,
                AttendanceStatus::Absent => summary.absent += 1,
                AttendanceStatus::HalfDay => summary.half_day += 1,
                AttendanceStatus::Leave => summary.leave += 1,
                AttendanceStatus::Holiday => summary.holiday += 1,
            }
            summary.days_worked += record.status.day_weight();
            summary.overtime_hours += record.overtime_hours;
        }
        summary
    }
}
