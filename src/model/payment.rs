use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
    strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Bank,
    Other,
}

/// One settlement against a worker's computed salary for a month.
/// Append-only: there is no update or reversal operation; a correction is a
/// compensating, note-flagged event. `month` is the `YYYY-MM` payroll key.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "f2a6d1c4-9e3b-4f6a-8c2d-5b7e9a0c1d2e",
        "worker_id": 1,
        "month": "2026-08",
        "paid_amount": 9000.0,
        "method": "cash",
        "deductions": 0.0,
        "advance_deducted": 400.0,
        "bonus": 0.0,
        "notes": null,
        "paid_at": "2026-08-31T10:15:00Z"
    })
)]
pub struct PaymentEvent {
    pub id: String,
    pub worker_id: i64,
    #[schema(example = "2026-08")]
    pub month: String,
    #[schema(example = 9000.0)]
    pub paid_amount: f64,
    pub method: PaymentMethod,
    #[schema(example = 0.0)]
    pub deductions: f64,
    #[schema(example = 400.0)]
    pub advance_deducted: f64,
    #[schema(example = 0.0)]
    pub bonus: f64,
    #[schema(nullable = true)]
    pub notes: Option<String>,
    pub paid_at: DateTime<Utc>,
}
