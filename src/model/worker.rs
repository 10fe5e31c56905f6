use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a worker is paid: a fixed monthly amount, or a per-day wage
/// multiplied by the days actually worked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
    strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompensationMode {
    Monthly,
    Daily,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
    strum::Display, strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LifecycleStatus {
    Active,
    OnLeave,
    Resigned,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
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
    })
)]
pub struct Worker {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Ram Kumar")]
    pub name: String,

    #[schema(example = "+919812345678", nullable = true)]
    pub phone: Option<String>,

    /// Free-text classification, e.g. "milker", "field hand", "supervisor".
    #[schema(example = "milker")]
    pub role: String,

    #[schema(example = "Basantpur", nullable = true)]
    pub village: Option<String>,

    pub compensation_mode: CompensationMode,

    /// Fixed salary for monthly-mode workers.
    #[schema(example = 12000.0, nullable = true)]
    pub monthly_salary: Option<f64>,

    /// Per-day wage for daily-mode workers.
    #[schema(example = 500.0, nullable = true)]
    pub daily_wage: Option<f64>,

    #[schema(example = "2024-06-01")]
    pub join_date: NaiveDate,

    pub status: LifecycleStatus,
}

impl Worker {
    pub fn is_active(&self) -> bool {
        self.status == LifecycleStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn lifecycle_status_parses_kebab_case() {
        assert_eq!(
            LifecycleStatus::from_str("on-leave").unwrap(),
            LifecycleStatus::OnLeave
        );
        assert_eq!(LifecycleStatus::Active.to_string(), "active");
        assert!(LifecycleStatus::from_str("retired").is_err());
    }

    #[test]
    fn compensation_mode_round_trips_through_serde() {
        let mode: CompensationMode = serde_json::from_str("\"daily\"").unwrap();
        assert_eq!(mode, CompensationMode::Daily);
        assert_eq!(serde_json::to_string(&CompensationMode::Monthly).unwrap(), "\"monthly\"");
    }
}
