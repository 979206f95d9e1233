use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 缴费状态，由应缴、已缴和截止日期推导，不落库
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum FeeStatus {
    Paid,
    Partial,
    Unpaid,
    Overdue,
}

impl FeeStatus {
    pub fn derive(
        amount_cents: i64,
        paid_cents: i64,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if paid_cents >= amount_cents {
            FeeStatus::Paid
        } else if now > due_date {
            FeeStatus::Overdue
        } else if paid_cents > 0 {
            FeeStatus::Partial
        } else {
            FeeStatus::Unpaid
        }
    }
}

impl<'de> Deserialize<'de> for FeeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FeeStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的缴费状态: '{s}'. 支持的状态: paid, partial, unpaid, overdue"
            ))
        })
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Paid => write!(f, "paid"),
            FeeStatus::Partial => write!(f, "partial"),
            FeeStatus::Unpaid => write!(f, "unpaid"),
            FeeStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(FeeStatus::Paid),
            "partial" => Ok(FeeStatus::Partial),
            "unpaid" => Ok(FeeStatus::Unpaid),
            "overdue" => Ok(FeeStatus::Overdue),
            _ => Err(format!("Invalid fee status: {s}")),
        }
    }
}

// 缴费方式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Card,
    Other,
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<PaymentMethod>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的缴费方式: '{s}'. 支持的方式: cash, bank_transfer, card, other"
            ))
        })
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "card" => Ok(PaymentMethod::Card),
            "other" => Ok(PaymentMethod::Other),
            _ => Err(format!("Invalid payment method: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub term: String,
    // 金额以分为单位
    pub amount_cents: i64,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 带缴费进度的收费项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeWithBalance {
    #[serde(flatten)]
    #[ts(flatten)]
    pub fee: Fee,
    pub student_name: Option<String>,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub status: FeeStatus,
}

impl FeeWithBalance {
    pub fn new(
        fee: Fee,
        student_name: Option<String>,
        paid_cents: i64,
        now: DateTime<Utc>,
    ) -> Self {
        let status = FeeStatus::derive(fee.amount_cents, paid_cents, fee.due_date, now);
        Self {
            balance_cents: (fee.amount_cents - paid_cents).max(0),
            fee,
            student_name,
            paid_cents,
            status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeePayment {
    pub id: i64,
    pub fee_id: i64,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    // 经手人
    pub received_by: Option<i64>,
    pub paid_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap()
    }

    #[test]
    fn test_fully_paid_is_paid_even_after_due_date() {
        let late = due() + Duration::days(10);
        assert_eq!(FeeStatus::derive(5000, 5000, due(), late), FeeStatus::Paid);
        assert_eq!(FeeStatus::derive(5000, 6000, due(), late), FeeStatus::Paid);
    }

    #[test]
    fn test_partial_before_due_date() {
        let early = due() - Duration::days(3);
        assert_eq!(
            FeeStatus::derive(5000, 1000, due(), early),
            FeeStatus::Partial
        );
        assert_eq!(FeeStatus::derive(5000, 0, due(), early), FeeStatus::Unpaid);
    }

    #[test]
    fn test_outstanding_after_due_date_is_overdue() {
        let late = due() + Duration::seconds(1);
        assert_eq!(
            FeeStatus::derive(5000, 1000, due(), late),
            FeeStatus::Overdue
        );
        assert_eq!(FeeStatus::derive(5000, 0, due(), late), FeeStatus::Overdue);
        // 截止当刻仍不算逾期
        assert_eq!(FeeStatus::derive(5000, 0, due(), due()), FeeStatus::Unpaid);
    }

    #[test]
    fn test_balance_never_negative() {
        let fee = Fee {
            id: 1,
            student_id: 1,
            title: "Tuition".to_string(),
            term: "2025-T1".to_string(),
            amount_cents: 5000,
            due_date: due(),
            created_at: due(),
            updated_at: due(),
        };
        let row = FeeWithBalance::new(fee, None, 7000, due());
        assert_eq!(row.balance_cents, 0);
        assert_eq!(row.status, FeeStatus::Paid);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
