use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Success => "success",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "success" => Ok(TransactionStatus::Success),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(DomainError::Internal(format!(
                "unknown transaction status '{other}'"
            ))),
        }
    }
}

/// Checkout request handed to the gateway's payment widget.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    pub reference: String,
    pub email: String,
    /// Minor currency units (kobo).
    pub amount: i64,
    pub public_key: String,
    pub metadata: serde_json::Value,
}

/// Callback payload delivered after the gateway checkout closes. The
/// client-reported `status` is advisory only; verification is authoritative.
#[derive(Debug, Clone)]
pub struct GatewayCallback {
    pub booking_id: Uuid,
    pub reference: String,
    pub status: Option<String>,
}

/// Authoritative verification result from the gateway's verify endpoint.
#[derive(Debug, Clone)]
pub struct VerifiedPayment {
    pub reference: String,
    pub status: TransactionStatus,
    /// Minor currency units (kobo), as reported by the gateway.
    pub amount_minor: i64,
}

/// Persisted payment attempt. `amount` is naira (gateway kobo / 100).
#[derive(Debug, Clone)]
pub struct TransactionView {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable proof of a captured payment. Money fields are whole naira,
/// derived from the verified amount.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    pub id: Uuid,
    pub receipt_number: String,
    pub transaction_id: Uuid,
    pub booking_id: Uuid,
    pub subtotal: i64,
    pub fees: i64,
    pub taxes: i64,
    pub total: i64,
    pub issued_at: DateTime<Utc>,
}

/// A transaction together with its receipt, when one was issued.
#[derive(Debug, Clone)]
pub struct PaymentSettlement {
    pub transaction: TransactionView,
    pub receipt: Option<ReceiptView>,
}

/// Terminal outcome of one confirmation attempt.
#[derive(Debug, Clone)]
pub enum ConfirmationOutcome {
    Confirmed {
        transaction: TransactionView,
        receipt: ReceiptView,
    },
    Declined {
        transaction: TransactionView,
    },
}

pub fn mint_receipt_number() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "RCP-{}-{}",
        Utc::now().timestamp_millis(),
        suffix[..6].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_status_round_trips() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Success,
            TransactionStatus::Failed,
        ] {
            assert_eq!(
                status.as_str().parse::<TransactionStatus>().unwrap(),
                status
            );
        }
        assert!("refunded".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn receipt_numbers_are_unique_and_prefixed() {
        let a = mint_receipt_number();
        let b = mint_receipt_number();
        assert!(a.starts_with("RCP-"));
        assert_ne!(a, b);
    }
}
