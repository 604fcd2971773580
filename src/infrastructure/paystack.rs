//! Paystack-style gateway verification client.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::errors::DomainError;
use crate::domain::payment::{TransactionStatus, VerifiedPayment};
use crate::domain::ports::PaymentVerifier;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub secret_key: String,
    pub public_key: String,
    pub verify_timeout: Duration,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        GatewayConfig {
            base_url: env::var("PAYSTACK_BASE_URL")
                .unwrap_or_else(|_| "https://api.paystack.co".to_string()),
            secret_key: env::var("PAYSTACK_SECRET_KEY").expect("PAYSTACK_SECRET_KEY must be set"),
            public_key: env::var("PAYSTACK_PUBLIC_KEY").expect("PAYSTACK_PUBLIC_KEY must be set"),
            verify_timeout: Duration::from_secs(10),
        }
    }
}

pub struct PaystackVerifier {
    config: GatewayConfig,
}

impl PaystackVerifier {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: bool,
    message: Option<String>,
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    reference: String,
    status: String,
    amount: i64,
}

fn map_gateway_status(status: &str) -> TransactionStatus {
    match status {
        "success" => TransactionStatus::Success,
        "failed" | "abandoned" | "reversed" => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

impl PaymentVerifier for PaystackVerifier {
    fn verify(&self, reference: &str) -> Result<VerifiedPayment, DomainError> {
        // Built per call: the blocking client must never live on the async
        // executor; `verify` only runs on `web::block` worker threads.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.verify_timeout)
            .build()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let url = format!(
            "{}/transaction/verify/{}",
            self.config.base_url.trim_end_matches('/'),
            reference
        );
        let response = client
            .get(&url)
            .bearer_auth(&self.config.secret_key)
            .send()
            .map_err(|e| DomainError::VerificationFailed(format!("gateway unreachable: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DomainError::VerificationFailed(format!(
                "gateway does not know reference '{reference}'"
            )));
        }
        if !response.status().is_success() {
            return Err(DomainError::VerificationFailed(format!(
                "gateway responded with {}",
                response.status()
            )));
        }

        let body: VerifyResponse = response.json().map_err(|e| {
            DomainError::VerificationFailed(format!("malformed gateway response: {e}"))
        })?;
        if !body.status {
            return Err(DomainError::VerificationFailed(body.message.unwrap_or_else(
                || "gateway rejected the verification call".to_string(),
            )));
        }
        let data = body.data.ok_or_else(|| {
            DomainError::VerificationFailed("gateway response missing transaction data".to_string())
        })?;

        Ok(VerifiedPayment {
            reference: data.reference,
            status: map_gateway_status(&data.status),
            amount_minor: data.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_statuses_map_onto_the_transaction_taxonomy() {
        assert_eq!(map_gateway_status("success"), TransactionStatus::Success);
        assert_eq!(map_gateway_status("failed"), TransactionStatus::Failed);
        assert_eq!(map_gateway_status("abandoned"), TransactionStatus::Failed);
        assert_eq!(map_gateway_status("reversed"), TransactionStatus::Failed);
        assert_eq!(map_gateway_status("ongoing"), TransactionStatus::Pending);
    }

    #[test]
    fn verify_payload_deserializes() {
        let json = r#"{
            "status": true,
            "message": "Verification successful",
            "data": { "reference": "ref_1_abc", "status": "success", "amount": 6382500 }
        }"#;
        let parsed: VerifyResponse = serde_json::from_str(json).expect("deserialize failed");
        assert!(parsed.status);
        let data = parsed.data.expect("data present");
        assert_eq!(data.amount, 6_382_500);
        assert_eq!(data.reference, "ref_1_abc");
    }
}
