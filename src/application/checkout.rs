//! Payment initiation: turn a priced booking into a gateway checkout request.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::booking::{BookingView, PaymentStatus};
use crate::domain::errors::DomainError;
use crate::domain::payment::GatewayRequest;
use crate::domain::ports::BookingRepository;

pub const MINOR_UNITS_PER_NAIRA: i64 = 100;

/// The only naira→kobo conversion in the codebase. Both the checkout amount
/// and the verification-time expected amount go through here.
pub fn to_minor_units(amount: i64) -> i64 {
    amount * MINOR_UNITS_PER_NAIRA
}

/// Inverse of [`to_minor_units`], rounding half-up for gateways that report
/// stray sub-naira amounts.
pub fn from_minor_units(amount_minor: i64) -> i64 {
    (amount_minor + MINOR_UNITS_PER_NAIRA / 2) / MINOR_UNITS_PER_NAIRA
}

/// Mint a payment reference unique to this attempt. Retries of the same
/// booking always get a fresh reference, so a gateway-side idempotency hit
/// can never mask a genuine duplicate submission. The random suffix keeps
/// references minted in the same millisecond distinct.
pub fn mint_reference() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ref_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

pub fn build_gateway_request(
    booking: &BookingView,
    payer_email: &str,
    public_key: &str,
) -> GatewayRequest {
    GatewayRequest {
        reference: mint_reference(),
        email: payer_email.to_string(),
        amount: to_minor_units(booking.total),
        public_key: public_key.to_string(),
        metadata: json!({
            "booking_id": booking.id,
            "custom_fields": [{
                "display_name": "Booking Reference",
                "variable_name": "booking_ref",
                "value": booking.id,
            }]
        }),
    }
}

pub struct CheckoutService<B> {
    bookings: B,
    public_key: String,
}

impl<B: BookingRepository> CheckoutService<B> {
    pub fn new(bookings: B, public_key: String) -> Self {
        Self {
            bookings,
            public_key,
        }
    }

    /// Rebuild the gateway request from the persisted booking so the amount
    /// the gateway charges is the amount this service quoted, not anything
    /// client-supplied.
    pub fn initialize(
        &self,
        booking_id: Uuid,
        payer_email: &str,
    ) -> Result<GatewayRequest, DomainError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)?
            .ok_or(DomainError::NotFound)?;
        if booking.payment_status == PaymentStatus::Captured {
            return Err(DomainError::InvalidInput(
                "booking is already paid".to_string(),
            ));
        }
        Ok(build_gateway_request(&booking, payer_email, &self.public_key))
    }
}
