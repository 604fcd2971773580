//! Nightly-rate price quoting.
//!
//! All arithmetic is integer naira. Rates are fixed marketplace policy,
//! expressed in basis points so fee and tax components stay exact. Night
//! counts come from calendar-date subtraction, which makes the day boundary
//! unambiguous regardless of the caller's timezone.

use chrono::NaiveDate;

use super::errors::DomainError;

/// Marketplace service fee: 10% of the subtotal.
pub const SERVICE_FEE_BPS: i64 = 1_000;
/// Tax charged on the subtotal: 5%.
pub const TAX_BPS: i64 = 500;

const BPS_SCALE: i64 = 10_000;

/// Price breakdown derived from a draft. Never persisted as-is; bookings
/// freeze a copy of these numbers at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub nights: i64,
    pub subtotal: i64,
    pub service_fee_bps: i64,
    pub tax_bps: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub total: i64,
}

/// Component breakdown of a settled payment, derived from the verified
/// gross amount rather than any client-side quote. The three components
/// always sum to `total` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptBreakdown {
    pub subtotal: i64,
    pub fees: i64,
    pub taxes: i64,
    pub total: i64,
}

/// Round `numerator / denominator` half-up. Operands must be non-negative.
fn half_up(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator / 2) / denominator
}

pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

pub fn quote(
    nightly_rate: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guest_count: i32,
    max_guests: i32,
) -> Result<PriceQuote, DomainError> {
    let nights = nights_between(check_in, check_out);
    if nights < 1 {
        return Err(DomainError::InvalidRange);
    }
    if guest_count < 1 || guest_count > max_guests {
        return Err(DomainError::InvalidGuestCount);
    }
    if nightly_rate <= 0 {
        return Err(DomainError::InvalidInput(
            "nightly rate must be positive".to_string(),
        ));
    }

    let subtotal = nightly_rate
        .checked_mul(nights)
        .ok_or_else(|| DomainError::InvalidInput("stay price overflows".to_string()))?;
    let service_fee = half_up(subtotal * SERVICE_FEE_BPS, BPS_SCALE);
    let tax = half_up(subtotal * TAX_BPS, BPS_SCALE);
    // The total is rounded once, from the subtotal, so it is independent of
    // any rounding in the display components.
    let total = half_up(subtotal * (BPS_SCALE + SERVICE_FEE_BPS + TAX_BPS), BPS_SCALE);

    Ok(PriceQuote {
        nights,
        subtotal,
        service_fee_bps: SERVICE_FEE_BPS,
        tax_bps: TAX_BPS,
        service_fee,
        tax,
        total,
    })
}

/// Back out the fee/tax components from a verified gross amount.
///
/// `subtotal` inverts the total formula (`total = subtotal * 1.15`), then
/// `taxes` absorbs the rounding remainder so components sum to the gross.
pub fn receipt_breakdown(gross: i64) -> ReceiptBreakdown {
    let subtotal = half_up(gross * BPS_SCALE, BPS_SCALE + SERVICE_FEE_BPS + TAX_BPS);
    let fees = half_up(subtotal * SERVICE_FEE_BPS, BPS_SCALE);
    let taxes = gross - subtotal - fees;
    ReceiptBreakdown {
        subtotal,
        fees,
        taxes,
        total: gross,
    }
}
