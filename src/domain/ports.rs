use uuid::Uuid;

use super::booking::BookingView;
use super::draft::BookingDraft;
use super::errors::DomainError;
use super::listing::{ListingPage, ListingView, NewListing, RefundPolicyView};
use super::payment::{PaymentSettlement, ReceiptView, TransactionView, VerifiedPayment};
use super::pricing::{PriceQuote, ReceiptBreakdown};

pub trait ListingRepository: Send + Sync + 'static {
    fn create(&self, listing: &NewListing) -> Result<ListingView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<ListingView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListingPage, DomainError>;
}

pub trait RefundPolicyRepository: Send + Sync + 'static {
    fn list_refund_policies(&self) -> Result<Vec<RefundPolicyView>, DomainError>;
}

pub trait BookingRepository: Send + Sync + 'static {
    /// Persist a booking with the quote frozen onto the row. The booking
    /// starts `pending`/`unpaid`.
    fn create(
        &self,
        draft: &BookingDraft,
        guest_id: Uuid,
        quote: &PriceQuote,
    ) -> Result<BookingView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<BookingView>, DomainError>;
}

pub trait PaymentRepository: Send + Sync + 'static {
    fn find_settlement(&self, reference: &str) -> Result<Option<PaymentSettlement>, DomainError>;

    /// Atomically insert the successful transaction, mark the booking
    /// captured/confirmed, and issue a receipt carrying `breakdown`. A
    /// duplicate reference resolves to the existing settlement when that
    /// settlement succeeded.
    fn record_success(
        &self,
        booking_id: Uuid,
        verified: &VerifiedPayment,
        breakdown: &ReceiptBreakdown,
    ) -> Result<PaymentSettlement, DomainError>;

    /// Atomically insert the failed transaction and mark the booking's
    /// payment failed, leaving its status untouched.
    fn record_failure(
        &self,
        booking_id: Uuid,
        verified: &VerifiedPayment,
    ) -> Result<TransactionView, DomainError>;

    fn find_receipt(&self, booking_id: Uuid) -> Result<Option<ReceiptView>, DomainError>;
}

/// Server-to-gateway check of a payment's true outcome. Supersedes any
/// client-reported status.
pub trait PaymentVerifier: Send + Sync + 'static {
    fn verify(&self, reference: &str) -> Result<VerifiedPayment, DomainError>;
}
