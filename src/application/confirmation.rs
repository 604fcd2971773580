//! Payment confirmation: the verify → persist → update → receipt sequence.
//!
//! The gateway callback only tells us a checkout closed; the verify call is
//! what decides the money moved. Persistence of the transaction, the booking
//! update, and the receipt happen atomically behind the `PaymentRepository`
//! port, so a failure at any point leaves the booking exactly as it was.
//! Re-invoking with an already-settled reference replays the stored outcome
//! instead of writing anything.

use crate::domain::errors::DomainError;
use crate::domain::payment::{
    ConfirmationOutcome, GatewayCallback, PaymentSettlement, TransactionStatus,
};
use crate::domain::ports::{BookingRepository, PaymentRepository, PaymentVerifier};
use crate::domain::pricing::receipt_breakdown;

use super::checkout::{from_minor_units, to_minor_units};

pub struct ConfirmationWorkflow<V, B, P> {
    verifier: V,
    bookings: B,
    payments: P,
}

impl<V, B, P> ConfirmationWorkflow<V, B, P>
where
    V: PaymentVerifier,
    B: BookingRepository,
    P: PaymentRepository,
{
    pub fn new(verifier: V, bookings: B, payments: P) -> Self {
        Self {
            verifier,
            bookings,
            payments,
        }
    }

    pub fn confirm(&self, callback: &GatewayCallback) -> Result<ConfirmationOutcome, DomainError> {
        if let Some(existing) = self.payments.find_settlement(&callback.reference)? {
            log::info!(
                "payment {} already settled, replaying stored outcome",
                callback.reference
            );
            return Self::replay(existing);
        }

        let booking = self
            .bookings
            .find_by_id(callback.booking_id)?
            .ok_or(DomainError::NotFound)?;

        let verified = self.verifier.verify(&callback.reference)?;

        match verified.status {
            TransactionStatus::Success => {
                let expected = to_minor_units(booking.total);
                if verified.amount_minor != expected {
                    return Err(DomainError::VerificationFailed(format!(
                        "amount mismatch: gateway captured {} kobo, booking total is {} kobo",
                        verified.amount_minor, expected
                    )));
                }
                // The receipt reflects what the gateway actually captured,
                // not the client-side quote.
                let breakdown = receipt_breakdown(from_minor_units(verified.amount_minor));
                let settlement = self
                    .payments
                    .record_success(booking.id, &verified, &breakdown)?;
                let receipt = settlement.receipt.ok_or_else(|| {
                    DomainError::Internal("captured payment settled without a receipt".to_string())
                })?;
                log::info!(
                    "payment {} captured for booking {}, receipt {}",
                    callback.reference,
                    booking.id,
                    receipt.receipt_number
                );
                Ok(ConfirmationOutcome::Confirmed {
                    transaction: settlement.transaction,
                    receipt,
                })
            }
            TransactionStatus::Failed => {
                if callback.status.as_deref() == Some("success") {
                    log::warn!(
                        "payment {}: client reported success but gateway verified failure",
                        callback.reference
                    );
                }
                let transaction = self.payments.record_failure(booking.id, &verified)?;
                log::info!(
                    "payment {} declined for booking {}",
                    callback.reference,
                    booking.id
                );
                Ok(ConfirmationOutcome::Declined { transaction })
            }
            TransactionStatus::Pending => Err(DomainError::VerificationFailed(
                "transaction is still pending at the gateway".to_string(),
            )),
        }
    }

    fn replay(existing: PaymentSettlement) -> Result<ConfirmationOutcome, DomainError> {
        match existing.transaction.status {
            TransactionStatus::Success => {
                let receipt = existing.receipt.ok_or_else(|| {
                    DomainError::Internal("captured payment settled without a receipt".to_string())
                })?;
                Ok(ConfirmationOutcome::Confirmed {
                    transaction: existing.transaction,
                    receipt,
                })
            }
            _ => Ok(ConfirmationOutcome::Declined {
                transaction: existing.transaction,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use bigdecimal::BigDecimal;
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::booking::{BookingStatus, BookingView, PaymentStatus};
    use crate::domain::draft::BookingDraft;
    use crate::domain::payment::{mint_receipt_number, ReceiptView, TransactionView, VerifiedPayment};
    use crate::domain::pricing::{PriceQuote, ReceiptBreakdown};

    struct StaticVerifier {
        result: Option<VerifiedPayment>,
    }

    impl PaymentVerifier for StaticVerifier {
        fn verify(&self, reference: &str) -> Result<VerifiedPayment, DomainError> {
            self.result.clone().ok_or_else(|| {
                DomainError::VerificationFailed(format!("unknown reference '{reference}'"))
            })
        }
    }

    struct FakeBookings {
        booking: BookingView,
    }

    impl BookingRepository for FakeBookings {
        fn create(
            &self,
            _draft: &BookingDraft,
            _guest_id: Uuid,
            _quote: &PriceQuote,
        ) -> Result<BookingView, DomainError> {
            unreachable!("not exercised by confirmation tests")
        }

        fn find_by_id(&self, id: Uuid) -> Result<Option<BookingView>, DomainError> {
            Ok((id == self.booking.id).then(|| self.booking.clone()))
        }
    }

    #[derive(Debug)]
    struct PaymentsState {
        transactions: Vec<TransactionView>,
        receipts: Vec<ReceiptView>,
        payment_status: PaymentStatus,
        booking_status: BookingStatus,
    }

    struct InMemoryPayments {
        state: Mutex<PaymentsState>,
        fail_writes: bool,
    }

    impl InMemoryPayments {
        fn new(booking_status: BookingStatus) -> Self {
            Self {
                state: Mutex::new(PaymentsState {
                    transactions: vec![],
                    receipts: vec![],
                    payment_status: PaymentStatus::Unpaid,
                    booking_status,
                }),
                fail_writes: false,
            }
        }

        fn failing(booking_status: BookingStatus) -> Self {
            Self {
                fail_writes: true,
                ..Self::new(booking_status)
            }
        }

        fn transaction_from(booking_id: Uuid, verified: &VerifiedPayment) -> TransactionView {
            TransactionView {
                id: Uuid::new_v4(),
                booking_id,
                amount: BigDecimal::from(verified.amount_minor) / BigDecimal::from(100),
                status: verified.status,
                reference: verified.reference.clone(),
                created_at: Utc::now(),
            }
        }
    }

    impl PaymentRepository for InMemoryPayments {
        fn find_settlement(
            &self,
            reference: &str,
        ) -> Result<Option<PaymentSettlement>, DomainError> {
            let state = self.state.lock().unwrap();
            let Some(transaction) = state
                .transactions
                .iter()
                .find(|t| t.reference == reference)
                .cloned()
            else {
                return Ok(None);
            };
            let receipt = state
                .receipts
                .iter()
                .find(|r| r.transaction_id == transaction.id)
                .cloned();
            Ok(Some(PaymentSettlement {
                transaction,
                receipt,
            }))
        }

        fn record_success(
            &self,
            booking_id: Uuid,
            verified: &VerifiedPayment,
            breakdown: &ReceiptBreakdown,
        ) -> Result<PaymentSettlement, DomainError> {
            if self.fail_writes {
                return Err(DomainError::PersistenceError(
                    "injected write failure".to_string(),
                ));
            }
            let mut state = self.state.lock().unwrap();
            let transaction = Self::transaction_from(booking_id, verified);
            let receipt = ReceiptView {
                id: Uuid::new_v4(),
                receipt_number: mint_receipt_number(),
                transaction_id: transaction.id,
                booking_id,
                subtotal: breakdown.subtotal,
                fees: breakdown.fees,
                taxes: breakdown.taxes,
                total: breakdown.total,
                issued_at: Utc::now(),
            };
            state.transactions.push(transaction.clone());
            state.receipts.push(receipt.clone());
            state.payment_status = PaymentStatus::Captured;
            state.booking_status = BookingStatus::Confirmed;
            Ok(PaymentSettlement {
                transaction,
                receipt: Some(receipt),
            })
        }

        fn record_failure(
            &self,
            booking_id: Uuid,
            verified: &VerifiedPayment,
        ) -> Result<TransactionView, DomainError> {
            if self.fail_writes {
                return Err(DomainError::PersistenceError(
                    "injected write failure".to_string(),
                ));
            }
            let mut state = self.state.lock().unwrap();
            let transaction = Self::transaction_from(booking_id, verified);
            state.transactions.push(transaction.clone());
            state.payment_status = PaymentStatus::Failed;
            Ok(transaction)
        }

        fn find_receipt(&self, booking_id: Uuid) -> Result<Option<ReceiptView>, DomainError> {
            let state = self.state.lock().unwrap();
            Ok(state
                .receipts
                .iter()
                .find(|r| r.booking_id == booking_id)
                .cloned())
        }
    }

    fn booking() -> BookingView {
        BookingView {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            check_in: "2024-06-01".parse().unwrap(),
            check_out: "2024-06-04".parse().unwrap(),
            guest_count: 2,
            refund_policy_id: None,
            subtotal: 55_500,
            service_fee: 5_550,
            tax: 2_775,
            total: 63_825,
            payment_status: PaymentStatus::Unpaid,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    fn verified(status: TransactionStatus, amount_minor: i64) -> VerifiedPayment {
        VerifiedPayment {
            reference: "ref_1717200000000_deadbeef".to_string(),
            status,
            amount_minor,
        }
    }

    fn callback(booking_id: Uuid) -> GatewayCallback {
        GatewayCallback {
            booking_id,
            reference: "ref_1717200000000_deadbeef".to_string(),
            status: Some("success".to_string()),
        }
    }

    fn workflow(
        booking: BookingView,
        result: Option<VerifiedPayment>,
        payments: InMemoryPayments,
    ) -> ConfirmationWorkflow<StaticVerifier, FakeBookings, InMemoryPayments> {
        ConfirmationWorkflow::new(StaticVerifier { result }, FakeBookings { booking }, payments)
    }

    #[test]
    fn verified_success_confirms_booking_and_issues_receipt() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Success, 6_382_500)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let outcome = wf.confirm(&callback(b.id)).expect("confirm failed");
        let ConfirmationOutcome::Confirmed {
            transaction,
            receipt,
        } = outcome
        else {
            panic!("expected a confirmed outcome");
        };

        assert_eq!(transaction.status, TransactionStatus::Success);
        assert_eq!(transaction.amount, BigDecimal::from(63_825));
        assert_eq!(receipt.subtotal, 55_500);
        assert_eq!(receipt.fees, 5_550);
        assert_eq!(receipt.taxes, 2_775);
        assert_eq!(receipt.total, 63_825);

        let state = wf.payments.state.lock().unwrap();
        assert_eq!(state.payment_status, PaymentStatus::Captured);
        assert_eq!(state.booking_status, BookingStatus::Confirmed);
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.receipts.len(), 1);
    }

    #[test]
    fn reconfirming_the_same_reference_is_a_no_op() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Success, 6_382_500)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let first = wf.confirm(&callback(b.id)).expect("first confirm failed");
        let second = wf.confirm(&callback(b.id)).expect("second confirm failed");

        let state = wf.payments.state.lock().unwrap();
        assert_eq!(state.transactions.len(), 1, "exactly one transaction");
        assert_eq!(state.receipts.len(), 1, "exactly one receipt");

        let (
            ConfirmationOutcome::Confirmed {
                receipt: first_receipt,
                ..
            },
            ConfirmationOutcome::Confirmed {
                receipt: second_receipt,
                ..
            },
        ) = (first, second)
        else {
            panic!("expected confirmed outcomes");
        };
        assert_eq!(first_receipt.receipt_number, second_receipt.receipt_number);
    }

    #[test]
    fn verified_failure_marks_payment_failed_without_receipt() {
        let b = booking();
        // Client claims success; the gateway verdict wins.
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Failed, 0)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let outcome = wf.confirm(&callback(b.id)).expect("confirm failed");
        assert!(matches!(outcome, ConfirmationOutcome::Declined { .. }));

        let state = wf.payments.state.lock().unwrap();
        assert_eq!(state.payment_status, PaymentStatus::Failed);
        assert_eq!(state.booking_status, BookingStatus::Pending);
        assert!(state.receipts.is_empty());
    }

    #[test]
    fn declined_payment_never_regresses_a_confirmed_booking() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Failed, 0)),
            InMemoryPayments::new(BookingStatus::Confirmed),
        );

        wf.confirm(&callback(b.id)).expect("confirm failed");

        let state = wf.payments.state.lock().unwrap();
        assert_eq!(state.booking_status, BookingStatus::Confirmed);
        assert_eq!(state.payment_status, PaymentStatus::Failed);
    }

    #[test]
    fn amount_mismatch_aborts_with_no_state_change() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Success, 6_382_500 - 100)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let err = wf.confirm(&callback(b.id)).unwrap_err();
        assert!(matches!(err, DomainError::VerificationFailed(_)));

        let state = wf.payments.state.lock().unwrap();
        assert!(state.transactions.is_empty());
        assert_eq!(state.payment_status, PaymentStatus::Unpaid);
        assert_eq!(state.booking_status, BookingStatus::Pending);
    }

    #[test]
    fn unknown_reference_aborts_with_no_state_change() {
        let b = booking();
        let wf = workflow(b.clone(), None, InMemoryPayments::new(BookingStatus::Pending));

        let err = wf.confirm(&callback(b.id)).unwrap_err();
        assert!(matches!(err, DomainError::VerificationFailed(_)));

        let state = wf.payments.state.lock().unwrap();
        assert!(state.transactions.is_empty());
        assert!(state.receipts.is_empty());
    }

    #[test]
    fn pending_gateway_status_is_not_captured() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Pending, 6_382_500)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let err = wf.confirm(&callback(b.id)).unwrap_err();
        assert!(matches!(err, DomainError::VerificationFailed(_)));

        let state = wf.payments.state.lock().unwrap();
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn persistence_failure_leaves_booking_untouched() {
        let b = booking();
        let wf = workflow(
            b.clone(),
            Some(verified(TransactionStatus::Success, 6_382_500)),
            InMemoryPayments::failing(BookingStatus::Pending),
        );

        let err = wf.confirm(&callback(b.id)).unwrap_err();
        assert!(matches!(err, DomainError::PersistenceError(_)));

        let state = wf.payments.state.lock().unwrap();
        assert_eq!(state.payment_status, PaymentStatus::Unpaid);
        assert_eq!(state.booking_status, BookingStatus::Pending);
        assert!(state.receipts.is_empty());
    }

    #[test]
    fn unknown_booking_is_not_found() {
        let b = booking();
        let wf = workflow(
            b,
            Some(verified(TransactionStatus::Success, 6_382_500)),
            InMemoryPayments::new(BookingStatus::Pending),
        );

        let err = wf.confirm(&callback(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }
}
