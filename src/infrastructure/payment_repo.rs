use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::PgConnection;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::booking::{BookingStatus, PaymentStatus};
use crate::domain::errors::DomainError;
use crate::domain::payment::{
    mint_receipt_number, PaymentSettlement, ReceiptView, TransactionStatus, TransactionView,
    VerifiedPayment,
};
use crate::domain::ports::PaymentRepository;
use crate::domain::pricing::ReceiptBreakdown;
use crate::schema::{bookings, payment_receipts, transactions};

use super::models::{NewReceiptRow, NewTransactionRow, ReceiptRow, TransactionRow};

pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Write-path error that keeps unique-violation distinguishable so a lost
/// race on `transactions.reference` can resolve to the winner's settlement.
enum WriteError {
    DuplicateReference,
    Domain(DomainError),
    Db(DieselError),
}

impl From<DieselError> for WriteError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                WriteError::DuplicateReference
            }
            other => WriteError::Db(other),
        }
    }
}

fn naira_amount(amount_minor: i64) -> BigDecimal {
    BigDecimal::from(amount_minor) / BigDecimal::from(100)
}

fn load_settlement(
    conn: &mut PgConnection,
    reference: &str,
) -> Result<Option<PaymentSettlement>, DomainError> {
    let transaction = transactions::table
        .filter(transactions::reference.eq(reference))
        .select(TransactionRow::as_select())
        .first(conn)
        .optional()?;

    let Some(transaction) = transaction else {
        return Ok(None);
    };

    let receipt = payment_receipts::table
        .filter(payment_receipts::transaction_id.eq(transaction.id))
        .select(ReceiptRow::as_select())
        .first(conn)
        .optional()?;

    Ok(Some(PaymentSettlement {
        transaction: transaction.try_into()?,
        receipt: receipt.map(Into::into),
    }))
}

impl DieselPaymentRepository {
    /// A duplicate reference means a concurrent attempt already settled this
    /// payment. Idempotent when that settlement succeeded, an error
    /// otherwise.
    fn resolve_duplicate(
        conn: &mut PgConnection,
        reference: &str,
    ) -> Result<PaymentSettlement, DomainError> {
        let existing = load_settlement(conn, reference)?.ok_or_else(|| {
            DomainError::PersistenceError(format!("duplicate payment reference '{reference}'"))
        })?;
        if existing.transaction.status == TransactionStatus::Success {
            Ok(existing)
        } else {
            Err(DomainError::PersistenceError(format!(
                "reference '{}' already recorded with status {}",
                reference,
                existing.transaction.status.as_str()
            )))
        }
    }
}

impl PaymentRepository for DieselPaymentRepository {
    fn find_settlement(&self, reference: &str) -> Result<Option<PaymentSettlement>, DomainError> {
        let mut conn = self.pool.get()?;
        load_settlement(&mut conn, reference)
    }

    fn record_success(
        &self,
        booking_id: Uuid,
        verified: &VerifiedPayment,
        breakdown: &ReceiptBreakdown,
    ) -> Result<PaymentSettlement, DomainError> {
        let mut conn = self.pool.get()?;

        let result = conn.transaction::<PaymentSettlement, WriteError, _>(|conn| {
            // 1. Insert the verified transaction; the uniqueness constraint
            //    on `reference` is the idempotency backstop.
            let inserted: TransactionRow = diesel::insert_into(transactions::table)
                .values(&NewTransactionRow {
                    id: Uuid::new_v4(),
                    booking_id,
                    amount: naira_amount(verified.amount_minor),
                    status: verified.status.as_str().to_string(),
                    reference: verified.reference.clone(),
                })
                .returning(TransactionRow::as_returning())
                .get_result(conn)?;

            // 2. Capture the booking.
            diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
                .set((
                    bookings::payment_status.eq(PaymentStatus::Captured.as_str()),
                    bookings::status.eq(BookingStatus::Confirmed.as_str()),
                ))
                .execute(conn)?;

            // 3. Issue the receipt from the verified breakdown.
            let receipt: ReceiptRow = diesel::insert_into(payment_receipts::table)
                .values(&NewReceiptRow {
                    id: Uuid::new_v4(),
                    receipt_number: mint_receipt_number(),
                    transaction_id: inserted.id,
                    booking_id,
                    subtotal: breakdown.subtotal,
                    fees: breakdown.fees,
                    taxes: breakdown.taxes,
                    total: breakdown.total,
                })
                .returning(ReceiptRow::as_returning())
                .get_result(conn)?;

            let transaction: TransactionView =
                inserted.try_into().map_err(WriteError::Domain)?;
            Ok(PaymentSettlement {
                transaction,
                receipt: Some(receipt.into()),
            })
        });

        match result {
            Ok(settlement) => Ok(settlement),
            Err(WriteError::DuplicateReference) => {
                Self::resolve_duplicate(&mut conn, &verified.reference)
            }
            Err(WriteError::Domain(e)) => Err(e),
            Err(WriteError::Db(e)) => Err(e.into()),
        }
    }

    fn record_failure(
        &self,
        booking_id: Uuid,
        verified: &VerifiedPayment,
    ) -> Result<TransactionView, DomainError> {
        let mut conn = self.pool.get()?;

        let result = conn.transaction::<TransactionRow, WriteError, _>(|conn| {
            let inserted: TransactionRow = diesel::insert_into(transactions::table)
                .values(&NewTransactionRow {
                    id: Uuid::new_v4(),
                    booking_id,
                    amount: naira_amount(verified.amount_minor),
                    status: verified.status.as_str().to_string(),
                    reference: verified.reference.clone(),
                })
                .returning(TransactionRow::as_returning())
                .get_result(conn)?;

            // The booking's status is left alone: a declined retry must not
            // regress an already-confirmed booking.
            diesel::update(bookings::table.filter(bookings::id.eq(booking_id)))
                .set(bookings::payment_status.eq(PaymentStatus::Failed.as_str()))
                .execute(conn)?;

            Ok(inserted)
        });

        match result {
            Ok(row) => row.try_into(),
            Err(WriteError::DuplicateReference) => Err(DomainError::PersistenceError(format!(
                "duplicate payment reference '{}'",
                verified.reference
            ))),
            Err(WriteError::Domain(e)) => Err(e),
            Err(WriteError::Db(e)) => Err(e.into()),
        }
    }

    fn find_receipt(&self, booking_id: Uuid) -> Result<Option<ReceiptView>, DomainError> {
        let mut conn = self.pool.get()?;

        let receipt = payment_receipts::table
            .filter(payment_receipts::booking_id.eq(booking_id))
            .select(ReceiptRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(receipt.map(Into::into))
    }
}
