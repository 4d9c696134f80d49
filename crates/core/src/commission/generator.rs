//! Per-partner commission row generation.
//!
//! The set of commission rows of a transfer is a pure function of the
//! transfer and its client's configuration. Persistence replaces the whole
//! set on every transfer write; there are no incremental updates.

use alianza_shared::types::{ClientId, PartnerId, TransferId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::CommissionPeriod;
use super::types::PaymentStatus;
use crate::client::CommissionSplits;
use crate::error::CommissionError;
use crate::percent::round_money;

/// The transfer fields the generator reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSnapshot {
    /// Transfer being regenerated.
    pub transfer_id: TransferId,
    /// Owning client.
    pub client_id: ClientId,
    /// Transfer date; determines the period.
    pub date: NaiveDate,
    /// Base amount of the transfer.
    pub base_amount: Decimal,
    /// Payment status at generation time.
    pub payment_status: PaymentStatus,
    /// Service label copied onto each row.
    pub service: String,
}

/// A commission row ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionDraft {
    /// Source transfer.
    pub transfer_id: TransferId,
    /// Client of the transfer.
    pub client_id: ClientId,
    /// Partner being paid.
    pub partner_id: PartnerId,
    /// 1-based slot position the row came from.
    pub slot: usize,
    /// Service label.
    pub service: String,
    /// Fraction copied from the client configuration.
    pub percentage: Decimal,
    /// `percentage x base_amount`, 2 decimals.
    pub amount: Decimal,
    /// Period month.
    pub period_month: u32,
    /// Period year.
    pub period_year: i32,
    /// First day the row may be released.
    pub releasable_from: NaiveDate,
    /// Always false on creation; the release engine owns this flag.
    pub released: bool,
    /// Transfer date snapshot.
    pub transfer_date: NaiveDate,
    /// Transfer payment status snapshot.
    pub transfer_payment_status: PaymentStatus,
}

impl CommissionDraft {
    /// The period of the row.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` if the stored month/year is malformed.
    pub fn period(&self) -> Result<CommissionPeriod, CommissionError> {
        CommissionPeriod::new(self.period_month, self.period_year)
    }
}

/// Builds commission rows from a transfer and its client's splits.
pub struct CommissionGenerator;

impl CommissionGenerator {
    /// Generates one row per payable slot.
    ///
    /// Partner amounts use each slot's own undiscounted percentage against
    /// the transfer base amount; category discounts only affect the
    /// transfer's total.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod` if the transfer date is at the edge of the
    /// calendar and `AmountOutOfRange` if a partner amount overflows.
    pub fn generate(
        transfer: &TransferSnapshot,
        splits: &CommissionSplits,
    ) -> Result<Vec<CommissionDraft>, CommissionError> {
        let period = CommissionPeriod::containing(transfer.date)?;

        splits
            .payable_slots()
            .map(|(slot, partner_id, percentage)| {
                let amount = percentage
                    .checked_mul(transfer.base_amount)
                    .ok_or(CommissionError::AmountOutOfRange(transfer.base_amount))?;
                Ok(CommissionDraft {
                    transfer_id: transfer.transfer_id,
                    client_id: transfer.client_id,
                    partner_id,
                    slot,
                    service: transfer.service.clone(),
                    percentage,
                    amount: round_money(amount),
                    period_month: period.month(),
                    period_year: period.year(),
                    releasable_from: period.releasable_from(),
                    released: false,
                    transfer_date: transfer.date,
                    transfer_payment_status: transfer.payment_status,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{CommissionSlot, SlotInput};
    use rust_decimal_macros::dec;

    fn snapshot(amount: Decimal, date: NaiveDate) -> TransferSnapshot {
        TransferSnapshot {
            transfer_id: TransferId::new(),
            client_id: ClientId::new(),
            date,
            base_amount: amount,
            payment_status: PaymentStatus::Pending,
            service: "PROCOM".to_string(),
        }
    }

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_acme_scenario() {
        let a = PartnerId::new();
        let b = PartnerId::new();
        let splits = CommissionSplits::from_inputs(&[
            SlotInput {
                partner_id: Some(a),
                percentage: Some("6".into()),
            },
            SlotInput {
                partner_id: Some(b),
                percentage: Some("4".into()),
            },
        ])
        .unwrap();
        let transfer = snapshot(dec!(1000.00), march_15());

        let rows = CommissionGenerator::generate(&transfer, &splits).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].partner_id, a);
        assert_eq!(rows[0].amount, dec!(60.00));
        assert_eq!(rows[1].partner_id, b);
        assert_eq!(rows[1].amount, dec!(40.00));
        for row in &rows {
            assert_eq!((row.period_month, row.period_year), (3, 2024));
            assert_eq!(
                row.releasable_from,
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
            );
            assert!(!row.released);
            assert_eq!(row.transfer_id, transfer.transfer_id);
            assert_eq!(row.service, "PROCOM");
        }
    }

    #[test]
    fn test_skips_empty_and_zero_slots() {
        let a = PartnerId::new();
        let splits = CommissionSplits::new(vec![
            CommissionSlot::new(a, dec!(0.05)),
            CommissionSlot::new(PartnerId::new(), Decimal::ZERO),
            CommissionSlot {
                partner_id: None,
                percentage: Some(dec!(0.02)),
            },
            CommissionSlot {
                partner_id: Some(PartnerId::new()),
                percentage: None,
            },
        ])
        .unwrap();

        let rows = CommissionGenerator::generate(&snapshot(dec!(100), march_15()), &splits).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].partner_id, a);
        assert_eq!(rows[0].slot, 1);
        assert_eq!(rows[0].amount, dec!(5.00));
    }

    #[test]
    fn test_no_slots_no_rows() {
        let rows = CommissionGenerator::generate(
            &snapshot(dec!(100), march_15()),
            &CommissionSplits::default(),
        )
        .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let splits = CommissionSplits::new(vec![CommissionSlot::new(PartnerId::new(), dec!(0.01))])
            .unwrap();
        let transfer = snapshot(dec!(100), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let rows = CommissionGenerator::generate(&transfer, &splits).unwrap();
        assert_eq!((rows[0].period_month, rows[0].period_year), (12, 2024));
        assert_eq!(
            rows[0].releasable_from,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(rows[0].period().unwrap().to_string(), "2024-12");
    }

    #[test]
    fn test_largest_amount_with_full_slot() {
        let full = CommissionSplits::new(vec![CommissionSlot::new(PartnerId::new(), Decimal::ONE)])
            .unwrap();
        let transfer = snapshot(crate::commission::MAX_AMOUNT, march_15());

        let rows = CommissionGenerator::generate(&transfer, &full).unwrap();
        assert_eq!(rows[0].amount, dec!(999999999999.99));
    }

    #[test]
    fn test_partner_amount_rounds_half_up() {
        let splits = CommissionSplits::new(vec![CommissionSlot::new(PartnerId::new(), dec!(0.015))])
            .unwrap();
        // 0.015 x 0.30 = 0.0045 -> 0.00 ; 0.015 x 0.70 = 0.0105 -> 0.01
        let rows =
            CommissionGenerator::generate(&snapshot(dec!(0.70), march_15()), &splits).unwrap();
        assert_eq!(rows[0].amount, dec!(0.01));

        // 0.015 x 1.00 = 0.015 -> 0.02
        let rows =
            CommissionGenerator::generate(&snapshot(dec!(1.00), march_15()), &splits).unwrap();
        assert_eq!(rows[0].amount, dec!(0.02));
    }
}
