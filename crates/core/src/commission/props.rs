//! Property-based tests for commission calculation and generation.

use alianza_shared::types::{ClientId, PartnerId, TransferId};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::TransferCalculator;
use super::generator::{CommissionGenerator, TransferSnapshot};
use super::types::PaymentStatus;
use crate::client::{AdministrativeCategory, ClientTerms, CommissionSlot, CommissionSplits};
use crate::percent::round_money;

/// Amounts from 0.00 to 10,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Slot fractions from 0.000000 to 0.100000.
fn fraction() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000i64).prop_map(|n| Decimal::new(n, 6))
}

fn splits_strategy() -> impl Strategy<Value = CommissionSplits> {
    prop::collection::vec(
        (any::<bool>(), prop::option::of(fraction())),
        0..=12,
    )
    .prop_map(|slots| {
        let slots = slots
            .into_iter()
            .map(|(has_partner, percentage)| CommissionSlot {
                partner_id: has_partner.then(PartnerId::new),
                percentage,
            })
            .collect();
        CommissionSplits::new(slots).unwrap()
    })
}

fn date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The aggregate equals the sum of every non-null slot fraction.
    #[test]
    fn prop_aggregate_equals_slot_sum(splits in splits_strategy()) {
        let expected: Decimal = splits.slots().iter().filter_map(|s| s.percentage).sum();
        prop_assert_eq!(splits.aggregate_rate(), expected);
    }

    /// CONFEDIN transfers use max(0, rate - 0.002); everyone else the plain rate.
    #[test]
    fn prop_calculator_rate_rule(
        rate in fraction(),
        base in amount(),
        confedin in any::<bool>(),
    ) {
        let client = ClientTerms {
            client_id: ClientId::new(),
            service_commission_rate: Some(rate),
            category: confedin.then_some(AdministrativeCategory::Confedin),
        };
        let result = TransferCalculator::compute(Some(base), Some(&client)).unwrap();

        let effective = if confedin {
            (rate - Decimal::new(2, 3)).max(Decimal::ZERO)
        } else {
            rate
        };
        prop_assert_eq!(result.commission_amount, round_money(effective * base));
        prop_assert_eq!(
            result.commission_amount_with_tax,
            round_money(result.commission_amount * Decimal::new(116, 2))
        );
        prop_assert!(result.commission_amount >= Decimal::ZERO);
    }

    /// Regenerating for an unchanged transfer yields the same rows.
    #[test]
    fn prop_generation_is_idempotent(
        splits in splits_strategy(),
        base in amount(),
        date in date(),
    ) {
        let transfer = TransferSnapshot {
            transfer_id: TransferId::new(),
            client_id: ClientId::new(),
            date,
            base_amount: base,
            payment_status: PaymentStatus::Paid,
            service: "Fiscal".to_string(),
        };
        let first = CommissionGenerator::generate(&transfer, &splits).unwrap();
        let second = CommissionGenerator::generate(&transfer, &splits).unwrap();
        prop_assert_eq!(first, second);
    }

    /// One row per payable slot, undiscounted, never released on creation.
    #[test]
    fn prop_rows_follow_payable_slots(
        splits in splits_strategy(),
        base in amount(),
        date in date(),
    ) {
        let transfer = TransferSnapshot {
            transfer_id: TransferId::new(),
            client_id: ClientId::new(),
            date,
            base_amount: base,
            payment_status: PaymentStatus::Pending,
            service: String::new(),
        };
        let rows = CommissionGenerator::generate(&transfer, &splits).unwrap();

        prop_assert_eq!(rows.len(), splits.payable_slots().count());
        for row in &rows {
            prop_assert!(row.percentage > Decimal::ZERO);
            prop_assert_eq!(row.amount, round_money(row.percentage * base));
            prop_assert!(!row.released);
            prop_assert!(row.releasable_from > date);
        }
    }
}
