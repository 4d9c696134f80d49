//! Per-partner payout summaries for the reporting read contract.

use std::collections::BTreeMap;

use alianza_shared::types::PartnerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimal view of a commission row for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionLine {
    /// Partner owed the amount.
    pub partner_id: PartnerId,
    /// Commission amount.
    pub amount: Decimal,
    /// Release flag.
    pub released: bool,
}

/// Totals owed to one partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerPayout {
    /// Partner.
    pub partner_id: PartnerId,
    /// Number of commission rows.
    pub commissions: u64,
    /// Sum of every row.
    pub total_amount: Decimal,
    /// Sum of released (payable) rows.
    pub released_amount: Decimal,
    /// Sum of rows still held.
    pub held_amount: Decimal,
}

impl PartnerPayout {
    fn empty(partner_id: PartnerId) -> Self {
        Self {
            partner_id,
            commissions: 0,
            total_amount: Decimal::ZERO,
            released_amount: Decimal::ZERO,
            held_amount: Decimal::ZERO,
        }
    }
}

/// Aggregates commission rows per partner, ordered by partner id.
pub fn summarize_payouts(lines: impl IntoIterator<Item = CommissionLine>) -> Vec<PartnerPayout> {
    let mut by_partner: BTreeMap<PartnerId, PartnerPayout> = BTreeMap::new();

    for line in lines {
        let payout = by_partner
            .entry(line.partner_id)
            .or_insert_with(|| PartnerPayout::empty(line.partner_id));
        payout.commissions += 1;
        payout.total_amount += line.amount;
        if line.released {
            payout.released_amount += line.amount;
        } else {
            payout.held_amount += line.amount;
        }
    }

    by_partner.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_summarize_payouts() {
        let a = PartnerId::new();
        let b = PartnerId::new();
        let lines = vec![
            CommissionLine {
                partner_id: a,
                amount: dec!(60.00),
                released: true,
            },
            CommissionLine {
                partner_id: a,
                amount: dec!(15.50),
                released: false,
            },
            CommissionLine {
                partner_id: b,
                amount: dec!(40.00),
                released: true,
            },
        ];

        let payouts = summarize_payouts(lines);
        assert_eq!(payouts.len(), 2);

        let pa = payouts.iter().find(|p| p.partner_id == a).unwrap();
        assert_eq!(pa.commissions, 2);
        assert_eq!(pa.total_amount, dec!(75.50));
        assert_eq!(pa.released_amount, dec!(60.00));
        assert_eq!(pa.held_amount, dec!(15.50));

        let pb = payouts.iter().find(|p| p.partner_id == b).unwrap();
        assert_eq!(pb.held_amount, Decimal::ZERO);
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_payouts(Vec::new()).is_empty());
    }
}
