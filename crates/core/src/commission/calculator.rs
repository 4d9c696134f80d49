//! Transfer commission calculator.
//!
//! Runs on every transfer write, before the row is persisted, and produces
//! the three derived fields stored on the transfer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::ClientTerms;
use crate::error::CommissionError;
use crate::percent::{round_half_up, round_money};

/// Decimal places of the stored display rate.
pub const DISPLAY_RATE_SCALE: u32 = 4;

/// Largest base amount a transfer may carry: 999,999,999,999.99, the
/// capacity of the stored `NUMERIC(14, 2)` column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// VAT multiplier applied to the commission amount (16% IVA).
#[must_use]
pub fn vat_factor() -> Decimal {
    Decimal::new(116, 2)
}

/// Rate reduction for discounted categories: 0.2 percentage points.
#[must_use]
pub fn category_discount() -> Decimal {
    Decimal::new(2, 3)
}

/// Derived commission figures of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCommission {
    /// Base amount used (null amounts become zero).
    pub base_amount: Decimal,
    /// Fraction actually applied, after any category discount.
    pub effective_rate: Decimal,
    /// `effective_rate` as a percentage, 4 decimals.
    pub commission_rate: Decimal,
    /// `effective_rate x base_amount`, 2 decimals.
    pub commission_amount: Decimal,
    /// `commission_amount x 1.16`, 2 decimals.
    pub commission_amount_with_tax: Decimal,
}

/// Stateless calculator for transfer commission figures.
pub struct TransferCalculator;

impl TransferCalculator {
    /// Returns the rate a client's transfers are charged.
    ///
    /// CONFEDIN clients get `rate - 0.002`, never below zero. The client's
    /// own stored aggregate is left untouched.
    #[must_use]
    pub fn effective_rate(client: &ClientTerms) -> Decimal {
        let rate = client.service_commission_rate.unwrap_or(Decimal::ZERO);
        match client.category {
            Some(category) if category.has_rate_discount() => {
                (rate - category_discount()).max(Decimal::ZERO)
            }
            _ => rate,
        }
    }

    /// Validates a base amount; `None` becomes zero.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` below zero and `AmountOutOfRange` above
    /// [`MAX_AMOUNT`].
    pub fn check_amount(amount: Option<Decimal>) -> Result<Decimal, CommissionError> {
        let amount = amount.unwrap_or(Decimal::ZERO);
        if amount < Decimal::ZERO {
            return Err(CommissionError::NegativeAmount(amount));
        }
        if amount > MAX_AMOUNT {
            return Err(CommissionError::AmountOutOfRange(amount));
        }
        Ok(amount)
    }

    /// Computes the derived commission fields for a transfer.
    ///
    /// # Errors
    ///
    /// Returns `MissingClientReference` when no client is given, plus the
    /// errors of [`TransferCalculator::check_amount`].
    pub fn compute(
        base_amount: Option<Decimal>,
        client: Option<&ClientTerms>,
    ) -> Result<TransferCommission, CommissionError> {
        let client = client.ok_or(CommissionError::MissingClientReference)?;
        let base_amount = Self::check_amount(base_amount)?;

        let effective_rate = Self::effective_rate(client);
        let overflow = || CommissionError::AmountOutOfRange(base_amount);
        let commission_amount = round_money(
            effective_rate
                .checked_mul(base_amount)
                .ok_or_else(overflow)?,
        );
        let with_tax = commission_amount
            .checked_mul(vat_factor())
            .ok_or_else(overflow)?;
        let display_rate = effective_rate
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(overflow)?;

        Ok(TransferCommission {
            base_amount,
            effective_rate,
            commission_rate: round_half_up(display_rate, DISPLAY_RATE_SCALE),
            commission_amount,
            commission_amount_with_tax: round_money(with_tax),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AdministrativeCategory;
    use alianza_shared::types::ClientId;
    use rust_decimal_macros::dec;

    fn client(rate: Option<Decimal>, category: Option<AdministrativeCategory>) -> ClientTerms {
        ClientTerms {
            client_id: ClientId::new(),
            service_commission_rate: rate,
            category,
        }
    }

    #[test]
    fn test_standard_client() {
        let acme = client(Some(dec!(0.10)), None);
        let result = TransferCalculator::compute(Some(dec!(1000.00)), Some(&acme)).unwrap();

        assert_eq!(result.commission_amount, dec!(100.00));
        assert_eq!(result.commission_amount_with_tax, dec!(116.00));
        assert_eq!(result.commission_rate, dec!(10.0000));
        assert_eq!(result.effective_rate, dec!(0.10));
    }

    #[test]
    fn test_confedin_discount() {
        let confedin = client(Some(dec!(0.10)), Some(AdministrativeCategory::Confedin));
        let result = TransferCalculator::compute(Some(dec!(1000.00)), Some(&confedin)).unwrap();

        assert_eq!(result.effective_rate, dec!(0.098));
        assert_eq!(result.commission_rate, dec!(9.8));
        assert_eq!(result.commission_amount, dec!(98.00));
        assert_eq!(result.commission_amount_with_tax, dec!(113.68));
    }

    #[test]
    fn test_confedin_discount_clamps_at_zero() {
        let confedin = client(Some(dec!(0.001)), Some(AdministrativeCategory::Confedin));
        let result = TransferCalculator::compute(Some(dec!(5000)), Some(&confedin)).unwrap();

        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.commission_amount, Decimal::ZERO);
        assert_eq!(result.commission_amount_with_tax, Decimal::ZERO);
    }

    #[test]
    fn test_other_categories_not_discounted() {
        let zamora = client(Some(dec!(0.05)), Some(AdministrativeCategory::Zamora));
        let result = TransferCalculator::compute(Some(dec!(200)), Some(&zamora)).unwrap();
        assert_eq!(result.commission_amount, dec!(10.00));
    }

    #[test]
    fn test_null_rate_is_zero() {
        let bare = client(None, None);
        let result = TransferCalculator::compute(Some(dec!(1234.56)), Some(&bare)).unwrap();
        assert_eq!(result.commission_amount, Decimal::ZERO);
        assert_eq!(result.commission_rate, Decimal::ZERO);
    }

    #[test]
    fn test_null_amount_is_zero() {
        let acme = client(Some(dec!(0.10)), None);
        let result = TransferCalculator::compute(None, Some(&acme)).unwrap();
        assert_eq!(result.base_amount, Decimal::ZERO);
        assert_eq!(result.commission_amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_client() {
        assert_eq!(
            TransferCalculator::compute(Some(dec!(10)), None),
            Err(CommissionError::MissingClientReference)
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let acme = client(Some(dec!(0.10)), None);
        assert_eq!(
            TransferCalculator::compute(Some(dec!(-1)), Some(&acme)),
            Err(CommissionError::NegativeAmount(dec!(-1)))
        );
    }

    #[test]
    fn test_amount_above_column_capacity_rejected() {
        let full = client(Some(Decimal::ONE), None);
        assert_eq!(
            TransferCalculator::compute(Some(Decimal::MAX), Some(&full)),
            Err(CommissionError::AmountOutOfRange(Decimal::MAX))
        );
        assert_eq!(
            TransferCalculator::compute(Some(dec!(1000000000000.00)), Some(&full)),
            Err(CommissionError::AmountOutOfRange(dec!(1000000000000.00)))
        );
    }

    #[test]
    fn test_largest_amount_with_largest_rate() {
        // Twelve slots at 100% each.
        let twelve = client(Some(dec!(12)), None);
        let result = TransferCalculator::compute(Some(MAX_AMOUNT), Some(&twelve)).unwrap();
        assert_eq!(MAX_AMOUNT, dec!(999999999999.99));
        assert_eq!(result.commission_amount, dec!(11999999999999.88));
        assert_eq!(result.commission_amount_with_tax, dec!(13919999999999.86));
    }

    #[test]
    fn test_rounding_half_up_on_amounts() {
        // 0.123457 x 1000.05 = 123.4631...
        let odd = client(Some(dec!(0.123457)), None);
        let result = TransferCalculator::compute(Some(dec!(1000.05)), Some(&odd)).unwrap();
        assert_eq!(result.commission_amount, dec!(123.46));
        assert_eq!(result.commission_amount_with_tax, dec!(143.21));
        assert_eq!(result.commission_rate, dec!(12.3457));

        // 0.05 x 0.10 = 0.005 -> 0.01 (half-up, not banker's)
        let five = client(Some(dec!(0.05)), None);
        let result = TransferCalculator::compute(Some(dec!(0.10)), Some(&five)).unwrap();
        assert_eq!(result.commission_amount, dec!(0.01));
    }
}
