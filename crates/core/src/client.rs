//! Client commission configuration.
//!
//! A client carries up to [`MAX_COMMISSION_SLOTS`] ordered (partner,
//! percentage) slots. The client's aggregate service-commission rate is never
//! typed by an operator: it is always the sum of the non-null slot fractions,
//! recomputed from [`CommissionSplits::aggregate_rate`] on every save.

use std::fmt;
use std::str::FromStr;

use alianza_shared::types::{ClientId, ExecutiveId, PartnerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CommissionError;
use crate::percent::{FRACTION_SCALE, percent_to_fraction};

/// Maximum number of commission slots per client.
pub const MAX_COMMISSION_SLOTS: usize = 12;

/// Administrative category ("AC") of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdministrativeCategory {
    /// CONFEDIN. Transfers of these clients get a 0.2 point rate discount.
    Confedin,
    /// CAMARENCE.
    Camarence,
    /// HATRES.
    Hatres,
    /// SERVIARUGA.
    Serviaruga,
    /// ZAMORA.
    Zamora,
    /// INACTIVO.
    Inactivo,
    /// SERVICIO.
    Servicio,
}

impl AdministrativeCategory {
    /// All categories, in display order.
    pub const ALL: [Self; 7] = [
        Self::Confedin,
        Self::Camarence,
        Self::Hatres,
        Self::Serviaruga,
        Self::Zamora,
        Self::Inactivo,
        Self::Servicio,
    ];

    /// Canonical stored code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confedin => "CONFEDIN",
            Self::Camarence => "CAMARENCE",
            Self::Hatres => "HATRES",
            Self::Serviaruga => "SERVIARUGA",
            Self::Zamora => "ZAMORA",
            Self::Inactivo => "INACTIVO",
            Self::Servicio => "SERVICIO",
        }
    }

    /// Whether transfers of this category use the discounted rate.
    #[must_use]
    pub const fn has_rate_discount(self) -> bool {
        matches!(self, Self::Confedin)
    }
}

impl fmt::Display for AdministrativeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdministrativeCategory {
    type Err = CommissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == code)
            .ok_or_else(|| CommissionError::UnknownValue {
                kind: "administrative category",
                value: s.to_string(),
            })
    }
}

/// One configured commission slot. Either half may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionSlot {
    /// Partner receiving the commission.
    pub partner_id: Option<PartnerId>,
    /// Share of the transfer amount, as a fraction in `[0, 1]`.
    pub percentage: Option<Decimal>,
}

impl CommissionSlot {
    /// Creates a slot with both partner and percentage set.
    #[must_use]
    pub const fn new(partner_id: PartnerId, percentage: Decimal) -> Self {
        Self {
            partner_id: Some(partner_id),
            percentage: Some(percentage),
        }
    }

    /// Returns the partner and percentage if this slot produces a commission.
    ///
    /// A slot pays out only when the partner is set and the percentage is
    /// strictly positive.
    #[must_use]
    pub fn payable(&self) -> Option<(PartnerId, Decimal)> {
        match (self.partner_id, self.percentage) {
            (Some(partner_id), Some(pct)) if pct > Decimal::ZERO => Some((partner_id, pct)),
            _ => None,
        }
    }
}

/// Slot as typed by an operator: percentage in the 0-100 display scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInput {
    /// Partner receiving the commission.
    pub partner_id: Option<PartnerId>,
    /// Percentage as entered (e.g. `"6.5"`); blank means "no percentage".
    pub percentage: Option<String>,
}

/// Validated, ordered commission configuration of a client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionSplits {
    slots: Vec<CommissionSlot>,
}

impl CommissionSplits {
    /// Validates stored slots.
    ///
    /// # Errors
    ///
    /// Returns `TooManySlots` for more than 12 slots and
    /// `PercentageOutOfRange` for any fraction outside `[0, 1]`.
    pub fn new(slots: Vec<CommissionSlot>) -> Result<Self, CommissionError> {
        if slots.len() > MAX_COMMISSION_SLOTS {
            return Err(CommissionError::TooManySlots {
                count: slots.len(),
                max: MAX_COMMISSION_SLOTS,
            });
        }

        for pct in slots.iter().filter_map(|slot| slot.percentage) {
            if pct < Decimal::ZERO || pct > Decimal::ONE {
                return Err(CommissionError::PercentageOutOfRange(pct));
            }
        }

        Ok(Self { slots })
    }

    /// Builds the configuration from operator input in the 0-100 scale.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercentage` if any non-blank percentage does not parse,
    /// plus the errors of [`CommissionSplits::new`].
    pub fn from_inputs(inputs: &[SlotInput]) -> Result<Self, CommissionError> {
        if inputs.len() > MAX_COMMISSION_SLOTS {
            return Err(CommissionError::TooManySlots {
                count: inputs.len(),
                max: MAX_COMMISSION_SLOTS,
            });
        }

        let slots = inputs
            .iter()
            .map(|input| {
                let percentage = match input.percentage.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(raw) => Some(percent_to_fraction(raw)?),
                };
                Ok(CommissionSlot {
                    partner_id: input.partner_id,
                    percentage,
                })
            })
            .collect::<Result<Vec<_>, CommissionError>>()?;

        Self::new(slots)
    }

    /// Slots in configured order.
    #[must_use]
    pub fn slots(&self) -> &[CommissionSlot] {
        &self.slots
    }

    /// Sum of every non-null slot fraction.
    ///
    /// Slots without a partner still count: the aggregate reflects what the
    /// operator configured, not only what pays out.
    #[must_use]
    pub fn aggregate_rate(&self) -> Decimal {
        self.slots
            .iter()
            .filter_map(|slot| slot.percentage)
            .sum::<Decimal>()
            .round_dp(FRACTION_SCALE)
    }

    /// Slots that generate commission rows, with their 1-based position.
    pub fn payable_slots(&self) -> impl Iterator<Item = (usize, PartnerId, Decimal)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.payable().map(|(p, pct)| (index + 1, p, pct)))
    }

    /// Returns true if no slot is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// The parts of a client the transfer calculator reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTerms {
    /// Client identifier.
    pub client_id: ClientId,
    /// Stored aggregate rate (fraction); `None` is treated as zero.
    pub service_commission_rate: Option<Decimal>,
    /// Administrative category.
    pub category: Option<AdministrativeCategory>,
}

/// Executives responsible for a client account or a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutiveAssignment {
    /// Lead executive.
    pub executive: Option<ExecutiveId>,
    /// Second executive.
    pub secondary: Option<ExecutiveId>,
    /// Support executive.
    pub support: Option<ExecutiveId>,
}

impl ExecutiveAssignment {
    /// Fills every unset role from `client`, the assignment of the owning
    /// client. Roles already set on the transfer are kept.
    #[must_use]
    pub fn or_client(self, client: Self) -> Self {
        Self {
            executive: self.executive.or(client.executive),
            secondary: self.secondary.or(client.secondary),
            support: self.support.or(client.support),
        }
    }

    /// Distinct executives referenced, in role order.
    #[must_use]
    pub fn ids(&self) -> Vec<ExecutiveId> {
        let mut ids = Vec::with_capacity(3);
        for id in [self.executive, self.secondary, self.support].into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Business name as stored: trimmed and uppercased.
#[must_use]
pub fn canonical_business_name(name: &str) -> String {
    name.trim().to_uppercase()
}
