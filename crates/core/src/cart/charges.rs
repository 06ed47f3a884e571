//! Customization surcharges.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Customization;

/// Per-unit surcharges for jersey personalization, in the cart's currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeSchedule {
    /// Printed name.
    pub name: Decimal,
    /// Printed number.
    pub number: Decimal,
    /// Non-default font.
    pub font: Decimal,
    /// Sleeve badge.
    pub badge: Decimal,
}

impl Default for ChargeSchedule {
    /// Name 200, number 200, badge 100; fonts are free.
    fn default() -> Self {
        Self {
            name: Decimal::new(200, 0),
            number: Decimal::new(200, 0),
            font: Decimal::ZERO,
            badge: Decimal::new(100, 0),
        }
    }
}

impl ChargeSchedule {
    /// Total surcharge for one unit with the given customization.
    #[must_use]
    pub fn charge_for(&self, customization: &Customization) -> Decimal {
        self.breakdown(customization)
            .into_iter()
            .map(|(_, amount)| amount)
            .sum()
    }

    /// Itemized surcharges for the options that were chosen, for order
    /// summaries. Free options are still listed.
    #[must_use]
    pub fn breakdown(&self, customization: &Customization) -> Vec<(&'static str, Decimal)> {
        [
            ("Badge", customization.badge.is_some(), self.badge),
            ("Name", customization.name.is_some(), self.name),
            ("Number", customization.number.is_some(), self.number),
            ("Font Type", customization.font.is_some(), self.font),
        ]
        .into_iter()
        .filter(|(_, chosen, _)| *chosen)
        .map(|(label, _, amount)| (label, amount))
        .collect()
    }
}
