//! [`Charge`] definitions.

use common::{unit, Amount, DateOf, MonthYear};
use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{apartment, contract, user};
#[cfg(doc)]
use super::{Apartment, Contract, User};

/// Monthly charge billed under a [`Contract`].
#[derive(Clone, Debug)]
pub struct Charge {
    /// ID of this [`Charge`].
    pub id: Id,

    /// ID of the [`Contract`] this [`Charge`] is billed under.
    pub contract_id: contract::Id,

    /// Billing [`Period`] of this [`Charge`].
    ///
    /// Always the first day of the billed month, and always inside the
    /// owning [`Contract`]'s window.
    pub period: Period,

    /// Billing [`Amounts`] of this [`Charge`].
    pub amounts: Amounts,

    /// Whether this [`Charge`] applies a rent adjustment.
    pub is_adjustment: bool,

    /// Whether this [`Charge`] is visible to the billed tenant.
    pub is_visible: bool,

    /// [`PaymentDate`] of this [`Charge`], or [`None`] while unpaid.
    pub paid_at: Option<PaymentDate>,
}

impl Charge {
    /// Indicates whether this [`Charge`] has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }
}

/// ID of a [`Charge`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// First day of the month a [`Charge`] bills.
pub type Period = DateOf<(Charge, unit::Billing)>;

/// Day a [`Charge`] was paid on.
pub type PaymentDate = DateOf<(Charge, unit::Payment)>;

/// Billing components of a [`Charge`].
///
/// Every component is an [`Amount`], so negative money is unrepresentable
/// here by construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Amounts {
    /// Monthly rent.
    pub rent: Amount,

    /// Shared building expenses.
    pub expenses: Amount,

    /// Municipal tax.
    pub municipal_tax: Amount,

    /// Provincial tax.
    pub provincial_tax: Amount,

    /// Water bill.
    pub water: Amount,
}

impl Amounts {
    /// Returns the total of these [`Amounts`].
    #[must_use]
    pub fn total(&self) -> Amount {
        [
            self.rent,
            self.expenses,
            self.municipal_tax,
            self.provincial_tax,
            self.water,
        ]
        .into_iter()
        .sum()
    }
}

/// Flattened billing statement of a [`Charge`], ready for delivery to the
/// billed tenant.
#[derive(Clone, Debug)]
pub struct Statement {
    /// [`user::Email`] of the billed tenant.
    pub recipient: user::Email,

    /// [`apartment::Position`] of the billed [`Apartment`].
    pub apartment: apartment::Position,

    /// Billed month.
    pub period: MonthYear,

    /// Billing [`Amounts`] being delivered.
    pub amounts: Amounts,

    /// Total of the delivered [`Amounts`].
    pub total: Amount,
}
