//! Domain model for FiatLife.
//!
//! These types are what the local store keeps in its `jsonData` payload
//! columns and what the relay carries as encrypted app data. The JSON shape
//! is camelCase with SCREAMING_SNAKE_CASE enum names; unknown keys are
//! ignored and missing keys fall back to defaults so payloads written by
//! older or newer clients still decode.

/// Declares a string-backed enum whose wire name doubles as the value of
/// the denormalized filter columns (`category`, `type`). The variant marked
/// `#[default]` is what missing JSON fields decode to.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name, as stored in JSON and in filter columns.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err($crate::ModelError::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

mod bill;
mod credit;
mod error;
mod goal;
mod paycheck;
mod salary;
mod source;

pub use bill::{Bill, BillCategory, BillFrequency};
pub use credit::{CreditAccount, CreditAccountType, CreditCardMinPaymentType, StatementEntry};
pub use error::{ModelError, ModelResult};
pub use goal::{FinancialGoal, GoalCategory};
pub use paycheck::{
    estimate_state_tax_rate, AnnualProjection, DeductionLine, DepositAllocation,
    FederalTaxBracket, PaycheckCalculation,
};
pub use salary::{
    AccountType, Deduction, DeductionCategory, DeductionType, DirectDeposit, FilingStatus,
    PayFrequency, SalaryConfig, TaxOverrides,
};
pub use source::{BillSource, BillWithSource};

/// Records that carry their own identity and modification time.
///
/// Repositories use this to stamp new records with an id and creation time
/// and to bump `updatedAt` on every save.
pub trait Versioned {
    fn id(&self) -> &str;
    fn updated_at(&self) -> i64;
    /// Gives a never-saved record its id and creation time.
    fn assign_identity(&mut self, id: String, now_ms: i64);
    fn touch(&mut self, now_ms: i64);
}

/// Stamps a record for saving: fresh identity if it has none, otherwise a
/// new modification time.
pub fn prepare_for_save<T: Versioned>(mut record: T, new_id: impl FnOnce() -> String, now_ms: i64) -> T {
    if record.id().is_empty() {
        record.assign_identity(new_id(), now_ms);
    } else {
        record.touch(now_ms);
    }
    record
}
