//! Credit cards, loans and other lines of credit.

use crate::Versioned;
use serde::{Deserialize, Serialize};

/// A line of credit or loan account.
///
/// Revolving fields (`credit_limit`, `minimum_payment_*`) apply to credit
/// cards and HELOCs; amortizing fields (`original_principal`, `term_months`,
/// `monthly_payment_amount`) apply to the loan types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreditAccount {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: CreditAccountType,
    pub institution: String,
    pub account_number_last4: String,
    pub apr: f64,
    pub current_balance: f64,
    pub due_day: u8,
    pub linked_bill_id: Option<String>,
    pub notes: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub statement_entries: Vec<StatementEntry>,
    pub attachment_hashes: Vec<String>,
    pub credit_limit: f64,
    pub minimum_payment_type: CreditCardMinPaymentType,
    pub minimum_payment_value: f64,
    pub original_principal: f64,
    pub term_months: Option<u32>,
    pub monthly_payment_amount: Option<f64>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
}

impl Default for CreditAccount {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            account_type: CreditAccountType::default(),
            institution: String::new(),
            account_number_last4: String::new(),
            apr: 0.0,
            current_balance: 0.0,
            due_day: 1,
            linked_bill_id: None,
            notes: String::new(),
            created_at: 0,
            updated_at: 0,
            statement_entries: Vec::new(),
            attachment_hashes: Vec::new(),
            credit_limit: 0.0,
            minimum_payment_type: CreditCardMinPaymentType::default(),
            minimum_payment_value: 2.0,
            original_principal: 0.0,
            term_months: None,
            monthly_payment_amount: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl CreditAccount {
    /// Minimum payment due on a revolving balance.
    pub fn minimum_due(&self) -> f64 {
        match self.minimum_payment_type {
            CreditCardMinPaymentType::Fixed => self.minimum_payment_value.max(0.0),
            CreditCardMinPaymentType::PercentOfBalance => {
                (self.current_balance * (self.minimum_payment_value / 100.0)).max(0.0)
            }
            CreditCardMinPaymentType::FullBalance => self.current_balance.max(0.0),
        }
    }

    /// Monthly payment used for totals: the minimum due on a carried
    /// revolving balance, or the fixed payment of an amortizing loan.
    pub fn effective_monthly_payment(&self) -> f64 {
        if self.account_type.is_revolving() {
            if self.current_balance > 0.0 { self.minimum_due() } else { 0.0 }
        } else if self.account_type.is_amortizing() {
            self.monthly_payment_amount.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    /// Balance as a percent of the credit limit. `None` without a limit.
    pub fn utilization_percent(&self) -> Option<f64> {
        (self.account_type.is_revolving() && self.credit_limit > 0.0)
            .then(|| (self.current_balance / self.credit_limit * 100.0).max(0.0))
    }
}

impl Versioned for CreditAccount {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn assign_identity(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.created_at = now_ms;
        self.updated_at = now_ms;
    }

    fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
    }
}

/// An uploaded statement document attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatementEntry {
    /// sha256 of the blob.
    pub hash: String,
    pub added_at: i64,
    pub label: String,
}

named_enum! {
    pub enum CreditAccountType {
        CreditCard => "CREDIT_CARD",
        Mortgage => "MORTGAGE",
        CarLoan => "CAR_LOAN",
        StudentLoan => "STUDENT_LOAN",
        PersonalLoan => "PERSONAL_LOAN",
        Heloc => "HELOC",
        RetirementLoan => "RETIREMENT_LOAN",
        #[default]
        Other => "OTHER",
    }
}

impl CreditAccountType {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::CreditCard => "Credit Card",
            Self::Mortgage => "Mortgage",
            Self::CarLoan => "Car Loan",
            Self::StudentLoan => "Student Loan",
            Self::PersonalLoan => "Personal Loan",
            Self::Heloc => "HELOC",
            Self::RetirementLoan => "401k/IRA Loan",
            Self::Other => "Other",
        }
    }

    /// Has a credit limit and a minimum payment.
    pub fn is_revolving(self) -> bool {
        matches!(self, Self::CreditCard | Self::Heloc)
    }

    /// Has an original principal, a term and a fixed payment.
    pub fn is_amortizing(self) -> bool {
        matches!(
            self,
            Self::Mortgage | Self::CarLoan | Self::StudentLoan | Self::PersonalLoan | Self::RetirementLoan
        )
    }
}

named_enum! {
    pub enum CreditCardMinPaymentType {
        Fixed => "FIXED",
        #[default]
        PercentOfBalance => "PERCENT_OF_BALANCE",
        FullBalance => "FULL_BALANCE",
    }
}

