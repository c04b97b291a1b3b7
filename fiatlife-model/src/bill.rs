use crate::Versioned;
use serde::{Deserialize, Serialize};

/// A recurring bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub category: BillCategory,
    pub frequency: BillFrequency,
    /// Day of month the bill is due, 1..=31.
    pub due_day: u8,
    pub auto_pay: bool,
    pub account_name: String,
    pub notes: String,
    /// Blob hashes of attached statements/receipts.
    pub attachment_hashes: Vec<String>,
    pub is_paid: bool,
    pub last_paid_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Default for Bill {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            amount: 0.0,
            category: BillCategory::default(),
            frequency: BillFrequency::default(),
            due_day: 1,
            auto_pay: false,
            account_name: String::new(),
            notes: String::new(),
            attachment_hashes: Vec::new(),
            is_paid: false,
            last_paid_date: None,
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl Bill {
    /// Cost normalized to a monthly figure.
    pub fn monthly_amount(&self) -> f64 {
        self.annual_amount() / 12.0
    }

    pub fn annual_amount(&self) -> f64 {
        self.amount * f64::from(self.frequency.times_per_year())
    }
}

impl Versioned for Bill {
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

named_enum! {
    pub enum BillCategory {
        MortgageRent => "MORTGAGE_RENT",
        Electric => "ELECTRIC",
        GasHeating => "GAS_HEATING",
        WaterSewer => "WATER_SEWER",
        Trash => "TRASH",
        Internet => "INTERNET",
        Phone => "PHONE",
        CableStreaming => "CABLE_STREAMING",
        CarPayment => "CAR_PAYMENT",
        CarInsurance => "CAR_INSURANCE",
        HomeInsurance => "HOME_INSURANCE",
        PropertyTax => "PROPERTY_TAX",
        Hoa => "HOA",
        Groceries => "GROCERIES",
        GasFuel => "GAS_FUEL",
        Childcare => "CHILDCARE",
        StudentLoan => "STUDENT_LOAN",
        CreditCard => "CREDIT_CARD",
        Subscription => "SUBSCRIPTION",
        GymFitness => "GYM_FITNESS",
        Pet => "PET",
        #[default]
        Other => "OTHER",
    }
}

impl BillCategory {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::MortgageRent => "Mortgage/Rent",
            Self::Electric => "Electric",
            Self::GasHeating => "Gas/Heating",
            Self::WaterSewer => "Water/Sewer",
            Self::Trash => "Trash",
            Self::Internet => "Internet",
            Self::Phone => "Phone",
            Self::CableStreaming => "Cable/Streaming",
            Self::CarPayment => "Car Payment",
            Self::CarInsurance => "Car Insurance",
            Self::HomeInsurance => "Home Insurance",
            Self::PropertyTax => "Property Tax",
            Self::Hoa => "HOA",
            Self::Groceries => "Groceries",
            Self::GasFuel => "Gas/Fuel",
            Self::Childcare => "Childcare",
            Self::StudentLoan => "Student Loan",
            Self::CreditCard => "Credit Card",
            Self::Subscription => "Subscription",
            Self::GymFitness => "Gym/Fitness",
            Self::Pet => "Pet",
            Self::Other => "Other",
        }
    }
}

named_enum! {
    pub enum BillFrequency {
        Weekly => "WEEKLY",
        Biweekly => "BIWEEKLY",
        #[default]
        Monthly => "MONTHLY",
        Bimonthly => "BIMONTHLY",
        Quarterly => "QUARTERLY",
        Semiannually => "SEMIANNUALLY",
        Annually => "ANNUALLY",
    }
}

impl BillFrequency {
    pub fn times_per_year(self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Monthly => 12,
            Self::Bimonthly => 6,
            Self::Quarterly => 4,
            Self::Semiannually => 2,
            Self::Annually => 1,
        }
    }
}
