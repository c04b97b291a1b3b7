//! Salary configuration and its payroll value types.

use crate::Versioned;
use serde::{Deserialize, Serialize};

/// Pay setup used to estimate paychecks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalaryConfig {
    pub id: String,
    pub name: String,
    pub hourly_rate: f64,
    pub standard_hours_per_period: f64,
    pub overtime_hours: f64,
    pub overtime_multiplier: f64,
    pub pay_frequency: PayFrequency,
    pub filing_status: FilingStatus,
    pub state: String,
    pub county: String,
    pub allowances: u32,
    pub pre_tax_deductions: Vec<Deduction>,
    pub post_tax_deductions: Vec<Deduction>,
    pub direct_deposits: Vec<DirectDeposit>,
    pub tax_overrides: TaxOverrides,
    pub updated_at: i64,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: "My Salary".to_string(),
            hourly_rate: 0.0,
            standard_hours_per_period: 80.0,
            overtime_hours: 0.0,
            overtime_multiplier: 1.5,
            pay_frequency: PayFrequency::default(),
            filing_status: FilingStatus::default(),
            state: String::new(),
            county: String::new(),
            allowances: 0,
            pre_tax_deductions: Vec::new(),
            post_tax_deductions: Vec::new(),
            direct_deposits: Vec::new(),
            tax_overrides: TaxOverrides::default(),
            updated_at: 0,
        }
    }
}

impl SalaryConfig {
    /// Regular plus overtime pay for one pay period, before any deduction.
    pub fn gross_per_period(&self) -> f64 {
        let regular = self.hourly_rate * self.standard_hours_per_period;
        let overtime = self.hourly_rate * self.overtime_multiplier * self.overtime_hours;
        regular + overtime
    }

    pub fn annual_gross(&self) -> f64 {
        self.gross_per_period() * f64::from(self.pay_frequency.periods_per_year())
    }

    /// Sum of enabled pre-tax deductions for one period.
    pub fn pre_tax_total(&self) -> f64 {
        let gross = self.gross_per_period();
        self.pre_tax_deductions.iter().map(|d| d.amount_for(gross)).sum()
    }

    /// Sum of enabled post-tax deductions for one period.
    pub fn post_tax_total(&self) -> f64 {
        let gross = self.gross_per_period();
        self.post_tax_deductions.iter().map(|d| d.amount_for(gross)).sum()
    }
}

impl Versioned for SalaryConfig {
    fn id(&self) -> &str {
        &self.id
    }

    fn updated_at(&self) -> i64 {
        self.updated_at
    }

    fn assign_identity(&mut self, id: String, now_ms: i64) {
        self.id = id;
        self.updated_at = now_ms;
    }

    fn touch(&mut self, now_ms: i64) {
        self.updated_at = now_ms;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Deduction {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub deduction_type: DeductionType,
    pub category: DeductionCategory,
    /// When set, `amount` is a percent of gross pay.
    pub is_percentage: bool,
    pub is_enabled: bool,
}

impl Default for Deduction {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            amount: 0.0,
            deduction_type: DeductionType::default(),
            category: DeductionCategory::default(),
            is_percentage: false,
            is_enabled: true,
        }
    }
}

impl Deduction {
    /// Amount withheld from a paycheck with the given gross.
    pub fn amount_for(&self, gross: f64) -> f64 {
        if !self.is_enabled {
            0.0
        } else if self.is_percentage {
            gross * self.amount / 100.0
        } else {
            self.amount
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectDeposit {
    pub id: String,
    pub account_name: String,
    pub bank_name: String,
    pub account_type: AccountType,
    pub amount: f64,
    pub is_percentage: bool,
    /// Receives whatever is left after the other deposits.
    pub is_remainder: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxOverrides {
    pub federal_additional_withholding: f64,
    pub state_additional_withholding: f64,
    pub is_exempt_from_federal: bool,
    pub is_exempt_from_state: bool,
    pub is_exempt_from_local: bool,
    pub custom_state_tax_rate: Option<f64>,
    pub custom_county_tax_rate: Option<f64>,
}

named_enum! {
    pub enum PayFrequency {
        Weekly => "WEEKLY",
        #[default]
        Biweekly => "BIWEEKLY",
        Semimonthly => "SEMIMONTHLY",
        Monthly => "MONTHLY",
    }
}

impl PayFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Self::Weekly => 52,
            Self::Biweekly => 26,
            Self::Semimonthly => 24,
            Self::Monthly => 12,
        }
    }
}

named_enum! {
    pub enum FilingStatus {
        #[default]
        Single => "SINGLE",
        MarriedFilingJointly => "MARRIED_FILING_JOINTLY",
        MarriedFilingSeparately => "MARRIED_FILING_SEPARATELY",
        HeadOfHousehold => "HEAD_OF_HOUSEHOLD",
    }
}

named_enum! {
    pub enum DeductionType {
        #[default]
        PreTax => "PRE_TAX",
        PostTax => "POST_TAX",
    }
}

named_enum! {
    pub enum DeductionCategory {
        MedicalInsurance => "MEDICAL_INSURANCE",
        DentalInsurance => "DENTAL_INSURANCE",
        VisionInsurance => "VISION_INSURANCE",
        Hsa => "HSA",
        Fsa => "FSA",
        Traditional401k => "TRADITIONAL_401K",
        Roth401k => "ROTH_401K",
        LifeInsurance => "LIFE_INSURANCE",
        AdAndD => "AD_AND_D",
        CriticalIllness => "CRITICAL_ILLNESS",
        DisabilityInsurance => "DISABILITY_INSURANCE",
        LegalPlan => "LEGAL_PLAN",
        UnionDues => "UNION_DUES",
        ParkingTransit => "PARKING_TRANSIT",
        #[default]
        Other => "OTHER",
    }
}

impl DeductionCategory {
    /// Whether payroll normally takes this deduction before tax.
    pub fn default_type(self) -> DeductionType {
        match self {
            Self::MedicalInsurance
            | Self::DentalInsurance
            | Self::VisionInsurance
            | Self::Hsa
            | Self::Fsa
            | Self::Traditional401k
            | Self::ParkingTransit => DeductionType::PreTax,
            _ => DeductionType::PostTax,
        }
    }
}

named_enum! {
    pub enum AccountType {
        #[default]
        Checking => "CHECKING",
        Savings => "SAVINGS",
        MoneyMarket => "MONEY_MARKET",
        Investment => "INVESTMENT",
        Other => "OTHER",
    }
}

