//! Paycheck and annual take-home estimates for a [`SalaryConfig`].
//!
//! Federal income tax uses the 2025 brackets and standard deduction for the
//! filing status, applied to annualized taxable pay. State tax is a flat
//! estimate per state unless the config overrides it; county tax applies
//! only when a custom rate is set. FICA is computed on annualized gross.

use crate::salary::{Deduction, DeductionCategory, DirectDeposit, FilingStatus, SalaryConfig};
use serde::Serialize;

pub const SOCIAL_SECURITY_RATE: f64 = 0.062;
pub const SOCIAL_SECURITY_WAGE_BASE: f64 = 176_100.0;
pub const MEDICARE_RATE: f64 = 0.0145;
pub const ADDITIONAL_MEDICARE_RATE: f64 = 0.009;
pub const ADDITIONAL_MEDICARE_THRESHOLD_SINGLE: f64 = 200_000.0;
pub const ADDITIONAL_MEDICARE_THRESHOLD_JOINT: f64 = 250_000.0;

/// State rate used for codes with no table entry.
const DEFAULT_STATE_RATE: f64 = 0.05;

/// One federal bracket. `base_tax` is the tax owed on income up to `min`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FederalTaxBracket {
    pub min: f64,
    pub max: f64,
    pub rate: f64,
    pub base_tax: f64,
}

const fn bracket(min: f64, max: f64, rate: f64, base_tax: f64) -> FederalTaxBracket {
    FederalTaxBracket { min, max, rate, base_tax }
}

const SINGLE: [FederalTaxBracket; 7] = [
    bracket(0.0, 11_925.0, 0.10, 0.0),
    bracket(11_925.0, 48_475.0, 0.12, 1_192.50),
    bracket(48_475.0, 103_350.0, 0.22, 5_578.50),
    bracket(103_350.0, 197_300.0, 0.24, 17_651.00),
    bracket(197_300.0, 250_525.0, 0.32, 40_199.00),
    bracket(250_525.0, 626_350.0, 0.35, 57_231.00),
    bracket(626_350.0, f64::MAX, 0.37, 188_769.75),
];

const MARRIED_FILING_JOINTLY: [FederalTaxBracket; 7] = [
    bracket(0.0, 23_850.0, 0.10, 0.0),
    bracket(23_850.0, 96_950.0, 0.12, 2_385.00),
    bracket(96_950.0, 206_700.0, 0.22, 11_157.00),
    bracket(206_700.0, 394_600.0, 0.24, 35_302.00),
    bracket(394_600.0, 501_050.0, 0.32, 80_398.00),
    bracket(501_050.0, 751_600.0, 0.35, 114_462.00),
    bracket(751_600.0, f64::MAX, 0.37, 202_154.50),
];

const MARRIED_FILING_SEPARATELY: [FederalTaxBracket; 7] = [
    bracket(0.0, 11_925.0, 0.10, 0.0),
    bracket(11_925.0, 48_475.0, 0.12, 1_192.50),
    bracket(48_475.0, 103_350.0, 0.22, 5_578.50),
    bracket(103_350.0, 197_300.0, 0.24, 17_651.00),
    bracket(197_300.0, 250_525.0, 0.32, 40_199.00),
    bracket(250_525.0, 375_800.0, 0.35, 57_231.00),
    bracket(375_800.0, f64::MAX, 0.37, 101_077.25),
];

const HEAD_OF_HOUSEHOLD: [FederalTaxBracket; 7] = [
    bracket(0.0, 17_000.0, 0.10, 0.0),
    bracket(17_000.0, 64_850.0, 0.12, 1_700.00),
    bracket(64_850.0, 103_350.0, 0.22, 7_442.00),
    bracket(103_350.0, 197_300.0, 0.24, 15_912.00),
    bracket(197_300.0, 250_500.0, 0.32, 38_460.00),
    bracket(250_500.0, 626_350.0, 0.35, 55_484.00),
    bracket(626_350.0, f64::MAX, 0.37, 187_031.50),
];

impl FilingStatus {
    pub fn federal_brackets(self) -> &'static [FederalTaxBracket] {
        match self {
            Self::Single => &SINGLE,
            Self::MarriedFilingJointly => &MARRIED_FILING_JOINTLY,
            Self::MarriedFilingSeparately => &MARRIED_FILING_SEPARATELY,
            Self::HeadOfHousehold => &HEAD_OF_HOUSEHOLD,
        }
    }

    pub fn standard_deduction(self) -> f64 {
        match self {
            Self::Single | Self::MarriedFilingSeparately => 15_000.0,
            Self::MarriedFilingJointly => 30_000.0,
            Self::HeadOfHousehold => 22_500.0,
        }
    }

    fn additional_medicare_threshold(self) -> f64 {
        match self {
            Self::MarriedFilingJointly => ADDITIONAL_MEDICARE_THRESHOLD_JOINT,
            _ => ADDITIONAL_MEDICARE_THRESHOLD_SINGLE,
        }
    }

    fn bracket_for(self, taxable: f64) -> Option<&'static FederalTaxBracket> {
        self.federal_brackets().iter().rev().find(|b| taxable > b.min)
    }

    /// Annual federal income tax on `taxable` income.
    pub fn federal_tax(self, taxable: f64) -> f64 {
        self.bracket_for(taxable)
            .map_or(0.0, |b| b.base_tax + (taxable - b.min) * b.rate)
    }

    /// Rate of the bracket `taxable` falls in; the lowest rate at zero.
    pub fn marginal_rate(self, taxable: f64) -> f64 {
        self.bracket_for(taxable)
            .or_else(|| self.federal_brackets().first())
            .map_or(0.0, |b| b.rate)
    }
}

/// Flat income tax estimate for a two-letter state code.
pub fn estimate_state_tax_rate(state: &str) -> f64 {
    match state.trim().to_ascii_uppercase().as_str() {
        "AK" | "FL" | "NV" | "NH" | "SD" | "TN" | "TX" | "WA" | "WY" => 0.0,
        "AL" | "CT" | "MA" | "MS" => 0.050,
        "AZ" => 0.025,
        "AR" => 0.044,
        "CA" => 0.093,
        "CO" => 0.044,
        "DE" => 0.066,
        "GA" => 0.055,
        "HI" => 0.075,
        "ID" => 0.058,
        "IL" => 0.0495,
        "IN" => 0.0315,
        "IA" => 0.060,
        "KS" => 0.057,
        "KY" | "OH" => 0.040,
        "LA" | "MI" => 0.0425,
        "ME" => 0.0715,
        "MD" | "MT" | "VA" => 0.0575,
        "MN" => 0.0985,
        "MO" => 0.048,
        "NE" => 0.0564,
        "NJ" => 0.0897,
        "NM" => 0.059,
        "NY" => 0.0685,
        "NC" => 0.045,
        "ND" => 0.0195,
        "OK" => 0.0475,
        "OR" => 0.099,
        "PA" => 0.0307,
        "RI" => 0.0599,
        "SC" => 0.065,
        "UT" => 0.0465,
        "VT" => 0.0875,
        "WV" => 0.055,
        "WI" => 0.0765,
        "DC" => 0.0895,
        _ => DEFAULT_STATE_RATE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionLine {
    pub name: String,
    pub amount: f64,
    pub category: DeductionCategory,
}

/// Share of net pay routed to one direct deposit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAllocation {
    pub deposit: DirectDeposit,
    pub calculated_amount: f64,
}

/// Breakdown of a single paycheck. Rates are fractions, not percents.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckCalculation {
    pub gross_pay: f64,
    pub regular_pay: f64,
    pub overtime_pay: f64,
    pub total_pre_tax_deductions: f64,
    pub pre_tax_deduction_breakdown: Vec<DeductionLine>,
    pub federal_taxable_income: f64,
    pub federal_tax: f64,
    pub federal_marginal_rate: f64,
    pub state_tax: f64,
    pub state_tax_rate: f64,
    pub county_tax: f64,
    pub county_tax_rate: f64,
    pub social_security: f64,
    pub social_security_rate: f64,
    pub medicare: f64,
    pub medicare_rate: f64,
    pub total_taxes: f64,
    pub total_post_tax_deductions: f64,
    pub post_tax_deduction_breakdown: Vec<DeductionLine>,
    pub net_pay: f64,
    pub annualized_gross: f64,
    pub annualized_net: f64,
    pub effective_tax_rate: f64,
    pub deposit_allocations: Vec<DepositAllocation>,
    /// Net pay no deposit claimed.
    pub unallocated_amount: f64,
}

/// A year of paychecks with a given amount of overtime.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualProjection {
    pub annual_regular_pay: f64,
    pub annual_overtime_pay: f64,
    pub annual_gross_pay: f64,
    pub annual_pre_tax_deductions: f64,
    pub pre_tax_deduction_breakdown: Vec<DeductionLine>,
    pub annual_federal_taxable_income: f64,
    pub annual_federal_tax: f64,
    pub annual_state_tax: f64,
    pub annual_county_tax: f64,
    pub annual_social_security: f64,
    pub annual_medicare: f64,
    pub annual_total_taxes: f64,
    pub annual_post_tax_deductions: f64,
    pub post_tax_deduction_breakdown: Vec<DeductionLine>,
    pub annual_net_pay: f64,
    pub effective_tax_rate: f64,
    pub marginal_federal_rate: f64,
    pub overtime_hours_used: f64,
    pub per_paycheck_net: f64,
}

/// Annual state and county rates after overrides and exemptions.
struct LocalRates {
    state: f64,
    county: f64,
}

impl SalaryConfig {
    fn local_rates(&self) -> LocalRates {
        let overrides = &self.tax_overrides;
        let state = if overrides.is_exempt_from_state {
            0.0
        } else {
            overrides
                .custom_state_tax_rate
                .unwrap_or_else(|| estimate_state_tax_rate(&self.state))
        };
        let county = if overrides.is_exempt_from_local {
            0.0
        } else {
            overrides.custom_county_tax_rate.unwrap_or(0.0)
        };
        LocalRates { state, county }
    }

    /// Enabled deductions priced against `gross`, scaled by `periods`.
    fn deduction_lines(deductions: &[Deduction], gross: f64, periods: f64) -> Vec<DeductionLine> {
        deductions
            .iter()
            .filter(|d| d.is_enabled)
            .map(|d| DeductionLine {
                name: d.name.clone(),
                amount: d.amount_for(gross) * periods,
                category: d.category,
            })
            .collect()
    }

    /// Estimates one paycheck from the current settings.
    pub fn paycheck(&self) -> PaycheckCalculation {
        let periods = f64::from(self.pay_frequency.periods_per_year());
        let overrides = &self.tax_overrides;
        let regular_pay = self.hourly_rate * self.standard_hours_per_period;
        let overtime_pay = self.hourly_rate * self.overtime_multiplier * self.overtime_hours;
        let gross_pay = regular_pay + overtime_pay;

        let pre_tax = Self::deduction_lines(&self.pre_tax_deductions, gross_pay, 1.0);
        let total_pre_tax: f64 = pre_tax.iter().map(|l| l.amount).sum();

        let annual_taxable = (gross_pay - total_pre_tax) * periods;
        let federal_taxable_annual =
            (annual_taxable - self.filing_status.standard_deduction()).max(0.0);
        let federal_tax = if overrides.is_exempt_from_federal {
            0.0
        } else {
            self.filing_status.federal_tax(federal_taxable_annual) / periods
                + overrides.federal_additional_withholding
        };

        let rates = self.local_rates();
        let state_tax = if overrides.is_exempt_from_state {
            0.0
        } else {
            annual_taxable * rates.state / periods + overrides.state_additional_withholding
        };
        let county_tax = annual_taxable * rates.county / periods;

        let annualized_gross = gross_pay * periods;
        let social_security = social_security(annualized_gross) / periods;
        let medicare = medicare(annualized_gross, self.filing_status) / periods;
        let total_taxes = federal_tax + state_tax + county_tax + social_security + medicare;

        let post_tax = Self::deduction_lines(&self.post_tax_deductions, gross_pay, 1.0);
        let total_post_tax: f64 = post_tax.iter().map(|l| l.amount).sum();

        let net_pay = gross_pay - total_pre_tax - total_taxes - total_post_tax;
        let deposit_allocations = allocate_deposits(&self.direct_deposits, net_pay);
        let allocated: f64 = deposit_allocations.iter().map(|a| a.calculated_amount).sum();

        PaycheckCalculation {
            gross_pay,
            regular_pay,
            overtime_pay,
            total_pre_tax_deductions: total_pre_tax,
            pre_tax_deduction_breakdown: pre_tax,
            federal_taxable_income: federal_taxable_annual / periods,
            federal_tax,
            federal_marginal_rate: self.filing_status.marginal_rate(federal_taxable_annual),
            state_tax,
            state_tax_rate: rates.state,
            county_tax,
            county_tax_rate: rates.county,
            social_security,
            social_security_rate: SOCIAL_SECURITY_RATE,
            medicare,
            medicare_rate: MEDICARE_RATE,
            total_taxes,
            total_post_tax_deductions: total_post_tax,
            post_tax_deduction_breakdown: post_tax,
            net_pay,
            annualized_gross,
            annualized_net: net_pay * periods,
            effective_tax_rate: if gross_pay > 0.0 { total_taxes / gross_pay } else { 0.0 },
            deposit_allocations,
            unallocated_amount: net_pay - allocated,
        }
    }

    /// Projects a full year, replacing the per-period overtime with
    /// `annual_overtime_hours` spread over the year.
    pub fn annual_projection(&self, annual_overtime_hours: f64) -> AnnualProjection {
        let periods = f64::from(self.pay_frequency.periods_per_year());
        let overrides = &self.tax_overrides;
        let annual_regular_pay = self.hourly_rate * self.standard_hours_per_period * periods;
        let annual_overtime_pay =
            self.hourly_rate * self.overtime_multiplier * annual_overtime_hours;
        let annual_gross = annual_regular_pay + annual_overtime_pay;
        let per_period_gross = annual_gross / periods;

        let pre_tax = Self::deduction_lines(&self.pre_tax_deductions, per_period_gross, periods);
        let annual_pre_tax: f64 = pre_tax.iter().map(|l| l.amount).sum();

        let annual_taxable = annual_gross - annual_pre_tax;
        let federal_taxable =
            (annual_taxable - self.filing_status.standard_deduction()).max(0.0);
        let annual_federal_tax = if overrides.is_exempt_from_federal {
            0.0
        } else {
            self.filing_status.federal_tax(federal_taxable)
                + overrides.federal_additional_withholding * periods
        };

        let rates = self.local_rates();
        let annual_state_tax = if overrides.is_exempt_from_state {
            0.0
        } else {
            annual_taxable * rates.state + overrides.state_additional_withholding * periods
        };
        let annual_county_tax = annual_taxable * rates.county;
        let annual_social_security = social_security(annual_gross);
        let annual_medicare = medicare(annual_gross, self.filing_status);
        let annual_total_taxes = annual_federal_tax
            + annual_state_tax
            + annual_county_tax
            + annual_social_security
            + annual_medicare;

        let post_tax = Self::deduction_lines(&self.post_tax_deductions, per_period_gross, periods);
        let annual_post_tax: f64 = post_tax.iter().map(|l| l.amount).sum();
        let annual_net = annual_gross - annual_pre_tax - annual_total_taxes - annual_post_tax;

        AnnualProjection {
            annual_regular_pay,
            annual_overtime_pay,
            annual_gross_pay: annual_gross,
            annual_pre_tax_deductions: annual_pre_tax,
            pre_tax_deduction_breakdown: pre_tax,
            annual_federal_taxable_income: federal_taxable,
            annual_federal_tax,
            annual_state_tax,
            annual_county_tax,
            annual_social_security,
            annual_medicare,
            annual_total_taxes,
            annual_post_tax_deductions: annual_post_tax,
            post_tax_deduction_breakdown: post_tax,
            annual_net_pay: annual_net,
            effective_tax_rate: if annual_gross > 0.0 { annual_total_taxes / annual_gross } else { 0.0 },
            marginal_federal_rate: self.filing_status.marginal_rate(federal_taxable),
            overtime_hours_used: annual_overtime_hours,
            per_paycheck_net: annual_net / periods,
        }
    }
}

fn social_security(annual_gross: f64) -> f64 {
    annual_gross.min(SOCIAL_SECURITY_WAGE_BASE) * SOCIAL_SECURITY_RATE
}

fn medicare(annual_gross: f64, status: FilingStatus) -> f64 {
    let threshold = status.additional_medicare_threshold();
    let additional = if annual_gross > threshold {
        (annual_gross - threshold) * ADDITIONAL_MEDICARE_RATE
    } else {
        0.0
    };
    annual_gross * MEDICARE_RATE + additional
}

/// Splits `net_pay` across deposits in `sort_order`. Fixed and percentage
/// deposits are capped at what is left; the first remainder deposit takes
/// the rest.
fn allocate_deposits(deposits: &[DirectDeposit], net_pay: f64) -> Vec<DepositAllocation> {
    let mut sorted: Vec<&DirectDeposit> = deposits.iter().collect();
    sorted.sort_by_key(|d| d.sort_order);

    let mut remaining = net_pay;
    let mut allocations: Vec<DepositAllocation> = sorted
        .iter()
        .filter(|d| !d.is_remainder)
        .map(|d| {
            let wanted = if d.is_percentage { net_pay * d.amount / 100.0 } else { d.amount };
            let allocated = wanted.min(remaining).max(0.0);
            remaining -= allocated;
            DepositAllocation {
                deposit: (*d).clone(),
                calculated_amount: allocated,
            }
        })
        .collect();

    if let Some(remainder) = sorted.iter().find(|d| d.is_remainder) {
        allocations.push(DepositAllocation {
            deposit: (*remainder).clone(),
            calculated_amount: remaining.max(0.0),
        });
    }
    allocations.sort_by_key(|a| a.deposit.sort_order);
    allocations
}
