use fiatlife_model::{
    estimate_state_tax_rate, prepare_for_save, AccountType, Bill, BillCategory, BillFrequency,
    BillWithSource, CreditAccount, CreditAccountType, CreditCardMinPaymentType, Deduction,
    DeductionCategory, DeductionType, DirectDeposit, FilingStatus, FinancialGoal, GoalCategory,
    ModelError, PayFrequency, SalaryConfig, TaxOverrides,
};
use pretty_assertions::assert_eq;

// ── JSON shape ───────────────────────────────────────────────────

#[test]
fn bill_serializes_camel_case_with_wire_enum_names() {
    let bill = Bill {
        id: "b1".into(),
        name: "Rent".into(),
        amount: 1500.0,
        category: BillCategory::MortgageRent,
        frequency: BillFrequency::Monthly,
        due_day: 3,
        auto_pay: true,
        ..Bill::default()
    };
    let json = serde_json::to_value(&bill).unwrap();
    assert_eq!(json["category"], "MORTGAGE_RENT");
    assert_eq!(json["frequency"], "MONTHLY");
    assert_eq!(json["dueDay"], 3);
    assert_eq!(json["autoPay"], true);
    assert_eq!(json["lastPaidDate"], serde_json::Value::Null);
}

#[test]
fn unknown_keys_are_ignored_and_missing_keys_default() {
    let bill: Bill = serde_json::from_str(r#"{"id":"x","name":"Gym","somethingNew":42}"#).unwrap();
    assert_eq!(bill.id, "x");
    assert_eq!(bill.due_day, 1);
    assert_eq!(bill.category, BillCategory::Other);
    assert_eq!(bill.frequency, BillFrequency::Monthly);

    let goal: FinancialGoal = serde_json::from_str("{}").unwrap();
    assert_eq!(goal.color, "#4CAF50");
    assert_eq!(goal.category, GoalCategory::GeneralSavings);

    let salary: SalaryConfig = serde_json::from_str(r#"{"hourlyRate":25.0}"#).unwrap();
    assert_eq!(salary.name, "My Salary");
    assert_eq!(salary.standard_hours_per_period, 80.0);
    assert_eq!(salary.overtime_multiplier, 1.5);
    assert_eq!(salary.pay_frequency, PayFrequency::Biweekly);
}

#[test]
fn credit_account_type_field_is_named_type() {
    let json = r#"{"id":"c1","type":"CREDIT_CARD","currentBalance":500.0}"#;
    let account: CreditAccount = serde_json::from_str(json).unwrap();
    assert_eq!(account.account_type, CreditAccountType::CreditCard);
    assert_eq!(account.minimum_payment_value, 2.0);

    let back = serde_json::to_value(&account).unwrap();
    assert_eq!(back["type"], "CREDIT_CARD");
}

#[test]
fn deduction_defaults_to_enabled() {
    let d: Deduction = serde_json::from_str(r#"{"name":"HSA","category":"HSA"}"#).unwrap();
    assert!(d.is_enabled);
    assert_eq!(d.deduction_type, DeductionType::PreTax);
}

// ── Enum names ───────────────────────────────────────────────────

#[test]
fn enum_names_parse_and_display() {
    assert_eq!("CAR_LOAN".parse::<CreditAccountType>().unwrap(), CreditAccountType::CarLoan);
    assert_eq!(BillCategory::GymFitness.to_string(), "GYM_FITNESS");
    assert_eq!(BillCategory::ALL.len(), 22);
    assert_eq!(GoalCategory::ALL.len(), 13);
    for category in BillCategory::ALL {
        assert_eq!(category.as_str().parse::<BillCategory>().unwrap(), *category);
    }
}

#[test]
fn unknown_enum_name_is_an_error() {
    let err = "YEARLY".parse::<BillFrequency>().unwrap_err();
    assert!(matches!(err, ModelError::UnknownVariant { kind: "BillFrequency", .. }));
    assert!(serde_json::from_str::<Bill>(r#"{"frequency":"YEARLY"}"#).is_err());
}

#[test]
fn enum_defaults_follow_marked_variant() {
    assert_eq!(PayFrequency::default(), PayFrequency::Biweekly);
    assert_eq!(FilingStatus::default(), FilingStatus::Single);
    assert_eq!(AccountType::default(), AccountType::Checking);
    assert_eq!(GoalCategory::default(), GoalCategory::GeneralSavings);
    assert_eq!(
        CreditCardMinPaymentType::default(),
        CreditCardMinPaymentType::PercentOfBalance
    );

    let deposit: DirectDeposit = serde_json::from_str("{}").unwrap();
    assert_eq!(deposit.account_type, AccountType::Checking);
    let salary: SalaryConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(salary.pay_frequency, PayFrequency::Biweekly);
    assert_eq!(salary.filing_status, FilingStatus::Single);
}

// ── Derived values ───────────────────────────────────────────────

#[test]
fn bill_normalizes_to_monthly() {
    let weekly = Bill { amount: 12.0, frequency: BillFrequency::Weekly, ..Bill::default() };
    assert_eq!(weekly.annual_amount(), 624.0);
    assert_eq!(weekly.monthly_amount(), 52.0);

    let quarterly = Bill { amount: 300.0, frequency: BillFrequency::Quarterly, ..Bill::default() };
    assert_eq!(quarterly.monthly_amount(), 100.0);
}

#[test]
fn goal_progress_is_clamped() {
    let mut goal = FinancialGoal { target_amount: 1000.0, current_amount: 250.0, ..FinancialGoal::default() };
    assert_eq!(goal.progress_percent(), 25.0);
    assert_eq!(goal.remaining_amount(), 750.0);
    assert!(!goal.is_complete());

    goal.current_amount = 1500.0;
    assert_eq!(goal.progress_percent(), 100.0);
    assert_eq!(goal.remaining_amount(), 0.0);
    assert!(goal.is_complete());

    goal.target_amount = 0.0;
    assert_eq!(goal.progress_percent(), 0.0);
}

#[test]
fn goal_months_remaining() {
    let goal = FinancialGoal {
        target_amount: 1000.0,
        current_amount: 100.0,
        monthly_contribution: 200.0,
        ..FinancialGoal::default()
    };
    assert_eq!(goal.months_remaining(), Some(5));

    let idle = FinancialGoal { monthly_contribution: 0.0, ..goal };
    assert_eq!(idle.months_remaining(), None);
}

#[test]
fn credit_minimum_due_by_type() {
    let mut card = CreditAccount {
        account_type: CreditAccountType::CreditCard,
        current_balance: 1000.0,
        credit_limit: 4000.0,
        ..CreditAccount::default()
    };
    assert_eq!(card.minimum_due(), 20.0);
    assert_eq!(card.effective_monthly_payment(), 20.0);
    assert_eq!(card.utilization_percent(), Some(25.0));

    card.minimum_payment_type = CreditCardMinPaymentType::Fixed;
    card.minimum_payment_value = 35.0;
    assert_eq!(card.minimum_due(), 35.0);

    card.minimum_payment_type = CreditCardMinPaymentType::FullBalance;
    assert_eq!(card.minimum_due(), 1000.0);

    card.current_balance = 0.0;
    assert_eq!(card.effective_monthly_payment(), 0.0);
}

#[test]
fn amortizing_loan_uses_fixed_payment() {
    let loan = CreditAccount {
        account_type: CreditAccountType::Mortgage,
        current_balance: 200_000.0,
        monthly_payment_amount: Some(1450.0),
        ..CreditAccount::default()
    };
    assert_eq!(loan.effective_monthly_payment(), 1450.0);
    assert_eq!(loan.utilization_percent(), None);
}

#[test]
fn salary_gross_includes_overtime() {
    let salary = SalaryConfig {
        hourly_rate: 20.0,
        overtime_hours: 10.0,
        pay_frequency: PayFrequency::Weekly,
        standard_hours_per_period: 40.0,
        ..SalaryConfig::default()
    };
    assert_eq!(salary.gross_per_period(), 800.0 + 300.0);
    assert_eq!(salary.annual_gross(), 1100.0 * 52.0);
}

#[test]
fn salary_deduction_totals_skip_disabled() {
    let salary = SalaryConfig {
        hourly_rate: 10.0,
        pre_tax_deductions: vec![
            Deduction { amount: 5.0, is_percentage: true, ..Deduction::default() },
            Deduction { amount: 100.0, is_enabled: false, ..Deduction::default() },
        ],
        post_tax_deductions: vec![Deduction { amount: 12.5, ..Deduction::default() }],
        ..SalaryConfig::default()
    };
    assert_eq!(salary.pre_tax_total(), 40.0);
    assert_eq!(salary.post_tax_total(), 12.5);
}

#[test]
fn deduction_category_default_type() {
    assert_eq!(DeductionCategory::Traditional401k.default_type(), DeductionType::PreTax);
    assert_eq!(DeductionCategory::Roth401k.default_type(), DeductionType::PostTax);
    assert_eq!(DeductionCategory::UnionDues.default_type(), DeductionType::PostTax);
}

// ── Save stamping ────────────────────────────────────────────────

#[test]
fn prepare_for_save_assigns_identity_once() {
    let fresh = prepare_for_save(Bill::default(), || "new-id".to_string(), 1_000);
    assert_eq!(fresh.id, "new-id");
    assert_eq!(fresh.created_at, 1_000);
    assert_eq!(fresh.updated_at, 1_000);

    let edited = prepare_for_save(fresh, || unreachable!(), 2_000);
    assert_eq!(edited.id, "new-id");
    assert_eq!(edited.created_at, 1_000);
    assert_eq!(edited.updated_at, 2_000);
}

#[test]
fn native_bill_with_source() {
    let wrapped = BillWithSource::native(Bill { id: "b9".into(), ..Bill::default() });
    assert_eq!(wrapped.id(), "b9");
    assert!(!wrapped.is_cypherlog());
    assert!(wrapped.preserved_tags.is_none());
}

// ── Paycheck ─────────────────────────────────────────────────────

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// $50/h, 80 h biweekly, single, no state income tax.
fn texas_salary() -> SalaryConfig {
    SalaryConfig {
        hourly_rate: 50.0,
        state: "TX".into(),
        ..SalaryConfig::default()
    }
}

fn deposit(name: &str, amount: f64, sort_order: i32) -> DirectDeposit {
    DirectDeposit {
        id: name.into(),
        account_name: name.into(),
        amount,
        sort_order,
        ..DirectDeposit::default()
    }
}

#[test]
fn federal_tax_walks_brackets() {
    let single = FilingStatus::Single;
    assert_close(single.federal_tax(0.0), 0.0);
    assert_close(single.federal_tax(11_925.0), 1_192.5);
    assert_close(single.federal_tax(89_000.0), 14_494.0);
    assert_close(single.marginal_rate(0.0), 0.10);
    assert_close(single.marginal_rate(89_000.0), 0.22);
    assert_close(FilingStatus::MarriedFilingJointly.standard_deduction(), 30_000.0);
    assert_close(FilingStatus::HeadOfHousehold.standard_deduction(), 22_500.0);
}

#[test]
fn state_rate_estimate() {
    assert_close(estimate_state_tax_rate("ca"), 0.093);
    assert_close(estimate_state_tax_rate("TX"), 0.0);
    assert_close(estimate_state_tax_rate("ZZ"), 0.05);
    assert_close(estimate_state_tax_rate(""), 0.05);
}

#[test]
fn paycheck_for_plain_hourly_salary() {
    let pay = texas_salary().paycheck();
    assert_close(pay.gross_pay, 4_000.0);
    assert_close(pay.overtime_pay, 0.0);
    assert_close(pay.federal_taxable_income, 89_000.0 / 26.0);
    assert_close(pay.federal_tax, 14_494.0 / 26.0);
    assert_close(pay.federal_marginal_rate, 0.22);
    assert_close(pay.state_tax, 0.0);
    assert_close(pay.social_security, 248.0);
    assert_close(pay.medicare, 58.0);
    assert_close(pay.net_pay, 4_000.0 - 14_494.0 / 26.0 - 306.0);
    assert_close(pay.annualized_gross, 104_000.0);
    assert_close(pay.effective_tax_rate, pay.total_taxes / 4_000.0);
    assert!(pay.deposit_allocations.is_empty());
    assert_close(pay.unallocated_amount, pay.net_pay);
}

#[test]
fn paycheck_applies_deductions_and_overrides() {
    let config = SalaryConfig {
        pre_tax_deductions: vec![
            Deduction {
                name: "401k".into(),
                amount: 10.0,
                is_percentage: true,
                category: DeductionCategory::Traditional401k,
                ..Deduction::default()
            },
            Deduction {
                name: "Paused".into(),
                amount: 999.0,
                is_enabled: false,
                ..Deduction::default()
            },
        ],
        post_tax_deductions: vec![Deduction {
            name: "Dues".into(),
            amount: 25.0,
            category: DeductionCategory::UnionDues,
            ..Deduction::default()
        }],
        tax_overrides: TaxOverrides {
            state_additional_withholding: 10.0,
            custom_state_tax_rate: Some(0.05),
            custom_county_tax_rate: Some(0.01),
            ..TaxOverrides::default()
        },
        ..texas_salary()
    };
    let pay = config.paycheck();

    assert_eq!(pay.pre_tax_deduction_breakdown.len(), 1);
    assert_close(pay.total_pre_tax_deductions, 400.0);
    assert_close(pay.federal_tax, 12_206.0 / 26.0);
    assert_close(pay.state_tax_rate, 0.05);
    assert_close(pay.state_tax, 190.0);
    assert_close(pay.county_tax, 36.0);
    // FICA is on gross, before pre-tax deductions.
    assert_close(pay.social_security, 248.0);
    assert_close(pay.total_post_tax_deductions, 25.0);
    assert_close(
        pay.net_pay,
        4_000.0 - 400.0 - pay.total_taxes - 25.0,
    );
}

#[test]
fn exemptions_zero_income_taxes_but_not_fica() {
    let config = SalaryConfig {
        state: "CA".into(),
        tax_overrides: TaxOverrides {
            federal_additional_withholding: 50.0,
            is_exempt_from_federal: true,
            is_exempt_from_state: true,
            is_exempt_from_local: true,
            custom_county_tax_rate: Some(0.02),
            ..TaxOverrides::default()
        },
        ..texas_salary()
    };
    let pay = config.paycheck();
    assert_close(pay.federal_tax, 0.0);
    assert_close(pay.state_tax, 0.0);
    assert_close(pay.state_tax_rate, 0.0);
    assert_close(pay.county_tax, 0.0);
    assert_close(pay.total_taxes, 306.0);
}

#[test]
fn high_earner_pays_additional_medicare() {
    let single = SalaryConfig {
        hourly_rate: 150.0,
        ..texas_salary()
    };
    let pay = single.paycheck();
    assert_close(pay.social_security, 176_100.0 * 0.062 / 26.0);
    assert_close(pay.medicare, (312_000.0 * 0.0145 + 112_000.0 * 0.009) / 26.0);

    let joint = SalaryConfig {
        filing_status: FilingStatus::MarriedFilingJointly,
        ..single
    };
    assert_close(
        joint.paycheck().medicare,
        (312_000.0 * 0.0145 + 62_000.0 * 0.009) / 26.0,
    );
}

#[test]
fn deposits_fill_in_sort_order_with_remainder_last() {
    let mut invest = deposit("Invest", 10.0, 1);
    invest.is_percentage = true;
    let mut checking = deposit("Checking", 0.0, 2);
    checking.is_remainder = true;
    let config = SalaryConfig {
        direct_deposits: vec![checking, invest, deposit("Savings", 500.0, 0)],
        ..texas_salary()
    };
    let pay = config.paycheck();

    let names: Vec<&str> = pay
        .deposit_allocations
        .iter()
        .map(|a| a.deposit.account_name.as_str())
        .collect();
    assert_eq!(names, vec!["Savings", "Invest", "Checking"]);
    assert_close(pay.deposit_allocations[0].calculated_amount, 500.0);
    assert_close(pay.deposit_allocations[1].calculated_amount, pay.net_pay * 0.1);
    assert_close(
        pay.deposit_allocations[2].calculated_amount,
        pay.net_pay * 0.9 - 500.0,
    );
    assert_close(pay.unallocated_amount, 0.0);
}

#[test]
fn fixed_deposits_are_capped_at_net_pay() {
    let config = SalaryConfig {
        direct_deposits: vec![deposit("Big", 10_000.0, 0), deposit("Late", 100.0, 1)],
        ..texas_salary()
    };
    let pay = config.paycheck();
    assert_close(pay.deposit_allocations[0].calculated_amount, pay.net_pay);
    assert_close(pay.deposit_allocations[1].calculated_amount, 0.0);
    assert_close(pay.unallocated_amount, 0.0);

    let partial = SalaryConfig {
        direct_deposits: vec![deposit("Savings", 500.0, 0)],
        ..texas_salary()
    }
    .paycheck();
    assert_close(partial.unallocated_amount, partial.net_pay - 500.0);
}

#[test]
fn annual_projection_matches_paychecks_without_overtime() {
    let config = texas_salary();
    let pay = config.paycheck();
    let year = config.annual_projection(0.0);
    assert_close(year.annual_gross_pay, 104_000.0);
    assert_close(year.annual_federal_tax, 14_494.0);
    assert_close(year.annual_net_pay, pay.annualized_net);
    assert_close(year.per_paycheck_net, pay.net_pay);
    assert_close(year.marginal_federal_rate, 0.22);
}

#[test]
fn annual_projection_adds_overtime() {
    let year = texas_salary().annual_projection(100.0);
    assert_close(year.annual_regular_pay, 104_000.0);
    assert_close(year.annual_overtime_pay, 7_500.0);
    assert_close(year.annual_gross_pay, 111_500.0);
    assert_close(year.overtime_hours_used, 100.0);
    assert_close(year.annual_federal_taxable_income, 96_500.0);
    assert_close(
        year.annual_federal_tax,
        5_578.5 + (96_500.0 - 48_475.0) * 0.22,
    );
}

#[test]
fn paycheck_serializes_camel_case() {
    let json = serde_json::to_value(texas_salary().paycheck()).unwrap();
    assert_eq!(json["grossPay"], 4_000.0);
    assert!(json.get("unallocatedAmount").is_some());
}
