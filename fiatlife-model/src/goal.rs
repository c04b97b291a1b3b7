use crate::Versioned;
use serde::{Deserialize, Serialize};

/// A savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialGoal {
    pub id: String,
    pub name: String,
    pub category: GoalCategory,
    pub target_amount: f64,
    pub current_amount: f64,
    pub monthly_contribution: f64,
    pub target_date: Option<i64>,
    pub notes: String,
    /// Hex color, `#RRGGBB`.
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Default for FinancialGoal {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            category: GoalCategory::default(),
            target_amount: 0.0,
            current_amount: 0.0,
            monthly_contribution: 0.0,
            target_date: None,
            notes: String::new(),
            color: "#4CAF50".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }
}

impl FinancialGoal {
    /// Percent of the target reached, clamped to `0.0..=100.0`.
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount > 0.0 {
            (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn remaining_amount(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Months of contributions left, if contributing toward an unmet target.
    pub fn months_remaining(&self) -> Option<u32> {
        let remaining = self.remaining_amount();
        if self.monthly_contribution > 0.0 && remaining > 0.0 {
            Some((remaining / self.monthly_contribution).ceil() as u32)
        } else {
            None
        }
    }
}

impl Versioned for FinancialGoal {
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
    pub enum GoalCategory {
        EmergencyFund => "EMERGENCY_FUND",
        Retirement => "RETIREMENT",
        HouseDownPayment => "HOUSE_DOWN_PAYMENT",
        CarPurchase => "CAR_PURCHASE",
        Vacation => "VACATION",
        Wedding => "WEDDING",
        Education => "EDUCATION",
        DebtPayoff => "DEBT_PAYOFF",
        #[default]
        GeneralSavings => "GENERAL_SAVINGS",
        Investment => "INVESTMENT",
        HomeImprovement => "HOME_IMPROVEMENT",
        Medical => "MEDICAL",
        Other => "OTHER",
    }
}

impl GoalCategory {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::EmergencyFund => "Emergency Fund",
            Self::Retirement => "Retirement",
            Self::HouseDownPayment => "House Down Payment",
            Self::CarPurchase => "New Car",
            Self::Vacation => "Trip/Vacation",
            Self::Wedding => "Wedding",
            Self::Education => "Education",
            Self::DebtPayoff => "Debt Payoff",
            Self::GeneralSavings => "Cash Savings",
            Self::Investment => "Investment",
            Self::HomeImprovement => "Home Improvement",
            Self::Medical => "Medical",
            Self::Other => "Other",
        }
    }

    pub fn suggested_color(self) -> &'static str {
        match self {
            Self::EmergencyFund | Self::Medical => "#F44336",
            Self::Retirement => "#9C27B0",
            Self::HouseDownPayment => "#2196F3",
            Self::CarPurchase => "#FF9800",
            Self::Vacation => "#00BCD4",
            Self::Wedding => "#E91E63",
            Self::Education => "#3F51B5",
            Self::DebtPayoff => "#795548",
            Self::GeneralSavings => "#4CAF50",
            Self::Investment => "#009688",
            Self::HomeImprovement => "#607D8B",
            Self::Other => "#9E9E9E",
        }
    }
}
