use serde::{Deserialize, Serialize};

/// Parameters of a single projection. Money fields are in currency units,
/// percentages on the 0-100 scale, ages in whole years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationInput {
    pub monthly_income: f64,
    pub current_investments: f64,
    pub target_patrimony: f64,
    pub invest_percentage: f64,
    pub current_age: i32,
    pub retirement_age: i32,
    pub annual_return: f64,
    pub monthly_spending_retirement: f64,
}

impl SimulationInput {
    /// Starting values shown by the form before the user edits anything.
    pub fn initial() -> Self {
        Self {
            monthly_income: 10_000.0,
            current_investments: 20_000.0,
            target_patrimony: 1_000_000.0,
            invest_percentage: 20.0,
            current_age: 30,
            retirement_age: 65,
            annual_return: 10.0,
            monthly_spending_retirement: 5_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub total_accumulated: f64,
    pub monthly_contribution: f64,
    pub months_to_retirement: u64,
    pub sustainable_monthly_spending: f64,
    pub heritage: f64,
    pub is_goal_met: bool,
    pub surplus: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulation,
    Retirement,
}

/// One year of the month-by-month path behind a projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTracePoint {
    pub age: i64,
    pub phase: Phase,
    pub months: u32,
    pub contributions: f64,
    pub withdrawals: f64,
    pub growth: f64,
    pub end_balance: f64,
}
