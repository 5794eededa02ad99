use super::types::{Phase, SimulationInput, SimulationResult, YearTracePoint};

/// Age at which the drawdown simulation ends.
pub const LIFE_EXPECTANCY_AGE: i32 = 72;

const MONTHS_PER_YEAR: u64 = 12;

/// Upper bound on the rows [`run_yearly_trace`] emits per phase.
pub const MAX_TRACE_YEARS: u64 = 200;

/// Effective monthly rate equivalent to a nominal annual return in percent.
pub fn monthly_rate(annual_return: f64) -> f64 {
    (1.0 + annual_return / 100.0).powf(1.0 / 12.0) - 1.0
}

pub fn monthly_contribution(monthly_income: f64, invest_percentage: f64) -> f64 {
    monthly_income * (invest_percentage / 100.0)
}

pub fn run_projection(inputs: &SimulationInput) -> SimulationResult {
    let months_to_invest = months_between(inputs.current_age, inputs.retirement_age);
    let rate = monthly_rate(inputs.annual_return);
    let contribution = monthly_contribution(inputs.monthly_income, inputs.invest_percentage);

    let fv_initial = inputs.current_investments * (1.0 + rate).powf(months_to_invest as f64);
    let fv_contributions = future_value_of_contributions(contribution, rate, months_to_invest);
    let total_accumulated = fv_initial + fv_contributions;

    // Perpetuity: spending only the monthly yield leaves the principal intact.
    let sustainable_monthly_spending = total_accumulated * rate;

    let months_in_retirement = months_between(inputs.retirement_age, LIFE_EXPECTANCY_AGE);
    let heritage = run_drawdown(
        total_accumulated,
        rate,
        inputs.monthly_spending_retirement,
        months_in_retirement,
    );

    SimulationResult {
        total_accumulated,
        monthly_contribution: contribution,
        months_to_retirement: months_to_invest,
        sustainable_monthly_spending,
        heritage,
        is_goal_met: total_accumulated >= inputs.target_patrimony,
        surplus: total_accumulated - inputs.target_patrimony,
    }
}

/// Year-by-year path of the projection: accumulation rows up to the
/// retirement age, then drawdown rows up to [`LIFE_EXPECTANCY_AGE`]. The
/// drawdown starts from the closed-form total of [`run_projection`] and
/// steps exactly like it, so the last drawdown row ends on the heritage.
///
/// Each phase emits at most [`MAX_TRACE_YEARS`] rows. Drawdown rows stop
/// after the year the balance runs out or stops moving.
pub fn run_yearly_trace(inputs: &SimulationInput) -> Vec<YearTracePoint> {
    let rate = monthly_rate(inputs.annual_return);
    let contribution = monthly_contribution(inputs.monthly_income, inputs.invest_percentage);
    let accumulation_years = (months_between(inputs.current_age, inputs.retirement_age)
        / MONTHS_PER_YEAR)
        .min(MAX_TRACE_YEARS);
    let retirement_years = (months_between(inputs.retirement_age, LIFE_EXPECTANCY_AGE)
        / MONTHS_PER_YEAR)
        .min(MAX_TRACE_YEARS);

    let mut rows = Vec::new();

    let mut lump = inputs.current_investments;
    let mut deposits = 0.0;
    for year in 0..accumulation_years {
        let start = lump + deposits;
        for _ in 0..MONTHS_PER_YEAR {
            lump *= 1.0 + rate;
            deposits = if rate > 0.0 {
                deposits * (1.0 + rate) + contribution
            } else {
                deposits + contribution
            };
        }
        let end = lump + deposits;
        let contributions = contribution * MONTHS_PER_YEAR as f64;
        rows.push(YearTracePoint {
            age: i64::from(inputs.current_age) + year as i64,
            phase: Phase::Accumulation,
            months: MONTHS_PER_YEAR as u32,
            contributions,
            withdrawals: 0.0,
            growth: end - start - contributions,
            end_balance: end,
        });
    }

    let spending = inputs.monthly_spending_retirement;
    let mut balance = run_projection(inputs).total_accumulated;
    for year in 0..retirement_years {
        let mut growth = 0.0;
        let mut withdrawals = 0.0;
        let mut months = 0;
        let mut exhausted = false;
        let mut settled = false;
        for _ in 0..MONTHS_PER_YEAR {
            let interest = balance * rate;
            growth += interest;
            months += 1;
            match drawdown_step(balance, rate, spending) {
                Some(next) => {
                    withdrawals += spending;
                    settled |= next == balance;
                    balance = next;
                }
                None => {
                    // The last month takes whatever is left.
                    withdrawals += (balance + interest).max(0.0);
                    balance = 0.0;
                    exhausted = true;
                    break;
                }
            }
        }
        rows.push(YearTracePoint {
            age: i64::from(inputs.retirement_age) + year as i64,
            phase: Phase::Retirement,
            months,
            contributions: 0.0,
            withdrawals,
            growth,
            end_balance: balance,
        });
        if exhausted || settled {
            break;
        }
    }

    rows
}

fn months_between(from_age: i32, to_age: i32) -> u64 {
    let years = (i64::from(to_age) - i64::from(from_age)).max(0);
    years.unsigned_abs() * MONTHS_PER_YEAR
}

/// Ordinary annuity with deposits at the end of each month. Non-positive
/// rates fall back to the plain sum of deposits.
fn future_value_of_contributions(contribution: f64, rate: f64, months: u64) -> f64 {
    if rate > 0.0 {
        contribution * (((1.0 + rate).powf(months as f64) - 1.0) / rate)
    } else {
        contribution * months as f64
    }
}

/// One month of retirement. `None` once the balance would go negative.
fn drawdown_step(balance: f64, rate: f64, spending: f64) -> Option<f64> {
    let interest = balance * rate;
    let next = balance + interest - spending;
    // NaN fails this comparison as well.
    if next >= 0.0 { Some(next) } else { None }
}

fn run_drawdown(start: f64, rate: f64, spending: f64, months: u64) -> f64 {
    let mut balance = start;
    for _ in 0..months {
        match drawdown_step(balance, rate, spending) {
            // Fixed point: the remaining months cannot change the balance.
            Some(next) if next == balance => break,
            Some(next) => balance = next,
            None => return 0.0,
        }
    }
    balance
}
