mod engine;
mod format;
mod input;
mod report;
mod types;

pub use engine::{
    LIFE_EXPECTANCY_AGE, MAX_TRACE_YEARS, monthly_contribution, monthly_rate, run_projection,
    run_yearly_trace,
};
pub use format::{format_currency, format_money_field, format_number_input, format_percentage};
pub use input::{FormFields, InputError, parse_age_input, parse_decimal_input, parse_money_input};
pub use report::{
    ResultCard, ResultReport, build_report, contribution_preview, render_trace_table,
};
pub use types::{Phase, SimulationInput, SimulationResult, YearTracePoint};
