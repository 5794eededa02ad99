use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::format_money_field;
use super::types::SimulationInput;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("{field}: '{value}' is not a valid number")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field}: '{value}' is not a whole number of years")]
    InvalidAge { field: &'static str, value: String },
}

/// Reads a masked money field. Every keystroke that is not a digit is
/// dropped and the remaining digits are taken as cents, so `"10.000,00"`
/// and `"1000000"` both read as `10000.0`.
pub fn parse_money_input(text: &str) -> f64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0.0;
    }
    digits.parse::<f64>().map_or(0.0, |cents| cents / 100.0)
}

/// Percentages and rates. Blank reads as zero; either `.` or `,` may mark
/// the decimals (with `,` present, dots are thousands separators).
pub fn parse_decimal_input(field: &'static str, text: &str) -> Result<f64, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::InvalidNumber {
            field,
            value: text.to_string(),
        }),
    }
}

pub fn parse_age_input(field: &'static str, text: &str) -> Result<i32, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse::<i32>().map_err(|_| InputError::InvalidAge {
        field,
        value: text.to_string(),
    })
}

/// Raw text of the eight form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormFields {
    pub monthly_income: String,
    pub current_investments: String,
    pub target_patrimony: String,
    pub invest_percentage: String,
    pub current_age: String,
    pub retirement_age: String,
    pub annual_return: String,
    pub monthly_spending_retirement: String,
}

impl FormFields {
    /// What the form shows for `input`: money fields masked, zeros blank.
    pub fn from_input(input: &SimulationInput) -> Self {
        Self {
            monthly_income: format_money_field(input.monthly_income),
            current_investments: format_money_field(input.current_investments),
            target_patrimony: format_money_field(input.target_patrimony),
            invest_percentage: plain_field(input.invest_percentage),
            current_age: age_field(input.current_age),
            retirement_age: age_field(input.retirement_age),
            annual_return: plain_field(input.annual_return),
            monthly_spending_retirement: format_money_field(input.monthly_spending_retirement),
        }
    }

    pub fn parse(&self) -> Result<SimulationInput, InputError> {
        Ok(SimulationInput {
            monthly_income: parse_money_input(&self.monthly_income),
            current_investments: parse_money_input(&self.current_investments),
            target_patrimony: parse_money_input(&self.target_patrimony),
            invest_percentage: parse_decimal_input("investPercentage", &self.invest_percentage)?,
            current_age: parse_age_input("currentAge", &self.current_age)?,
            retirement_age: parse_age_input("retirementAge", &self.retirement_age)?,
            annual_return: parse_decimal_input("annualReturn", &self.annual_return)?,
            monthly_spending_retirement: parse_money_input(&self.monthly_spending_retirement),
        })
    }
}

fn plain_field(value: f64) -> String {
    if value == 0.0 {
        String::new()
    } else {
        value.to_string()
    }
}

fn age_field(age: i32) -> String {
    if age == 0 { String::new() } else { age.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_input_treats_digits_as_cents() {
        assert_eq!(parse_money_input("10.000,00"), 10_000.0);
        assert_eq!(parse_money_input("1000000"), 10_000.0);
        assert_eq!(parse_money_input("R$ 1,5"), 0.15);
        assert_eq!(parse_money_input("7"), 0.07);
    }

    #[test]
    fn money_input_without_digits_is_zero() {
        assert_eq!(parse_money_input(""), 0.0);
        assert_eq!(parse_money_input("R$ ,"), 0.0);
        assert_eq!(parse_money_input("abc"), 0.0);
    }

    #[test]
    fn money_input_ignores_minus_sign() {
        assert_eq!(parse_money_input("-12,34"), 12.34);
    }

    #[test]
    fn decimal_input_accepts_both_separators() {
        assert_eq!(parse_decimal_input("annualReturn", "10"), Ok(10.0));
        assert_eq!(parse_decimal_input("annualReturn", "7.5"), Ok(7.5));
        assert_eq!(parse_decimal_input("annualReturn", "7,5"), Ok(7.5));
        assert_eq!(parse_decimal_input("annualReturn", "1.234,5"), Ok(1234.5));
        assert_eq!(parse_decimal_input("annualReturn", "  "), Ok(0.0));
        assert_eq!(parse_decimal_input("annualReturn", "-2"), Ok(-2.0));
    }

    #[test]
    fn decimal_input_rejects_garbage_and_non_finite() {
        let err = parse_decimal_input("investPercentage", "vinte").expect_err("must reject text");
        assert_eq!(
            err,
            InputError::InvalidNumber {
                field: "investPercentage",
                value: "vinte".to_string()
            }
        );
        assert!(parse_decimal_input("annualReturn", "NaN").is_err());
        assert!(parse_decimal_input("annualReturn", "inf").is_err());
        assert!(err.to_string().contains("investPercentage"));
    }

    #[test]
    fn age_input_requires_whole_years() {
        assert_eq!(parse_age_input("currentAge", "30"), Ok(30));
        assert_eq!(parse_age_input("currentAge", ""), Ok(0));
        assert_eq!(parse_age_input("currentAge", "-4"), Ok(-4));
        assert!(matches!(
            parse_age_input("currentAge", "30.5"),
            Err(InputError::InvalidAge { field: "currentAge", .. })
        ));
    }

    #[test]
    fn form_fields_display_initial_values_like_the_form() {
        let fields = FormFields::from_input(&SimulationInput::initial());

        assert_eq!(fields.monthly_income, "10.000,00");
        assert_eq!(fields.current_investments, "20.000,00");
        assert_eq!(fields.target_patrimony, "1.000.000,00");
        assert_eq!(fields.invest_percentage, "20");
        assert_eq!(fields.current_age, "30");
        assert_eq!(fields.retirement_age, "65");
        assert_eq!(fields.annual_return, "10");
        assert_eq!(fields.monthly_spending_retirement, "5.000,00");
    }

    #[test]
    fn cleared_form_is_blank_and_parses_to_zero() {
        let fields = FormFields::from_input(&SimulationInput::default());
        assert_eq!(fields, FormFields::default());
        assert_eq!(fields.parse(), Ok(SimulationInput::default()));
    }

    #[test]
    fn displayed_form_parses_back_to_same_input() {
        let initial = SimulationInput::initial();
        let parsed = FormFields::from_input(&initial)
            .parse()
            .expect("displayed form must parse");
        assert_eq!(parsed, initial);
    }

    #[test]
    fn form_parse_reports_offending_field() {
        let fields = FormFields {
            retirement_age: "sessenta".to_string(),
            ..FormFields::from_input(&SimulationInput::initial())
        };
        let err = fields.parse().expect_err("must reject age text");
        assert!(matches!(err, InputError::InvalidAge { field: "retirementAge", .. }));
    }
}
