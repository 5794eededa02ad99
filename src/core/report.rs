use std::fmt;

use serde::Serialize;

use super::engine::{LIFE_EXPECTANCY_AGE, monthly_contribution};
use super::format::format_currency;
use super::types::{Phase, SimulationInput, SimulationResult, YearTracePoint};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCard {
    pub title: String,
    pub value: String,
    pub caption: String,
}

/// Text of the result panel, ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultReport {
    pub goal_met: bool,
    pub status_message: String,
    pub summary_headline: String,
    pub summary: String,
    pub cards: Vec<ResultCard>,
}

pub fn build_report(inputs: &SimulationInput, result: &SimulationResult) -> ResultReport {
    let status_message = if result.is_goal_met {
        "Parabéns! Você já atingiu sua meta de aposentadoria com os investimentos atuais."
            .to_string()
    } else {
        format!(
            "Atenção: Você ainda precisa ajustar seus aportes para atingir a meta de {}.",
            format_currency(inputs.target_patrimony)
        )
    };

    let summary = format!(
        "Você poderá gastar até {} por mês e ainda deixará uma herança de {}.",
        format_currency(result.sustainable_monthly_spending),
        format_currency(result.heritage)
    );

    let years_contributing = result.months_to_retirement / 12;
    let cards = vec![
        ResultCard {
            title: "Você se aposentará com".to_string(),
            value: format_currency(result.total_accumulated),
            caption: format!(
                "Aportando {} por {years_contributing} anos.",
                format_currency(result.monthly_contribution)
            ),
        },
        ResultCard {
            title: "Deixará de herança".to_string(),
            value: format_currency(result.heritage),
            caption: format!("Baseado numa expectativa média de {LIFE_EXPECTANCY_AGE} anos."),
        },
        ResultCard {
            title: "Poderá gastar por mês".to_string(),
            value: format_currency(result.sustainable_monthly_spending),
            caption: "Para seu dinheiro nunca acabar.".to_string(),
        },
        goal_card(result),
    ];

    ResultReport {
        goal_met: result.is_goal_met,
        status_message,
        summary_headline: "Você conseguirá deixar uma herança para seus filhos.".to_string(),
        summary,
        cards,
    }
}

fn goal_card(result: &SimulationResult) -> ResultCard {
    let (title, caption) = if result.is_goal_met {
        ("Você passou da sua meta", "Parabéns!")
    } else {
        ("Faltam para sua meta", "Continue investindo!")
    };
    ResultCard {
        title: title.to_string(),
        value: format_currency(result.surplus.abs()),
        caption: caption.to_string(),
    }
}

/// Live hint shown next to the contribution field before any projection runs.
pub fn contribution_preview(inputs: &SimulationInput) -> String {
    let contribution = monthly_contribution(inputs.monthly_income, inputs.invest_percentage);
    format!("~ {}/mês", format_currency(contribution))
}

pub fn render_trace_table(rows: &[YearTracePoint]) -> String {
    let mut out = format!(
        "{:>5}  {:<12} {:>20} {:>20} {:>20} {:>22}\n",
        "Idade", "Fase", "Aportes", "Retiradas", "Rendimento", "Saldo"
    );
    for row in rows {
        let phase = match row.phase {
            Phase::Accumulation => "acumulação",
            Phase::Retirement => "aposentadoria",
        };
        out.push_str(&format!(
            "{:>5}  {:<12} {:>20} {:>20} {:>20} {:>22}\n",
            row.age,
            phase,
            format_currency(row.contributions),
            format_currency(row.withdrawals),
            format_currency(row.growth),
            format_currency(row.end_balance),
        ));
    }
    out
}

impl fmt::Display for ResultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resultado")?;
        writeln!(f, "=========")?;
        writeln!(f, "{}", self.status_message)?;
        writeln!(f)?;
        writeln!(f, "{}", self.summary_headline)?;
        writeln!(f, "{}", self.summary)?;
        for card in &self.cards {
            writeln!(f)?;
            writeln!(f, "{}: {}", card.title, card.value)?;
            write!(f, "  {}", card.caption)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::run_projection;

    #[test]
    fn report_for_initial_form_values() {
        let inputs = SimulationInput::initial();
        let result = run_projection(&inputs);
        let report = build_report(&inputs, &result);

        assert!(report.goal_met);
        assert!(report.status_message.starts_with("Parabéns!"));
        assert_eq!(
            report.summary,
            "Você poderá gastar até R$\u{a0}58.686,73 por mês e ainda deixará uma herança de R$\u{a0}13.746.967,25."
        );
        assert_eq!(report.cards.len(), 4);
        assert_eq!(report.cards[0].value, "R$\u{a0}7.359.630,77");
        assert_eq!(report.cards[0].caption, "Aportando R$\u{a0}2.000,00 por 35 anos.");
        assert_eq!(report.cards[1].caption, "Baseado numa expectativa média de 72 anos.");
        assert_eq!(report.cards[2].value, "R$\u{a0}58.686,73");
        assert_eq!(report.cards[3].title, "Você passou da sua meta");
        assert_eq!(report.cards[3].value, "R$\u{a0}6.359.630,77");
    }

    #[test]
    fn report_for_missed_goal_shows_shortfall_magnitude() {
        let inputs = SimulationInput {
            monthly_income: 5_000.0,
            current_investments: 50_000.0,
            target_patrimony: 2_000_000.0,
            invest_percentage: 15.0,
            current_age: 35,
            retirement_age: 55,
            annual_return: 6.0,
            monthly_spending_retirement: 8_000.0,
        };
        let result = run_projection(&inputs);
        let report = build_report(&inputs, &result);

        assert!(!report.goal_met);
        assert_eq!(
            report.status_message,
            "Atenção: Você ainda precisa ajustar seus aportes para atingir a meta de R$\u{a0}2.000.000,00."
        );
        assert_eq!(report.cards[1].value, "R$\u{a0}0,00");
        assert_eq!(report.cards[3].title, "Faltam para sua meta");
        assert_eq!(report.cards[3].value, "R$\u{a0}1.499.564,25");
        assert_eq!(report.cards[3].caption, "Continue investindo!");
    }

    #[test]
    fn years_in_caption_round_down() {
        let inputs = SimulationInput::initial();
        let mut result = run_projection(&inputs);
        result.months_to_retirement = 23;
        let report = build_report(&inputs, &result);
        assert!(report.cards[0].caption.ends_with("por 1 anos."));
    }

    #[test]
    fn contribution_preview_uses_engine_formula() {
        assert_eq!(
            contribution_preview(&SimulationInput::initial()),
            "~ R$\u{a0}2.000,00/mês"
        );
        assert_eq!(
            contribution_preview(&SimulationInput::default()),
            "~ R$\u{a0}0,00/mês"
        );
    }

    #[test]
    fn display_lists_every_card() {
        let inputs = SimulationInput::initial();
        let report = build_report(&inputs, &run_projection(&inputs));
        let text = report.to_string();

        assert!(text.starts_with("Resultado\n"));
        for card in &report.cards {
            assert!(text.contains(&format!("{}: {}", card.title, card.value)));
            assert!(text.contains(&card.caption));
        }
    }

    #[test]
    fn trace_table_has_header_and_one_line_per_row() {
        let inputs = SimulationInput::initial();
        let rows = crate::core::run_yearly_trace(&inputs);
        let table = render_trace_table(&rows);

        assert_eq!(table.lines().count(), rows.len() + 1);
        assert!(table.lines().next().is_some_and(|header| header.contains("Saldo")));
        assert!(table.contains("aposentadoria"));
    }
}
