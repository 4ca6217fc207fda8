//! Recommendation text synthesis.
//!
//! Every sentence is a clause that is included only when the data supports
//! it, so the text never mentions a field the two scenarios agree on.

use crate::config::ModelSchema;
use crate::domain::{Scenario, ScenarioPair};
use crate::models::FieldDiff;
use crate::utils::format_currency;

pub(crate) struct RecommendationInput<'a> {
    pub pair: &'a ScenarioPair,
    pub schema: &'a ModelSchema,
    pub value_a: f64,
    pub value_b: f64,
    /// Higher-valued scenario (ties favour A).
    pub higher: Scenario,
    pub margin_percent: Option<f64>,
    pub negligible: bool,
    pub diffs: &'a [FieldDiff],
}

impl RecommendationInput<'_> {
    fn value(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::A => self.value_a,
            Scenario::B => self.value_b,
        }
    }

    fn differs(&self, field: &str) -> bool {
        self.diffs.iter().any(|d| d.field == field)
    }

    fn specific_value(&self, scenario: Scenario, field: &str) -> String {
        self.pair.specific(scenario).display_value(field)
    }
}

pub(crate) fn synthesize(input: &RecommendationInput<'_>) -> String {
    let clauses = if input.negligible {
        comparable_clauses(input)
    } else {
        preferred_clauses(input)
    };
    clauses.join(" ")
}

fn comparable_clauses(input: &RecommendationInput<'_>) -> Vec<String> {
    let profile = &input.schema.comparison;
    let summary = if input.diffs.is_empty() {
        "the selected fields".to_string()
    } else {
        input
            .diffs
            .iter()
            .map(|d| input.schema.summary_name(&d.field))
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        format!(
            "Both scenarios produce nearly identical {} ({} vs {}).",
            profile.result_noun,
            format_currency(input.value_a),
            format_currency(input.value_b)
        ),
        format!(
            "The {} differences between them ({}) have minimal impact on this model's prediction.",
            profile.context_noun, summary
        ),
        format!(
            "Consider other business factors such as operating cost or foot traffic when choosing between these {}s.",
            profile.context_noun
        ),
    ]
}

fn preferred_clauses(input: &RecommendationInput<'_>) -> Vec<String> {
    let profile = &input.schema.comparison;
    let winner = input.higher;
    let loser = winner.other();
    let mut clauses = Vec::new();

    let headline = match input.margin_percent {
        Some(pct) => format!(
            "{} is the stronger {} for this item, with {} of {} compared to {}, a difference of {:.1}%.",
            winner,
            profile.context_noun,
            profile.result_noun,
            format_currency(input.value(winner)),
            format_currency(input.value(loser)),
            pct
        ),
        None => format!(
            "{} is the stronger {} for this item, with {} of {} compared to {}.",
            winner,
            profile.context_noun,
            profile.result_noun,
            format_currency(input.value(winner)),
            format_currency(input.value(loser))
        ),
    };
    clauses.push(headline);

    let primary = profile.primary_driver;
    if input.differs(primary) {
        clauses.push(format!(
            "The largest driver is {}: {} significantly outperforms {} in this model.",
            input.schema.summary_name(primary),
            input.specific_value(winner, primary),
            input.specific_value(loser, primary)
        ));
    }

    let secondary = profile.secondary_driver;
    if input.differs(secondary) {
        clauses.push(format!(
            "{} also contributes: {} shows higher predicted performance.",
            capitalize(input.schema.summary_name(secondary)),
            input.specific_value(winner, secondary)
        ));
    }

    clauses.push(action_statement(input));
    clauses
}

/// Closing sentence: the shared item inputs plus whatever distinguishes the
/// winning scenario.
fn action_statement(input: &RecommendationInput<'_>) -> String {
    let profile = &input.schema.comparison;
    let shared = input.pair.shared();
    let winner = input.higher;

    let subject = match shared.get(profile.subject_field) {
        Some(v) if !v.is_blank() => v.to_string(),
        _ => "this item".to_string(),
    };
    let price = shared
        .get(profile.price_field)
        .and_then(|v| v.as_number())
        .map(|p| {
            format!(
                " at {} {}",
                input.schema.label(profile.price_field),
                format_currency(p)
            )
        })
        .unwrap_or_default();

    let distinguishing = [profile.primary_driver, profile.secondary_driver]
        .into_iter()
        .find(|f| input.differs(f))
        .or_else(|| input.diffs.first().map(|d| d.field.as_str()));

    let placement = match distinguishing {
        Some(field) if field == profile.primary_driver => format!(
            "in a {} {}",
            input.specific_value(winner, field),
            profile.context_noun
        ),
        Some(field) => format!(
            "in the {} with {} {}",
            profile.context_noun,
            input.schema.summary_name(field),
            input.specific_value(winner, field)
        ),
        None => format!("in the {} configuration", winner),
    };

    format!(
        "Based on this model, stocking {}{} {} would yield the better return.",
        subject, price, placement
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
