use crate::analysis::recommendation::{self, RecommendationInput};
use crate::config::{EngineConfig, ModelSchema};
use crate::domain::{Scenario, ScenarioPair};
use crate::models::{DiffReport, FieldDiff};
use crate::utils::{percent_change, round_to, share_of};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Builds the diff report for two scored scenarios. Pure: same inputs, same
/// report.
pub fn compare(
    pair: &ScenarioPair,
    value_a: f64,
    value_b: f64,
    schema: &ModelSchema,
    config: &EngineConfig,
) -> DiffReport {
    // Ties favour A
    let higher = if value_a >= value_b {
        Scenario::A
    } else {
        Scenario::B
    };
    let margin_absolute = (value_a - value_b).abs();
    let negligible = margin_absolute < config.negligible_threshold;

    let lower_value = value_a.min(value_b);
    let margin_percent = if negligible || lower_value <= 0.0 {
        None
    } else {
        Some(round_to(100.0 * margin_absolute / lower_value, 1))
    };

    let field_diffs = field_diffs(pair, schema);

    let primary = schema.comparison.primary_driver;
    let largest_contributor = (!negligible && field_diffs.iter().any(|d| d.field == primary))
        .then(|| primary.to_string());

    let recommendation = recommendation::synthesize(&RecommendationInput {
        pair,
        schema,
        value_a,
        value_b,
        higher,
        margin_percent,
        negligible,
        diffs: &field_diffs,
    });

    let max = value_a.max(value_b);
    let report = DiffReport {
        value_a,
        value_b,
        winner: (!negligible).then_some(higher),
        margin_absolute,
        margin_percent,
        negligible,
        field_diffs,
        largest_contributor,
        recommendation,
        vs_average_a: percent_change(value_a, config.dataset_average).map(|p| round_to(p, 1)),
        vs_average_b: percent_change(value_b, config.dataset_average).map(|p| round_to(p, 1)),
        bar_width_a: round_to(share_of(value_a, max), 1),
        bar_width_b: round_to(share_of(value_b, max), 1),
    };

    #[cfg(debug_assertions)]
    if DF.log_comparator {
        log::info!(
            "COMPARATOR: A={:.2} B={:.2} winner={:?} margin={:.2} ({:?}%) diffs={}",
            report.value_a,
            report.value_b,
            report.winner,
            report.margin_absolute,
            report.margin_percent,
            report.field_diffs.len()
        );
    }

    report
}

/// Rows for comparable scenario fields whose stringified values differ, in
/// the profile's fixed order.
pub fn field_diffs(pair: &ScenarioPair, schema: &ModelSchema) -> Vec<FieldDiff> {
    let a = pair.specific(Scenario::A);
    let b = pair.specific(Scenario::B);
    schema
        .comparison
        .comparable
        .iter()
        .filter_map(|&field| {
            let value_a = a.display_value(field);
            let value_b = b.display_value(field);
            (value_a != value_b).then(|| FieldDiff {
                field: field.to_string(),
                label: schema.label(field).to_string(),
                value_a,
                value_b,
            })
        })
        .collect()
}
