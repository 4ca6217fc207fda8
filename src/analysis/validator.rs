use crate::config::{FieldSpec, ModelSchema};
use crate::domain::{FieldKind, FieldRole, InputSnapshot, Scenario, ScenarioPair};
use crate::errors::ValidationError;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    Missing,
    Blank,
    NotNumeric,
    UnknownCategory(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Field name, prefixed with the scenario key (`A.Outlet_Type`) for
    /// scenario-specific fields of a pair.
    pub field: String,
    pub problem: FieldProblem,
}

/// Outcome of a validation pass. Empty means the input may be submitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    pub issues: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Offending field names in schema order, for user-facing messaging.
    pub fn offending_fields(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.field.clone()).collect()
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ValidationError {
                fields: self.offending_fields(),
            })
        }
    }
}

/// Completeness and well-formedness checks against a model schema.
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a ModelSchema,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a ModelSchema) -> Self {
        Self { schema }
    }

    pub fn check(&self, snapshot: &InputSnapshot) -> ValidationReport {
        let issues = self
            .schema
            .fields
            .iter()
            .filter_map(|spec| {
                check_field(spec, snapshot).map(|problem| FieldIssue {
                    field: spec.name.to_string(),
                    problem,
                })
            })
            .collect();
        ValidationReport { issues }
    }

    /// Checks shared fields against the shared group and scenario fields
    /// against each scenario's own group. A value supplied in the wrong group
    /// does not count. Shared problems are reported once; scenario problems
    /// carry the scenario key.
    pub fn check_pair(&self, pair: &ScenarioPair) -> ValidationReport {
        let mut issues = Vec::new();

        for spec in self.schema.fields_with_role(FieldRole::Shared) {
            if let Some(problem) = check_field(spec, pair.shared()) {
                issues.push(FieldIssue {
                    field: spec.name.to_string(),
                    problem,
                });
            }
        }

        for scenario in [Scenario::A, Scenario::B] {
            let specific = pair.specific(scenario);
            for spec in self.schema.fields_with_role(FieldRole::Scenario) {
                if let Some(problem) = check_field(spec, specific) {
                    issues.push(FieldIssue {
                        field: format!("{}.{}", scenario.key().to_uppercase(), spec.name),
                        problem,
                    });
                }
            }
        }

        ValidationReport { issues }
    }

    pub fn validate(&self, snapshot: &InputSnapshot) -> Result<(), ValidationError> {
        self.check(snapshot).into_result()
    }

    pub fn validate_pair(&self, pair: &ScenarioPair) -> Result<(), ValidationError> {
        self.check_pair(pair).into_result()
    }
}

fn check_field(spec: &FieldSpec, snapshot: &InputSnapshot) -> Option<FieldProblem> {
    let Some(value) = snapshot.get(spec.name) else {
        return Some(FieldProblem::Missing);
    };
    if value.is_blank() {
        return Some(FieldProblem::Blank);
    }
    match spec.kind {
        FieldKind::Numeric => value.as_number().is_none().then_some(FieldProblem::NotNumeric),
        FieldKind::Categorical => {
            let raw = value.to_string();
            let canonical = spec.normalize(raw.trim());
            (!spec.accepts_category(canonical))
                .then(|| FieldProblem::UnknownCategory(canonical.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BIG_MART;

    fn complete() -> InputSnapshot {
        InputSnapshot::new()
            .with("Item_Weight", 12.5)
            .with("Item_Fat_Content", "Low Fat")
            .with("Item_Visibility", 0.066)
            .with("Item_Type", "Dairy")
            .with("Item_MRP", 150.0)
            .with("Outlet_Type", "Supermarket Type1")
            .with("Outlet_Size", "Medium")
            .with("Outlet_Location_Type", "Tier 1")
            .with("Outlet_Establishment_Year", 1999)
            .with("Outlet_Identifier", "OUT049")
    }

    #[test]
    fn accepts_complete_snapshot() {
        let report = Validator::new(&BIG_MART).check(&complete());
        assert!(report.is_valid(), "{:?}", report);
    }

    #[test]
    fn accepts_numeric_text_and_aliases() {
        let snap = complete()
            .with("Item_MRP", "150.25")
            .with("Item_Fat_Content", "LF");
        assert!(Validator::new(&BIG_MART).validate(&snap).is_ok());
    }

    #[test]
    fn rejects_missing_field() {
        let err = Validator::new(&BIG_MART)
            .validate(&complete().without("Outlet_Size"))
            .unwrap_err();
        assert_eq!(err.fields, vec!["Outlet_Size".to_string()]);
    }

    #[test]
    fn rejects_non_numeric_and_blank() {
        let snap = complete()
            .with("Item_Weight", "heavy")
            .with("Item_Type", "  ");
        let report = Validator::new(&BIG_MART).check(&snap);
        assert_eq!(
            report.issues,
            vec![
                FieldIssue {
                    field: "Item_Weight".into(),
                    problem: FieldProblem::NotNumeric
                },
                FieldIssue {
                    field: "Item_Type".into(),
                    problem: FieldProblem::Blank
                },
            ]
        );
    }

    #[test]
    fn rejects_nan_number() {
        let snap = complete().with("Item_Visibility", f64::NAN);
        assert_eq!(
            Validator::new(&BIG_MART).check(&snap).offending_fields(),
            vec!["Item_Visibility".to_string()]
        );
    }

    #[test]
    fn rejects_unknown_category() {
        let snap = complete().with("Outlet_Type", "Hypermarket");
        let report = Validator::new(&BIG_MART).check(&snap);
        assert_eq!(
            report.issues[0].problem,
            FieldProblem::UnknownCategory("Hypermarket".into())
        );
    }

    #[test]
    fn pair_reports_scenario_prefix() {
        let full = complete();
        let shared = full.restricted_to(&BIG_MART.names_with_role(FieldRole::Shared));
        let scenario = full.restricted_to(&BIG_MART.names_with_role(FieldRole::Scenario));
        let pair = ScenarioPair::new(
            shared,
            scenario.clone(),
            scenario.without("Outlet_Establishment_Year"),
        );
        let report = Validator::new(&BIG_MART).check_pair(&pair);
        assert_eq!(
            report.offending_fields(),
            vec!["B.Outlet_Establishment_Year".to_string()]
        );
    }

    #[test]
    fn pair_reports_shared_once() {
        let full = complete();
        let scenario = full.restricted_to(&BIG_MART.names_with_role(FieldRole::Scenario));
        let shared = full
            .restricted_to(&BIG_MART.names_with_role(FieldRole::Shared))
            .without("Item_MRP");
        let pair = ScenarioPair::new(shared, scenario.clone(), scenario);
        let err = Validator::new(&BIG_MART).validate_pair(&pair).unwrap_err();
        assert_eq!(err.fields, vec!["Item_MRP".to_string()]);
    }

    #[test]
    fn pair_fields_must_sit_in_their_own_group() {
        let full = complete();
        let shared = full
            .restricted_to(&BIG_MART.names_with_role(FieldRole::Shared))
            .without("Item_MRP")
            .with("Outlet_Size", "Medium");
        let scenario = full
            .restricted_to(&BIG_MART.names_with_role(FieldRole::Scenario))
            .without("Outlet_Size")
            .with("Item_MRP", 150.0);
        let pair = ScenarioPair::new(shared, scenario.clone(), scenario);

        // Both merged snapshots would be complete, but each group is checked on its own
        let report = Validator::new(&BIG_MART).check_pair(&pair);
        assert_eq!(
            report.offending_fields(),
            vec![
                "Item_MRP".to_string(),
                "A.Outlet_Size".to_string(),
                "B.Outlet_Size".to_string(),
            ]
        );
    }
}
