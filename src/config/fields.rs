//! Field schema for the sales model served by the prediction endpoint.

use crate::domain::{FieldKind, FieldRole};

#[derive(Debug)]
pub struct FieldSpec {
    /// Key used in snapshots and on the wire.
    pub name: &'static str,
    /// Column label for diff tables.
    pub label: &'static str,
    /// Lower-case name used inside recommendation sentences.
    pub summary_name: &'static str,
    pub kind: FieldKind,
    pub role: FieldRole,
    /// Accepted categories. Empty means any non-blank text (or numeric field).
    pub categories: &'static [&'static str],
    /// Dirty spellings mapped onto their canonical category.
    pub aliases: &'static [(&'static str, &'static str)],
}

impl FieldSpec {
    pub fn normalize<'a>(&self, raw: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|(from, _)| *from == raw)
            .map(|(_, to)| *to)
            .unwrap_or(raw)
    }

    pub fn accepts_category(&self, value: &str) -> bool {
        self.categories.is_empty() || self.categories.contains(&value)
    }
}

/// Which scenario fields the comparator looks at, and which of them drive
/// the recommendation text.
#[derive(Debug)]
pub struct ComparisonProfile {
    /// Fixed display order for field-diff rows.
    pub comparable: &'static [&'static str],
    /// Field most associated with outcome magnitude.
    pub primary_driver: &'static str,
    pub secondary_driver: &'static str,
    /// Shared field naming what is being stocked/sold.
    pub subject_field: &'static str,
    /// Shared numeric field quoted as a price in the action statement.
    pub price_field: &'static str,
    pub result_noun: &'static str,
    pub context_noun: &'static str,
}

#[derive(Debug)]
pub struct ModelSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub comparison: ComparisonProfile,
}

impl ModelSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields_with_role(&self, role: FieldRole) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.role == role)
    }

    pub fn names_with_role(&self, role: FieldRole) -> Vec<&'static str> {
        self.fields_with_role(role).map(|f| f.name).collect()
    }

    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.field(name).map(|f| f.label).unwrap_or(name)
    }

    pub fn summary_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.field(name).map(|f| f.summary_name).unwrap_or(name)
    }
}

const NONE: &[&str] = &[];
const NO_ALIASES: &[(&str, &str)] = &[];

pub const BIG_MART: ModelSchema = ModelSchema {
    name: "Big Mart Sales",
    fields: &[
        FieldSpec {
            name: "Item_Weight",
            label: "Item Weight",
            summary_name: "item weight",
            kind: FieldKind::Numeric,
            role: FieldRole::Shared,
            categories: NONE,
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Item_Fat_Content",
            label: "Fat Content",
            summary_name: "fat content",
            kind: FieldKind::Categorical,
            role: FieldRole::Shared,
            categories: &["Low Fat", "Regular"],
            aliases: &[
                ("LF", "Low Fat"),
                ("low fat", "Low Fat"),
                ("reg", "Regular"),
                ("REG", "Regular"),
            ],
        },
        FieldSpec {
            name: "Item_Visibility",
            label: "Visibility",
            summary_name: "visibility",
            kind: FieldKind::Numeric,
            role: FieldRole::Shared,
            categories: NONE,
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Item_Type",
            label: "Item Type",
            summary_name: "item type",
            kind: FieldKind::Categorical,
            role: FieldRole::Shared,
            categories: &[
                "Baking Goods",
                "Breads",
                "Breakfast",
                "Canned",
                "Dairy",
                "Frozen Foods",
                "Fruits and Vegetables",
                "Hard Drinks",
                "Health and Hygiene",
                "Household",
                "Meat",
                "Others",
                "Seafood",
                "Snack Foods",
                "Soft Drinks",
                "Starchy Foods",
            ],
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Item_MRP",
            label: "MRP",
            summary_name: "MRP",
            kind: FieldKind::Numeric,
            role: FieldRole::Shared,
            categories: NONE,
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Outlet_Type",
            label: "Outlet Type",
            summary_name: "outlet type",
            kind: FieldKind::Categorical,
            role: FieldRole::Scenario,
            categories: &[
                "Grocery Store",
                "Supermarket Type1",
                "Supermarket Type2",
                "Supermarket Type3",
            ],
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Outlet_Size",
            label: "Outlet Size",
            summary_name: "outlet size",
            kind: FieldKind::Categorical,
            role: FieldRole::Scenario,
            categories: &["High", "Medium", "Small"],
            aliases: &[("high", "High"), ("medium", "Medium"), ("small", "Small")],
        },
        FieldSpec {
            name: "Outlet_Location_Type",
            label: "Location",
            summary_name: "location",
            kind: FieldKind::Categorical,
            role: FieldRole::Scenario,
            categories: &["Tier 1", "Tier 2", "Tier 3"],
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Outlet_Establishment_Year",
            label: "Outlet Year",
            summary_name: "outlet year",
            kind: FieldKind::Numeric,
            role: FieldRole::Scenario,
            categories: NONE,
            aliases: NO_ALIASES,
        },
        FieldSpec {
            name: "Outlet_Identifier",
            label: "Outlet ID",
            summary_name: "outlet ID",
            kind: FieldKind::Categorical,
            role: FieldRole::Scenario,
            categories: &[
                "OUT010", "OUT013", "OUT017", "OUT018", "OUT019", "OUT027", "OUT035", "OUT045",
                "OUT046", "OUT049",
            ],
            aliases: NO_ALIASES,
        },
    ],
    comparison: ComparisonProfile {
        comparable: &[
            "Outlet_Type",
            "Outlet_Size",
            "Outlet_Location_Type",
            "Outlet_Establishment_Year",
            "Outlet_Identifier",
        ],
        primary_driver: "Outlet_Type",
        secondary_driver: "Outlet_Location_Type",
        subject_field: "Item_Type",
        price_field: "Item_MRP",
        result_noun: "predicted sales",
        context_noun: "outlet",
    },
};
