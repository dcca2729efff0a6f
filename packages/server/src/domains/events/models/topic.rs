use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Civic topic categories an event can be classified into.
///
/// The serialized labels are part of the wire contract with the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Topic {
    #[serde(rename = "Legislation/Policy")]
    LegislationPolicy,
    #[serde(rename = "Zoning/Housing")]
    ZoningHousing,
    #[serde(rename = "Budget/Finance")]
    BudgetFinance,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Public Safety")]
    PublicSafety,
    #[serde(rename = "Health/Social Services")]
    HealthSocialServices,
    #[serde(rename = "Environment")]
    Environment,
    #[serde(rename = "Other")]
    Other,
}

impl Topic {
    pub const ALL: [Topic; 9] = [
        Topic::LegislationPolicy,
        Topic::ZoningHousing,
        Topic::BudgetFinance,
        Topic::Education,
        Topic::Transportation,
        Topic::PublicSafety,
        Topic::HealthSocialServices,
        Topic::Environment,
        Topic::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Topic::LegislationPolicy => "Legislation/Policy",
            Topic::ZoningHousing => "Zoning/Housing",
            Topic::BudgetFinance => "Budget/Finance",
            Topic::Education => "Education",
            Topic::Transportation => "Transportation",
            Topic::PublicSafety => "Public Safety",
            Topic::HealthSocialServices => "Health/Social Services",
            Topic::Environment => "Environment",
            Topic::Other => "Other",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
