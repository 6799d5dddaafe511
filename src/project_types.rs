//! Project Type Registry
//!
//! The four business-case categories, each described by one data record
//! (display metadata and ordered input schema) and one pure formula.
//! Formulas are dispatched through [`ProjectTypeId`] rather than by string.

use crate::calculation::CalculationResult;
use crate::error::{CalcError, Result};
use crate::inputs::InputValues;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a project type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectTypeId {
    Sales,
    Productivity,
    Employee,
    Nps,
}

impl ProjectTypeId {
    /// Registration order, which is also menu order.
    pub const ALL: [ProjectTypeId; 4] = [
        ProjectTypeId::Sales,
        ProjectTypeId::Productivity,
        ProjectTypeId::Employee,
        ProjectTypeId::Nps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectTypeId::Sales => "sales",
            ProjectTypeId::Productivity => "productivity",
            ProjectTypeId::Employee => "employee",
            ProjectTypeId::Nps => "nps",
        }
    }

    /// Run this category's formula. Missing inputs read as zero.
    pub fn calculate(&self, inputs: &InputValues) -> CalculationResult {
        match self {
            ProjectTypeId::Sales => calculate_sales(inputs),
            ProjectTypeId::Productivity => calculate_productivity(inputs),
            ProjectTypeId::Employee => calculate_employee(inputs),
            ProjectTypeId::Nps => calculate_nps(inputs),
        }
    }

    fn index(&self) -> usize {
        match self {
            ProjectTypeId::Sales => 0,
            ProjectTypeId::Productivity => 1,
            ProjectTypeId::Employee => 2,
            ProjectTypeId::Nps => 3,
        }
    }
}

impl fmt::Display for ProjectTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectTypeId {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        ProjectTypeId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| CalcError::UnknownProjectType(s.to_string()))
    }
}

/// One numeric assumption in a project type's form
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputField {
    pub key: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub hint: &'static str,
}

impl InputField {
    const fn new(key: &'static str, label: &'static str, default: f64, hint: &'static str) -> Self {
        Self {
            key,
            label,
            default,
            hint,
        }
    }
}

/// A business-case category
#[derive(Debug, Clone, Serialize)]
pub struct ProjectType {
    pub id: ProjectTypeId,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub inputs: &'static [InputField],
}

impl ProjectType {
    /// Fresh input values seeded from every field's default.
    pub fn defaults(&self) -> InputValues {
        self.inputs.iter().map(|f| (f.key, f.default)).collect()
    }

    pub fn input(&self, key: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.key == key)
    }

    pub fn calculate(&self, inputs: &InputValues) -> CalculationResult {
        self.id.calculate(inputs)
    }
}

const SALES_INPUTS: &[InputField] = &[
    InputField::new("stores", "Number of Stores", 1.0, "Stores impacted"),
    InputField::new("weeks", "Duration (Weeks)", 12.0, "Campaign duration"),
    InputField::new("baseSales", "Base Sales per Store/Week ($)", 10000.0, "Current weekly sales"),
    InputField::new("uplift", "Expected Uplift (%)", 5.0, "Sales increase %"),
    InputField::new("grossMargin", "Gross Margin (%)", 30.0, "Profit margin"),
];

const PRODUCTIVITY_INPUTS: &[InputField] = &[
    InputField::new("stores", "Number of Locations", 1.0, "Sites impacted"),
    InputField::new("weeks", "Duration (Weeks)", 52.0, "Annual impact"),
    InputField::new("hoursSaved", "Hours Saved per Location/Week", 2.0, "Time saved per week"),
    InputField::new("laborRate", "Labor Cost per Hour ($)", 25.0, "Hourly rate"),
    InputField::new("otherSavings", "Other Savings ($)", 0.0, "Additional cost reductions"),
];

const EMPLOYEE_INPUTS: &[InputField] = &[
    InputField::new("employees", "Number of Employees", 100.0, "Team size"),
    InputField::new("turnoverReduction", "Turnover Reduction (%)", 5.0, "Fewer people leaving"),
    InputField::new("costPerHire", "Cost per Hire ($)", 5000.0, "Onboarding cost"),
    InputField::new("productivityGain", "Productivity Gain (%)", 2.0, "Efficiency improvement"),
    InputField::new("avgSalary", "Average Salary ($)", 65000.0, "Annual salary"),
];

const NPS_INPUTS: &[InputField] = &[
    InputField::new("customers", "Number of Customers", 10000.0, "Affected customers"),
    InputField::new("currentNPS", "Current NPS", 30.0, "Starting NPS score"),
    InputField::new("targetNPS", "Target NPS", 40.0, "Goal NPS score"),
    InputField::new("valuePerNPS", "Value per NPS Point ($)", 1000.0, "Revenue per point"),
    InputField::new("conversionImpact", "Conversion Impact ($)", 0.0, "Additional revenue"),
];

fn calculate_sales(v: &InputValues) -> CalculationResult {
    let incremental_sales =
        v.get("stores") * v.get("weeks") * v.get("baseSales") * (v.get("uplift") / 100.0);
    let gross_profit = incremental_sales * (v.get("grossMargin") / 100.0);

    CalculationResult::new(
        ProjectTypeId::Sales,
        vec![("incrementalSales", incremental_sales), ("grossProfit", gross_profit)],
        gross_profit,
    )
}

fn calculate_productivity(v: &InputValues) -> CalculationResult {
    let labor_savings = v.get("stores") * v.get("weeks") * v.get("hoursSaved") * v.get("laborRate");
    let other_savings = v.get("otherSavings");

    CalculationResult::new(
        ProjectTypeId::Productivity,
        vec![("laborSavings", labor_savings), ("otherSavings", other_savings)],
        labor_savings + other_savings,
    )
}

fn calculate_employee(v: &InputValues) -> CalculationResult {
    let retention_savings =
        v.get("employees") * (v.get("turnoverReduction") / 100.0) * v.get("costPerHire");

    // `weeks` is not part of the employee schema, so this term is zero for
    // anything entered through the form. Kept until product decides.
    let productivity_value = v.get("employees") * (v.get("productivityGain") / 100.0) * v.get("avgSalary")
        / 52.0
        * v.get("weeks");
    let productivity_value = if productivity_value.is_nan() { 0.0 } else { productivity_value };

    CalculationResult::new(
        ProjectTypeId::Employee,
        vec![
            ("retentionSavings", retention_savings),
            ("productivityValue", productivity_value),
        ],
        retention_savings + productivity_value,
    )
}

fn calculate_nps(v: &InputValues) -> CalculationResult {
    let nps_increase = v.get("targetNPS") - v.get("currentNPS");
    let nps_value = nps_increase * v.get("valuePerNPS");
    let conversion_impact = v.get("conversionImpact");

    CalculationResult::new(
        ProjectTypeId::Nps,
        vec![
            ("npsIncrease", nps_increase),
            ("npsValue", nps_value),
            ("conversionImpact", conversion_impact),
        ],
        nps_value + conversion_impact,
    )
}

/// Ordered, immutable set of project types
#[derive(Debug)]
pub struct ProjectTypeRegistry {
    types: [ProjectType; 4],
}

impl ProjectTypeRegistry {
    pub fn builtin() -> Self {
        Self {
            types: [
                ProjectType {
                    id: ProjectTypeId::Sales,
                    name: "Sales Uplift",
                    icon: "📈",
                    description: "Increase in sales revenue",
                    inputs: SALES_INPUTS,
                },
                ProjectType {
                    id: ProjectTypeId::Productivity,
                    name: "Productivity Improvement",
                    icon: "⚡",
                    description: "Cost reduction through efficiency",
                    inputs: PRODUCTIVITY_INPUTS,
                },
                ProjectType {
                    id: ProjectTypeId::Employee,
                    name: "Employee Experience",
                    icon: "👥",
                    description: "Retention and productivity gains",
                    inputs: EMPLOYEE_INPUTS,
                },
                ProjectType {
                    id: ProjectTypeId::Nps,
                    name: "NPS Improvement",
                    icon: "⭐",
                    description: "Customer satisfaction impact",
                    inputs: NPS_INPUTS,
                },
            ],
        }
    }

    /// Look up a category by its string id.
    pub fn get(&self, id: &str) -> Result<&ProjectType> {
        let id: ProjectTypeId = id.parse()?;
        Ok(self.by_id(id))
    }

    pub fn by_id(&self, id: ProjectTypeId) -> &ProjectType {
        &self.types[id.index()]
    }

    /// Categories in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectType> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

lazy_static! {
    static ref REGISTRY: ProjectTypeRegistry = ProjectTypeRegistry::builtin();
}

/// The process-wide registry, built on first use.
pub fn registry() -> &'static ProjectTypeRegistry {
    &REGISTRY
}
