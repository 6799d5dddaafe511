//! Calculation Evaluator
//!
//! Runs a project type's formula over the current inputs and derives the
//! confidence table from the resulting total. Nothing is cached: callers
//! evaluate again after every edit.

use crate::error::Result;
use crate::inputs::InputValues;
use crate::project_types::{registry, ProjectTypeId};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Percentages applied to the total for the sensitivity display.
pub const CONFIDENCE_LEVELS: [u32; 6] = [50, 75, 90, 100, 110, 125];

/// Named outputs of one calculation. `total` is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    project_type: ProjectTypeId,
    outputs: Vec<(&'static str, f64)>,
    total: f64,
}

impl CalculationResult {
    pub fn new(project_type: ProjectTypeId, outputs: Vec<(&'static str, f64)>, total: f64) -> Self {
        Self {
            project_type,
            outputs,
            total,
        }
    }

    pub fn project_type(&self) -> ProjectTypeId {
        self.project_type
    }

    /// The bottom-line EBIT impact.
    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        if key == "total" {
            return Some(self.total);
        }
        self.outputs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All outputs in formula order, `total` last.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.outputs
            .iter()
            .copied()
            .chain(std::iter::once(("total", self.total)))
    }

    pub fn confidence(&self, percent: u32) -> f64 {
        confidence(self, percent)
    }

    pub fn confidence_table(&self) -> ConfidenceTable {
        ConfidenceTable::for_result(self)
    }
}

impl Serialize for CalculationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.outputs.len() + 1))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

/// Evaluate the category named by `category_id`.
///
/// Fails only when the id is not one of the registered project types.
pub fn evaluate(category_id: &str, inputs: &InputValues) -> Result<CalculationResult> {
    let project_type = registry().get(category_id)?;
    Ok(project_type.calculate(inputs))
}

/// `total` scaled by `percent`.
pub fn confidence(result: &CalculationResult, percent: u32) -> f64 {
    // Scale factor first so that 100% is exactly the total
    result.total() * (f64::from(percent) / 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ConfidenceRow {
    pub percent: u32,
    pub value: f64,
}

/// Total scaled across [`CONFIDENCE_LEVELS`], ascending by percentage
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ConfidenceTable {
    rows: Vec<ConfidenceRow>,
}

impl ConfidenceTable {
    pub fn for_result(result: &CalculationResult) -> Self {
        Self {
            rows: CONFIDENCE_LEVELS
                .iter()
                .map(|&percent| ConfidenceRow {
                    percent,
                    value: confidence(result, percent),
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ConfidenceRow] {
        &self.rows
    }

    pub fn value_at(&self, percent: u32) -> Option<f64> {
        self.rows.iter().find(|r| r.percent == percent).map(|r| r.value)
    }
}
