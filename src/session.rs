//! Calculator Session
//!
//! The selected project type and its editable values. Selecting a type
//! always starts over from that type's defaults.

use crate::calculation::{CalculationResult, ConfidenceTable};
use crate::error::{CalcError, Result};
use crate::inputs::{parse_value, InputValues};
use crate::project_types::{registry, ProjectType, ProjectTypeId};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CalculatorSession {
    project_type: ProjectTypeId,
    values: InputValues,
}

impl CalculatorSession {
    /// Starts on the first registered type.
    pub fn new() -> Self {
        Self::with_project_type(ProjectTypeId::Sales)
    }

    pub fn with_project_type(id: ProjectTypeId) -> Self {
        Self {
            project_type: id,
            values: registry().by_id(id).defaults(),
        }
    }

    pub fn project_type(&self) -> &'static ProjectType {
        registry().by_id(self.project_type)
    }

    pub fn values(&self) -> &InputValues {
        &self.values
    }

    /// Switch category. Prior edits are discarded even when reselecting.
    pub fn select(&mut self, id: ProjectTypeId) {
        debug!("Selecting project type {}", id);
        self.project_type = id;
        self.values = registry().by_id(id).defaults();
    }

    pub fn select_str(&mut self, id: &str) -> Result<()> {
        let id: ProjectTypeId = id.parse()?;
        self.select(id);
        Ok(())
    }

    /// Edit one field of the current type.
    pub fn set_value(&mut self, key: &str, value: f64) -> Result<()> {
        if self.project_type().input(key).is_none() {
            return Err(CalcError::UnknownInput {
                project_type: self.project_type.to_string(),
                key: key.to_string(),
            });
        }
        self.values.set(key, value);
        Ok(())
    }

    /// Edit one field from typed text (`"12abc"` → 12, garbage → 0).
    pub fn set_text(&mut self, key: &str, text: &str) -> Result<()> {
        self.set_value(key, parse_value(text))
    }

    pub fn calculate(&self) -> CalculationResult {
        self.project_type.calculate(&self.values)
    }

    pub fn confidence_table(&self) -> ConfidenceTable {
        self.calculate().confidence_table()
    }
}

impl Default for CalculatorSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_sales_defaults() {
        let session = CalculatorSession::new();
        assert_eq!(session.project_type().id, ProjectTypeId::Sales);
        assert_eq!(session.values(), &registry().by_id(ProjectTypeId::Sales).defaults());
    }

    #[test]
    fn test_switch_resets_to_defaults() {
        let mut session = CalculatorSession::new();
        session.set_value("stores", 40.0).unwrap();
        session.set_value("weeks", 3.0).unwrap();

        session.select(ProjectTypeId::Productivity);
        let productivity = registry().by_id(ProjectTypeId::Productivity);
        assert_eq!(session.values(), &productivity.defaults());
        assert_eq!(session.values().get("weeks"), 52.0);
        assert!(!session.values().contains_key("baseSales"));

        session.select(ProjectTypeId::Sales);
        assert_eq!(session.values().get("stores"), 1.0);
    }

    #[test]
    fn test_reselect_same_type_resets() {
        let mut session = CalculatorSession::with_project_type(ProjectTypeId::Nps);
        session.set_value("targetNPS", 90.0).unwrap();
        session.select(ProjectTypeId::Nps);
        assert_eq!(session.values().get("targetNPS"), 40.0);
    }

    #[test]
    fn test_edit_recalculates() {
        let mut session = CalculatorSession::new();
        let before = session.calculate().total();
        session.set_text("stores", "2").unwrap();
        let after = session.calculate().total();
        assert!((after - before * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut session = CalculatorSession::with_project_type(ProjectTypeId::Employee);
        let err = session.set_value("weeks", 52.0).unwrap_err();
        assert!(matches!(err, CalcError::UnknownInput { .. }));
        assert_eq!(session.calculate().get("productivityValue"), Some(0.0));
    }

    #[test]
    fn test_garbage_text_coerces_to_zero() {
        let mut session = CalculatorSession::new();
        session.set_text("uplift", "lots").unwrap();
        assert_eq!(session.values().get("uplift"), 0.0);
        assert_eq!(session.calculate().total(), 0.0);
    }

    #[test]
    fn test_select_str() {
        let mut session = CalculatorSession::new();
        session.select_str("employee").unwrap();
        assert_eq!(session.project_type().id, ProjectTypeId::Employee);
        assert!(session.select_str("bogus").is_err());
        assert_eq!(session.project_type().id, ProjectTypeId::Employee);
    }
}
