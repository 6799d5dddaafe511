//! Benefits Calculator
//!
//! Business-case impact calculator: a fixed registry of project types, each
//! with its own input schema and formula, plus the confidence table,
//! presentation report, password gate and the static asset server.

pub mod auth;
pub mod calculation;
pub mod config;
pub mod currency;
pub mod error;
pub mod inputs;
pub mod logging;
pub mod project_types;
pub mod report;
pub mod server;
pub mod session;

pub use calculation::{confidence, evaluate, CalculationResult, ConfidenceTable, CONFIDENCE_LEVELS};
pub use error::{CalcError, Result};
pub use inputs::InputValues;
pub use project_types::{registry, InputField, ProjectType, ProjectTypeId, ProjectTypeRegistry};
pub use session::CalculatorSession;
