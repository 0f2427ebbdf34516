//! Ripple-impact analysis of refactoring operations

mod analyzer;
pub mod operation;
mod ripple;

pub use analyzer::{
    classify_risk, Dependency, ImpactAnalyzer, ImpactType, ImpactedFile, RippleImpactAnalysis,
    RiskLevel,
};
pub use operation::{OperationRequest, RefactoringOperation};
pub use ripple::ripple_effect;
