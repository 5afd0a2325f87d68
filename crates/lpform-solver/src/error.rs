use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Expected between {min} and {max} variables, got {found}")]
    VariableCount { min: usize, max: usize, found: usize },
    #[error("Expected between {min} and {max} constraints, got {found}")]
    ConstraintCount { min: usize, max: usize, found: usize },
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),
    #[error("Objective has {found} coefficients but the problem has {expected} variables")]
    ObjectiveLength { expected: usize, found: usize },
    #[error("Constraint {constraint} has {found} coefficients but the problem has {expected} variables")]
    CoefficientLength {
        constraint: String,
        expected: usize,
        found: usize,
    },
    #[error("Unknown constraint operator: {0:?} (expected <=, = or >=)")]
    UnknownOperator(String),
    #[error("Non-finite number in {0}")]
    NonFinite(String),
}
