use std::collections::HashSet;
use std::ops::RangeInclusive;

use log::trace;

use crate::error::ModelError;
use crate::problem::{Constraint, ConstraintOp, Direction, Model, Objective, Variable};

pub const DEFAULT_HEADING: &str = "Linear Programming Problem";

/// Problem definition as entered by a user, before validation
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProblemInput {
    #[cfg_attr(feature = "serde", serde(default))]
    pub heading: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction: Direction,
    /// Variable names; blank entries get `x1`, `x2`, ...
    pub variables: Vec<String>,
    /// Objective coefficients, one per variable
    pub objective: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<ConstraintInput>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintInput {
    /// Blank names get `Constraint_1`, `Constraint_2`, ...
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub coefficients: Vec<f64>,
    pub op: ConstraintOp,
    pub rhs: f64,
}

impl ConstraintInput {
    pub fn new(name: impl Into<String>, coefficients: Vec<f64>, op: ConstraintOp, rhs: f64) -> Self {
        Self {
            name: name.into(),
            coefficients,
            op,
            rhs,
        }
    }
}

/// Accepted problem dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub variables: RangeInclusive<usize>,
    pub constraints: RangeInclusive<usize>,
}

impl Limits {
    /// Dimensions offered by the interactive form: 2-3 variables, 1-5 constraints
    pub const FORM: Limits = Limits {
        variables: 2..=3,
        constraints: 1..=5,
    };

    pub const UNRESTRICTED: Limits = Limits {
        variables: 1..=usize::MAX,
        constraints: 0..=usize::MAX,
    };
}

impl Default for Limits {
    fn default() -> Self {
        Self::UNRESTRICTED
    }
}

impl ProblemInput {
    pub fn new(direction: Direction, variables: Vec<String>, objective: Vec<f64>) -> Self {
        Self {
            heading: String::new(),
            direction,
            variables,
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        coefficients: Vec<f64>,
        op: ConstraintOp,
        rhs: f64,
    ) {
        self.constraints
            .push(ConstraintInput::new(name, coefficients, op, rhs));
    }

    /// Build a model with no limits on its dimensions
    pub fn build(&self) -> Result<Model, ModelError> {
        self.build_with(&Limits::UNRESTRICTED)
    }

    /// Validate the input against `limits` and produce a solver-ready model
    pub fn build_with(&self, limits: &Limits) -> Result<Model, ModelError> {
        let n = self.variables.len();
        if !limits.variables.contains(&n) {
            return Err(ModelError::VariableCount {
                min: *limits.variables.start(),
                max: *limits.variables.end(),
                found: n,
            });
        }
        if !limits.constraints.contains(&self.constraints.len()) {
            return Err(ModelError::ConstraintCount {
                min: *limits.constraints.start(),
                max: *limits.constraints.end(),
                found: self.constraints.len(),
            });
        }

        let mut seen = HashSet::new();
        let mut variables = Vec::with_capacity(n);
        for (index, raw) in self.variables.iter().enumerate() {
            let name = match raw.trim() {
                "" => format!("x{}", index + 1),
                name => name.to_string(),
            };
            if !seen.insert(name.clone()) {
                return Err(ModelError::DuplicateVariable(name));
            }
            variables.push(Variable { name, index });
        }

        if self.objective.len() != n {
            return Err(ModelError::ObjectiveLength {
                expected: n,
                found: self.objective.len(),
            });
        }
        check_finite(&self.objective, || "objective".to_string())?;

        let mut constraints = Vec::with_capacity(self.constraints.len());
        for (j, input) in self.constraints.iter().enumerate() {
            let name = match input.name.trim() {
                "" => format!("Constraint_{}", j + 1),
                name => name.to_string(),
            };
            if input.coefficients.len() != n {
                return Err(ModelError::CoefficientLength {
                    constraint: name,
                    expected: n,
                    found: input.coefficients.len(),
                });
            }
            check_finite(&input.coefficients, || format!("constraint {}", name))?;
            check_finite(&[input.rhs], || format!("right-hand side of {}", name))?;

            constraints.push(Constraint {
                name,
                coefficients: input.coefficients.clone(),
                op: input.op,
                rhs: input.rhs,
            });
        }

        let heading = match self.heading.trim() {
            "" => DEFAULT_HEADING.to_string(),
            heading => heading.to_string(),
        };

        trace!(
            "built model {:?}: {} variables, {} constraints",
            heading,
            variables.len(),
            constraints.len()
        );

        Ok(Model::new(
            heading,
            variables,
            Objective {
                direction: self.direction,
                coefficients: self.objective.clone(),
            },
            constraints,
        ))
    }
}

fn check_finite(values: &[f64], what: impl FnOnce() -> String) -> Result<(), ModelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ModelError::NonFinite(what()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_input() -> ProblemInput {
        let mut input = ProblemInput::new(
            Direction::Maximize,
            vec!["x1".to_string(), "x2".to_string()],
            vec![3.0, 2.0],
        );
        input.add_constraint("capacity", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        input
    }

    #[test]
    fn test_build_simple_model() {
        let model = two_var_input().build().unwrap();
        assert_eq!(model.num_variables(), 2);
        assert_eq!(model.num_constraints(), 1);
        assert_eq!(model.variables()[1].name, "x2");
        assert_eq!(model.variables()[1].index, 1);
        assert_eq!(model.objective().direction, Direction::Maximize);
        assert_eq!(model.constraints()[0].op, ConstraintOp::Le);
        assert_eq!(model.heading(), DEFAULT_HEADING);
    }

    #[test]
    fn test_default_names() {
        let mut input = ProblemInput::new(
            Direction::Minimize,
            vec!["  ".to_string(), "labor".to_string()],
            vec![1.0, 1.0],
        )
        .with_heading("  Shop floor ");
        input.add_constraint("", vec![1.0, 0.0], ConstraintOp::Ge, 1.0);
        input.add_constraint(" hours ", vec![0.0, 1.0], ConstraintOp::Ge, 1.0);

        let model = input.build().unwrap();
        assert_eq!(model.variable_names(), vec!["x1", "labor"]);
        assert_eq!(model.constraints()[0].name, "Constraint_1");
        assert_eq!(model.constraints()[1].name, "hours");
        assert_eq!(model.heading(), "Shop floor");
    }

    #[test]
    fn test_zero_problem_is_legal() {
        let mut input = ProblemInput::new(
            Direction::Maximize,
            vec!["x1".to_string(), "x2".to_string()],
            vec![0.0, 0.0],
        );
        input.add_constraint("c", vec![0.0, 0.0], ConstraintOp::Le, 0.0);
        assert!(input.build().is_ok());
    }

    #[test]
    fn test_objective_length_mismatch() {
        let mut input = two_var_input();
        input.objective.push(1.0);
        assert_eq!(
            input.build(),
            Err(ModelError::ObjectiveLength { expected: 2, found: 3 })
        );
    }

    #[test]
    fn test_constraint_length_mismatch() {
        let mut input = two_var_input();
        input.add_constraint("short", vec![1.0], ConstraintOp::Ge, 0.0);
        match input.build() {
            Err(ModelError::CoefficientLength { constraint, expected, found }) => {
                assert_eq!(constraint, "short");
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("Expected coefficient length error, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_variable() {
        let input = ProblemInput::new(
            Direction::Maximize,
            vec!["x".to_string(), " x".to_string()],
            vec![1.0, 1.0],
        );
        assert_eq!(input.build(), Err(ModelError::DuplicateVariable("x".to_string())));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut input = two_var_input();
        input.add_constraint("bad", vec![1.0, 1.0], ConstraintOp::Le, f64::NAN);
        assert!(matches!(input.build(), Err(ModelError::NonFinite(_))));

        let mut input = two_var_input();
        input.objective[0] = f64::INFINITY;
        assert_eq!(input.build(), Err(ModelError::NonFinite("objective".to_string())));
    }

    #[test]
    fn test_form_limits() {
        let input = ProblemInput::new(Direction::Maximize, vec!["x".to_string()], vec![1.0]);
        assert!(input.build().is_ok());
        assert_eq!(
            input.build_with(&Limits::FORM),
            Err(ModelError::VariableCount { min: 2, max: 3, found: 1 })
        );

        let no_constraints = ProblemInput::new(
            Direction::Maximize,
            vec!["a".to_string(), "b".to_string()],
            vec![1.0, 1.0],
        );
        assert!(matches!(
            no_constraints.build_with(&Limits::FORM),
            Err(ModelError::ConstraintCount { found: 0, .. })
        ));

        let mut too_many = two_var_input();
        for i in 0..5 {
            too_many.add_constraint(format!("c{}", i), vec![1.0, 0.0], ConstraintOp::Le, 1.0);
        }
        assert!(matches!(
            too_many.build_with(&Limits::FORM),
            Err(ModelError::ConstraintCount { max: 5, found: 6, .. })
        ));
    }
}
