use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::solution::ConstraintViolation;

/// Optimization direction of the objective
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "Maximize", alias = "max"))]
    Maximize,
    #[cfg_attr(feature = "serde", serde(alias = "Minimize", alias = "min"))]
    Minimize,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Maximize => write!(f, "Maximize"),
            Direction::Minimize => write!(f, "Minimize"),
        }
    }
}

/// Relational operator of a constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    #[cfg_attr(feature = "serde", serde(rename = "<=", alias = "≤"))]
    Le,
    /// Equal (=)
    #[cfg_attr(feature = "serde", serde(rename = "=", alias = "=="))]
    Eq,
    /// Greater than or equal (>=)
    #[cfg_attr(feature = "serde", serde(rename = ">=", alias = "≥"))]
    Ge,
}

impl ConstraintOp {
    /// Plain ASCII spelling, as accepted by most LP tooling
    pub fn ascii(self) -> &'static str {
        match self {
            ConstraintOp::Le => "<=",
            ConstraintOp::Eq => "=",
            ConstraintOp::Ge => ">=",
        }
    }
}

impl FromStr for ConstraintOp {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" => Ok(ConstraintOp::Le),
            "=" | "==" => Ok(ConstraintOp::Eq),
            ">=" | "≥" => Ok(ConstraintOp::Ge),
            other => Err(ModelError::UnknownOperator(other.to_string())),
        }
    }
}

impl fmt::Display for ConstraintOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintOp::Le => write!(f, "≤"),
            ConstraintOp::Eq => write!(f, "="),
            ConstraintOp::Ge => write!(f, "≥"),
        }
    }
}

/// A non-negative continuous decision variable
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    /// Position in every coefficient vector of the model
    pub index: usize,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub direction: Direction,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for display)
    pub name: String,
    /// Coefficients for each variable
    pub coefficients: Vec<f64>,
    pub op: ConstraintOp,
    /// Right-hand side value
    pub rhs: f64,
}

impl Constraint {
    /// Left-hand side evaluated at `values`
    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Distance from the boundary, positive on the feasible side.
    /// Equality constraints report the negated absolute gap.
    pub fn slack(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs(values);
        match self.op {
            ConstraintOp::Le => self.rhs - lhs,
            ConstraintOp::Ge => lhs - self.rhs,
            ConstraintOp::Eq => -(lhs - self.rhs).abs(),
        }
    }

    /// Magnitude of the row at `values`: `1 + max(|rhs|, Σ|aᵢxᵢ|)`.
    /// Tolerances are relative to it, so large right-hand sides absorb
    /// the solver's rounding error.
    pub fn scale(&self, values: &[f64]) -> f64 {
        let terms: f64 = self
            .coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| (coef * value).abs())
            .sum();
        1.0 + self.rhs.abs().max(terms)
    }

    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.slack(values) >= -tolerance * self.scale(values)
    }

    /// Whether the point sits on this constraint's boundary
    pub fn is_binding(&self, values: &[f64], tolerance: f64) -> bool {
        (self.lhs(values) - self.rhs).abs() <= tolerance * self.scale(values)
    }
}

/// A validated linear program: every coefficient vector has one entry per variable.
///
/// Only [`ProblemInput::build`](crate::ProblemInput::build) constructs a `Model`, so the
/// dimensions can be trusted by the solver and by presentation code.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    heading: String,
    variables: Vec<Variable>,
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl Model {
    pub(crate) fn new(
        heading: String,
        variables: Vec<Variable>,
        objective: Objective,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            heading,
            variables,
            objective,
            constraints,
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Objective evaluated at `values`
    pub fn objective_value_at(&self, values: &[f64]) -> f64 {
        self.objective
            .coefficients
            .iter()
            .zip(values)
            .map(|(coef, value)| coef * value)
            .sum()
    }

    /// Constraints violated by `values` beyond the scaled `tolerance`, worst first
    pub fn violations(&self, values: &[f64], tolerance: f64) -> Vec<ConstraintViolation> {
        let mut violations: Vec<ConstraintViolation> = self
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(values, tolerance))
            .map(|c| {
                let actual = c.lhs(values);
                let violation_amount = -c.slack(values);
                let description = match c.op {
                    ConstraintOp::Le => format!(
                        "{} exceeds maximum of {} by {:.3e}",
                        c.name, c.rhs, violation_amount
                    ),
                    ConstraintOp::Ge => format!(
                        "{} is below minimum of {} by {:.3e}",
                        c.name, c.rhs, violation_amount
                    ),
                    ConstraintOp::Eq => format!(
                        "{} requires exactly {} but got {} (off by {:.3e})",
                        c.name, c.rhs, actual, violation_amount
                    ),
                };
                ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual,
                    violation_amount,
                    description,
                }
            })
            .collect();

        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capacity() -> Constraint {
        Constraint {
            name: "capacity".to_string(),
            coefficients: vec![1.0, 1.0],
            op: ConstraintOp::Le,
            rhs: 4.0,
        }
    }

    #[test]
    fn test_operator_symbols() {
        assert_eq!("<=".parse::<ConstraintOp>().unwrap(), ConstraintOp::Le);
        assert_eq!("≤".parse::<ConstraintOp>().unwrap(), ConstraintOp::Le);
        assert_eq!("=".parse::<ConstraintOp>().unwrap(), ConstraintOp::Eq);
        assert_eq!("==".parse::<ConstraintOp>().unwrap(), ConstraintOp::Eq);
        assert_eq!(" >= ".parse::<ConstraintOp>().unwrap(), ConstraintOp::Ge);
        assert_eq!("≥".parse::<ConstraintOp>().unwrap(), ConstraintOp::Ge);

        match "<".parse::<ConstraintOp>() {
            Err(ModelError::UnknownOperator(sym)) => assert_eq!(sym, "<"),
            other => panic!("Expected unknown operator, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(ConstraintOp::Le.to_string(), "≤");
        assert_eq!(ConstraintOp::Ge.to_string(), "≥");
        assert_eq!(ConstraintOp::Eq.ascii(), "=");
    }

    #[test]
    fn test_slack_and_binding() {
        let c = capacity();
        assert!((c.lhs(&[1.0, 2.0]) - 3.0).abs() < 1e-12);
        assert!((c.slack(&[1.0, 2.0]) - 1.0).abs() < 1e-12);
        assert!(c.is_satisfied_by(&[4.0, 0.0], 1e-9));
        assert!(c.is_binding(&[4.0, 0.0], 1e-9));
        assert!(!c.is_satisfied_by(&[4.0, 0.5], 1e-9));
    }

    #[test]
    fn test_tolerance_scales_with_magnitude() {
        let large = Constraint {
            name: "budget".to_string(),
            coefficients: vec![1.0, 1.0],
            op: ConstraintOp::Le,
            rhs: 5e7,
        };
        // 1e-10 relative error, as a simplex leaves it at this size
        assert!(large.is_satisfied_by(&[5e7 + 0.01, 0.0], 1e-6));
        assert!(large.is_binding(&[5e7 + 0.01, 0.0], 1e-6));
        assert!(!large.is_satisfied_by(&[5e7 + 1000.0, 0.0], 1e-6));

        // the same absolute error on a small row is a real violation
        assert!(!capacity().is_satisfied_by(&[4.01, 0.0], 1e-6));
        assert!((capacity().scale(&[1.0, 2.0]) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_violation_description_keeps_small_amounts() {
        let model = Model::new(
            "test".to_string(),
            vec![Variable { name: "x".to_string(), index: 0 }],
            Objective {
                direction: Direction::Maximize,
                coefficients: vec![1.0],
            },
            vec![Constraint {
                name: "cap".to_string(),
                coefficients: vec![1.0],
                op: ConstraintOp::Le,
                rhs: 1.0,
            }],
        );

        let violations = model.violations(&[1.0001], 1e-6);
        assert_eq!(violations.len(), 1);
        assert!(
            violations[0].description.starts_with("cap exceeds maximum of 1 by 1.000e-4"),
            "{}",
            violations[0].description
        );
    }

    #[test]
    fn test_equality_slack() {
        let c = Constraint {
            name: "mix".to_string(),
            coefficients: vec![2.0, 1.0],
            op: ConstraintOp::Eq,
            rhs: 3.0,
        };
        assert!(c.is_satisfied_by(&[1.0, 1.0], 1e-9));
        assert!(!c.is_satisfied_by(&[1.0, 2.0], 1e-9));
        assert!(!c.is_satisfied_by(&[0.0, 2.0], 1e-9));
    }

    #[test]
    fn test_violations_sorted_worst_first() {
        let model = Model::new(
            "test".to_string(),
            vec![
                Variable { name: "x".to_string(), index: 0 },
                Variable { name: "y".to_string(), index: 1 },
            ],
            Objective {
                direction: Direction::Maximize,
                coefficients: vec![1.0, 1.0],
            },
            vec![
                capacity(),
                Constraint {
                    name: "floor".to_string(),
                    coefficients: vec![1.0, 0.0],
                    op: ConstraintOp::Ge,
                    rhs: 10.0,
                },
            ],
        );

        let violations = model.violations(&[5.0, 0.0], 1e-9);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].constraint, "floor");
        assert!((violations[0].violation_amount - 5.0).abs() < 1e-12);
        assert_eq!(violations[1].constraint, "capacity");
        assert!(violations[1].description.contains("exceeds maximum"));

        assert!((model.objective_value_at(&[5.0, 2.0]) - 7.0).abs() < 1e-12);
    }
}
