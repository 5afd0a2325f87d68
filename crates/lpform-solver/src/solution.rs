use std::fmt;

/// Outcome category of a solve
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// An optimal solution was found
    Optimal,
    /// No point satisfies all constraints
    Infeasible,
    /// The objective can be improved without limit
    Unbounded,
    /// The solver failed or returned a point that could not be trusted
    NotSolved,
}

impl SolveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of solving a model
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Variable names, in model order
    pub variables: Vec<String>,
    /// Full-precision values aligned with `variables`; empty unless optimal
    pub values: Vec<f64>,
    /// Objective at `values`; `None` unless optimal
    pub objective_value: Option<f64>,
    /// Solver diagnostics for non-optimal outcomes
    pub message: Option<String>,
}

impl SolveResult {
    pub fn optimal(variables: Vec<String>, values: Vec<f64>, objective_value: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            variables,
            values,
            objective_value: Some(objective_value),
            message: None,
        }
    }

    pub fn infeasible(variables: Vec<String>) -> Self {
        Self::without_values(SolveStatus::Infeasible, variables, None)
    }

    pub fn unbounded(variables: Vec<String>) -> Self {
        Self::without_values(SolveStatus::Unbounded, variables, None)
    }

    pub fn not_solved(variables: Vec<String>, message: impl Into<String>) -> Self {
        Self::without_values(SolveStatus::NotSolved, variables, Some(message.into()))
    }

    fn without_values(status: SolveStatus, variables: Vec<String>, message: Option<String>) -> Self {
        Self {
            status,
            variables,
            values: Vec::new(),
            objective_value: None,
            message,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// Value of the named variable, if a solution exists
    pub fn value(&self, name: &str) -> Option<f64> {
        let index = self.variables.iter().position(|v| v == name)?;
        self.values.get(index).copied()
    }

    /// Name/value pairs in variable order; empty unless optimal
    pub fn assignment(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.variables
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolveStatus::NotSolved.to_string(), "Not Solved");
    }

    #[test]
    fn test_value_lookup() {
        let result = SolveResult::optimal(
            vec!["chairs".to_string(), "tables".to_string()],
            vec![4.0, 0.0],
            12.0,
        );
        assert!(result.is_optimal());
        assert_eq!(result.value("chairs"), Some(4.0));
        assert_eq!(result.value("stools"), None);
        let pairs: Vec<_> = result.assignment().collect();
        assert_eq!(pairs, vec![("chairs", 4.0), ("tables", 0.0)]);
    }

    #[test]
    fn test_non_optimal_has_no_values() {
        let result = SolveResult::infeasible(vec!["x1".to_string()]);
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert_eq!(result.value("x1"), None);
        assert_eq!(result.objective_value, None);
        assert_eq!(result.assignment().count(), 0);

        let failed = SolveResult::not_solved(vec![], "boom");
        assert_eq!(failed.message.as_deref(), Some("boom"));
    }
}
