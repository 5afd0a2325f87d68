use lpform_solver::{Model, SolveResult};
use serde::Serialize;

/// Break-even style summary of an optimal solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Economics {
    /// Sum of objective coefficient times value
    pub total_cost: f64,
    /// Sum of all variable values
    pub total_units: f64,
    /// `total_cost / total_units`; `None` when no units are produced
    pub average_cost: Option<f64>,
}

impl Economics {
    /// `None` unless the result is optimal
    pub fn from_solution(model: &Model, result: &SolveResult) -> Option<Self> {
        if !result.is_optimal() {
            return None;
        }

        let total_cost = model.objective_value_at(&result.values);
        let total_units: f64 = result.values.iter().sum();
        let average_cost = if total_units == 0.0 {
            None
        } else {
            Some(total_cost / total_units)
        };

        Some(Self {
            total_cost,
            total_units,
            average_cost,
        })
    }
}
