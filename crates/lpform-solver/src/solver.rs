use log::{debug, trace, warn};
use microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::problem::{ConstraintOp, Direction, Model};
use crate::solution::SolveResult;

/// What a backend reports for a model
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Optimal { values: Vec<f64>, objective: f64 },
    Infeasible,
    Unbounded,
    Failed(String),
}

/// The single point where an LP library is invoked.
///
/// Backends receive a validated [`Model`] and must treat every variable as
/// continuous with bounds `[0, ∞)`.
pub trait Backend {
    fn solve(&self, model: &Model) -> Outcome;
}

/// Backend using the pure-Rust `microlp` simplex solver
#[derive(Debug, Clone, Copy, Default)]
pub struct Microlp;

impl Backend for Microlp {
    fn solve(&self, model: &Model) -> Outcome {
        let direction = match model.objective().direction {
            Direction::Maximize => OptimizationDirection::Maximize,
            Direction::Minimize => OptimizationDirection::Minimize,
        };
        let mut problem = Problem::new(direction);
        let vars: Vec<_> = model
            .objective()
            .coefficients
            .iter()
            .map(|&coef| problem.add_var(coef, (0.0, f64::INFINITY)))
            .collect();

        for c in model.constraints() {
            let terms: Vec<_> = vars
                .iter()
                .zip(&c.coefficients)
                .filter(|(_, coef)| **coef != 0.0)
                .map(|(&var, &coef)| (var, coef))
                .collect();

            // A row without terms reduces to `0 op rhs`
            if terms.is_empty() {
                if c.is_satisfied_by(&[], 0.0) {
                    trace!("dropping trivially satisfied constraint {}", c.name);
                    continue;
                }
                debug!("constraint {} has no terms and cannot hold", c.name);
                return Outcome::Infeasible;
            }

            let op = match c.op {
                ConstraintOp::Le => ComparisonOp::Le,
                ConstraintOp::Eq => ComparisonOp::Eq,
                ConstraintOp::Ge => ComparisonOp::Ge,
            };
            problem.add_constraint(terms.as_slice(), op, c.rhs);
        }

        match problem.solve() {
            Ok(solution) => Outcome::Optimal {
                values: vars.iter().map(|&v| solution[v]).collect(),
                objective: solution.objective(),
            },
            Err(microlp::Error::Infeasible) => Outcome::Infeasible,
            Err(microlp::Error::Unbounded) => Outcome::Unbounded,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// Solve orchestrator: runs a backend and packages a [`SolveResult`]
pub struct Solver<B = Microlp> {
    backend: B,
    /// Relative tolerance used when checking the returned point
    tolerance: f64,
}

impl Default for Solver {
    fn default() -> Self {
        Self::with_backend(Microlp)
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Backend> Solver<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            tolerance: 1e-6,
        }
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Solve the model. Solver failures are reported through the status,
    /// never as an error.
    pub fn solve(&self, model: &Model) -> SolveResult {
        debug!(
            "solving {:?}: {} {} variables, {} constraints",
            model.heading(),
            model.objective().direction,
            model.num_variables(),
            model.num_constraints()
        );

        let names = model.variable_names();
        let result = match self.backend.solve(model) {
            Outcome::Optimal { values, objective } => {
                trace!("backend objective {} at {:?}", objective, values);
                self.verify(model, names, values)
            }
            Outcome::Infeasible => SolveResult::infeasible(names),
            Outcome::Unbounded => SolveResult::unbounded(names),
            Outcome::Failed(message) => {
                warn!("solver failed: {}", message);
                SolveResult::not_solved(names, message)
            }
        };

        debug!("status: {}", result.status);
        result
    }

    /// Accept the backend's point only if it is feasible for the model
    fn verify(&self, model: &Model, names: Vec<String>, values: Vec<f64>) -> SolveResult {
        if values.len() != model.num_variables() {
            let message = format!(
                "solver returned {} values for {} variables",
                values.len(),
                model.num_variables()
            );
            warn!("{}", message);
            return SolveResult::not_solved(names, message);
        }

        // negative rounding noise is judged against the size of the point
        let floor = -self.tolerance * (1.0 + values.iter().fold(0.0_f64, |m, v| m.max(v.abs())));
        if let Some((name, value)) = names
            .iter()
            .zip(&values)
            .find(|(_, value)| !value.is_finite() || **value < floor)
        {
            let message = format!("solver returned {} = {} outside [0, inf)", name, value);
            warn!("{}", message);
            return SolveResult::not_solved(names, message);
        }

        if let Some(worst) = model.violations(&values, self.tolerance).into_iter().next() {
            let message = format!("solver returned an infeasible point: {}", worst.description);
            warn!("{}", message);
            return SolveResult::not_solved(names, message);
        }

        let objective = model.objective_value_at(&values);
        SolveResult::optimal(names, values, objective)
    }
}
