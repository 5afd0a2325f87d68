//! Presentation data for a solved linear program.
//!
//! Everything here is derived from a [`Model`] and its [`SolveResult`]; nothing feeds
//! back into solving. Values are rounded only when displayed.

pub mod csv;
mod economics;
pub mod format;
pub mod plot;

use std::fmt::Write;

use lpform_solver::{Model, SolveResult, SolveStatus};
use serde::Serialize;

pub use economics::Economics;
pub use plot::{BoundaryLine, PlotData, PlotRange};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportOptions {
    /// Decimal places shown for metrics
    pub precision: usize,
    pub plot: PlotRange,
    /// Tolerance for marking constraints as binding
    pub tolerance: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: 3,
            plot: PlotRange::default(),
            tolerance: 1e-6,
        }
    }
}

/// A labelled value, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: f64,
}

/// One metric per variable plus the objective; empty unless optimal
pub fn metrics(result: &SolveResult, precision: usize) -> Vec<Metric> {
    let Some(objective) = result.objective_value.filter(|_| result.is_optimal()) else {
        return Vec::new();
    };

    result
        .assignment()
        .chain(std::iter::once((csv::OBJECTIVE_COLUMN, objective)))
        .map(|(label, value)| Metric {
            label: label.to_string(),
            value: format::round(value, precision),
        })
        .collect()
}

/// A constraint as listed in the formulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulationLine {
    pub name: String,
    pub text: String,
    /// Tight at the optimal point; always false without a solution
    pub binding: bool,
}

/// Everything a front end needs to present one solve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub heading: String,
    pub status: SolveStatus,
    pub message: Option<String>,
    pub objective: String,
    pub formulation: Vec<FormulationLine>,
    pub metrics: Vec<Metric>,
    pub economics: Option<Economics>,
    pub plot: PlotData,
    pub csv: Option<String>,
    #[serde(skip)]
    precision: usize,
}

impl Report {
    pub fn new(model: &Model, result: &SolveResult, options: &ReportOptions) -> Self {
        let formulation = model
            .constraints()
            .iter()
            .map(|c| FormulationLine {
                name: c.name.clone(),
                text: format::constraint_line(model, c),
                binding: result.is_optimal() && c.is_binding(&result.values, options.tolerance),
            })
            .collect();

        Self {
            heading: model.heading().to_string(),
            status: result.status,
            message: result.message.clone(),
            objective: format::objective_line(model),
            formulation,
            metrics: metrics(result, options.precision),
            economics: Economics::from_solution(model, result),
            plot: PlotData::from_solution(model, result, &options.plot),
            csv: csv::solution_csv(result),
            precision: options.precision,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn binding_constraints(&self) -> Vec<&str> {
        self.formulation
            .iter()
            .filter(|line| line.binding)
            .map(|line| line.name.as_str())
            .collect()
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.heading)?;
        writeln!(out, "{}", "=".repeat(self.heading.chars().count()))?;
        writeln!(out, "Status: {}", self.status)?;
        match self.status {
            SolveStatus::Optimal => {}
            SolveStatus::Infeasible => {
                writeln!(out, "No solution exists that satisfies all constraints.")?
            }
            SolveStatus::Unbounded => {
                writeln!(out, "The problem has no finite optimal solution.")?
            }
            SolveStatus::NotSolved => writeln!(out, "The solver did not produce a solution.")?,
        }
        if let Some(message) = &self.message {
            writeln!(out, "  {}", message)?;
        }
        writeln!(out)?;

        writeln!(out, "Objective:")?;
        writeln!(out, "  {}", self.objective)?;
        writeln!(out)?;

        writeln!(out, "Formulation:")?;
        for line in &self.formulation {
            if line.binding {
                writeln!(out, "  {}  (binding)", line.text)?;
            } else {
                writeln!(out, "  {}", line.text)?;
            }
        }

        if !self.metrics.is_empty() {
            writeln!(out)?;
            writeln!(out, "Results:")?;
            for metric in &self.metrics {
                writeln!(
                    out,
                    "  {:20} {:>14.prec$}",
                    metric.label,
                    metric.value,
                    prec = self.precision
                )?;
            }
        }

        if let Some(economics) = &self.economics {
            writeln!(out)?;
            writeln!(out, "Economic analysis:")?;
            writeln!(out, "  {:20} {:>14.2}", "Total cost", economics.total_cost)?;
            writeln!(out, "  {:20} {:>14.2}", "Total units", economics.total_units)?;
            match economics.average_cost {
                Some(avg) => writeln!(out, "  {:20} {:>14.2}", "Average cost/unit", avg)?,
                None => writeln!(out, "  {:20} {:>14}", "Average cost/unit", "n/a")?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lpform_solver::{ConstraintOp, Direction, ProblemInput, Solver};

    fn solved() -> (Model, SolveResult) {
        let mut input = ProblemInput::new(
            Direction::Maximize,
            vec!["x1".to_string(), "x2".to_string()],
            vec![3.0, 2.0],
        )
        .with_heading("Workshop");
        input.add_constraint("capacity", vec![1.0, 1.0], ConstraintOp::Le, 4.0);
        input.add_constraint("x2_cap", vec![0.0, 1.0], ConstraintOp::Le, 3.0);
        let model = input.build().unwrap();
        let result = Solver::new().solve(&model);
        (model, result)
    }

    #[test]
    fn test_metrics_rounded() {
        let result = SolveResult::optimal(
            vec!["a".to_string(), "b".to_string()],
            vec![1.0 / 3.0, 2.0],
            2.0 / 3.0,
        );
        let metrics = metrics(&result, 3);
        assert_eq!(metrics.len(), 3);
        assert_eq!(metrics[0], Metric { label: "a".to_string(), value: 0.333 });
        assert_eq!(metrics[2].label, "Objective Value");
        assert_eq!(metrics[2].value, 0.667);
        // the result itself keeps full precision
        assert_eq!(result.values[0], 1.0 / 3.0);
    }

    #[test]
    fn test_report_for_optimal_solution() {
        let (model, result) = solved();
        let report = Report::new(&model, &result, &ReportOptions::default());

        assert!(report.is_optimal());
        assert_eq!(report.heading, "Workshop");
        assert_eq!(report.objective, "Maximize: 3.0×x1 + 2.0×x2");
        assert_eq!(report.binding_constraints(), vec!["capacity"]);
        assert_eq!(report.metrics.last().unwrap().value, 12.0);
        assert!(report.csv.as_deref().unwrap().starts_with("x1,x2,Objective Value\n"));
        assert!(matches!(report.plot, PlotData::Planar { optimum: Some(_), .. }));

        let text = report.render_text();
        assert!(text.starts_with("Workshop\n========\nStatus: Optimal\n"));
        assert!(text.contains("capacity: 1.0×x1 + 1.0×x2 ≤ 4.0  (binding)"));
        assert!(text.contains("  x2_cap: 0.0×x1 + 1.0×x2 ≤ 3.0\n"));
        assert!(text.contains("Objective Value"));
        assert!(text.contains("Average cost/unit"));
    }

    #[test]
    fn test_report_for_infeasible_problem() {
        let (model, _) = solved();
        let result = SolveResult::infeasible(model.variable_names());
        let report = Report::new(&model, &result, &ReportOptions::default());

        assert!(!report.is_optimal());
        assert!(report.metrics.is_empty());
        assert!(report.binding_constraints().is_empty());
        assert_eq!(report.economics, None);
        assert_eq!(report.csv, None);

        let text = report.render_text();
        assert!(text.contains("Status: Infeasible"));
        assert!(text.contains("No solution exists"));
        assert!(!text.contains("Results:"));
    }

    #[test]
    fn test_binding_on_large_model() {
        let mut input = ProblemInput::new(
            Direction::Maximize,
            vec!["x1".to_string(), "x2".to_string()],
            vec![1.0, 1.0],
        );
        input.add_constraint("budget", vec![1.0, 1.0], ConstraintOp::Le, 5e7);
        input.add_constraint("x2_cap", vec![0.0, 1.0], ConstraintOp::Le, 4e7);
        let model = input.build().unwrap();
        // solver output carrying rounding error of 1e-2 at this size
        let result = SolveResult::optimal(model.variable_names(), vec![5e7 - 0.01, 0.0], 5e7);

        let report = Report::new(&model, &result, &ReportOptions::default());
        assert_eq!(report.binding_constraints(), vec!["budget"]);
    }

    #[test]
    fn test_report_serializes() {
        let (model, result) = solved();
        let report = Report::new(&model, &result, &ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "Optimal");
        assert_eq!(json["plot"]["kind"], "planar");
        assert_eq!(json["plot"]["lines"].as_array().unwrap().len(), 2);
        assert_eq!(json["formulation"][0]["binding"], true);
        assert!(json.get("precision").is_none());
    }
}
