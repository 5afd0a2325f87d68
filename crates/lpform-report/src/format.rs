//! Text rendering of numbers, expressions and constraints.

use lpform_solver::{Constraint, Model};

/// Render a number the way the form displays it: whole numbers keep one
/// decimal (`4.0`), everything else uses the shortest exact representation.
pub fn number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0.0
        return "0.0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Round for display only
pub fn round(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// `3.0×x1 + 2.0×x2`; negative coefficients are written as subtraction
pub fn linear_expr(coefficients: &[f64], names: &[String]) -> String {
    let mut out = String::new();
    for (i, (coef, name)) in coefficients.iter().zip(names).enumerate() {
        let negative = coef.is_sign_negative() && *coef != 0.0;
        match (i, negative) {
            (0, false) => {}
            (0, true) => out.push('-'),
            (_, false) => out.push_str(" + "),
            (_, true) => out.push_str(" - "),
        }
        out.push_str(&number(coef.abs()));
        out.push('×');
        out.push_str(name);
    }
    out
}

/// `Maximize: 3.0×x1 + 2.0×x2`
pub fn objective_line(model: &Model) -> String {
    let objective = model.objective();
    format!(
        "{}: {}",
        objective.direction,
        linear_expr(&objective.coefficients, &model.variable_names())
    )
}

/// `capacity: 1.0×x1 + 1.0×x2 ≤ 4.0`
pub fn constraint_line(model: &Model, constraint: &Constraint) -> String {
    format!(
        "{}: {} {} {}",
        constraint.name,
        linear_expr(&constraint.coefficients, &model.variable_names()),
        constraint.op,
        number(constraint.rhs)
    )
}

/// One line per constraint, in model order
pub fn formulation(model: &Model) -> Vec<String> {
    model
        .constraints()
        .iter()
        .map(|c| constraint_line(model, c))
        .collect()
}
