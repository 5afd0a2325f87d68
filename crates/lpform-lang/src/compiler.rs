use std::collections::HashMap;

use lpform_solver::{ConstraintInput, Limits, Model, ModelError, ProblemInput};
use thiserror::Error;

use crate::ast::*;
use crate::lexer::Span;
use crate::parser::{ParseError, Parser};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Missing variables declaration")]
    MissingVariables,
    #[error("Missing objective (maximize or minimize)")]
    MissingObjective,
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String, span: Span },
    #[error("Duplicate variable: {name}")]
    DuplicateVariable { name: String, span: Span },
    #[error("Constant term not allowed on the left-hand side; move it to the right-hand side")]
    ConstantTerm { span: Span },
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl CompileError {
    /// Source location, when the error points at one
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Parse(e) => e.span(),
            CompileError::UnknownVariable { span, .. }
            | CompileError::DuplicateVariable { span, .. }
            | CompileError::ConstantTerm { span } => Some(*span),
            CompileError::MissingVariables
            | CompileError::MissingObjective
            | CompileError::Model(_) => None,
        }
    }
}

/// Lowers a parsed [`Program`] into a [`ProblemInput`].
pub struct Compiler {
    limits: Limits,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            limits: Limits::UNRESTRICTED,
        }
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self { limits }
    }

    /// Lower the program without validating it against the limits
    pub fn lower(&self, program: &Program) -> Result<ProblemInput, CompileError> {
        let decl = program
            .variables
            .as_ref()
            .ok_or(CompileError::MissingVariables)?;

        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, name) in decl.names.iter().enumerate() {
            if index.insert(name.text.as_str(), i).is_some() {
                return Err(CompileError::DuplicateVariable {
                    name: name.text.clone(),
                    span: name.span,
                });
            }
        }
        let variables: Vec<String> = decl.names.iter().map(|n| n.text.clone()).collect();

        let objective = program
            .objective
            .as_ref()
            .ok_or(CompileError::MissingObjective)?;
        let coefficients = dense(&objective.expr, &index)?;

        let mut input = ProblemInput::new(objective.direction, variables, coefficients);
        if let Some(heading) = &program.heading {
            input = input.with_heading(heading.text.clone());
        }

        for constraint in &program.constraints {
            input.constraints.push(ConstraintInput::new(
                constraint.name.clone().unwrap_or_default(),
                dense(&constraint.expr, &index)?,
                constraint.op,
                constraint.rhs,
            ));
        }

        Ok(input)
    }

    /// Lower and build, applying this compiler's limits
    pub fn compile(&self, program: &Program) -> Result<(ProblemInput, Model), CompileError> {
        let input = self.lower(program)?;
        let model = input.build_with(&self.limits)?;
        Ok((input, model))
    }
}

/// Parse `source` and compile it under `limits`
pub fn compile(source: &str, limits: &Limits) -> Result<(ProblemInput, Model), CompileError> {
    let program = Parser::parse(source)?;
    Compiler::with_limits(limits.clone()).compile(&program)
}

/// One coefficient per declared variable; repeated variables accumulate
fn dense(expr: &LinearExpr, index: &HashMap<&str, usize>) -> Result<Vec<f64>, CompileError> {
    let mut coefficients = vec![0.0; index.len()];
    for term in &expr.terms {
        let Some(name) = &term.variable else {
            return Err(CompileError::ConstantTerm { span: term.span });
        };
        let &i = index
            .get(name.as_str())
            .ok_or_else(|| CompileError::UnknownVariable {
                name: name.clone(),
                span: term.span,
            })?;
        coefficients[i] += term.coefficient;
    }
    Ok(coefficients)
}
