//! WASM bindings for the browser form and editor
//!
//! Every entry point returns plain JavaScript objects built with `serde-wasm-bindgen`.

use chrono::NaiveDate;
use lpform_report::{Report, ReportOptions, csv};
use lpform_solver::{Limits, Model, ProblemInput, Solver};
use wasm_bindgen::prelude::*;

use crate::compiler::compile;
use crate::lexer::Lexer;
use crate::parser::Parser;

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn report(model: &Model) -> Result<JsValue, JsValue> {
    let result = Solver::new().solve(model);
    to_js(&Report::new(model, &result, &ReportOptions::default()))
}

/// Solve a problem submitted from the form
///
/// `input` is a serialized `ProblemInput`; the form's dimension limits apply.
#[wasm_bindgen]
pub fn solve_form(input: JsValue) -> Result<JsValue, JsValue> {
    let input: ProblemInput =
        serde_wasm_bindgen::from_value(input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let model = input
        .build_with(&Limits::FORM)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    report(&model)
}

/// Compile and solve source text, returning the report as JSON
#[wasm_bindgen]
pub fn solve(source: &str) -> Result<JsValue, JsValue> {
    let (_, model) =
        compile(source, &Limits::UNRESTRICTED).map_err(|e| JsValue::from_str(&e.to_string()))?;
    report(&model)
}

/// Parse source code and return the AST as JSON
#[wasm_bindgen]
pub fn parse(source: &str) -> Result<JsValue, JsValue> {
    let program = Parser::parse(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&program)
}

/// Tokenize source code and return tokens as JSON
#[wasm_bindgen]
pub fn tokenize(source: &str) -> Result<JsValue, JsValue> {
    let tokens: Vec<TokenInfo> = Lexer::tokenize(source)
        .into_iter()
        .map(|t| TokenInfo {
            kind: format!("{:?}", t.kind),
            text: t.text,
            start: t.span.start,
            end: t.span.end,
        })
        .collect();
    to_js(&tokens)
}

#[derive(serde::Serialize)]
struct TokenInfo {
    kind: String,
    text: String,
    start: usize,
    end: usize,
}

/// Validate source code and return diagnostics as JSON
#[wasm_bindgen]
pub fn validate(source: &str) -> JsValue {
    serde_wasm_bindgen::to_value(&diagnostics(source)).unwrap_or(JsValue::NULL)
}

#[derive(serde::Serialize, Debug, PartialEq)]
struct Diagnostic {
    start: usize,
    end: usize,
    line: usize,
    column: usize,
    severity: &'static str,
    message: String,
}

fn diagnostics(source: &str) -> Vec<Diagnostic> {
    let Err(err) = compile(source, &Limits::UNRESTRICTED) else {
        return Vec::new();
    };
    let span = err.span().unwrap_or(crate::Span::new(0, source.len()));
    let (line, column) = span.line_col(source);
    vec![Diagnostic {
        start: span.start,
        end: span.end,
        line,
        column,
        severity: "error",
        message: err.to_string(),
    }]
}

/// Default CSV download name, stamped with the browser's local time
#[wasm_bindgen]
pub fn export_file_name() -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let timestamp = NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
        .and_then(|d| d.and_hms_opt(now.get_hours(), now.get_minutes(), now.get_seconds()))
        .ok_or_else(|| JsValue::from_str("Invalid date"))?;
    Ok(csv::export_file_name(&timestamp))
}
