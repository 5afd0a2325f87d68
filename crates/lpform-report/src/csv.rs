//! CSV export of an optimal solution.

use chrono::NaiveDateTime;
use lpform_solver::SolveResult;

use crate::format;

pub const OBJECTIVE_COLUMN: &str = "Objective Value";

/// Header of variable names plus `Objective Value`, then one row of
/// full-precision values. `None` unless the result is optimal.
pub fn solution_csv(result: &SolveResult) -> Option<String> {
    let objective = result.objective_value.filter(|_| result.is_optimal())?;

    let header: Vec<String> = result
        .variables
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(OBJECTIVE_COLUMN))
        .map(escape)
        .collect();
    let row: Vec<String> = result
        .values
        .iter()
        .chain(std::iter::once(&objective))
        .map(|&v| format::number(v))
        .collect();

    Some(format!("{}\n{}\n", header.join(","), row.join(",")))
}

/// `lp_solution_20240131_174501.csv`
pub fn export_file_name(timestamp: &NaiveDateTime) -> String {
    timestamp.format("lp_solution_%Y%m%d_%H%M%S.csv").to_string()
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_solution_csv() {
        let result = SolveResult::optimal(
            vec!["x1".to_string(), "x2".to_string()],
            vec![4.0, 1.0 / 3.0],
            12.0,
        );
        assert_eq!(
            solution_csv(&result).unwrap(),
            "x1,x2,Objective Value\n4.0,0.3333333333333333,12.0\n"
        );
    }

    #[test]
    fn test_quoted_names() {
        let result = SolveResult::optimal(
            vec!["chairs, oak".to_string(), "say \"hi\"".to_string()],
            vec![1.0, 2.0],
            3.0,
        );
        let csv = solution_csv(&result).unwrap();
        assert!(csv.starts_with("\"chairs, oak\",\"say \"\"hi\"\"\",Objective Value\n"));
    }

    #[test]
    fn test_no_csv_without_solution() {
        let result = SolveResult::unbounded(vec!["x1".to_string()]);
        assert_eq!(solution_csv(&result), None);
    }

    #[test]
    fn test_export_file_name() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(17, 45, 1)
            .unwrap();
        assert_eq!(export_file_name(&ts), "lp_solution_20240131_174501.csv");
    }
}
