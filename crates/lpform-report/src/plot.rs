//! Plot geometry for 2- and 3-variable problems. Rendering is left to the caller.

use lpform_solver::{Model, SolveResult};
use serde::Serialize;

/// Horizontal extent and sampling of constraint boundary lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlotRange {
    pub x_min: f64,
    pub x_max: f64,
    pub samples: usize,
}

impl Default for PlotRange {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 20.0,
            samples: 400,
        }
    }
}

impl PlotRange {
    /// Evenly spaced sample positions, endpoints included
    pub fn xs(&self) -> Vec<f64> {
        match self.samples {
            0 => Vec::new(),
            1 => vec![self.x_min],
            n => {
                let step = (self.x_max - self.x_min) / (n - 1) as f64;
                (0..n).map(|i| self.x_min + step * i as f64).collect()
            }
        }
    }
}

/// Boundary `a·x + b·y = rhs` of one constraint, sampled as `y = (rhs − a·x) / b`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryLine {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlotData {
    Planar {
        axes: [String; 2],
        lines: Vec<BoundaryLine>,
        optimum: Option<[f64; 2]>,
    },
    Spatial {
        axes: [String; 3],
        optimum: Option<[f64; 3]>,
    },
    Unsupported,
}

impl PlotData {
    pub fn from_solution(model: &Model, result: &SolveResult, range: &PlotRange) -> Self {
        let names = model.variable_names();
        let values = result.is_optimal().then_some(result.values.as_slice());

        match names.as_slice() {
            [x, y] => {
                let xs = range.xs();
                let lines = model
                    .constraints()
                    .iter()
                    .filter(|c| c.coefficients[1] != 0.0)
                    .map(|c| {
                        let (a, b) = (c.coefficients[0], c.coefficients[1]);
                        BoundaryLine {
                            name: c.name.clone(),
                            points: xs.iter().map(|&x| [x, (c.rhs - a * x) / b]).collect(),
                        }
                    })
                    .collect();
                PlotData::Planar {
                    axes: [x.clone(), y.clone()],
                    lines,
                    optimum: values.map(|v| [v[0], v[1]]),
                }
            }
            [x, y, z] => PlotData::Spatial {
                axes: [x.clone(), y.clone(), z.clone()],
                optimum: values.map(|v| [v[0], v[1], v[2]]),
            },
            _ => PlotData::Unsupported,
        }
    }
}
