use clap::{ArgAction, Parser, Subcommand};
use log::{debug, info, warn};
use lpform_lang::CompileError;
use lpform_report::{Report, ReportOptions, csv};
use lpform_solver::{Limits, Model, ProblemInput, Solver};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "lpform")]
#[command(about = "Build, solve and report small linear programs", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a problem and print the report
    Solve {
        /// Problem file: `.json` for a serialized problem input, anything else for the text notation
        file: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Write the solution as CSV, to PATH or a timestamped file name
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        csv: Option<Option<PathBuf>>,
        /// Decimal places shown for results
        #[arg(short, long, default_value_t = 3)]
        precision: usize,
        /// Accept any number of variables and constraints
        #[arg(long)]
        unrestricted: bool,
    },
    /// Check a problem file for errors
    Check {
        /// The file to check
        file: PathBuf,
        /// Accept any number of variables and constraints
        #[arg(long)]
        unrestricted: bool,
    },
    /// Parse a problem file and output the AST
    Parse {
        /// The file to parse
        file: PathBuf,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

fn setup_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    use fern::colors::{Color, ColoredLevelConfig};
    let colors = ColoredLevelConfig::new()
        .debug(Color::White)
        .info(Color::Green)
        .warn(Color::BrightYellow)
        .error(Color::BrightRed);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} | {:5} | {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    }
}

fn report_compile_error(file: &Path, source: &str, err: &CompileError) -> ! {
    let kind = match err {
        CompileError::Parse(_) => "Parse",
        CompileError::Model(_) => "Model",
        _ => "Compile",
    };
    match err.span() {
        Some(span) => {
            let (line, col) = span.line_col(source);
            eprintln!("{} error: {}:{}:{}: {}", kind, file.display(), line, col, err);
        }
        None => eprintln!("{} error: {}", kind, err),
    }
    std::process::exit(1);
}

/// Load a problem from JSON or the text notation and build it under `limits`
fn load(file: &Path, limits: &Limits) -> (ProblemInput, Model) {
    let source = read_source(file);

    if file.extension().is_some_and(|ext| ext == "json") {
        debug!("reading {} as problem input JSON", file.display());
        let input: ProblemInput = match serde_json::from_str(&source) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Parse error: {}", e);
                std::process::exit(1);
            }
        };
        return match input.build_with(limits) {
            Ok(model) => (input, model),
            Err(e) => {
                eprintln!("Model error: {}", e);
                std::process::exit(1);
            }
        };
    }

    debug!("reading {} as problem notation", file.display());
    match lpform_lang::compile(&source, limits) {
        Ok(compiled) => compiled,
        Err(e) => report_compile_error(file, &source, &e),
    }
}

fn limits(unrestricted: bool) -> Limits {
    if unrestricted {
        Limits::UNRESTRICTED
    } else {
        Limits::FORM
    }
}

fn write_csv(report: &Report, path: Option<PathBuf>) {
    let Some(content) = &report.csv else {
        warn!("no optimal solution, CSV not written");
        return;
    };
    let path = path.unwrap_or_else(|| {
        PathBuf::from(csv::export_file_name(&chrono::Local::now().naive_local()))
    });
    if let Err(e) = std::fs::write(&path, content) {
        eprintln!("Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }
    info!("wrote {}", path.display());
    eprintln!("Solution written to {}", path.display());
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if let Err(e) = setup_logger(level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match cli.command {
        Commands::Solve {
            file,
            format,
            csv,
            precision,
            unrestricted,
        } => {
            let (_, model) = load(&file, &limits(unrestricted));

            let result = Solver::new().solve(&model);
            let options = ReportOptions {
                precision,
                ..ReportOptions::default()
            };
            let report = Report::new(&model, &result, &options);

            if format == "json" {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing report: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print!("{}", report.render_text());
            }

            if let Some(path) = csv {
                write_csv(&report, path);
            }

            if !report.is_optimal() {
                std::process::exit(1);
            }
        }
        Commands::Check { file, unrestricted } => {
            let (_, model) = load(&file, &limits(unrestricted));
            println!(
                "{}: {} variables, {} constraints",
                model.heading(),
                model.num_variables(),
                model.num_constraints()
            );
            println!("No errors found");
        }
        Commands::Parse { file, format } => {
            let source = read_source(&file);

            match lpform_lang::Parser::parse(&source) {
                Ok(program) => {
                    if format == "json" {
                        match serde_json::to_string_pretty(&program) {
                            Ok(json) => println!("{}", json),
                            Err(e) => {
                                eprintln!("Error serializing AST: {}", e);
                                std::process::exit(1);
                            }
                        }
                    } else {
                        println!("{:#?}", program);
                    }
                }
                Err(e) => {
                    report_compile_error(&file, &source, &CompileError::Parse(e));
                }
            }
        }
    }
}
