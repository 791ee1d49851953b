//! CLI comparing the iterative methods on a Matrix Market system.
//!
//! The exact solution is taken as x = (1, …, 1) and b = A x, so every method's error
//! against the true solution can be reported.

use anyhow::Context;
use clap::Parser;
use itersolve::{Method, SolverOptions, read_matrix_market, run_methods};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "itersolve")]
#[command(about = "Compare Jacobi, Gauss-Seidel, gradient and conjugate gradient on a sparse system", long_about = None)]
struct Cli {
    /// Matrix Market file (coordinate, real or integer)
    matrix: PathBuf,

    /// Method to run (repeatable); all methods when omitted
    #[arg(short, long = "method")]
    methods: Vec<String>,

    /// Relative-residual tolerance (repeatable)
    #[arg(short, long = "tol", default_values_t = vec![1e-4, 1e-6, 1e-8, 1e-10])]
    tols: Vec<f64>,

    /// Iteration cap
    #[arg(long, default_value_t = itersolve::MAXITE)]
    max_iters: usize,

    /// Log progress every N iterations (0 = silent)
    #[arg(long, default_value_t = 0)]
    report_interval: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let methods = if cli.methods.is_empty() {
        Method::ALL.to_vec()
    } else {
        cli.methods
            .iter()
            .map(|m| m.parse::<Method>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let a = read_matrix_market(&cli.matrix)
        .with_context(|| format!("reading {}", cli.matrix.display()))?;
    let x = vec![1.0; a.ncols()];
    let b = a.mul_vec(&x);
    println!(
        "{}: {}x{}, {} nonzeros",
        cli.matrix.display(),
        a.nrows(),
        a.ncols(),
        a.nnz()
    );

    for &tol in &cli.tols {
        let opts = SolverOptions::new(tol)
            .with_max_iters(cli.max_iters)
            .with_report_interval(cli.report_interval);
        println!("\ntol = {tol:e}");
        println!("{:<22} {:>14} {:>10} {:>12}", "method", "rel. error", "iters", "time [s]");
        for outcome in run_methods(&methods, &a, &b, &x, &opts) {
            match &outcome.result {
                Ok(report) => println!(
                    "{:<22} {:>14.6e} {:>10} {:>12.6}",
                    outcome.method.name(),
                    report.rel_error,
                    report.iterations,
                    report.elapsed_secs()
                ),
                Err(e) if e.is_divergence() => println!(
                    "{:<22} did not converge within limit ({} iterations)",
                    outcome.method.name(),
                    cli.max_iters
                ),
                Err(e) => println!("{:<22} skipped: {e}", outcome.method.name()),
            }
        }
    }
    Ok(())
}
