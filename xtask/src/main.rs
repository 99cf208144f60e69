use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the fare comparison workspace",
    long_about = "A unified CLI for running the fare-compare tool, the demo example,\n\
                  benchmarks, and CI checks in the fare comparison workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the fare-compare CLI, forwarding any arguments
    Compare {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run the compare_trip example (one trip priced across the day)
    Demo,
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, examples, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build and run the examples
    Examples,
    /// Run benchmarks
    Bench,
    /// Run check + examples + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

/// Run cargo and exit with its status code on failure.
fn run_cargo(args: &[&str]) {
    eprintln!("+ cargo {}", args.join(" "));
    let status = match Command::new("cargo").args(args).status() {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute cargo: {error}");
            exit(1);
        }
    };
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

const BENCH_ARGS: &[&str] = &["bench", "--package", "fare_core", "--bench", "performance"];

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fare_core");
    run_cargo(&["test", "-p", "fare_core", "--all-features"]);

    step("Test fare_cli");
    run_cargo(&["test", "-p", "fare_cli"]);
}

fn ci_examples() {
    step("Run compare_trip");
    run_cargo(&["run", "-p", "fare_core", "--example", "compare_trip"]);

    step("Run fare-compare against the straight-line router");
    run_cargo(&[
        "run",
        "-p",
        "fare_cli",
        "--",
        "estimate",
        "Mexico Square",
        "Bole International Airport",
        "--hour",
        "7",
        "--no-history",
    ]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(BENCH_ARGS);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare { args } => {
            let mut cargo_args = vec!["run", "-p", "fare_cli", "--"];
            cargo_args.extend(args.iter().map(String::as_str));
            run_cargo(&cargo_args);
        }
        Commands::Demo => {
            run_cargo(&["run", "-p", "fare_core", "--example", "compare_trip"]);
        }
        Commands::Bench => {
            run_cargo(BENCH_ARGS);
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Examples => ci_examples(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_examples();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
