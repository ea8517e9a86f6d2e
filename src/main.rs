use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vk_dispatch_gen::{regenerate, ArtifactResult, Config, GenError, Mode, Outcome, Report};

#[derive(Parser)]
#[command(name = "vk-dispatch-gen")]
#[command(about = "Regenerate the Vulkan dispatch table regions of vk_helpers.h and vk_helpers.c")]
struct Cli {
    /// Repository root containing src/xrt/auxiliary/vk/vk_helpers.{h,c}
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Report stale artifacts without writing them
    #[arg(long)]
    check: bool,

    /// Print a JSON report instead of progress lines
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let start = Instant::now();
    let mode = if cli.check { Mode::Check } else { Mode::Write };

    let results = match regenerate(Config::with_root(&cli.root), mode) {
        Ok(results) => results,
        Err(e) => {
            eprint!("{}", render_error(&e));
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&Report::from_results(&results)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for result in &results {
            print_result(result);
        }
        print_summary(&results, start.elapsed());
    }

    let failed = results.iter().any(|r| r.result.is_err());
    let stale = results.iter().any(|r| matches!(r.result, Ok(Outcome::Stale)));
    if failed || stale {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn render_error(e: &GenError) -> String {
    if io::stderr().is_terminal() {
        e.render_color()
    } else {
        e.render()
    }
}

fn print_result(result: &ArtifactResult) {
    let is_tty = io::stderr().is_terminal();
    let path = result.path.display();
    match &result.result {
        Ok(Outcome::Written) if is_tty => eprintln!("  \x1b[32m✓\x1b[0m {}", path),
        Ok(Outcome::Written) => eprintln!("  ✓ {}", path),
        Ok(Outcome::Unchanged) => eprintln!("  = {} (unchanged)", path),
        Ok(Outcome::Stale) if is_tty => eprintln!("  \x1b[33m!\x1b[0m {} (stale)", path),
        Ok(Outcome::Stale) => eprintln!("  ! {} (stale)", path),
        Err(e) => eprint!("{}", render_error(e)),
    }
}

fn print_summary(results: &[ArtifactResult], elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let written = results
        .iter()
        .filter(|r| matches!(r.result, Ok(Outcome::Written)))
        .count();
    let failed = results.iter().filter(|r| r.result.is_err()).count();
    let files_word = if written == 1 { "file" } else { "files" };

    let mut summary = format!("Regenerated {} {} in {}", written, files_word, time_str);
    if failed > 0 {
        summary.push_str(&format!(", {} failed", failed));
    }

    if is_tty {
        eprintln!("\n\x1b[1m{}\x1b[0m", summary);
    } else {
        eprintln!("\n{}", summary);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
