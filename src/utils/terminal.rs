//! Terminal output for the demo binaries.
//!
//! Library code reports through the `log` macros (`RUST_LOG=info` shows the
//! lattice and boundary setup); the helpers here only render the banner and
//! the end-of-run summary on stdout, and forward fatal setup problems to
//! both the log sink and stderr.

use colored::*;

pub fn print_welcome_message() {
    println!("{}", "-".repeat(72));
    println!(
        "{}",
        r#"
   _____                          _      ____
  / ____|                        | |    |  _ \
 | |     _ __ ___ _ __ ___   __ _| |    | |_) |
 | |    | '__/ _ \ '_ ` _ \ / _` | |    |  _ <
 | |____| | |  __/ | | | | | (_| | |____| |_) |
  \_____|_|  \___|_| |_| |_|\__,_|______|____/
"#
        .blue()
        .bold()
    );
}

/// Report a fatal setup problem and leave; the message reaches the log sink
/// as well as stderr.
pub fn report_failure(message: &str) {
    log::error!("{message}");
    eprintln!("{} {}", "aborted:".red().bold(), message);
}

/// End-of-run summary with the usual lattice-updates-per-second figure.
pub fn print_metrics(time_steps: u64, elapsed_seconds: f64, mlups: f64) {
    println!("\n{}", "=".repeat(72));
    println!(
        "{} {} steps in {}",
        "finished:".green().bold(),
        time_steps,
        format_duration(elapsed_seconds)
    );
    println!("{} {:.2} million lattice-site updates per second", "throughput:".bold(), mlups);
    println!("{}", "=".repeat(72));
}

fn format_duration(seconds: f64) -> String {
    let whole = seconds as u64;
    if whole >= 3600 {
        format!("{}h {}m {:.1}s", whole / 3600, (whole % 3600) / 60, seconds % 60.0)
    } else if whole >= 60 {
        format!("{}m {:.1}s", whole / 60, seconds % 60.0)
    } else {
        format!("{seconds:.3}s")
    }
}
