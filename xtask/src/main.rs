use std::env;
use std::path::Path;
use std::process::{Command, ExitCode};

fn cargo(root: &Path, args: &[&str]) -> Result<(), String> {
    let shown = args.join(" ");
    let status = Command::new(env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()))
        .args(args)
        .current_dir(root)
        .status()
        .map_err(|e| format!("failed to run `cargo {shown}`: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("command failed: cargo {shown}"))
    }
}

const FMT: &[&str] = &["fmt", "--all", "--", "--check"];
const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];
const TEST: &[&str] = &["test", "--workspace"];
const BENCH_BUILD: &[&str] = &["bench", "-p", "semlink-reconcile", "--no-run"];

fn main() -> ExitCode {
    let arg = env::args().nth(1).unwrap_or_else(|| "help".to_string());
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let root = manifest_dir.parent().unwrap_or(manifest_dir);

    let result = match arg.as_str() {
        "fmt" => cargo(root, FMT),
        "clippy" => cargo(root, CLIPPY),
        "test" => cargo(root, TEST),
        "ci" => [FMT, CLIPPY, TEST, BENCH_BUILD]
            .iter()
            .try_for_each(|args| cargo(root, args)),
        "help" | "--help" | "-h" => {
            eprintln!("xtask commands:");
            eprintln!("  fmt      check formatting");
            eprintln!("  clippy   lint every target, warnings denied");
            eprintln!("  test     run the workspace tests");
            eprintln!("  ci       all of the above plus a bench build");
            Ok(())
        }
        _ => Err(format!(
            "unknown xtask command: {arg} (try `cargo run -p xtask -- help`)"
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
