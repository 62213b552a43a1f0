use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use codeprobe_core::config::Config;
use codeprobe_core::CodeprobeError;
use codeprobe_diff::{merge_to_file, render, LineDiffer, SimilarDiffer, TextInput};
use codeprobe_inspector::{Inspector, JsError};

#[derive(Parser)]
#[command(
    name = "codeprobe",
    about = "Line diff/merge helper and browser-driven JavaScript error inspector",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare or merge texts line by line
    Diff {
        /// Task to run (auto picks merge when --base is given)
        #[arg(long, value_enum, default_value = "auto")]
        task: Task,

        /// First input: file path or literal text (Base64 with --base64)
        #[arg(long)]
        input1: String,

        /// Second input: file path or literal text (Base64 with --base64)
        #[arg(long)]
        input2: String,

        /// Merge base: file path or literal text (Base64 with --base64)
        #[arg(long)]
        base: Option<String>,

        /// Output file path (required for merge)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Treat all textual inputs as Base64-encoded
        #[arg(long)]
        base64: bool,
    },

    /// Load an HTML file in a headless browser and report JavaScript errors
    Inspect {
        /// Absolute path to the HTML file
        file: PathBuf,

        /// Navigation timeout in ms
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Run the browser with a visible window
        #[arg(long)]
        headed: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Task {
    Compare,
    Merge,
    Auto,
}

/// `auto` resolves to merge exactly when a base was supplied.
fn merge_requested(task: Task, has_base: bool) -> bool {
    match task {
        Task::Merge => true,
        Task::Compare => false,
        Task::Auto => has_base,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => Config::load(std::path::Path::new(path))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Diff {
            task,
            input1,
            input2,
            base,
            output,
            base64,
        } => run_diff(task, &input1, &input2, base.as_deref(), output, base64),
        Commands::Inspect {
            file,
            timeout_ms,
            headed,
        } => {
            let mut inspector_config = config.inspector();
            if let Some(timeout_ms) = timeout_ms {
                inspector_config.timeout_ms = timeout_ms;
            }
            if headed {
                inspector_config.headless = false;
            }
            run_inspect(inspector_config, &file).await;
            Ok(())
        }
    }
}

fn run_diff(
    task: Task,
    input1: &str,
    input2: &str,
    base: Option<&str>,
    output: Option<PathBuf>,
    base64: bool,
) -> anyhow::Result<()> {
    let differ = SimilarDiffer::new();

    if merge_requested(task, base.is_some()) {
        let output = output.ok_or(CodeprobeError::MissingOutput)?;
        let base = base.ok_or_else(|| anyhow::anyhow!("merge requires --base"))?;

        // File mode applies only when base and both inputs are all files.
        let inputs = TextInput::resolve_all(&[base, input1, input2], base64)?;

        merge_to_file(
            &differ,
            inputs[0].text(),
            inputs[1].text(),
            inputs[2].text(),
            &output,
        )?;
        println!("Merge result written to: {}", output.display());
    } else {
        let inputs = TextInput::resolve_all(&[input1, input2], base64)?;

        println!("{}", render(&differ.compare(inputs[0].text(), inputs[1].text())));
    }

    Ok(())
}

/// Inspection failures are printed, never propagated: the process exits
/// cleanly regardless of the outcome.
async fn run_inspect(config: codeprobe_core::config::InspectorConfig, file: &std::path::Path) {
    println!("Inspecting: {}", file.display());

    let mut inspector = Inspector::new(config);
    match inspector.inspect_file(file).await {
        Ok(errors) => print_report(&errors),
        Err(e) => println!("Inspection failed: {e}"),
    }
    if let Err(e) = inspector.close().await {
        tracing::warn!(error = %e, "inspector close failed");
    }
}

fn print_report(errors: &[JsError]) {
    if errors.is_empty() {
        println!("No JavaScript errors found");
        return;
    }

    println!("Found {} JavaScript error(s):", errors.len());
    for (i, error) in errors.iter().enumerate() {
        println!();
        println!("Error #{}:", i + 1);
        println!("Message: {}", error.message);
        if error.line_number > 0 {
            println!(
                "Location: line {}, column {}",
                error.line_number, error.column_number
            );
        }
        if !error.stack_trace.is_empty() {
            println!("Stack trace: {}", error.stack_trace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_auto_task_selection() {
        assert!(!merge_requested(Task::Auto, false));
        assert!(merge_requested(Task::Auto, true));
        assert!(merge_requested(Task::Merge, false));
        assert!(!merge_requested(Task::Compare, true));
    }

    #[test]
    fn test_merge_without_output_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.txt");
        std::fs::write(&base, "a\nb").unwrap();

        let err = run_diff(
            Task::Merge,
            base.to_str().unwrap(),
            base.to_str().unwrap(),
            Some(base.to_str().unwrap()),
            None,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("output"));
    }

    #[test]
    fn test_merge_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.txt");
        let left = dir.path().join("left.txt");
        let right = dir.path().join("right.txt");
        let out = dir.path().join("merged.txt");
        std::fs::write(&base, "a\nb\nc").unwrap();
        std::fs::write(&left, "a\nb\nc\nd").unwrap();
        std::fs::write(&right, "a\nb\nc\ne").unwrap();

        run_diff(
            Task::Merge,
            left.to_str().unwrap(),
            right.to_str().unwrap(),
            Some(base.to_str().unwrap()),
            Some(out.clone()),
            false,
        )
        .unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "a\nb\nc\nd\ne");
    }

    #[test]
    fn test_merge_mixed_inputs_treated_as_literal() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base.txt");
        let out = dir.path().join("merged.txt");
        std::fs::write(&base, "a\nb").unwrap();

        run_diff(
            Task::Merge,
            base.to_str().unwrap(),
            "not a file",
            Some(base.to_str().unwrap()),
            Some(out.clone()),
            false,
        )
        .unwrap();

        // One non-file input forces the whole set literal: the merge
        // operates on the raw path string, never the file contents.
        let merged = std::fs::read_to_string(&out).unwrap();
        assert!(merged.contains(base.to_str().unwrap()));
        assert!(!merged.contains("a\nb"));
    }

    #[test]
    fn test_compare_base64_decode_error_is_fatal() {
        let err = run_diff(Task::Compare, "!!!", "???", None, None, true).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
