//! Convert a dialysis-session binary log to CSV.
//!
//! Usage: `dialysis-log-convert <input> [output-dir]`
//!
//! Prints the decoded table and writes `<stem>_converted.csv` next to the
//! input, or into `output-dir` when given. Set `DIALYSIS_LOG_CONFIG` to a
//! JSON config file to override defaults; `RUST_LOG` controls logging.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use dialysis_log_core::{ConverterConfig, FileSource, Session};
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "DIALYSIS_LOG_CONFIG";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        tracing::error!("{:#}", e);
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let (input, output_dir) = match args {
        [input] => (PathBuf::from(input), None),
        [input, output_dir] => (PathBuf::from(input), Some(PathBuf::from(output_dir))),
        _ => bail!("usage: dialysis-log-convert <input> [output-dir]"),
    };

    let config = load_config()?;
    let (table, written) = convert(&input, output_dir.as_deref(), config)?;
    print!("{}", table);
    println!("wrote {}", written.display());
    Ok(())
}

fn load_config() -> Result<ConverterConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => ConverterConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", PathBuf::from(&path).display())),
        None => Ok(ConverterConfig::default()),
    }
}

/// Decode `input`, write its CSV, and return the rendered table and the
/// path written.
fn convert(
    input: &Path,
    output_dir: Option<&Path>,
    config: ConverterConfig,
) -> Result<(String, PathBuf)> {
    let mut session = Session::new(config);
    let mut source = FileSource::new(input);
    let log = session
        .load(&mut source)
        .with_context(|| format!("reading {}", input.display()))?;
    let table = log.table().render_text();

    let document = session.export_csv()?;
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    let target = dir.join(&document.file_name);
    std::fs::write(&target, document.contents.as_bytes())
        .with_context(|| format!("writing {}", target.display()))?;

    tracing::info!(path = %target.display(), "wrote CSV");
    Ok((table, target))
}
