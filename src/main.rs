use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use gtin_barcodes::cli::{Cli, Mode};
use gtin_barcodes::logger;
use gtin_barcodes::{
    BatchDir, BatchPathBuilder, BatchRunner, BatchSummary, Config, DelimitedLineParser, Ean13Renderer, Error,
    FontText, LineSource, Result, SheetSource, SourceRow, SystemClock,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;
    tracing::debug!("config: {config:?}");
    Ok(config)
}

fn choose_mode() -> Result<Mode> {
    print!("Mode  [1] Spreadsheet  /  [2] Paste codes  : ");
    io::stdout().flush()?;
    let mut choice = String::new();
    io::stdin().lock().read_line(&mut choice)?;
    match choice.trim() {
        "1" => Ok(Mode::Sheet { path: None, sheet: None, start_row: None, end_row: None }),
        "2" => Ok(Mode::Paste),
        other => Err(Error::config(format!("invalid choice {other:?}"))),
    }
}

fn run(cli: Cli) -> Result<BatchSummary> {
    let config = load_config(&cli)?;
    let render = &config.render;
    let text = FontText::load(&render.font_path, &render.font_family, render.font_size_px)?;

    let mode = match cli.mode.clone() {
        Some(mode) => mode,
        None => choose_mode()?,
    };

    // open the source first so a missing workbook leaves no empty batch folder
    let rows: Box<dyn Iterator<Item = Result<SourceRow>>> = match mode {
        Mode::Sheet { .. } => Box::new(SheetSource::open(&config.sheet)?),
        Mode::Paste => {
            println!("📥 Paste GTINs (one per line). Add a name with TAB or 2+ spaces.");
            println!("🧾 Example: 8684771191031    Pistachio Paste 200g");
            println!("🔚 Finish with an empty line or Ctrl+D.\n");
            Box::new(LineSource::new(io::stdin().lock(), DelimitedLineParser))
        }
    };

    let batch_path = BatchPathBuilder::new(&config.output.dir, &config.output.timestamp_format).build(&SystemClock)?;
    let dir = BatchDir::create(batch_path)?;

    let runner = BatchRunner::new(&Ean13Renderer, &text, render, &dir, &config.output.formats);
    let summary = runner.run_with(rows, |outcome| {
        let names: Vec<_> = outcome.artifacts.iter().map(|a| a.file_name()).collect();
        println!(" ✓  {}: {} → {}", outcome.id, outcome.gtin, names.join(", "));
    })?;

    for failure in &summary.failures {
        println!(" ✗  {}: {:?} → {}", failure.id, failure.code, failure.reason);
    }
    println!("\n✔ Done → {summary} → {}", dir.path().display());
    Ok(summary)
}
