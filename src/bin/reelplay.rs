//! reelplay - render an annotation catalog into a directive script
//!
//! Plays the full walkthrough against a recording sink and writes the
//! resulting directive script (JSON, or a human-readable listing) to stdout
//! or a file. The script is everything a rendering runtime needs to draw
//! the walkthrough; reelplay itself never touches pixels.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use annoreel::{
    DetectionCatalog, IdentityAssets, PlaybackConfig, ScriptRecorder, Sequencer, SequencerState,
    Timeline,
};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the catalog JSON file.
    #[arg(long)]
    catalog: String,
    /// Output path for the directive script; stdout when omitted.
    #[arg(long)]
    output: Option<String>,
    /// Output format: json or text.
    #[arg(long, default_value = "json")]
    format: String,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = PlaybackConfig::load()?;
    let catalog = DetectionCatalog::from_json_file(&args.catalog)?;
    log::info!(
        "catalog {}: {} subjects",
        args.catalog,
        catalog.len()
    );

    let is_tty = std::io::stderr().is_terminal();
    let ui = ui::Ui::from_args(Some(&args.ui), is_tty);
    let mut bar = ui.subject_bar(catalog.len() as u64);

    let resolver = IdentityAssets;
    let mut sequencer = Sequencer::new(&catalog, &resolver, &config)?;
    let mut timeline = Timeline::new(ScriptRecorder::new());
    loop {
        let before = sequencer.state();
        let subject = sequencer.subject_index();
        let next = sequencer.step(&mut timeline)?;
        if before == SequencerState::Hold {
            bar.advance(&catalog.subjects()[subject].background);
        }
        if next == SequencerState::Done {
            break;
        }
    }
    bar.finish();

    let total_ms = timeline.now_ms();
    let script = timeline.into_sink().into_script();
    log::info!("{} directives, {}ms of playback", script.len(), total_ms);

    let rendered = match args.format.as_str() {
        "json" => {
            let mut json =
                serde_json::to_string_pretty(&script).context("serializing directive script")?;
            json.push('\n');
            json
        }
        "text" => {
            let mut listing = String::new();
            for directive in &script {
                listing.push_str(&directive.to_string());
                listing.push('\n');
            }
            listing
        }
        other => anyhow::bail!("unknown format {:?} (expected json or text)", other),
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing script to {}", path))?,
        None => print!("{}", rendered),
    }
    Ok(())
}
