use clap::Parser;
use docket::{ImageMode, LayoutId, PipelineBuilder, PipelineError, RecordId};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Renders a job card to PDF using a saved layout.
#[derive(Parser, Debug)]
#[command(version, about = "Render job cards to PDF")]
struct Args {
    /// Directory holding job records as `<id>.json`
    #[arg(long, default_value = "data/jobcards")]
    record_dir: PathBuf,

    /// Directory holding layouts as `<id>.json`
    #[arg(long, default_value = "data/layouts")]
    layout_dir: PathBuf,

    /// Id of the job record to render
    record_id: String,

    /// Id of the layout to render it with
    layout_id: String,

    /// JSON settings file (`exportPath`, `pdfVersion`, `imageMode`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export directory, overriding the settings file
    #[arg(short, long)]
    export_dir: Option<PathBuf>,

    /// Write the PDF to this file instead of the export directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decode images on the rayon pool
    #[arg(long)]
    parallel_images: bool,
}

fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let args = Args::parse();

    let mut builder = PipelineBuilder::new();
    if let Some(config) = &args.config {
        builder = builder.with_config_file(config)?;
    }
    if let Some(dir) = args.export_dir {
        builder = builder.with_export_dir(dir);
    }
    if args.parallel_images {
        builder = builder.with_image_mode(ImageMode::Parallel);
    }
    let pipeline = builder
        .with_record_dir(&args.record_dir)
        .with_layout_dir(&args.layout_dir)
        .build()?;

    let record_id: RecordId = args.record_id.as_str().into();
    let layout_id: LayoutId = args.layout_id.as_str().into();

    let report = match &args.output {
        Some(path) => {
            let file = BufWriter::new(File::create(path)?);
            let (mut file, report) = pipeline.render_to_writer(&record_id, &layout_id, file)?;
            file.flush()?;
            println!("{}", path.display());
            report
        }
        None => {
            let outcome = pipeline.export(&record_id, &layout_id)?;
            match &outcome.saved.path {
                Some(path) => println!("{}", path.display()),
                None => println!("{}", outcome.saved.name),
            }
            outcome.report
        }
    };

    info!(
        "{} page(s), {} element(s) drawn, {} skipped",
        report.pages,
        report.elements_drawn,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        eprintln!(
            "skipped {} '{}' on page {}: {}",
            skipped.kind,
            skipped.element_id,
            skipped.page + 1,
            skipped.reason
        );
    }
    Ok(())
}
