//! reserve-cert
//!
//! Fills the reserve-service approval certificate with today's Hebrew and
//! Gregorian dates and the soldier's personal details.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use cert_cli::{certificate_values, load_profile, Config};
use cert_types::{GregorianDate, PersonalDetails};
use clap::{Parser, Subcommand};
use overlay_core::{fill_certificate, CertificateDocument, FillMode, FontProgram};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "reserve-cert")]
#[command(version, about = "Fill the reserve-service approval certificate")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill the template and write the result
    Fill(FillArgs),
    /// Print pages, fonts and form fields of a template
    Inspect {
        /// PDF to inspect
        #[arg(long)]
        template: PathBuf,
    },
    /// Print the Hebrew renderings of a date
    HebrewDate {
        /// Date as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<GregorianDate>,
    },
}

#[derive(clap::Args, Debug)]
struct FillArgs {
    /// Layout configuration (TOML); the built-in layout is used otherwise
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Personal details as JSON
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Template PDF (overrides the layout)
    #[arg(long)]
    template: Option<PathBuf>,

    /// TrueType font with Hebrew glyphs (overrides the layout)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Output path (overrides the layout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Issue date as YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<GregorianDate>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    id_number: Option<String>,

    #[arg(long)]
    private_number: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Output files go to disk, diagnostics to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Command::Fill(fill_args) => fill(fill_args),
        Command::Inspect { template } => inspect(template),
        Command::HebrewDate { date } => {
            let date = date.unwrap_or_else(today);
            println!("{}", hebrew_date::format_hebrew_date(date));
            println!("{}", hebrew_date::format_gregorian_hebrew_month(date));
            Ok(())
        }
    }
}

fn today() -> GregorianDate {
    chrono::Local::now().date_naive()
}

fn fill(args: FillArgs) -> anyhow::Result<()> {
    let mut config = match &args.layout {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(template) = args.template {
        config.document.template = template;
    }
    if let Some(font) = args.font {
        config.document.font = font;
    }
    if let Some(output) = args.output {
        config.document.output = output;
    }

    let mut details = match &args.profile {
        Some(path) => load_profile(path)?,
        None => PersonalDetails::default(),
    };
    for (slot, value) in [
        (&mut details.first_name, args.first_name),
        (&mut details.last_name, args.last_name),
        (&mut details.id_number, args.id_number),
        (&mut details.private_number, args.private_number),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }

    let date = args.date.unwrap_or_else(today);
    let values = certificate_values(&details, date, config.document.days_before);
    tracing::info!("Issue date {}: {}", date, values["hebrew_date"]);

    let template = fs::read(&config.document.template).with_context(|| {
        format!(
            "Failed to read template: {}",
            config.document.template.display()
        )
    })?;
    let font_bytes = fs::read(&config.document.font)
        .with_context(|| format!("Failed to read font: {}", config.document.font.display()))?;
    let font = FontProgram::from_bytes(font_bytes).context("Failed to load font")?;

    let outcome = fill_certificate(&template, font, &config.plan(), &values)
        .context("Failed to fill certificate")?;
    if outcome.written == 0 {
        bail!("Nothing was written to the certificate");
    }

    fs::write(&config.document.output, &outcome.pdf).with_context(|| {
        format!(
            "Failed to write output: {}",
            config.document.output.display()
        )
    })?;

    let what = match outcome.mode {
        FillMode::FormFields => "form fields",
        FillMode::Overlay => "text overlays",
    };
    tracing::info!(
        "Wrote {} {} to {}",
        outcome.written,
        what,
        config.document.output.display()
    );
    Ok(())
}

fn inspect(path: PathBuf) -> anyhow::Result<()> {
    let bytes =
        fs::read(&path).with_context(|| format!("Failed to read template: {}", path.display()))?;
    let doc = CertificateDocument::load(&bytes).context("Failed to parse template")?;

    println!("Pages: {}", doc.page_count());
    for page in 1..=doc.page_count() {
        let size = doc.page_size(page)?;
        println!("  page {}: {} x {}", page, size.width, size.height);
    }

    let fonts = doc.fonts();
    println!("Fonts: {}", fonts.len());
    for font in fonts {
        println!(
            "  {} ({})",
            font.base_font.as_deref().unwrap_or("unnamed"),
            font.subtype.as_deref().unwrap_or("unknown")
        );
    }

    let fields = doc.form_fields();
    println!("Form fields: {}", fields.len());
    for field in fields {
        println!("  {} [{:?}]", field.name, field.kind);
    }
    Ok(())
}
