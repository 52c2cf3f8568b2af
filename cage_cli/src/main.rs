//! # Cage Weight CLI
//!
//! Terminal front end for the reinforcement cage weight calculator.
//! Collects bar entries (from a project file or interactive prompts), prints
//! the weight summary, and optionally exports the PDF report.
//!
//! Usage:
//!   cage_cli [options]
//!
//! Options:
//!   --input <file>           Load a .cage.json project instead of prompting
//!   --save <file>            Save the entered project to a .cage.json file
//!   --config <file>          Report branding settings (TOML)
//!   --project-name <name>    Project name for the report
//!   --project-number <num>   Project number (also names the PDF)
//!   --cage-type <type>       wall, column or pile (interactive default: wall)
//!   --pdf                    Export the PDF report to the current directory
//!   --output <dir>           Export the PDF report to <dir>
//!   --no-logo                Skip the branding logo fetch
//!   --json                   Print the summary as JSON
//!
//! Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=cage_core=debug).

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use cage_core::branding::{HttpLogoProvider, LogoProvider, NoLogo};
use cage_core::calculations::{calculate_cage, BarCategory, BarSpec, CageInput, CageType};
use cage_core::display::{summary_table, total_statement};
use cage_core::errors::Severity;
use cage_core::file_io::{load_project, save_project, write_report};
use cage_core::materials::designations;
use cage_core::pdf::render_report;
use cage_core::project::{CageProject, ReportMetadata};
use cage_core::settings::ReportSettings;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parsed command line options
#[derive(Debug, Default, PartialEq)]
struct Options {
    input: Option<PathBuf>,
    save: Option<PathBuf>,
    config: Option<PathBuf>,
    project_name: Option<String>,
    project_number: Option<String>,
    cage_type: Option<CageType>,
    output_dir: Option<PathBuf>,
    no_logo: bool,
    json: bool,
    help: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {}", name))
        };
        match arg.as_str() {
            "--input" => opts.input = Some(PathBuf::from(value("--input")?)),
            "--save" => opts.save = Some(PathBuf::from(value("--save")?)),
            "--config" => opts.config = Some(PathBuf::from(value("--config")?)),
            "--project-name" => opts.project_name = Some(value("--project-name")?),
            "--project-number" => opts.project_number = Some(value("--project-number")?),
            "--cage-type" => {
                let raw = value("--cage-type")?;
                let cage_type =
                    CageType::from_name(&raw).ok_or_else(|| format!("Unknown cage type: {}", raw))?;
                opts.cage_type = Some(cage_type);
            }
            "--output" => opts.output_dir = Some(PathBuf::from(value("--output")?)),
            "--pdf" => {
                if opts.output_dir.is_none() {
                    opts.output_dir = Some(PathBuf::from("."));
                }
            }
            "--no-logo" => opts.no_logo = true,
            "--json" => opts.json = true,
            "-h" | "--help" => opts.help = true,
            other => return Err(format!("Unknown option: {}", other)),
        }
    }

    Ok(opts)
}

fn print_usage() {
    println!("Usage: cage_cli [options]");
    println!();
    println!("Options:");
    println!("  --input <file>           Load a .cage.json project instead of prompting");
    println!("  --save <file>            Save the entered project to a .cage.json file");
    println!("  --config <file>          Report branding settings (TOML)");
    println!("  --project-name <name>    Project name for the report");
    println!("  --project-number <num>   Project number (also names the PDF)");
    println!("  --cage-type <type>       wall, column or pile");
    println!("  --pdf                    Export the PDF report to the current directory");
    println!("  --output <dir>           Export the PDF report to <dir>");
    println!("  --no-logo                Skip the branding logo fetch");
    println!("  --json                   Print the summary as JSON");
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = input.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

fn prompt_string(prompt: &str, default: &str) -> String {
    prompt_line(&format!("{} [{}]: ", prompt, default)).unwrap_or_else(|| default.to_string())
}

fn prompt_i64(prompt: &str, default: i64) -> i64 {
    prompt_line(&format!("{} [{}]: ", prompt, default))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(&format!("{} [{}]: ", prompt, default))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Walk the user through bar entries for each category, seeded with the
/// wall cage defaults.
fn prompt_cage_input(cage_type: CageType) -> CageInput {
    let defaults = CageInput::wall_default();
    let mut input = CageInput::new(cage_type);

    println!("Available bar sizes: {}", designations().join(", "));

    for category in BarCategory::ALL {
        let seed = defaults
            .bars_in(category)
            .next()
            .cloned()
            .unwrap_or_else(|| BarSpec::new(category, "N10", 0, 0.0));

        println!();
        println!("{}", category.display_name());
        let count = prompt_i64("  Number of entries", 1).max(0);
        for i in 1..=count {
            if count > 1 {
                println!("  Entry {}", i);
            }
            let size = prompt_string("    Bar size", &seed.size);
            let quantity = prompt_i64("    Quantity", seed.quantity);
            let length = prompt_f64(&format!("    {}", category.length_caption()), seed.length_per_unit_m);
            input.bars.push(BarSpec::new(category, size, quantity, length));
        }
    }

    input
}

fn load_settings(opts: &Options) -> Result<ReportSettings, String> {
    match &opts.config {
        Some(path) => ReportSettings::load(path).map_err(|e| e.to_string()),
        None => {
            let settings = ReportSettings::default().with_env_overrides();
            settings.validate().map_err(|e| e.to_string())?;
            Ok(settings)
        }
    }
}

fn run(opts: Options) -> Result<(), String> {
    let settings = load_settings(&opts)?;

    let mut project = match &opts.input {
        Some(path) => load_project(path).map_err(|e| e.to_string())?,
        None => {
            let name = opts
                .project_name
                .clone()
                .unwrap_or_else(|| prompt_string("Project name", "Untitled Project"));
            let number = opts
                .project_number
                .clone()
                .unwrap_or_else(|| prompt_string("Project number", "0000"));
            let cage_type = opts.cage_type.unwrap_or_else(|| {
                let raw = prompt_string("Cage type (wall/column/pile)", "wall");
                CageType::from_name(&raw).unwrap_or_else(|| {
                    println!("Unknown cage type '{}', using Wall Cage", raw);
                    CageType::Wall
                })
            });

            let input = if cage_type.is_supported() {
                prompt_cage_input(cage_type)
            } else {
                CageInput::new(cage_type)
            };
            CageProject::new(name, number).with_input(input)
        }
    };

    if opts.input.is_some() {
        if let Some(name) = &opts.project_name {
            project.project_name = name.clone();
        }
        if let Some(number) = &opts.project_number {
            project.project_number = number.clone();
        }
    }

    if let Some(path) = &opts.save {
        save_project(&project, path).map_err(|e| e.to_string())?;
        println!("Saved project to {}", path.display());
    }

    let summary = match calculate_cage(&project.input) {
        Ok(summary) => summary,
        Err(e) => {
            println!();
            println!("{}", e);
            println!("Please select 'Wall Cage' for current calculations.");
            return Ok(());
        }
    };

    let cage_label = project.input.cage_type.display_name();

    println!();
    println!("═══════════════════════════════════════");
    println!("  WEIGHT CALCULATION SUMMARY");
    println!("═══════════════════════════════════════");
    println!();
    print!("{}", summary_table(&summary));
    println!();

    for issue in &summary.issues {
        match issue.severity {
            Severity::Error => eprintln!("{}", issue),
            Severity::Warning => println!("{}", issue),
        }
    }
    if !summary.issues.is_empty() {
        println!();
    }

    println!("═══════════════════════════════════════");
    println!("  {}", total_statement(cage_label, summary.total_weight_kg));
    println!("═══════════════════════════════════════");
    println!();
    println!("Bar weights are based on nominal mass per meter for Australian reinforcing steel standards.");

    if opts.json {
        println!();
        println!("JSON Output:");
        let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    if let Some(dir) = &opts.output_dir {
        let meta = ReportMetadata::for_project(&project);
        let provider: Box<dyn LogoProvider> = if opts.no_logo {
            Box::new(NoLogo)
        } else {
            Box::new(HttpLogoProvider::from_settings(&settings))
        };

        let pdf = render_report(&summary, &meta, &settings, provider.as_ref()).map_err(|e| e.to_string())?;
        let path = write_report(&pdf, dir, &project.project_number).map_err(|e| e.to_string())?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn main() {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(2);
        }
    };

    debug!(?opts, "parsed options");

    if opts.help {
        print_usage();
        return;
    }

    println!("Concrete Reinforcement Cage Weight Calculator");
    println!("=============================================");
    println!();

    if let Err(e) = run(opts) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
