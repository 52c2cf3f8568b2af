//! # PDF Generation Module
//!
//! Generates the cage weight report from a [`CalculationSummary`] using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - The optional header logo is served to Typst as a virtual file
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use cage_core::branding::NoLogo;
//! use cage_core::calculations::{calculate_cage, CageInput};
//! use cage_core::pdf::render_report;
//! use cage_core::project::ReportMetadata;
//! use cage_core::settings::ReportSettings;
//!
//! let input = CageInput::wall_default();
//! let summary = calculate_cage(&input).unwrap();
//! let meta = ReportMetadata::new("Wall Cage", "Riverside Apartments", "25-014");
//!
//! let pdf = render_report(&summary, &meta, &ReportSettings::default(), &NoLogo).unwrap();
//! std::fs::write("cage_report.pdf", pdf).unwrap();
//! ```

use std::path::Path;

use chrono::{Datelike, Utc};
use tracing::{debug, warn};
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::branding::{Logo, LogoProvider};
use crate::calculations::CalculationSummary;
use crate::display::{fmt_length, fmt_quantity, fmt_unit_weight, fmt_weight, total_statement};
use crate::errors::{CalcError, CalcResult};
use crate::project::ReportMetadata;
use crate::settings::ReportSettings;

/// Printed in place of the tables when no line item qualified
pub const NO_DATA_NOTICE: &str =
    "No data: no bar entries with a quantity and length greater than zero were provided.";

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world: one source, bundled fonts, and at most one image.
struct PdfWorld {
    /// The main source document
    main: Source,
    /// Font book
    book: LazyHash<FontBook>,
    /// Available fonts
    fonts: Vec<Font>,
    /// Library (standard functions)
    library: LazyHash<Library>,
    /// Header logo as (virtual file name, bytes)
    logo: Option<(String, Bytes)>,
}

impl PdfWorld {
    fn new(source: String, logo: Option<&Logo>) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
            logo: logo.map(|l| (l.file_name(), Bytes::new(l.bytes.clone()))),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        match &self.logo {
            Some((name, bytes)) if path == Path::new(name) => Ok(bytes.clone()),
            _ => Err(FileError::NotFound(path.into())),
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(now.year(), now.month() as u8, now.day() as u8)
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Typst template for the cage weight report.
///
/// Header and footer are page-level settings, so every page carries them.
const REPORT_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 3cm, bottom: 2.2cm, left: 2cm, right: 2cm),
  header: [
    #grid(
      columns: ({{LOGO_COLUMN}}, 1fr),
      gutter: 10pt,
      align: horizon,
      {{LOGO_CELL}},
      align(right)[
        #text(size: 11pt, weight: "bold")[{{ORG_NAME}}] \
        #text(size: 8pt, fill: gray)[{{ORG_ADDRESS}}]
      ],
    )
    #v(-4pt)
    #line(length: 100%, stroke: 0.5pt + gray)
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(2pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 8pt)[{{PROGRAM}}]],
      align(center)[#text(size: 8pt)[{{ORG_NAME}}]],
      align(right)[#text(size: 8pt)[Page #counter(page).display("1 of 1", both: true)]],
    )
  ]
)

#set text(font: ("Libertinus Serif", "New Computer Modern"), size: 10pt)

// Title Block
#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Concrete Reinforcement Cage Weight Report]
    #v(4pt)
    #text(size: 11pt)[Steel mass estimate from nominal bar masses (AS/NZS 4671)]
  ]
]

#v(12pt)

*Project Information*
#v(4pt)
#table(
  columns: (auto, 1fr),
  stroke: none,
  row-gutter: 4pt,
  [Project Name:], [{{PROJECT_NAME}}],
  [Project Number:], [{{PROJECT_NUMBER}}],
  [Cage Type:], [{{CAGE_TYPE}}],
  [Generated:], [{{GENERATED}}],
)

#v(8pt)
#line(length: 100%, stroke: 0.5pt)

== Input Details

{{INPUT_SECTION}}

#v(12pt)

== Weight Calculation Summary

{{SUMMARY_SECTION}}

#v(16pt)

#align(center)[
  #block(width: auto, fill: rgb("#d4edda"), inset: 14pt, radius: 4pt)[
    #text(size: 14pt, weight: "bold")[{{TOTAL_STATEMENT}}]
  ]
]
{{ISSUES_SECTION}}
#v(16pt)
#text(size: 8pt, fill: gray)[
  Bar weights are based on nominal mass per meter for Australian reinforcing steel (AS/NZS 4671). \
  Quantities and lengths should be verified against the approved drawings.
]
"##;

// ============================================================================
// PDF Rendering Functions
// ============================================================================

/// Render the cage weight report to PDF.
///
/// The logo is requested from `logo` once. A missing logo, or one Typst cannot
/// decode, degrades the header to text only; it never fails the render.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::RenderFailed)` - If Typst compilation or PDF export fails
pub fn render_report(
    summary: &CalculationSummary,
    meta: &ReportMetadata,
    settings: &ReportSettings,
    logo: &dyn LogoProvider,
) -> CalcResult<Vec<u8>> {
    let logo = logo.fetch_logo();

    if let Some(logo) = &logo {
        let source = build_report_source(summary, meta, settings, Some(logo));
        match compile_pdf(source, Some(logo)) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => warn!(error = %e, "report with logo failed to compile, retrying without logo"),
        }
    }

    let source = build_report_source(summary, meta, settings, None);
    compile_pdf(source, None)
}

/// Build the Typst source for a report without compiling it.
pub fn build_report_source(
    summary: &CalculationSummary,
    meta: &ReportMetadata,
    settings: &ReportSettings,
    logo: Option<&Logo>,
) -> String {
    let (logo_column, logo_cell) = match logo {
        Some(l) => ("auto".to_string(), format!("image(\"{}\", height: 1.2cm)", l.file_name())),
        None => ("0pt".to_string(), "[]".to_string()),
    };

    let (input_section, summary_section) = if summary.is_empty() {
        let notice = no_data_block();
        (notice.clone(), notice)
    } else {
        (build_input_table(summary), build_summary_table(summary))
    };

    REPORT_TEMPLATE
        .replace("{{LOGO_COLUMN}}", &logo_column)
        .replace("{{LOGO_CELL}}", &logo_cell)
        .replace("{{ORG_NAME}}", &escape_typst(&settings.organization_name))
        .replace("{{ORG_ADDRESS}}", &escape_typst(&settings.organization_address))
        .replace("{{PROGRAM}}", &escape_typst(&settings.program_label()))
        .replace("{{PROJECT_NAME}}", &escape_typst(&meta.project_name))
        .replace("{{PROJECT_NUMBER}}", &escape_typst(&meta.project_number))
        .replace("{{CAGE_TYPE}}", &escape_typst(&meta.cage_type_label))
        .replace("{{GENERATED}}", &meta.generated_display())
        .replace("{{INPUT_SECTION}}", &input_section)
        .replace("{{SUMMARY_SECTION}}", &summary_section)
        .replace(
            "{{TOTAL_STATEMENT}}",
            &escape_typst(&total_statement(&meta.cage_type_label, summary.total_weight_kg)),
        )
        .replace("{{ISSUES_SECTION}}", &build_issues_section(summary))
}

fn compile_pdf(source: String, logo: Option<&Logo>) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source, logo);

    let warned = typst::compile::<PagedDocument>(&world);
    for warning in warned.warnings.iter() {
        debug!(message = %warning.message, "typst warning");
    }

    let document = warned
        .output
        .map_err(|errors| CalcError::render_failed("typst compilation", join_messages(&errors)))?;

    typst_pdf::pdf(&document, &PdfOptions::default())
        .map_err(|errors| CalcError::render_failed("pdf export", join_messages(&errors)))
}

fn join_messages(errors: &[SourceDiagnostic]) -> String {
    errors
        .iter()
        .map(|e| e.message.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn no_data_block() -> String {
    format!(
        "#block(width: 100%, fill: rgb(\"#fff3cd\"), inset: 10pt, radius: 4pt)[{}]",
        escape_typst(NO_DATA_NOTICE)
    )
}

/// Every qualifying raw input: label, size, quantity, length per unit
fn build_input_table(summary: &CalculationSummary) -> String {
    let rows = summary
        .line_items
        .iter()
        .map(|item| {
            format!(
                "  [{}], [{}], [{}], [{}],",
                escape_typst(&item.label),
                item.size,
                fmt_quantity(item.quantity),
                fmt_length(item.length_per_unit_m),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"#table(
  columns: (1fr, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, center, right, right),
  table.header([*Component*], [*Bar Size*], [*Quantity*], [*Length per Unit (m)*]),
{rows}
)"##
    )
}

/// Included line items with derived figures, closed by a totals row
fn build_summary_table(summary: &CalculationSummary) -> String {
    let rows = summary
        .line_items
        .iter()
        .map(|item| {
            format!(
                "  [{}], [{}], [{}], [{}], [{}],",
                escape_typst(&item.label),
                item.size,
                fmt_length(item.total_length_m),
                fmt_unit_weight(item.unit_weight_kg_per_m),
                fmt_weight(item.total_weight_kg),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"#table(
  columns: (1fr, auto, auto, auto, auto),
  inset: 6pt,
  stroke: 0.5pt,
  align: (left, center, right, right, right),
  table.header([*Component*], [*Bar Size*], [*Total Length (m)*], [*Unit Weight (kg/m)*], [*Total Weight (kg)*]),
{rows}
  table.footer([*Total*], [], [*{total_length}*], [], [*{total_weight}*]),
)"##,
        total_length = fmt_length(summary.total_length_m()),
        total_weight = fmt_weight(summary.total_weight_kg),
    )
}

/// Entries excluded because of an error or warning
fn build_issues_section(summary: &CalculationSummary) -> String {
    if summary.issues.is_empty() {
        return String::new();
    }

    let items = summary
        .issues
        .iter()
        .map(|issue| format!("- {}", escape_typst(&issue.to_string())))
        .collect::<Vec<_>>()
        .join("\n");

    format!("\n#v(12pt)\n=== Excluded Entries\n\n{}\n", items)
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '~' | '/' | '-' | '+'
            | '=' | '"' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
