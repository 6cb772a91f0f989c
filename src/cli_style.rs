/*!
 * Terminal styling for the space-builder CLI
 *
 * Themed text, a header box, and result tables for validation and build
 * reports.
 */

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};

use crate::core::{BuildOutcome, BuildPlan, Validation};
use crate::descriptor::InterfaceDescriptor;

// ============================================================================
// THEME COLORS
// ============================================================================

pub struct Theme;

impl Theme {
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Bold cyan
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }
}

// ============================================================================
// ICONS
// ============================================================================

pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const BUILD: &'static str = "🛠";
    pub const ARROW_RIGHT: &'static str = "→";
}

// ============================================================================
// BOXES
// ============================================================================

/// Draw a styled header box
pub fn header_box(title: &str, subtitle: Option<&str>) {
    let width = 56;
    println!("{}", Theme::primary(format!("╔{}╗", "═".repeat(width))));

    let title_display = format!("{} {}", Icons::BUILD, title);
    print_centered(&title_display, width, |s| Theme::header(s).to_string());

    if let Some(sub) = subtitle {
        print_centered(sub, width, |s| Theme::muted(s).to_string());
    }

    println!("{}", Theme::primary(format!("╚{}╝", "═".repeat(width))));
}

fn print_centered(text: &str, width: usize, paint: impl Fn(&str) -> String) {
    let len = text.chars().count().min(width);
    let padding = (width - len) / 2;
    println!(
        "{}{}{}{}{}",
        Theme::primary("║"),
        " ".repeat(padding),
        paint(text),
        " ".repeat(width - padding - len),
        Theme::primary("║")
    );
}

// ============================================================================
// TABLES
// ============================================================================

fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Summary of a successful check or dry run
pub fn validation_table(validation: &Validation) -> Table {
    let mut table = create_table();
    table.set_header(vec![header_cell("Validation"), Cell::new("")]);

    table.add_row(vec![
        Cell::new("Target"),
        Cell::new(&validation.repo_id)
            .fg(Color::White)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("URL"),
        Cell::new(&validation.url).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Sources"),
        Cell::new(validation.identifiers.join("\n")),
    ]);
    add_signature_rows(&mut table, &validation.signature);

    table
}

/// Summary of a dry run, including where the program would land
pub fn plan_table(plan: &BuildPlan) -> Table {
    let mut table = validation_table(&plan.validation);
    table.add_row(vec![
        Cell::new("Entry point"),
        Cell::new(&plan.path_in_repo).fg(Color::DarkGrey),
    ]);
    table
}

/// Summary of a finished build
pub fn outcome_table(outcome: &BuildOutcome) -> Table {
    let mut table = create_table();
    table.set_header(vec![header_cell("Build"), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Space"),
        Cell::new(&outcome.repo_id)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("URL"),
        Cell::new(&outcome.url).fg(Color::Cyan),
    ]);
    table
}

fn add_signature_rows(table: &mut Table, signature: &InterfaceDescriptor) {
    let kinds = |list: &[crate::descriptor::ComponentKind]| {
        if list.is_empty() {
            "(none)".to_string()
        } else {
            list.iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
    };
    table.add_row(vec![
        Cell::new("Inputs"),
        Cell::new(kinds(&signature.inputs)),
    ]);
    table.add_row(vec![
        Cell::new("Outputs"),
        Cell::new(kinds(&signature.outputs)),
    ]);
}

// ============================================================================
// MESSAGES
// ============================================================================

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!(
        "\n{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        message
    );

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
    eprintln!();
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING),
        Theme::warning(message)
    );
}

pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS),
        Theme::success(message)
    );
}

pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation() -> Validation {
        Validation {
            repo_id: "alice/mixer".to_string(),
            url: "https://huggingface.co/spaces/alice/mixer".to_string(),
            identifiers: vec!["models/gpt2".to_string(), "models/distilgpt2".to_string()],
            signature: InterfaceDescriptor::new(["textbox"], Vec::<String>::new()),
        }
    }

    #[test]
    fn test_validation_table_lists_sources() {
        let rendered = validation_table(&validation()).to_string();
        assert!(rendered.contains("alice/mixer"));
        assert!(rendered.contains("models/distilgpt2"));
        assert!(rendered.contains("textbox"));
        assert!(rendered.contains("(none)"));
    }

    #[test]
    fn test_plan_table_adds_entry_point() {
        let plan = BuildPlan {
            validation: validation(),
            path_in_repo: "app.py".to_string(),
            artifact: String::new(),
        };
        assert!(plan_table(&plan).to_string().contains("app.py"));
    }
}
