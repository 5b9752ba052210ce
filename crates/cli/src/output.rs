//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use nutrilog_core::{FoodRecord, FoodSource};
use nutrilog_nutrition::DisplayNutrients;
use nutrilog_search::{Quality, QualityReport, RankedResult, ResultSource, SearchResponse};
use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Rounded nutrients on one line, e.g. `248 kcal  P 46.5  C 0  F 5.4`
pub fn format_nutrients(nutrients: &DisplayNutrients) -> String {
    format!(
        "{} kcal  P {}  C {}  F {}",
        nutrients.kcal, nutrients.protein, nutrients.carbs, nutrients.fat
    )
}

/// One catalog entry: id, name, brand and a marker for user favorites
pub fn format_food(food: &FoodRecord) -> String {
    let mut line = format!("{:>4}  {}", food.id.to_string().dimmed(), food.name);
    if let Some(brand) = &food.brand {
        line.push_str(&format!(" ({})", brand.dimmed()));
    }
    if food.source == FoodSource::User {
        line.push_str(&format!(" {}", "★".yellow()));
    }
    line
}

/// A search hit with its score, or `substr` for fallback matches
pub fn format_result(result: &RankedResult) -> String {
    let score = match result.score {
        Some(score) => format!("{:.3}", score),
        None => "substr".to_string(),
    };
    format!("{}  {}", format_food(&result.food), score.dimmed())
}

/// Quality tier label
pub fn quality_label(quality: Quality) -> &'static str {
    match quality {
        Quality::High => "high",
        Quality::Medium => "medium",
        Quality::Low => "low",
    }
}

/// Summary line for a search, e.g. `12 kept of 30 found (high)`
pub fn format_quality(report: &QualityReport, source: ResultSource) -> String {
    let origin = match source {
        ResultSource::Fallback => ", substring fallback",
        _ => "",
    };
    format!(
        "{} kept of {} found ({}{})",
        report.quality_kept,
        report.total_found,
        quality_label(report.quality),
        origin
    )
}

/// Print a search response as a list
pub fn print_response(response: &SearchResponse) {
    match (&response.quality, response.source) {
        (_, ResultSource::Idle) => Status::info("Type a query to search"),
        (Some(report), source) => {
            Status::header(&format!("Results for \"{}\"", response.query.trim()));
            for result in &response.results {
                println!("{}", format_result(result));
            }
            println!();
            Status::info(&format_quality(report, source));
        }
        (None, _) => Status::warning(&format!("No foods match \"{}\"", response.query.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_singular() {
        assert_eq!(format_count(1, "food", "foods"), "1 food");
    }

    #[test]
    fn test_format_count_plural() {
        assert_eq!(format_count(5, "food", "foods"), "5 foods");
    }

    #[test]
    fn test_format_nutrients() {
        let nutrients = DisplayNutrients {
            kcal: 248,
            protein: 46.5,
            carbs: 0.0,
            fat: 5.4,
        };
        assert_eq!(format_nutrients(&nutrients), "248 kcal  P 46.5  C 0  F 5.4");
    }

    #[test]
    fn test_format_quality_marks_fallback() {
        let report = QualityReport {
            quality: Quality::Low,
            total_found: 0,
            quality_kept: 2,
            threshold: 0.5,
        };
        assert_eq!(
            format_quality(&report, ResultSource::Fallback),
            "2 kept of 0 found (low, substring fallback)"
        );
        assert_eq!(format_quality(&report, ResultSource::Index), "2 kept of 0 found (low)");
    }
}
