//! Plain-text rendering of the table.

use std::fmt;

use chrono::DateTime;
use chrono::Local;
use chrono::Utc;

use artic_lib::BulkSelectOutcome;
use artic_lib::api::Page;
use artic_lib::model::RecordId;

const HEADERS: [&str; 6] = [
    "Title",
    "Place of origin",
    "Artist",
    "Inscriptions",
    "Start date",
    "End date",
];

const WIDTHS: [usize; 6] = [32, 16, 28, 20, 10, 8];

pub const LOADING: &str = "Loading...";

/// Status line printed under the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    /// Set when the page on screen came from the page cache.
    pub cached_until: Option<DateTime<Utc>>,
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} of {} ({} selected)",
            self.page, self.total_pages, self.selected
        )?;
        if let Some(until) = self.cached_until {
            write!(
                f,
                " [cached until {}]",
                until.with_timezone(&Local).format("%H:%M:%S")
            )?;
        }
        Ok(())
    }
}

/// Renders `page` with a checkbox per row and the footer line.
pub fn render_page(
    page: &Page,
    footer: &Footer,
    is_selected: impl Fn(RecordId) -> bool,
) -> String {
    let mut lines = vec![row("   ", "ID", HEADERS.map(String::from))];

    if page.is_empty() {
        lines.push("    (no artworks on this page)".to_string());
    }

    for artwork in page.records() {
        let mark = if is_selected(artwork.id) { "[x]" } else { "[ ]" };
        lines.push(row(mark, &artwork.id.to_string(), artwork.cells()));
    }

    lines.push(footer.to_string());
    lines.join("\n")
}

fn row(mark: &str, id: &str, cells: [String; 6]) -> String {
    let cells: String = cells
        .iter()
        .zip(WIDTHS)
        .map(|(cell, width)| format!("  {:<width$}", fit(cell, width)))
        .collect();
    format!("{} {:>8}{}", mark, id, cells)
}

pub fn error(message: impl std::fmt::Display) -> String {
    format!("An error occurred: {}", message)
}

/// Summarizes a finished bulk select.
pub fn outcome(outcome: &BulkSelectOutcome) -> String {
    let taken = outcome.taken.len();
    if outcome.cancelled {
        format!("select cancelled: {} of {} rows selected", taken, outcome.requested)
    } else if outcome.is_complete() {
        format!(
            "selected {} rows from {} page(s)",
            taken, outcome.pages_fetched
        )
    } else {
        format!(
            "selected {} of {} rows, the collection ended",
            taken, outcome.requested
        )
    }
}

/// Flattens `text` to one line and cuts it to `width` characters.
fn fit(text: &str, width: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if flat.chars().count() <= width {
        return flat;
    }

    let mut cut: String = flat.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use artic_lib::model::Artwork;

    use super::*;

    fn sample() -> Page {
        Page::new(
            2,
            vec![
                Artwork::new(7)
                    .with_title("Nighthawks")
                    .with_artist("Edward Hopper\nAmerican, 1882-1967")
                    .with_dates(1942, 1942),
                Artwork::new(8),
            ],
            25,
        )
    }

    fn footer(page: u32, total_pages: u32, selected: usize) -> Footer {
        Footer {
            page,
            total_pages,
            selected,
            cached_until: None,
        }
    }

    #[test]
    fn test_render_marks_selected_rows() {
        let text = render_page(&sample(), &footer(2, 3, 1), |id| id == 7);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Place of origin"));
        assert!(lines[1].starts_with("[x]        7  Nighthawks"));
        assert!(lines[1].contains("Edward Hopper American"));
        assert!(lines[1].contains("1942"));
        assert!(lines[2].starts_with("[ ]        8"));
        assert_eq!(lines[3], "page 2 of 3 (1 selected)");
    }

    #[test]
    fn test_render_empty_page() {
        let page = Page::new(1, Vec::new(), 0);
        let text = render_page(&page, &footer(1, 0, 0), |_| false);

        assert!(text.contains("no artworks"));
        assert!(text.ends_with("page 1 of 0 (0 selected)"));
    }

    #[test]
    fn test_footer_marks_cached_page() {
        let mut status = footer(1, 3, 0);
        assert_eq!(status.to_string(), "page 1 of 3 (0 selected)");

        status.cached_until = Some(Utc::now());
        assert!(status.to_string().starts_with("page 1 of 3 (0 selected) [cached until "));
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("a\tb", 10), "a b");
        assert_eq!(fit("abcdefghijkl", 8), "abcde...");
        assert_eq!(fit("ééééé", 5), "ééééé");
    }

    #[test]
    fn test_outcome_messages() {
        let mut done = BulkSelectOutcome {
            requested: 2,
            taken: vec![1, 2],
            pages_fetched: 1,
            ..Default::default()
        };
        assert_eq!(outcome(&done), "selected 2 rows from 1 page(s)");

        done.remaining = 1;
        done.taken.pop();
        assert_eq!(outcome(&done), "selected 1 of 2 rows, the collection ended");

        done.cancelled = true;
        assert_eq!(outcome(&done), "select cancelled: 1 of 2 rows selected");

        assert_eq!(error("boom"), "An error occurred: boom");
    }
}
