//! Console table rendering.
//!
//! Pure string builders so the menu loop can stay a thin stdout shell and
//! the layout stays testable.

use std::fmt::Write;

use crate::aggregate::{AggregateCell, Statistic};
use crate::filter::FilterState;
use crate::reading::TimeBucket;

const ZIP_COL_WIDTH: usize = 7;
const VALUE_COL_WIDTH: usize = 8;

/// Renders one statistic of the aggregate cells as a cross table: one row
/// per zip code (ascending), one column per time bucket in fixed order.
/// Groups with no readings render as `N/A`.
pub fn render_table(cells: &[AggregateCell], stat: Statistic) -> String {
    if cells.is_empty() {
        return "No data for the selected zip codes.\n".to_string();
    }

    let mut out = String::new();

    let _ = write!(out, "{:<ZIP_COL_WIDTH$}", "");
    for bucket in TimeBucket::ALL {
        let _ = write!(out, "{:>VALUE_COL_WIDTH$}", bucket.label());
    }
    out.push('\n');

    // Cells arrive sorted by zip then bucket, so each zip's cells are
    // contiguous and a single pass lays out the matrix.
    let mut row_zip: Option<&str> = None;
    let mut row: [Option<f64>; 4] = [None; 4];

    for cell in cells {
        if row_zip != Some(cell.zip_code.as_str()) {
            if let Some(zip) = row_zip {
                write_row(&mut out, zip, &row);
            }
            row_zip = Some(cell.zip_code.as_str());
            row = [None; 4];
        }
        row[cell.bucket as usize] = Some(cell.value(stat));
    }
    if let Some(zip) = row_zip {
        write_row(&mut out, zip, &row);
    }

    out
}

fn write_row(out: &mut String, zip: &str, row: &[Option<f64>; 4]) {
    let _ = write!(out, "{zip:<ZIP_COL_WIDTH$}");
    for value in row {
        match value {
            Some(v) => {
                let _ = write!(out, "{v:>VALUE_COL_WIDTH$.2}");
            }
            None => {
                let _ = write!(out, "{:>VALUE_COL_WIDTH$}", "N/A");
            }
        }
    }
    out.push('\n');
}

/// Renders the numbered zip code listing used by the filter submenu.
pub fn render_filters(filter: &FilterState) -> String {
    let mut out = String::from("The following zip codes are in the data set:\n");
    for (i, zip) in filter.known_zips().enumerate() {
        let state = if filter.is_enabled(zip) {
            "ACTIVE"
        } else {
            "INACTIVE"
        };
        let _ = writeln!(out, "{}: {:<11}{}", i + 1, zip, state);
    }
    out
}
