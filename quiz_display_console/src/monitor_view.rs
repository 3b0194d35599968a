// Terminal rendering of the monitor page.

use console::Style;
use itertools::Itertools;
use quiz_display::liveness::{Liveness, LivenessReading};
use quiz_display::monitor::{MonitorTable, NAME_CELL_CLASS, TableCell};
use quiz_display::protocol::PeriodStatus;


fn status_style(status: PeriodStatus) -> Style {
    match status {
        PeriodStatus::Good => Style::new().green(),
        PeriodStatus::Warning => Style::new().yellow(),
        PeriodStatus::Bad => Style::new().red().bold(),
    }
}

fn cell_style(class: &str) -> Style {
    if class == NAME_CELL_CLASS {
        return Style::new().bold();
    }
    [PeriodStatus::Good, PeriodStatus::Warning, PeriodStatus::Bad]
        .into_iter()
        .find(|status| status.css_class() == class)
        .map_or_else(Style::new, status_style)
}

fn render_cell(cell: &TableCell, width: usize) -> String {
    let padded = format!("{:<width$}", cell.text);
    cell_style(&cell.class).apply_to(padded).to_string()
}

// Columns are aligned; the name column is as wide as the longest name.
pub fn render_table(table: &MonitorTable) -> String {
    if table.is_empty() {
        return Style::new().dim().apply_to("(no displays)").to_string();
    }
    let num_columns = table.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..num_columns)
        .map(|col| {
            table
                .rows
                .iter()
                .filter_map(|row| row.cells.get(col))
                .map(|cell| cell.text.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    table
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| render_cell(cell, width))
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .join("\n")
}

pub fn render_liveness(reading: &LivenessReading) -> String {
    let text = format!("Last server response: {}s ago", reading.elapsed_secs);
    let style = status_style(reading.liveness.status());
    let text = style.apply_to(text).to_string();
    match reading.liveness {
        Liveness::Stale => format!("{text} (connection lost?)"),
        Liveness::Fresh | Liveness::Aging => text,
    }
}
