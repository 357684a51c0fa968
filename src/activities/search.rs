use std::fmt::Write as _;

use anyhow::Result;
use dialoguer::console;
use serde_json::Value;

use crate::ui::{apply_column_padding, header, print_with_pager, styled_table, truncate};
use crate::utils::pluralize;

use super::normalize::{ActivityRow, COLUMNS};

const CELL_WIDTH: usize = 40;

/// Render the aggregated records as a count line plus the normalized
/// table. JSON mode prints the raw aggregate untouched so it can be
/// piped to other tools.
pub fn run(activities: &[Value], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(activities)?);
        return Ok(());
    }

    let mut output = String::new();
    let count = format!(
        "{} {}",
        activities.len(),
        pluralize(activities.len(), "activity", Some("activities"))
    );
    writeln!(output, "{} found\n", console::style(count).bold())?;

    let mut table = styled_table();
    table.set_header(COLUMNS.iter().map(|c| header(c)).collect::<Vec<_>>());
    apply_column_padding(&mut table, (0, 2));

    for record in activities {
        let row = ActivityRow::from_record(record);
        let cells: Vec<String> = row
            .values()
            .iter()
            .map(|v| truncate(v, CELL_WIDTH))
            .collect();
        table.add_row(cells);
    }

    write!(output, "{table}")?;
    print_with_pager(&output)?;
    Ok(())
}
