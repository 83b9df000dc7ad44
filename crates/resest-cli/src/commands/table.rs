// Command handler for: Table
//
// Prints the critical-value table a run would use.

use std::path::PathBuf;

use serde_json::json;

use super::helpers::{load_table, parse_output_format};
use crate::types::OutputFormat;

/// Entry point for `resest table`.
pub(crate) fn run_table_command(
    table: Option<PathBuf>,
    confidence: u32,
    format: String,
) -> miette::Result<()> {
    let format = parse_output_format(&format)?;
    let loaded = load_table(table.as_deref(), confidence)?;
    let rows = loaded.rows();
    let (t_rows, z_row) = rows.split_at(rows.len() - 1);

    match format {
        OutputFormat::Text => {
            println!("# confidence {confidence}%");
            for (i, value) in t_rows.iter().enumerate() {
                println!("{}\t{value}", i + 1);
            }
            println!("z\t{}", z_row[0]);
        }
        OutputFormat::Json => {
            let value = json!({
                "confidence": confidence,
                "source": table.as_ref().map(|p| p.display().to_string()),
                "t": t_rows,
                "z": z_row[0],
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&value).map_err(|e| miette::miette!("{e}"))?
            );
        }
    }
    Ok(())
}
