use std::path::Path;

use scoretrim::{NUpOptions, TrimError, layout_n_up};

use crate::shared::{read_pdf, report_error, write_output};

pub fn run(
    file: &Path,
    (cols, rows): (u32, u32),
    output: &Path,
    margin: f64,
    gap: f64,
) -> Result<(), i32> {
    let bytes = read_pdf(file)?;
    let options = NUpOptions {
        margin,
        gap,
        ..NUpOptions::grid(cols, rows)
    };
    let laid_out = layout_n_up(&bytes, &options).map_err(|e| report_error(&TrimError::from(e)))?;
    write_output(output, &laid_out)?;

    println!("Laid out {cols}x{rows} grid -> {}", output.display());
    Ok(())
}
