use std::path::Path;

use crate::cli::emit;
use crate::error::Result;
use crate::rollup::{load_catalog, load_sale_lines, rollup};
use crate::settings::load_settings;

pub fn run(sales: &Path, catalog: &Path, output: Option<&Path>) -> Result<()> {
    let lines = load_sale_lines(sales)?;
    let catalog = load_catalog(catalog)?;
    let records = rollup(&lines, &catalog, load_settings().locale)?;
    let json = serde_json::to_string_pretty(&records)?;
    emit(&format!("{json}\n"), output)
}
