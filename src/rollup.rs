use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::aggregate::group_by;
use crate::error::{Result, SalesError};
use crate::fmt::{month_name, Locale};
use crate::models::SalesRecord;

/// One line of a distributor sales report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleLine {
    /// First day of the sale month, `YYYY-MM-DD`.
    pub month_of_sale: String,
    pub isbn: String,
    pub title: String,
    #[serde(default)]
    pub sales_type: String,
    #[serde(default)]
    pub retailer: String,
    pub quantity: Option<u64>,
    pub amount: Option<f64>,
}

/// Which book an ISBN belongs to and the partner's royalty share for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub isbn: String,
    pub book_title: String,
    pub book_slug: String,
    pub author: String,
    pub royalty_share: f64,
}

pub fn read_sale_lines<R: Read>(reader: R) -> Result<Vec<SaleLine>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut lines = Vec::new();
    for (i, result) in rdr.deserialize::<SaleLine>().enumerate() {
        let line = result.map_err(|e| SalesError::InvalidSaleLine {
            line: i + 2,
            reason: e.to_string(),
        })?;
        lines.push(line);
    }
    Ok(lines)
}

pub fn load_sale_lines(path: &Path) -> Result<Vec<SaleLine>> {
    let file = std::fs::File::open(path)?;
    read_sale_lines(std::io::BufReader::new(file))
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Roll sale lines up into monthly sales records, one per book and month.
/// Lines for ISBNs missing from the catalog are skipped.
pub fn rollup(
    lines: &[SaleLine],
    catalog: &[CatalogEntry],
    locale: Locale,
) -> Result<Vec<SalesRecord>> {
    let by_isbn: HashMap<&str, &CatalogEntry> =
        catalog.iter().map(|e| (e.isbn.as_str(), e)).collect();

    let mut monthly = Vec::with_capacity(lines.len());
    let mut skipped = 0usize;
    for (i, line) in lines.iter().enumerate() {
        let line_no = i + 2;
        let Some(book) = by_isbn.get(line.isbn.trim()) else {
            tracing::warn!(
                line = line_no,
                isbn = %line.isbn,
                title = %line.title,
                "ISBN not in catalog, skipping"
            );
            skipped += 1;
            continue;
        };
        let date = NaiveDate::parse_from_str(line.month_of_sale.trim(), "%Y-%m-%d").map_err(|e| {
            SalesError::InvalidSaleLine {
                line: line_no,
                reason: format!("bad month_of_sale '{}': {e}", line.month_of_sale),
            }
        })?;
        let month = date.month();
        let amount = line.amount.unwrap_or(0.0);
        monthly.push(SalesRecord {
            book_title: book.book_title.clone(),
            book_slug: book.book_slug.clone(),
            author: book.author.clone(),
            year: date.year(),
            month,
            month_name: month_name(locale, month).unwrap_or_default().to_string(),
            quantity: line.quantity.unwrap_or(0),
            original_amount: amount,
            royalty_share: book.royalty_share,
            payable_royalty: amount * book.royalty_share / 100.0,
        });
    }

    let records = group_by(monthly, |r| (r.book_slug.clone(), r.year, r.month));
    tracing::info!(lines = lines.len(), skipped, records = records.len(), "rolled up sale lines");
    Ok(records)
}
