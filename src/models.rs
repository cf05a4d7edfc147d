use serde::{Deserialize, Serialize};

/// One row of monthly unit sales and royalty data for a single book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub book_title: String,
    pub book_slug: String,
    pub author: String,
    pub year: i32,
    pub month: u32,
    pub month_name: String,
    pub quantity: u64,
    pub original_amount: f64,
    pub royalty_share: f64,
    pub payable_royalty: f64,
}

/// Sums of a book's sales over one year (`year` is set) or over all time.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRecord {
    pub book_title: String,
    pub book_slug: String,
    pub author: String,
    pub year: Option<i32>,
    pub quantity: u64,
    pub original_amount: f64,
    pub royalty_share: f64,
    pub payable_royalty: f64,
}

impl AggregatedRecord {
    pub fn yearly(record: &SalesRecord) -> Self {
        Self {
            year: Some(record.year),
            ..Self::all_time(record)
        }
    }

    pub fn all_time(record: &SalesRecord) -> Self {
        Self {
            book_title: record.book_title.clone(),
            book_slug: record.book_slug.clone(),
            author: record.author.clone(),
            year: None,
            quantity: record.quantity,
            original_amount: record.original_amount,
            royalty_share: record.royalty_share,
            payable_royalty: record.payable_royalty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Labels {
    pub book: String,
    pub author: String,
    pub year: String,
    pub month: String,
    pub quantity: String,
    pub original_amount: String,
    pub royalty_share: String,
    pub payable_royalty: String,
    pub total: String,
}

/// Table-widget localization strings. Only a few keys are read; the rest are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_records: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_table: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LanguageConfig {
    pub fn search_prompt(&self) -> &str {
        self.search.as_deref().unwrap_or("Search:")
    }

    pub fn no_matches(&self) -> &str {
        self.zero_records
            .as_deref()
            .unwrap_or("No matching records found")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesConfig {
    #[serde(default)]
    pub language: LanguageConfig,
    pub labels: Labels,
}

/// Everything the sales table needs from the hosting page.
#[derive(Debug, Clone)]
pub struct SalesPage {
    pub records: Vec<SalesRecord>,
    pub config: SalesConfig,
}
