use std::path::Path;

use regex::Regex;

use crate::error::Result;
use crate::models::{SalesConfig, SalesPage, SalesRecord};

pub const DATA_ELEMENT_ID: &str = "sales-data";
pub const CONFIG_ELEMENT_ID: &str = "sales-config";

/// Parse the two payloads. An empty record list is `Ok(None)`: there is
/// nothing to render. Malformed JSON is an error.
pub fn parse_blobs(data: &str, config: &str) -> Result<Option<SalesPage>> {
    let records: Vec<SalesRecord> = serde_json::from_str(data)?;
    let config: SalesConfig = serde_json::from_str(config)?;
    if records.is_empty() {
        tracing::info!("sales data is empty, nothing to render");
        return Ok(None);
    }
    tracing::debug!(records = records.len(), "parsed sales data");
    Ok(Some(SalesPage { records, config }))
}

/// Text content of the `<script>` element with the given id.
pub fn extract_blob(html: &str, id: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)<script\b[^>]*\sid\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
        regex::escape(id)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Read both payloads from a page that embeds them. A page without either
/// element has no sales table and yields `Ok(None)`.
pub fn from_html(html: &str) -> Result<Option<SalesPage>> {
    let (Some(data), Some(config)) = (
        extract_blob(html, DATA_ELEMENT_ID),
        extract_blob(html, CONFIG_ELEMENT_ID),
    ) else {
        tracing::info!("page has no embedded sales data or config, skipping");
        return Ok(None);
    };
    parse_blobs(&data, &config)
}

pub fn load_page(path: &Path) -> Result<Option<SalesPage>> {
    let html = std::fs::read_to_string(path)?;
    from_html(&html)
}

pub fn load_files(data: &Path, config: &Path) -> Result<Option<SalesPage>> {
    let data = std::fs::read_to_string(data)?;
    let config = std::fs::read_to_string(config)?;
    parse_blobs(&data, &config)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::SalesError;

    pub(crate) const CONFIG: &str = r#"{
        "language": {"search": "Пошук:", "zeroRecords": "Нічога не знойдзена", "paginate": {"next": ">"}},
        "labels": {
            "book": "Кніга", "author": "Аўтар", "year": "Год", "month": "Месяц",
            "quantity": "Колькасць", "originalAmount": "Сума", "royaltyShare": "Доля",
            "payableRoyalty": "Да выплаты", "total": "Разам"
        }
    }"#;

    pub(crate) const DATA: &str = r#"[
        {"book_title": "First Book", "book_slug": "first-book", "author": "Алесь",
         "year": 2025, "month": 11, "month_name": "Лістапад", "quantity": 10,
         "original_amount": 100.0, "royalty_share": 50.0, "payable_royalty": 50.0},
        {"book_title": "First Book", "book_slug": "first-book", "author": "Алесь",
         "year": 2025, "month": 12, "month_name": "Снежань", "quantity": 5,
         "original_amount": 50.0, "royalty_share": 50.0, "payable_royalty": 25.0},
        {"book_title": "Second Book", "book_slug": "second-book", "author": "Віктар",
         "year": 2026, "month": 1, "month_name": "Студзень", "quantity": 28,
         "original_amount": 280.0, "royalty_share": 25.0, "payable_royalty": 70.0}
    ]"#;

    #[test]
    fn test_parse_blobs() {
        let page = parse_blobs(DATA, CONFIG).unwrap().unwrap();
        assert_eq!(page.records.len(), 3);
        assert_eq!(page.records[2].month_name, "Студзень");
        assert_eq!(page.config.labels.payable_royalty, "Да выплаты");
        assert_eq!(page.config.language.search_prompt(), "Пошук:");
        assert!(page.config.language.extra.contains_key("paginate"));
    }

    #[test]
    fn test_empty_dataset_is_none() {
        assert!(parse_blobs("[]", CONFIG).unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(parse_blobs("[{", CONFIG), Err(SalesError::Json(_))));
        assert!(matches!(parse_blobs(DATA, "{}"), Err(SalesError::Json(_))));
    }

    #[test]
    fn test_from_html() {
        let html = format!(
            "<html><body><table id=\"sales-table\"></table>\
             <script id=\"sales-data\" type=\"application/json\">{DATA}</script>\n\
             <script type=\"application/json\" id='sales-config'>{CONFIG}</script></body></html>"
        );
        let page = from_html(&html).unwrap().unwrap();
        assert_eq!(page.records[0].book_slug, "first-book");
        assert_eq!(page.config.labels.total, "Разам");
    }

    #[test]
    fn test_missing_anchor_is_none() {
        let html = format!("<script id=\"sales-data\">{DATA}</script>");
        assert!(from_html(&html).unwrap().is_none());
        assert!(from_html("<html></html>").unwrap().is_none());
    }

    #[test]
    fn test_extract_blob_does_not_match_prefix_ids() {
        let html = "<script id=\"sales-data-old\">[1]</script><script id=\"sales-data\">[2]</script>";
        assert_eq!(extract_blob(html, "sales-data").as_deref(), Some("[2]"));
    }

    #[test]
    fn test_extract_blob_ignores_data_id_attribute() {
        let html = "<script data-id=\"sales-data\">[1]</script><script type=\"application/json\" id=\"sales-data\">[2]</script>";
        assert_eq!(extract_blob(html, "sales-data").as_deref(), Some("[2]"));
        assert_eq!(extract_blob("<script data-id=\"sales-data\">[1]</script>", "sales-data"), None);
    }

    #[test]
    fn test_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        let config = dir.path().join("config.json");
        std::fs::write(&data, DATA).unwrap();
        std::fs::write(&config, CONFIG).unwrap();
        let page = load_files(&data, &config).unwrap().unwrap();
        assert_eq!(page.records.len(), 3);
    }
}
