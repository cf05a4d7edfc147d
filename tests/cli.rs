use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "language": {"search": "Find:", "zeroRecords": "Nothing here"},
    "labels": {
        "book": "Book", "author": "Author", "year": "Year", "month": "Month",
        "quantity": "Qty", "originalAmount": "Amount", "royaltyShare": "Share",
        "payableRoyalty": "Payable", "total": "Total"
    }
}"#;

const DATA: &str = r#"[
    {"book_title": "First Book", "book_slug": "first-book", "author": "Alice",
     "year": 2025, "month": 11, "month_name": "November", "quantity": 10,
     "original_amount": 100.0, "royalty_share": 50.0, "payable_royalty": 50.0},
    {"book_title": "First Book", "book_slug": "first-book", "author": "Alice",
     "year": 2025, "month": 12, "month_name": "December", "quantity": 5,
     "original_amount": 50.0, "royalty_share": 50.0, "payable_royalty": 25.0},
    {"book_title": "Second Book", "book_slug": "second-book", "author": "Victor",
     "year": 2026, "month": 1, "month_name": "January", "quantity": 28,
     "original_amount": 280.0, "royalty_share": 25.0, "payable_royalty": 70.0}
]"#;

struct Fixture {
    home: TempDir,
    data: PathBuf,
    config: PathBuf,
}

impl Fixture {
    fn new(data: &str) -> Self {
        let home = tempfile::tempdir().unwrap();
        let data_path = home.path().join("data.json");
        let config_path = home.path().join("config.json");
        std::fs::write(&data_path, data).unwrap();
        std::fs::write(&config_path, CONFIG).unwrap();
        Self {
            home,
            data: data_path,
            config: config_path,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("royalties").unwrap();
        cmd.env("HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("ROYALTIES_LOG");
        cmd
    }

    fn report(&self, extra: &[&str]) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("report")
            .arg("--data")
            .arg(&self.data)
            .arg("--config")
            .arg(&self.config)
            .args(extra);
        cmd
    }

    fn path(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn report_text_monthly_by_default() {
    Fixture::new(DATA)
        .report(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly"))
        .stdout(predicate::str::contains("November"))
        .stdout(predicate::str::contains("$145.00"))
        .stdout(predicate::str::contains("43"));
}

#[test]
fn report_yearly_filtered_by_year() {
    Fixture::new(DATA)
        .report(&["--mode", "yearly", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First Book"))
        .stdout(predicate::str::contains("$75.00"))
        .stdout(predicate::str::contains("Second Book").not());
}

#[test]
fn report_csv_all_time() {
    Fixture::new(DATA)
        .report(&["--mode", "all-time", "--format", "csv"])
        .assert()
        .success()
        .stdout(
            "Book,Author,Qty,Amount,Share,Payable\n\
             First Book,Alice,15,150,50,75\n\
             Second Book,Victor,28,280,25,70\n",
        );
}

#[test]
fn report_html_to_file() {
    let fx = Fixture::new(DATA);
    let out = fx.path("out/sales.html");
    fx.report(&["--format", "html", "--search", "second", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    let html = read(&out);
    assert!(html.contains("<table id=\"sales-table\""));
    assert!(html.contains("<a href=\"/books/second-book/\">Second Book</a>"));
    assert!(!html.contains("first-book"));
    assert!(html.contains("data-test-id=\"total-quantity\">28</td>"));
    assert!(html.contains("data-test-id=\"total-payable-royalty\">$70.00</td>"));
}

#[test]
fn report_from_html_page() {
    let fx = Fixture::new(DATA);
    let page = fx.path("page.html");
    std::fs::write(
        &page,
        format!(
            "<html><body><script id=\"sales-data\" type=\"application/json\">{DATA}</script>\
             <script id=\"sales-config\" type=\"application/json\">{CONFIG}</script></body></html>"
        ),
    )
    .unwrap();
    fx.cmd()
        .arg("report")
        .arg("--page")
        .arg(&page)
        .args(["--format", "csv", "--mode", "yearly"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Book,Author,Year,Qty"));
}

#[test]
fn empty_dataset_prints_nothing() {
    Fixture::new("[]")
        .report(&[])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn page_without_sales_table_prints_nothing() {
    let fx = Fixture::new(DATA);
    let page = fx.path("plain.html");
    std::fs::write(&page, "<html><body>No sales here</body></html>").unwrap();
    fx.cmd()
        .arg("report")
        .arg("--page")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn malformed_json_fails() {
    Fixture::new("[{\"book_title\": ")
        .report(&[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn view_without_terminal_falls_back_to_text() {
    let fx = Fixture::new(DATA);
    fx.cmd()
        .arg("view")
        .arg("--data")
        .arg(&fx.data)
        .arg("--config")
        .arg(&fx.config)
        .args(["--mode", "all-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All time"))
        .stdout(predicate::str::contains("$145.00"));
}

#[test]
fn settings_default_mode_is_used_by_report() {
    let fx = Fixture::new(DATA);
    fx.cmd()
        .args(["settings", "--default-mode", "all-time", "--currency-prefix", "€"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"default_mode\": \"all-time\""));
    assert!(fx.path(".config/royalties/settings.json").exists());

    fx.report(&["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Book,Author,Qty"));
    fx.report(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains("€145.00"));
}

#[test]
fn settings_rejects_zero_page_length() {
    Fixture::new(DATA)
        .cmd()
        .args(["settings", "--page-length", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page length"));
}

#[test]
fn rollup_produces_sales_data() {
    let fx = Fixture::new(DATA);
    let sales = fx.path("sales.csv");
    let catalog = fx.path("catalog.json");
    std::fs::write(
        &sales,
        "month_of_sale,isbn,title,sales_type,retailer,quantity,amount\n\
         2025-11-01,111,First Book,retail,Shop,10,100.00\n\
         2026-01-01,222,Second Book,retail,Shop,20,200.00\n\
         2026-01-01,222,Second Book,subscription,Other,8,80.00\n\
         2026-01-01,999,Unknown,retail,Shop,1,1.00\n",
    )
    .unwrap();
    std::fs::write(
        &catalog,
        r#"[
            {"isbn": "111", "book_title": "First Book", "book_slug": "first-book", "author": "Alice", "royalty_share": 50.0},
            {"isbn": "222", "book_title": "Second Book", "book_slug": "second-book", "author": "Victor", "royalty_share": 25.0}
        ]"#,
    )
    .unwrap();
    let out = fx.path("data-out.json");

    fx.cmd()
        .args(["settings", "--locale", "en"])
        .assert()
        .success();
    fx.cmd()
        .arg("rollup")
        .arg("--sales")
        .arg(&sales)
        .arg("--catalog")
        .arg(&catalog)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let records: serde_json::Value = serde_json::from_str(&read(&out)).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["book_slug"], "second-book");
    assert_eq!(records[1]["quantity"], 28);
    assert_eq!(records[1]["payable_royalty"], 70.0);
    assert_eq!(records[1]["month_name"], "January");

    // The roll-up output feeds straight back into the report.
    fx.cmd()
        .arg("report")
        .arg("--data")
        .arg(&out)
        .arg("--config")
        .arg(&fx.config)
        .args(["--format", "csv", "--mode", "all-time"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Second Book,Victor,28,280,25,70"));
}

#[test]
fn rollup_bad_date_names_line() {
    let fx = Fixture::new(DATA);
    let sales = fx.path("sales.csv");
    let catalog = fx.path("catalog.json");
    std::fs::write(
        &sales,
        "month_of_sale,isbn,title,sales_type,retailer,quantity,amount\n\
         2025-11-01,111,First Book,retail,Shop,10,100.00\n\
         November 2025,111,First Book,retail,Shop,1,10.00\n",
    )
    .unwrap();
    std::fs::write(
        &catalog,
        r#"[{"isbn": "111", "book_title": "First Book", "book_slug": "first-book", "author": "Alice", "royalty_share": 50.0}]"#,
    )
    .unwrap();
    fx.cmd()
        .arg("rollup")
        .arg("--sales")
        .arg(&sales)
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}
