use std::cmp::Ordering;
use std::collections::HashMap;

use maud::Markup;

use crate::columns::{Direction, Field, Layout, Renderer, SortKey};
use crate::error::{Result, SalesError};
use crate::fmt::{currency, percent};
use crate::markup;
use crate::models::{AggregatedRecord, LanguageConfig, SalesRecord};

// ---------------------------------------------------------------------------
// Row projection
// ---------------------------------------------------------------------------

/// Raw value of one field of a row, before rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Int(i64),
    Num(f64),
    Month { number: u32, name: &'a str },
    Missing,
}

/// Anything the table can display as a sales row.
pub trait RowSource {
    fn book_slug(&self) -> &str;
    fn value(&self, field: Field) -> FieldValue<'_>;
}

impl RowSource for SalesRecord {
    fn book_slug(&self) -> &str {
        &self.book_slug
    }

    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Book => FieldValue::Text(&self.book_title),
            Field::Author => FieldValue::Text(&self.author),
            Field::Year => FieldValue::Int(self.year as i64),
            Field::Month => FieldValue::Month {
                number: self.month,
                name: &self.month_name,
            },
            Field::Quantity => FieldValue::Int(self.quantity as i64),
            Field::OriginalAmount => FieldValue::Num(self.original_amount),
            Field::RoyaltyShare => FieldValue::Num(self.royalty_share),
            Field::PayableRoyalty => FieldValue::Num(self.payable_royalty),
        }
    }
}

impl RowSource for AggregatedRecord {
    fn book_slug(&self) -> &str {
        &self.book_slug
    }

    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Book => FieldValue::Text(&self.book_title),
            Field::Author => FieldValue::Text(&self.author),
            Field::Year => self
                .year
                .map_or(FieldValue::Missing, |y| FieldValue::Int(y as i64)),
            Field::Month => FieldValue::Missing,
            Field::Quantity => FieldValue::Int(self.quantity as i64),
            Field::OriginalAmount => FieldValue::Num(self.original_amount),
            Field::RoyaltyShare => FieldValue::Num(self.royalty_share),
            Field::PayableRoyalty => FieldValue::Num(self.payable_royalty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub display: String,
    pub sort: SortValue,
    /// Lowercased raw value the search runs against.
    pub filter: String,
    /// Unrounded numeric value, for footer totals.
    pub number: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub book_slug: String,
    pub cells: Vec<Cell>,
}

fn render(value: FieldValue<'_>, renderer: Renderer, prefix: &str) -> Cell {
    match value {
        FieldValue::Text(s) => Cell {
            display: s.to_string(),
            sort: SortValue::Text(s.to_lowercase()),
            filter: s.to_lowercase(),
            number: None,
        },
        FieldValue::Month { number, name } => Cell {
            display: name.to_string(),
            sort: SortValue::Number(number as f64),
            filter: name.to_lowercase(),
            number: None,
        },
        FieldValue::Int(n) => Cell {
            display: n.to_string(),
            sort: SortValue::Number(n as f64),
            filter: n.to_string(),
            number: Some(n as f64),
        },
        FieldValue::Num(x) => Cell {
            display: match renderer {
                Renderer::Currency => currency(x, prefix),
                Renderer::Percent => percent(x),
                _ => x.to_string(),
            },
            sort: SortValue::Number(x),
            filter: x.to_string(),
            number: Some(x),
        },
        FieldValue::Missing => Cell {
            display: String::new(),
            sort: SortValue::Text(String::new()),
            filter: String::new(),
            number: None,
        },
    }
}

/// Project source rows onto a layout's columns.
pub fn project<R: RowSource>(rows: &[R], layout: &Layout, currency_prefix: &str) -> Vec<GridRow> {
    rows.iter()
        .map(|row| GridRow {
            book_slug: row.book_slug().to_string(),
            cells: layout
                .columns
                .iter()
                .map(|c| render(row.value(c.field), c.renderer, currency_prefix))
                .collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Widget seam
// ---------------------------------------------------------------------------

/// Rows plus the column, sort and footer configuration a widget is built with.
#[derive(Debug, Clone)]
pub struct WidgetSetup {
    pub layout: &'static Layout,
    pub rows: Vec<GridRow>,
    pub language: LanguageConfig,
    pub page_length: usize,
}

/// A sortable, filterable table bound to one dataset.
pub trait TableWidget {
    /// Sum of a numeric column over the rows passing the current filters.
    fn filtered_sum(&self, field: Field) -> f64;
    /// `<tr>` markup for the rows passing the current filters, in display order.
    fn body_rows(&self) -> Markup;
    /// Release the widget. Called once before the controller drops it.
    fn destroy(&mut self);
}

pub trait WidgetFactory {
    type Widget: TableWidget;
    fn create(&mut self, setup: WidgetSetup) -> Result<Self::Widget>;
}

// ---------------------------------------------------------------------------
// Default in-memory grid
// ---------------------------------------------------------------------------

pub struct Grid {
    layout: &'static Layout,
    rows: Vec<GridRow>,
    language: LanguageConfig,
    page_length: usize,
    order: Vec<SortKey>,
    search: String,
    search_words: Vec<String>,
    column_filters: HashMap<Field, String>,
    /// Indices into `rows` of the filtered rows, in display order.
    visible: Vec<usize>,
}

impl Grid {
    pub fn new(setup: WidgetSetup) -> Result<Self> {
        let width = setup.layout.columns.len();
        if let Some(bad) = setup.rows.iter().find(|r| r.cells.len() != width) {
            return Err(SalesError::Widget(format!(
                "row for '{}' has {} cells, layout has {width} columns",
                bad.book_slug,
                bad.cells.len()
            )));
        }
        let mut grid = Self {
            layout: setup.layout,
            rows: setup.rows,
            language: setup.language,
            page_length: setup.page_length.max(1),
            order: setup.layout.order.to_vec(),
            search: String::new(),
            search_words: Vec::new(),
            column_filters: HashMap::new(),
            visible: Vec::new(),
        };
        grid.refresh();
        Ok(grid)
    }

    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    pub fn language(&self) -> &LanguageConfig {
        &self.language
    }

    pub fn page_length(&self) -> usize {
        self.page_length
    }

    pub fn order(&self) -> &[SortKey] {
        &self.order
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Filtered rows in display order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &GridRow> + '_ {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Every whitespace-separated word of `term` must occur, ignoring case,
    /// in some cell's raw value.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
        self.search_words = self.search.split_whitespace().map(str::to_string).collect();
        self.refresh();
    }

    /// Restrict a filterable column to one exact display value, or clear it.
    /// Fields absent from the layout or not filterable are ignored.
    pub fn set_column_filter(&mut self, field: Field, value: Option<&str>) {
        let filterable = self
            .layout
            .columns
            .iter()
            .any(|c| c.field == field && c.filterable);
        if !filterable {
            return;
        }
        match value {
            Some(v) => {
                self.column_filters.insert(field, v.to_string());
            }
            None => {
                self.column_filters.remove(&field);
            }
        }
        self.refresh();
    }

    pub fn sort_by(&mut self, field: Field, direction: Direction) {
        if self.layout.position(field).is_some() {
            self.order = vec![SortKey { field, direction }];
            self.refresh();
        }
    }

    pub fn reset_order(&mut self) {
        self.order = self.layout.order.to_vec();
        self.refresh();
    }

    fn matches(&self, row: &GridRow) -> bool {
        for (field, wanted) in &self.column_filters {
            let Some(pos) = self.layout.position(*field) else {
                continue;
            };
            if row.cells[pos].display != *wanted {
                return false;
            }
        }
        self.search_words
            .iter()
            .all(|word| row.cells.iter().any(|c| c.filter.contains(word.as_str())))
    }

    fn refresh(&mut self) {
        let keys: Vec<(usize, Direction)> = self
            .order
            .iter()
            .filter_map(|k| self.layout.position(k.field).map(|p| (p, k.direction)))
            .collect();
        let mut visible: Vec<usize> = (0..self.rows.len())
            .filter(|&i| self.matches(&self.rows[i]))
            .collect();
        visible.sort_by(|&a, &b| {
            for &(pos, dir) in &keys {
                let ord = self.rows[a].cells[pos]
                    .sort
                    .compare(&self.rows[b].cells[pos].sort);
                let ord = match dir {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        self.visible = visible;
    }
}

impl TableWidget for Grid {
    fn filtered_sum(&self, field: Field) -> f64 {
        let Some(pos) = self.layout.position(field) else {
            return 0.0;
        };
        self.visible_rows()
            .filter_map(|r| r.cells[pos].number)
            .sum()
    }

    fn body_rows(&self) -> Markup {
        markup::body_rows(self)
    }

    fn destroy(&mut self) {
        self.rows.clear();
        self.visible.clear();
        self.column_filters.clear();
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GridFactory;

impl WidgetFactory for GridFactory {
    type Widget = Grid;

    fn create(&mut self, setup: WidgetSetup) -> Result<Grid> {
        Grid::new(setup)
    }
}
