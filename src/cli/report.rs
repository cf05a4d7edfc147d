use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::cli::{emit, FilterArgs, ReportFormat, SourceArgs};
use crate::columns::{Align, Field, ViewMode};
use crate::controller::{ViewController, ViewOptions};
use crate::error::{Result, SalesError};
use crate::grid::GridFactory;
use crate::markup;
use crate::models::SalesPage;
use crate::settings::load_settings;

pub type SalesController = ViewController<GridFactory>;

pub fn run(
    source: &SourceArgs,
    mode: Option<ViewMode>,
    filters: &FilterArgs,
    format: ReportFormat,
    output: Option<&Path>,
) -> Result<()> {
    let Some(page) = source.load()? else {
        return Ok(());
    };
    let settings = load_settings();
    let mode = mode.unwrap_or(settings.default_mode);
    let mut controller = build(page, settings.view_options(), mode)?;
    apply_filters(&mut controller, filters);

    let content = render(&mut controller, format)?;
    emit(&content, output)
}

/// Controller rendering `mode`. Reports have no empty-table fallback, so a
/// widget failure is an error here.
pub fn build(page: SalesPage, options: ViewOptions, mode: ViewMode) -> Result<SalesController> {
    match ViewController::open(page, GridFactory, options, mode) {
        (_, Some(e)) => Err(e),
        (controller, None) => Ok(controller),
    }
}

pub fn apply_filters(controller: &mut SalesController, filters: &FilterArgs) {
    controller.with_widget(|grid| {
        if let Some(term) = &filters.search {
            grid.set_search(term);
        }
        if let Some(book) = &filters.book {
            grid.set_column_filter(Field::Book, Some(book));
        }
        if let Some(author) = &filters.author {
            grid.set_column_filter(Field::Author, Some(author));
        }
        if let Some(year) = filters.year {
            grid.set_column_filter(Field::Year, Some(&year.to_string()));
        }
    });
}

pub fn render(controller: &mut SalesController, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => format_text(controller),
        ReportFormat::Csv => format_csv(controller)?,
        ReportFormat::Html => format_html(controller),
    })
}

fn alignment(align: Align) -> CellAlignment {
    match align {
        Align::Start => CellAlignment::Left,
        Align::End => CellAlignment::Right,
    }
}

fn title(controller: &SalesController) -> String {
    format!("Sales \u{2014} {}", controller.mode().title())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (controller -> String)
// ---------------------------------------------------------------------------

pub fn format_text(controller: &SalesController) -> String {
    let Some(grid) = controller.widget() else {
        return String::new();
    };
    let layout = grid.layout();
    let labels = &controller.config().labels;

    let mut table = Table::new();
    table.set_header(
        layout
            .columns
            .iter()
            .map(|c| Cell::new(c.field.label(labels)).set_alignment(alignment(c.align)))
            .collect::<Vec<_>>(),
    );

    for row in grid.visible_rows() {
        table.add_row(
            layout
                .columns
                .iter()
                .zip(&row.cells)
                .map(|(c, cell)| Cell::new(&cell.display).set_alignment(alignment(c.align)))
                .collect::<Vec<_>>(),
        );
    }

    let totals = controller.totals();
    let footer: Vec<Cell> = layout
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let text = match totals.iter().find(|(f, _)| *f == c.field) {
                Some((_, v)) => v.clone(),
                None if i == 0 => labels.total.clone(),
                None => String::new(),
            };
            Cell::new(text.as_str().bold()).set_alignment(alignment(c.align))
        })
        .collect();
    table.add_row(footer);

    format!("{}\n{table}\n", title(controller).as_str().bold())
}

pub fn format_csv(controller: &SalesController) -> Result<String> {
    let Some(grid) = controller.widget() else {
        return Ok(String::new());
    };
    let labels = &controller.config().labels;
    let layout = grid.layout();
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(layout.columns.iter().map(|c| c.field.label(labels)))?;
    for row in grid.visible_rows() {
        wtr.write_record(row.cells.iter().map(|cell| match cell.number {
            Some(n) => n.to_string(),
            None => cell.display.clone(),
        }))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| SalesError::Other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn format_html(controller: &mut SalesController) -> String {
    if controller.widget().is_none() {
        return String::new();
    }
    controller.render_body();
    let table = markup::table(
        controller.header_markup(),
        controller.body_markup(),
        controller.footer_markup(),
    );
    markup::document(&title(controller), table).into_string()
}
