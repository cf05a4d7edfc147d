//! HTML fragments for the `#sales-table` element.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::columns::{Align, Field, Layout, Renderer};
use crate::grid::Grid;
use crate::models::Labels;

const DOCUMENT_STYLE: &str = "table { border-collapse: collapse; }\n\
     th, td { padding: 4px 8px; border-bottom: 1px solid #ddd; }\n\
     .text-end { text-align: right; }\n\
     tfoot td { font-weight: bold; }";

fn align_class(align: Align) -> Option<&'static str> {
    match align {
        Align::Start => None,
        Align::End => Some("text-end"),
    }
}

/// `<tr>` of column headings for the layout.
pub fn header_row(layout: &Layout, labels: &Labels) -> Markup {
    html! {
        tr {
            @for c in layout.columns {
                th scope="col" class=[align_class(c.align)] { (c.field.label(labels)) }
            }
        }
    }
}

/// `<tr>` of footer cells: the total label, then one cell per column with
/// the rendered total in the designated cells and nothing elsewhere.
pub fn footer_row(layout: &Layout, labels: &Labels, totals: &[(Field, String)]) -> Markup {
    html! {
        tr {
            @for (i, c) in layout.columns.iter().enumerate() {
                @if let Some(total) = layout.total_for(c.field) {
                    @let value = totals
                        .iter()
                        .find(|(f, _)| *f == c.field)
                        .map(|(_, v)| v.as_str())
                        .unwrap_or_default();
                    td class=[align_class(c.align)] data-test-id=(total.test_id) { (value) }
                } @else if i == 0 {
                    td { (labels.total) }
                } @else {
                    td {}
                }
            }
        }
    }
}

/// One `<tr>` per filtered grid row, in display order.
pub fn body_rows(grid: &Grid) -> Markup {
    let layout = grid.layout();
    html! {
        @for row in grid.visible_rows() {
            tr {
                @for (c, cell) in layout.columns.iter().zip(&row.cells) {
                    td class=[align_class(c.align)] {
                        @if c.renderer == Renderer::BookLink {
                            a href={ "/books/" (row.book_slug) "/" } { (cell.display) }
                        } @else {
                            (cell.display)
                        }
                    }
                }
            }
        }
    }
}

/// Assemble a table element from its three already-rendered fragments.
pub fn table(head: &str, body: &str, foot: &str) -> Markup {
    html! {
        table id="sales-table" class="table" {
            thead { (PreEscaped(head)) }
            tbody { (PreEscaped(body)) }
            tfoot { (PreEscaped(foot)) }
        }
    }
}

/// A standalone HTML page around a rendered table.
pub fn document(heading: &str, table: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (heading) }
                style { (PreEscaped(DOCUMENT_STYLE)) }
            }
            body {
                h1 { (heading) }
                (table)
            }
        }
    }
}
