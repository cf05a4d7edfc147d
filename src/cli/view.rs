use std::io::IsTerminal;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::cli::report::{build, format_text, SalesController};
use crate::cli::SourceArgs;
use crate::columns::{Align, Direction, Field, ViewMode};
use crate::controller::ViewController;
use crate::grid::GridFactory;
use crate::error::Result;
use crate::settings::{get_data_dir, load_settings};
use crate::tui::{
    run_view, wrap_text, InteractiveView, ViewAction, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE,
    SELECTED_STYLE, TOTAL_STYLE,
};

pub fn run(source: &SourceArgs, mode: Option<ViewMode>) -> Result<()> {
    let Some(page) = source.load()? else {
        return Ok(());
    };
    let settings = load_settings();
    let mode = mode.unwrap_or(settings.default_mode);

    if !std::io::stdout().is_terminal() {
        let controller = build(page, settings.view_options(), mode)?;
        print!("{}", format_text(&controller));
        return Ok(());
    }
    // A failed first build still opens the view, empty, with the error shown.
    let (controller, err) = ViewController::open(page, GridFactory, settings.view_options(), mode);
    let mut view = SalesView::new(controller);
    view.status_message = err.map(|e| e.to_string());
    run_view(&mut view)
}

/// Where interactive-view logs go.
pub fn log_path() -> std::path::PathBuf {
    get_data_dir().join("royalties.log")
}

enum InputMode {
    Normal,
    Search(String),
}

pub struct SalesView {
    controller: SalesController,
    offset: usize,
    visible_count: usize,
    input: InputMode,
    status_message: Option<String>,
    sort_column: usize,
}

impl SalesView {
    pub fn new(controller: SalesController) -> Self {
        Self {
            controller,
            offset: 0,
            visible_count: 20,
            input: InputMode::Normal,
            status_message: None,
            sort_column: 0,
        }
    }

    #[cfg(test)]
    fn controller(&self) -> &SalesController {
        &self.controller
    }

    fn row_count(&self) -> usize {
        self.controller.widget().map_or(0, |g| g.visible_len())
    }

    fn switch(&mut self, mode: ViewMode) {
        self.offset = 0;
        self.sort_column = 0;
        self.input = InputMode::Normal;
        match self.controller.switch_to(mode) {
            Ok(()) => self.status_message = None,
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn apply_search(&mut self, term: &str) {
        self.offset = 0;
        self.controller.with_widget(|g| g.set_search(term));
    }

    fn cycle_sort(&mut self) {
        let columns = self.controller.layout().columns;
        self.sort_column = (self.sort_column + 1) % columns.len();
        let field = columns[self.sort_column].field;
        self.controller.with_widget(|g| g.sort_by(field, Direction::Asc));
    }

    fn reverse_sort(&mut self) {
        self.controller.with_widget(|g| {
            if let Some(first) = g.order().first().copied() {
                let direction = match first.direction {
                    Direction::Asc => Direction::Desc,
                    Direction::Desc => Direction::Asc,
                };
                g.sort_by(first.field, direction);
            }
        });
    }

    fn mode_tabs(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for (i, mode) in ViewMode::ALL.iter().enumerate() {
            let label = format!("[{}] {}", i + 1, mode.title());
            if *mode == self.controller.mode() {
                spans.push(Span::styled(label, SELECTED_STYLE));
            } else {
                spans.push(Span::styled(label, FOOTER_STYLE));
            }
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }

    fn totals_line(&self) -> Line<'static> {
        let labels = &self.controller.config().labels;
        let mut spans = vec![Span::styled(format!(" {}", labels.total), TOTAL_STYLE)];
        for (field, value) in self.controller.totals() {
            spans.push(Span::raw(format!("   {}: ", field.label(labels))));
            spans.push(Span::styled(value, TOTAL_STYLE));
        }
        Line::from(spans)
    }
}

fn aligned(text: String, align: Align) -> Cell<'static> {
    let line = Line::from(text);
    Cell::from(match align {
        Align::Start => line,
        Align::End => line.alignment(Alignment::Right),
    })
}

fn width_for(field: Field) -> Constraint {
    match field {
        Field::Book => Constraint::Fill(2),
        Field::Author => Constraint::Fill(1),
        Field::Year => Constraint::Length(6),
        Field::Month => Constraint::Length(12),
        Field::Quantity | Field::RoyaltyShare => Constraint::Length(10),
        Field::OriginalAmount | Field::PayableRoyalty => Constraint::Length(14),
    }
}

impl InteractiveView for SalesView {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [title_area, tabs_area, table_area, totals_area, status_area, keys_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Sales \u{2014} {}", self.controller.mode().title()))
                .style(HEADER_STYLE),
            title_area,
        );
        frame.render_widget(Paragraph::new(self.mode_tabs()), tabs_area);

        let layout = self.controller.layout();
        let labels = &self.controller.config().labels;
        let widths: Vec<Constraint> = layout.columns.iter().map(|c| width_for(c.field)).collect();

        // Book column gets roughly 2/(fixed + fill) of the width; wrap titles to it.
        let fixed: u16 = layout
            .columns
            .iter()
            .map(|c| match width_for(c.field) {
                Constraint::Length(n) => n + 2,
                _ => 2,
            })
            .sum();
        let book_width = (table_area.width.saturating_sub(fixed) as usize * 2 / 3).max(10);

        let header_overhead = 2u16;
        let available = table_area.height.saturating_sub(header_overhead) as usize;
        let mut rows = Vec::new();
        let mut used = 0usize;
        if let Some(grid) = self.controller.widget() {
            for row in grid.visible_rows().skip(self.offset) {
                let mut height = 1u16;
                let cells: Vec<Cell> = layout
                    .columns
                    .iter()
                    .zip(&row.cells)
                    .map(|(c, cell)| {
                        if c.field == Field::Book {
                            let (wrapped, lines) = wrap_text(&cell.display, book_width);
                            height = height.max(lines);
                            Cell::from(wrapped)
                        } else {
                            aligned(cell.display.clone(), c.align)
                        }
                    })
                    .collect();
                if used + height as usize > available && !rows.is_empty() {
                    break;
                }
                used += height as usize;
                rows.push(Row::new(cells).height(height));
            }
        }
        self.visible_count = rows.len().max(1);

        let header = Row::new(
            layout
                .columns
                .iter()
                .map(|c| aligned(c.field.label(labels).to_string(), c.align))
                .collect::<Vec<_>>(),
        )
        .style(HEADER_STYLE)
        .bottom_margin(1);
        frame.render_widget(
            Table::new(rows, widths).header(header).column_spacing(2),
            table_area,
        );

        frame.render_widget(Paragraph::new(self.totals_line()), totals_area);

        let status = if let Some(msg) = &self.status_message {
            Paragraph::new(format!(" {msg}")).style(ERROR_STYLE)
        } else if let Some(grid) = self.controller.widget() {
            let shown = grid.visible_len();
            if shown == 0 {
                Paragraph::new(format!(" {}", grid.language().no_matches())).style(FOOTER_STYLE)
            } else {
                let end = (self.offset + self.visible_count).min(shown);
                let filtered = if shown < grid.total_rows() {
                    format!(" (filtered from {})", grid.total_rows())
                } else {
                    String::new()
                };
                Paragraph::new(format!(" Rows {}-{end} of {shown}{filtered}", self.offset + 1))
                    .style(FOOTER_STYLE)
            }
        } else {
            Paragraph::new("")
        };
        frame.render_widget(status, status_area);

        let keys = match &self.input {
            InputMode::Normal => Paragraph::new(
                " 1/2/3=mode  /=search  s=sort  r=reverse  o=default order  \u{2191}/\u{2193}=scroll  q/Esc=close",
            )
            .style(FOOTER_STYLE),
            InputMode::Search(term) => {
                let prompt = self
                    .controller
                    .widget()
                    .map_or("Search:", |g| g.language().search_prompt());
                Paragraph::new(format!(" {prompt} {term}\u{2588}"))
            }
        };
        frame.render_widget(keys, keys_area);
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if let InputMode::Search(term) = &mut self.input {
            match code {
                KeyCode::Esc => {
                    self.input = InputMode::Normal;
                    self.apply_search("");
                }
                KeyCode::Enter => self.input = InputMode::Normal,
                KeyCode::Backspace => {
                    term.pop();
                    let t = term.clone();
                    self.apply_search(&t);
                }
                KeyCode::Char(c) => {
                    term.push(c);
                    let t = term.clone();
                    self.apply_search(&t);
                }
                _ => {}
            }
            return ViewAction::Continue;
        }

        let page = self
            .controller
            .widget()
            .map_or(self.visible_count, |g| g.page_length().min(self.visible_count));
        let max = self.row_count().saturating_sub(self.visible_count);
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Close,
            KeyCode::Char('1') | KeyCode::Char('m') => self.switch(ViewMode::Monthly),
            KeyCode::Char('2') | KeyCode::Char('y') => self.switch(ViewMode::Yearly),
            KeyCode::Char('3') | KeyCode::Char('a') => self.switch(ViewMode::AllTime),
            KeyCode::Char('/') => {
                let current = self
                    .controller
                    .widget()
                    .map(|g| g.search().to_string())
                    .unwrap_or_default();
                self.input = InputMode::Search(current);
            }
            KeyCode::Char('s') => self.cycle_sort(),
            KeyCode::Char('r') => self.reverse_sort(),
            KeyCode::Char('o') => {
                self.controller.with_widget(|g| g.reset_order());
            }
            KeyCode::Up | KeyCode::Char('k') => self.offset = self.offset.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.offset = (self.offset + 1).min(max),
            KeyCode::PageUp => self.offset = self.offset.saturating_sub(page),
            KeyCode::PageDown => self.offset = (self.offset + page).min(max),
            KeyCode::Home => self.offset = 0,
            KeyCode::End => self.offset = max,
            _ => {}
        }
        ViewAction::Continue
    }
}
