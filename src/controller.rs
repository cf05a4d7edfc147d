use crate::aggregate::{aggregate_all_time, aggregate_by_year};
use crate::columns::{layout, Field, Layout, ViewMode};
use crate::error::{Result, SalesError};
use crate::fmt::currency;
use crate::grid::{project, GridRow, TableWidget, WidgetFactory, WidgetSetup};
use crate::markup;
use crate::models::{SalesConfig, SalesPage, SalesRecord};

/// Display options the controller passes to every widget it builds.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub currency_prefix: String,
    pub page_length: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            currency_prefix: "$".to_string(),
            page_length: 25,
        }
    }
}

/// Owns the current view mode and the single live table widget.
///
/// Every mode switch destroys the widget, rewrites the header and footer
/// markup, clears the body and builds a new widget from the raw records.
pub struct ViewController<F: WidgetFactory> {
    records: Vec<SalesRecord>,
    config: SalesConfig,
    options: ViewOptions,
    factory: F,
    mode: ViewMode,
    widget: Option<F::Widget>,
    header: String,
    footer: String,
    body: String,
}

impl<F: WidgetFactory> ViewController<F> {
    /// A controller in its empty state: `initial` is the mode, but no widget
    /// is built and all markup is empty until `switch_to` runs.
    pub fn new(page: SalesPage, factory: F, options: ViewOptions, initial: ViewMode) -> Self {
        Self {
            records: page.records,
            config: page.config,
            options,
            factory,
            mode: initial,
            widget: None,
            header: String::new(),
            footer: String::new(),
            body: String::new(),
        }
    }

    /// Build the controller and render `initial`. The controller is returned
    /// even when the widget fails to build, in its empty state, together with
    /// the error.
    pub fn open(
        page: SalesPage,
        factory: F,
        options: ViewOptions,
        initial: ViewMode,
    ) -> (Self, Option<SalesError>) {
        let mut controller = Self::new(page, factory, options, initial);
        let err = controller.switch_to(initial).err();
        (controller, err)
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layout(&self) -> &'static Layout {
        layout(self.mode)
    }

    pub fn config(&self) -> &SalesConfig {
        &self.config
    }

    pub fn widget(&self) -> Option<&F::Widget> {
        self.widget.as_ref()
    }

    /// Mutate the widget (search, filters, sorting), then rewrite the footer
    /// totals from its filtered rows. A rendered body is re-rendered.
    pub fn with_widget<T>(&mut self, f: impl FnOnce(&mut F::Widget) -> T) -> Option<T> {
        let out = self.widget.as_mut().map(f);
        self.refresh_totals();
        if !self.body.is_empty() {
            self.render_body();
        }
        out
    }

    pub fn header_markup(&self) -> &str {
        &self.header
    }

    pub fn footer_markup(&self) -> &str {
        &self.footer
    }

    /// Body rows last rendered from the widget; empty after every switch.
    pub fn body_markup(&self) -> &str {
        &self.body
    }

    /// Fill the body with the widget's filtered rows in display order.
    pub fn render_body(&mut self) -> &str {
        self.body = self
            .widget
            .as_ref()
            .map(|w| w.body_rows().into_string())
            .unwrap_or_default();
        &self.body
    }

    /// Dataset for `mode`, always derived from the untouched raw records.
    pub fn dataset(&self, mode: ViewMode) -> Vec<GridRow> {
        let l = layout(mode);
        let prefix = &self.options.currency_prefix;
        match mode {
            ViewMode::Monthly => project(&self.records, l, prefix),
            ViewMode::Yearly => project(&aggregate_by_year(&self.records), l, prefix),
            ViewMode::AllTime => project(&aggregate_all_time(&self.records), l, prefix),
        }
    }

    pub fn switch_to(&mut self, mode: ViewMode) -> Result<()> {
        tracing::debug!(from = %self.mode, to = %mode, "switching sales view");

        if let Some(mut old) = self.widget.take() {
            old.destroy();
        }
        self.mode = mode;

        let l = layout(mode);
        let rows = self.dataset(mode);
        self.header = markup::header_row(l, &self.config.labels).into_string();
        self.footer = markup::footer_row(l, &self.config.labels, &self.zero_totals()).into_string();
        self.body.clear();

        let setup = WidgetSetup {
            layout: l,
            rows,
            language: self.config.language.clone(),
            page_length: self.options.page_length,
        };
        match self.factory.create(setup) {
            Ok(widget) => {
                self.widget = Some(widget);
                self.refresh_totals();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    mode = %mode,
                    error = %e,
                    "table widget failed to build, leaving table empty"
                );
                self.header.clear();
                self.footer.clear();
                Err(e)
            }
        }
    }

    /// Footer totals as rendered text: `(field, text)` per total cell.
    pub fn totals(&self) -> Vec<(Field, String)> {
        let Some(widget) = &self.widget else {
            return Vec::new();
        };
        self.layout()
            .totals
            .iter()
            .map(|t| (t.field, self.render_total(t.field, widget.filtered_sum(t.field))))
            .collect()
    }

    fn render_total(&self, field: Field, sum: f64) -> String {
        match field {
            Field::OriginalAmount | Field::PayableRoyalty => {
                currency(sum, &self.options.currency_prefix)
            }
            _ => format!("{}", sum.round() as i64),
        }
    }

    fn zero_totals(&self) -> Vec<(Field, String)> {
        self.layout()
            .totals
            .iter()
            .map(|t| (t.field, self.render_total(t.field, 0.0)))
            .collect()
    }

    fn refresh_totals(&mut self) {
        if self.widget.is_none() {
            return;
        }
        let totals = self.totals();
        self.footer = markup::footer_row(self.layout(), &self.config.labels, &totals).into_string();
    }
}
