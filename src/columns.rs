use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Labels;

/// Display granularity of the sales table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Monthly,
    Yearly,
    AllTime,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Monthly, ViewMode::Yearly, ViewMode::AllTime];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
            Self::AllTime => "All time",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::AllTime => "all-time",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Book,
    Author,
    Year,
    Month,
    Quantity,
    OriginalAmount,
    RoyaltyShare,
    PayableRoyalty,
}

impl Field {
    pub fn label<'a>(&self, labels: &'a Labels) -> &'a str {
        match self {
            Self::Book => &labels.book,
            Self::Author => &labels.author,
            Self::Year => &labels.year,
            Self::Month => &labels.month,
            Self::Quantity => &labels.quantity,
            Self::OriginalAmount => &labels.original_amount,
            Self::RoyaltyShare => &labels.royalty_share,
            Self::PayableRoyalty => &labels.payable_royalty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    End,
}

/// How a cell's value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Text,
    /// Title, linked to the book page in HTML output.
    BookLink,
    /// Shows the month name, sorts by month number.
    MonthName,
    Integer,
    Currency,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    pub align: Align,
    pub renderer: Renderer,
    /// Accepts exact-value column filters.
    pub filterable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: Field,
    pub direction: Direction,
}

/// A footer cell showing the sum of a column over the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterTotal {
    pub field: Field,
    pub test_id: &'static str,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Layout {
    pub mode: ViewMode,
    pub columns: &'static [Column],
    pub order: &'static [SortKey],
    pub totals: &'static [FooterTotal],
}

impl Layout {
    pub fn position(&self, field: Field) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }

    pub fn total_for(&self, field: Field) -> Option<&FooterTotal> {
        self.totals.iter().find(|t| t.field == field)
    }
}

const fn col(field: Field, align: Align, renderer: Renderer, filterable: bool) -> Column {
    Column {
        field,
        align,
        renderer,
        filterable,
    }
}

const BOOK: Column = col(Field::Book, Align::Start, Renderer::BookLink, true);
const AUTHOR: Column = col(Field::Author, Align::Start, Renderer::Text, true);
const YEAR: Column = col(Field::Year, Align::Start, Renderer::Integer, true);
const MONTH: Column = col(Field::Month, Align::Start, Renderer::MonthName, true);
const QUANTITY: Column = col(Field::Quantity, Align::End, Renderer::Integer, false);
const ORIGINAL_AMOUNT: Column = col(Field::OriginalAmount, Align::End, Renderer::Currency, false);
const ROYALTY_SHARE: Column = col(Field::RoyaltyShare, Align::End, Renderer::Percent, false);
const PAYABLE_ROYALTY: Column = col(Field::PayableRoyalty, Align::End, Renderer::Currency, false);

const TOTALS: &[FooterTotal] = &[
    FooterTotal { field: Field::Quantity, test_id: "total-quantity" },
    FooterTotal { field: Field::PayableRoyalty, test_id: "total-payable-royalty" },
];

const fn key(field: Field, direction: Direction) -> SortKey {
    SortKey { field, direction }
}

pub static MONTHLY: Layout = Layout {
    mode: ViewMode::Monthly,
    columns: &[
        BOOK,
        AUTHOR,
        YEAR,
        MONTH,
        QUANTITY,
        ORIGINAL_AMOUNT,
        ROYALTY_SHARE,
        PAYABLE_ROYALTY,
    ],
    order: &[
        key(Field::Year, Direction::Desc),
        key(Field::Month, Direction::Desc),
        key(Field::Book, Direction::Asc),
    ],
    totals: TOTALS,
};

pub static YEARLY: Layout = Layout {
    mode: ViewMode::Yearly,
    columns: &[BOOK, AUTHOR, YEAR, QUANTITY, ORIGINAL_AMOUNT, ROYALTY_SHARE, PAYABLE_ROYALTY],
    order: &[key(Field::Year, Direction::Desc), key(Field::Book, Direction::Asc)],
    totals: TOTALS,
};

pub static ALL_TIME: Layout = Layout {
    mode: ViewMode::AllTime,
    columns: &[BOOK, AUTHOR, QUANTITY, ORIGINAL_AMOUNT, ROYALTY_SHARE, PAYABLE_ROYALTY],
    order: &[key(Field::Book, Direction::Asc)],
    totals: TOTALS,
};

pub fn layout(mode: ViewMode) -> &'static Layout {
    match mode {
        ViewMode::Monthly => &MONTHLY,
        ViewMode::Yearly => &YEARLY,
        ViewMode::AllTime => &ALL_TIME,
    }
}
