//! The structured content plan: pages of column-addressed blocks.
//!
//! The plan is pure data. A rendering backend (plain text here, PDF or
//! anything else elsewhere) walks it without making any layout decisions of
//! its own.

use serde::Serialize;

/// A fully laid-out multi-page document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// One physical page: blocks tagged with the column they belong to, in
/// placement order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub blocks: Vec<PlacedBlock>,
}

impl Page {
    /// Blocks of a single column, in placement order.
    pub fn column_blocks(&self, column: ColumnKind) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(move |placed| placed.column == column)
            .map(|placed| &placed.block)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedBlock {
    pub column: ColumnKind,
    pub block: Block,
}

/// Layout stream a block belongs to. `FullWidth` spans all columns (report
/// header area); the other three are the parallel vertical streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    FullWidth,
    Combined,
    Connector1,
    Connector2,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::FullWidth => "",
            ColumnKind::Combined => "COMBINED CHARGER",
            ColumnKind::Connector1 => "CONNECTOR 1",
            ColumnKind::Connector2 => "CONNECTOR 2",
        }
    }
}

/// Visual emphasis for banners and cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Plain,
    Good,
    Attention,
}

/// One laid-out content block.
#[derive(Debug, Clone, Serialize)]
pub enum Block {
    /// Document/report title line.
    Title(String),
    /// Small header metadata line (generated-at, station summary, period).
    Meta { text: String, bold: bool },
    /// Inverted section header bar ("1. Charger Usage & Readiness").
    SectionHeader(String),
    /// Prominent one-line banner (success rate), tone-keyed.
    Banner { text: String, tone: Tone },
    Table(Table),
    /// Plain note ("No Failed / Error stops recorded.").
    Note(String),
}

impl Block {
    /// Height in layout lines; drives column page breaking.
    pub fn height(&self) -> usize {
        match self {
            Block::Title(_) | Block::Meta { .. } => 1,
            Block::SectionHeader(_) | Block::Banner { .. } | Block::Note(_) => 2,
            Block::Table(table) => table.rows.len() + 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub head: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn plain(cells: &[&str]) -> Self {
        TableRow {
            cells: cells.iter().map(|text| Cell::plain(*text)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub text: String,
    pub tone: Tone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Cell { text: text.into(), tone: Tone::Plain }
    }

    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Cell { text: text.into(), tone }
    }
}
