//! Formatter options

use serde::{Deserialize, Serialize};

/// Indentation character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    #[default]
    Spaces,
    Tabs,
}

/// Resolved, immutable printer settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Maximum line width used for fit decisions
    pub line_width: usize,

    /// Columns per indentation level (also the width of a tab)
    pub indent_width: usize,

    pub indent_style: IndentStyle,

    /// Break method chains with two or more calls, aligning the dots
    pub align_chains: bool,

    /// Break overlong argument lists one item per line
    pub align_arguments: bool,

    /// Break overlong parameter lists one item per line
    pub align_parameters: bool,

    /// Sort imports into fixed groups
    pub reorganize_imports: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            line_width: 100,
            indent_width: 4,
            indent_style: IndentStyle::Spaces,
            align_chains: true,
            align_arguments: true,
            align_parameters: true,
            reorganize_imports: true,
        }
    }
}

impl FormatOptions {
    /// Whitespace that pads a line to `column`
    ///
    /// With tabs, whole indentation levels become tabs and the remainder
    /// is filled with spaces so alignment survives any tab rendering.
    pub fn padding(&self, column: usize) -> String {
        match self.indent_style {
            IndentStyle::Spaces => " ".repeat(column),
            IndentStyle::Tabs if self.indent_width > 0 => {
                let tabs = column / self.indent_width;
                let spaces = column % self.indent_width;
                format!("{}{}", "\t".repeat(tabs), " ".repeat(spaces))
            }
            IndentStyle::Tabs => " ".repeat(column),
        }
    }
}
