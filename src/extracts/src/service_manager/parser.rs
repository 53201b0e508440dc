use std::collections::BTreeMap;

pub trait UnitLineParser: Send + Sync {
    /// `(unit name, status)` for a listing line, or `None` when the line is not a unit row.
    fn parse_line(&self, line: &str) -> Option<(String, String)>;
}

/// Whitespace-column parser for the tabular `systemctl list-units` output.
///
/// A row is `UNIT LOAD ACTIVE SUB DESCRIPTION`; failed units are prefixed with a bullet
/// glyph (`●`, or `*` on non-UTF-8 terminals) which shifts every column by one.
#[derive(Clone, Debug)]
pub struct ColumnUnitParser {
    pub name_column: usize,
    pub status_column: usize,
    pub marker_glyphs: Vec<String>,
}

impl Default for ColumnUnitParser {
    fn default() -> Self {
        Self {
            name_column: 0,
            status_column: 2,
            marker_glyphs: vec!["●".to_string(), "*".to_string()],
        }
    }
}

impl UnitLineParser for ColumnUnitParser {
    fn parse_line(&self, line: &str) -> Option<(String, String)> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() <= self.status_column {
            return None;
        }

        let offset = usize::from(
            self.marker_glyphs
                .iter()
                .any(|glyph| glyph.as_str() == fields[0]),
        );

        let name = fields.get(self.name_column + offset)?;
        let status = fields.get(self.status_column + offset)?;
        Some((name.to_string(), status.to_string()))
    }
}

/// Parses every listing line containing `marker`. Later rows for the same unit win.
pub fn parse_listing(
    parser: &dyn UnitLineParser,
    marker: &str,
    listing: &str,
) -> BTreeMap<String, String> {
    listing
        .lines()
        .filter(|line| line.contains(marker))
        .filter_map(|line| parser.parse_line(line))
        .collect()
}
