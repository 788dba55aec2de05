//! Table formatting for print output
//!
//! Applies structural styling to every table in a sanitized subtree:
//! full-width collapsed-border layout, uniform cell borders and padding,
//! emphasized header cells, and an alternating tint on body rows.
//!
//! The formatter is a pure transform over an already-parsed subtree and is
//! invoked exactly once per table per pipeline run (the assembler calls it
//! once per block, after sanitization).

use kuchiki::NodeRef;
use tracing::debug;

use crate::utils::dom::append_style;

const TABLE_STYLE: &str = "width: 100%; border-collapse: collapse; margin-bottom: 20px;";
const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px; text-align: left;";
const HEADER_CELL_STYLE: &str = "background-color: #f2f2f2; font-weight: bold;";

/// Background tint for alternating body rows, starting from the second
/// body row (0-based index 1).
const STRIPE_STYLE: &str = "background-color: #f9f9f9;";

/// Format every table in the subtree rooted at `root`.
pub fn format_tables(root: &NodeRef) {
    let tables: Vec<NodeRef> = match root.select("table") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };

    for table in &tables {
        format_table(table);
    }

    if !tables.is_empty() {
        debug!(count = tables.len(), "formatted tables for print");
    }
}

fn format_table(table: &NodeRef) {
    append_style(table, TABLE_STYLE);

    if let Ok(cells) = table.select("th, td") {
        for cell in cells {
            append_style(cell.as_node(), CELL_STYLE);
        }
    }

    if let Ok(headers) = table.select("th") {
        for th in headers {
            append_style(th.as_node(), HEADER_CELL_STYLE);
        }
    }

    // Body rows are rows containing no header cell; odd-indexed ones
    // (0-based) get the tint, so N header-free rows yield floor(N/2)
    // shaded rows.
    let rows: Vec<NodeRef> = match table.select("tr") {
        Ok(iter) => iter.map(|el| el.as_node().clone()).collect(),
        Err(()) => Vec::new(),
    };
    let body_rows = rows.iter().filter(|row| !contains_header_cell(row));
    for (i, row) in body_rows.enumerate() {
        if i % 2 == 1 {
            append_style(row, STRIPE_STYLE);
        }
    }
}

fn contains_header_cell(row: &NodeRef) -> bool {
    row.children().any(|child| {
        child
            .as_element()
            .is_some_and(|el| el.name.local.as_ref() == "th")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dom::{fragment_element, serialize_node};

    fn format(html: &str) -> String {
        let root = fragment_element(html).unwrap();
        format_tables(&root);
        serialize_node(&root).unwrap()
    }

    #[test]
    fn test_table_gets_layout_style() {
        let out = format("<table><tr><td>a</td></tr></table>");
        assert!(out.contains("width: 100%"));
        assert!(out.contains("border-collapse: collapse"));
        assert!(out.contains("margin-bottom: 20px"));
    }

    #[test]
    fn test_cells_get_border_padding_alignment() {
        let out = format("<table><tr><th>h</th><td>d</td></tr></table>");
        assert_eq!(out.matches("border: 1px solid #ddd").count(), 2);
        assert_eq!(out.matches("padding: 8px").count(), 2);
        assert_eq!(out.matches("text-align: left").count(), 2);
    }

    #[test]
    fn test_header_cells_emphasized() {
        let out = format("<table><tr><th>h</th><td>d</td></tr></table>");
        assert_eq!(out.matches("background-color: #f2f2f2").count(), 1);
        assert_eq!(out.matches("font-weight: bold").count(), 1);
    }

    #[test]
    fn test_alternating_rows_shade_floor_half() {
        // 5 header-free rows: indices 1 and 3 shaded
        let out = format(
            "<table>\
             <tr><th>h</th></tr>\
             <tr><td>0</td></tr><tr><td>1</td></tr><tr><td>2</td></tr>\
             <tr><td>3</td></tr><tr><td>4</td></tr>\
             </table>",
        );
        assert_eq!(out.matches("background-color: #f9f9f9").count(), 2);
    }

    #[test]
    fn test_header_row_not_counted_in_alternation() {
        // header row first, then two body rows: only the second body row shaded
        let root =
            fragment_element("<table><tr><th>h</th></tr><tr><td>a</td></tr><tr><td>b</td></tr></table>")
                .unwrap();
        format_tables(&root);
        let rows: Vec<_> = root.select("tr").unwrap().collect();
        let style_of = |i: usize| {
            let attrs = rows[i].attributes.borrow();
            attrs.get("style").unwrap_or("").to_string()
        };
        assert!(!style_of(0).contains("#f9f9f9"));
        assert!(!style_of(1).contains("#f9f9f9"));
        assert!(style_of(2).contains("#f9f9f9"));
    }

    #[test]
    fn test_single_body_row_unshaded() {
        let out = format("<table><tr><td>only</td></tr></table>");
        assert!(!out.contains("#f9f9f9"));
    }

    #[test]
    fn test_no_tables_is_noop() {
        let root = fragment_element("<div><p>no tables</p></div>").unwrap();
        let before = serialize_node(&root).unwrap();
        format_tables(&root);
        assert_eq!(serialize_node(&root).unwrap(), before);
    }
}
