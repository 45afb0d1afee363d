use super::display_path;
use crate::report::{PlannedRename, RenameKind};
use comfy_table::{Cell, Color, ContentArrangement, Table};
use std::io::{self, IsTerminal};

/// Render planned renames as a table
pub fn render_table(renames: &[PlannedRename], use_color: bool) -> String {
    let mut table = Table::new();

    if io::stdout().is_terminal() {
        table.set_content_arrangement(ContentArrangement::Dynamic);
    } else {
        table.set_content_arrangement(ContentArrangement::Disabled);
    }

    // Force styling even in non-TTY environments when colors are explicitly requested
    if use_color {
        table.enforce_styling();
        table.set_header(vec![
            Cell::new("Path").fg(Color::Cyan),
            Cell::new("Kind").fg(Color::Cyan),
            Cell::new("New Name").fg(Color::Cyan),
        ]);
    } else {
        table.set_header(vec!["Path", "Kind", "New Name"]);
    }

    let mut files = 0;
    let mut dirs = 0;
    for rename in renames {
        let from_str = display_path(&rename.from);
        let kind_str = match rename.kind {
            RenameKind::File => {
                files += 1;
                "File"
            },
            RenameKind::Dir => {
                dirs += 1;
                "Dir"
            },
        };
        let to_str = format!("→ {}", rename.new_name());

        if use_color {
            table.add_row(vec![
                Cell::new(&from_str),
                Cell::new(kind_str).fg(Color::Blue),
                Cell::new(to_str).fg(Color::Magenta),
            ]);
        } else {
            table.add_row(vec![from_str.as_str(), kind_str, to_str.as_str()]);
        }
    }

    let totals = format!("{files} files, {dirs} dirs");
    if use_color {
        table.add_row(vec![
            Cell::new("TOTALS").fg(Color::Cyan),
            Cell::new(totals).fg(Color::White),
            Cell::new(""),
        ]);
    } else {
        table.add_row(vec!["TOTALS", totals.as_str(), ""]);
    }

    let mut output = table.to_string();
    output.push('\n');
    output
}
