use super::display_path;
use crate::report::{PlannedRename, RenameKind};
use nu_ansi_term::Color as AnsiColor;
use std::fmt::Write;

/// One `rename: old -> new` line per planned rename.
pub fn render_list(renames: &[PlannedRename], use_color: bool) -> String {
    let mut output = String::new();
    for rename in renames {
        let from = display_path(&rename.from);
        let to = rename.new_name();
        let label = match rename.kind {
            RenameKind::File => "rename",
            RenameKind::Dir => "rename dir",
        };
        if use_color {
            writeln!(
                output,
                "  {}: {}  ->  {}",
                AnsiColor::Blue.paint(label),
                AnsiColor::Red.paint(from),
                AnsiColor::Green.paint(to)
            )
            .ok();
        } else {
            writeln!(output, "  {label}: {from}  ->  {to}").ok();
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::tests::sample;

    #[test]
    fn test_list_lines() {
        let output = render_list(&sample(), false);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("->  2024-03-05 Scan 01.pdf"));
        assert!(lines[1].contains("rename dir:"));
    }

    #[test]
    fn test_list_colors() {
        let output = render_list(&sample(), true);
        assert!(output.contains("\x1b["));
    }
}
