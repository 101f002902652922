use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keytrace::api::ReadStats;
use keytrace::report::{CharCount, Report};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

/// Printable label for a character cell. Whitespace and control characters
/// would otherwise render as empty cells.
fn char_label(c: char) -> String {
    match c {
        ' ' => "space".to_string(),
        c if c.is_control() || c.is_whitespace() => c.escape_debug().to_string(),
        c => c.to_string(),
    }
}

pub fn print_summary(report: &Report, stats: &ReadStats) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("%"),
    ]);
    table.add_row(vec![
        Cell::new("Records"),
        Cell::new(stats.records),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Sessions"),
        Cell::new(report.sessions),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(report.total).fg(Color::Cyan),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("SFB").fg(Color::Red),
        Cell::new(report.sfb),
        Cell::new(format!("{:.1}%", report.sfb_percent)),
    ]);
    table.add_row(vec![
        Cell::new("DSFB").fg(Color::Red),
        Cell::new(report.dsfb),
        Cell::new(format!("{:.1}%", report.dsfb_percent)),
    ]);
    right_align(&mut table, 1..=2);
    println!("\n{}", table);
}

pub fn print_fingers(report: &Report) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Finger").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("%"),
    ]);
    for usage in &report.fingers {
        table.add_row(vec![
            Cell::new(usage.finger),
            Cell::new(usage.count),
            Cell::new(format!("{:.1}%", usage.percent)),
        ]);
    }
    right_align(&mut table, 1..=2);
    println!("\n{}", table);
}

/// `top == 0` prints every row.
pub fn print_frequencies(title: &str, rows: &[CharCount], top: usize) {
    if rows.is_empty() {
        println!("\n{}: none", title);
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new(title).add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("%"),
    ]);

    let limit = if top == 0 { rows.len() } else { top };
    for row in rows.iter().take(limit) {
        table.add_row(vec![
            Cell::new(char_label(row.ch)).set_alignment(CellAlignment::Center),
            Cell::new(row.count),
            Cell::new(format!("{:.1}%", row.percent)),
        ]);
    }
    right_align(&mut table, 1..=2);
    println!("\n{}", table);

    if rows.len() > limit {
        println!("({} more not shown)", rows.len() - limit);
    }
}

pub fn print_report(report: &Report, stats: &ReadStats, top: usize) {
    print_fingers(report);
    print_summary(report, stats);
    print_frequencies("Characters", &report.characters, top);
    print_frequencies("Unmapped", &report.unmapped, top);
}
