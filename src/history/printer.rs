use super::model::HistoryEntry;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

/// 渲染历史记录表格 (按传入顺序)
pub fn history_table<'a>(entries: impl IntoIterator<Item = &'a HistoryEntry>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Time", "Method", "URL", "Status", "Duration"]);

    for entry in entries {
        let status_color = if entry.status < 400 {
            Color::Green
        } else {
            Color::Red
        };

        table.add_row(vec![
            Cell::new(entry.short_id()),
            Cell::new(entry.timestamp.format("%H:%M:%S")),
            Cell::new(entry.method),
            Cell::new(&entry.url).add_attribute(Attribute::Dim),
            Cell::new(entry.status).fg(status_color),
            Cell::new(format!("{}ms", entry.duration_ms)),
        ]);
    }

    table
}
