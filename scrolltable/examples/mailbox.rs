use std::fs::File;

use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};

use scrolltable::error::TableError;
use scrolltable::model::RowId;
use scrolltable::selection::{RowObserver, RowSelectionModel};
use scrolltable::source::InMemoryRowSource;
use scrolltable::view::{BlockRenderer, ScrollConfig, ScrollTable};
use scrolltable::Row;

/// Prints selection and activation changes the way a view would restyle
/// rows.
struct PrintObserver;

impl RowObserver for PrintObserver {
    fn row_selected(&mut self, row: &Row) {
        println!("  [x] {}", row.get_str("subject").unwrap_or_default());
    }

    fn row_unselected(&mut self, row: &Row) {
        println!("  [ ] {}", row.get_str("subject").unwrap_or_default());
    }

    fn row_activated(&mut self, row: &Row) {
        println!("  >>> {}", row.get_str("subject").unwrap_or_default());
    }

    fn row_deactivated(&mut self, row: &Row) {
        println!("  <<< {}", row.get_str("subject").unwrap_or_default());
    }
}

fn print_layout(table: &ScrollTable<InMemoryRowSource, BlockRenderer>) {
    for placeholder in table.placeholders().placeholders() {
        let state = match placeholder.content() {
            Some(block) => format!("{} rows loaded", block.len()),
            None => "placeholder".to_string(),
        };
        println!("  [{:>4}, {:>4}) {}", placeholder.start(), placeholder.stop(), state);
    }
}

fn mark_read(rows: &mut RowSelectionModel) -> Result<(), TableError> {
    let mut ids: Vec<RowId> = Vec::new();
    rows.visit_selected_rows(|row| ids.push(row.id().clone()));
    for id in ids {
        rows.row_mut(&id)?.set_field("read", true);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up file logging
    let log_file = File::create("mailbox.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let messages: Vec<_> = (0..1_000)
        .map(|i| {
            json!({
                "__id__": format!("msg-{i}"),
                "subject": format!("Message {i}"),
                "sender": "alice@example.com",
                "read": i % 3 == 0,
            })
        })
        .collect();
    let source = InMemoryRowSource::from_json(json!(messages))?;

    let config = ScrollConfig::default()
        .with_viewport_height(200)
        .with_overscan_rows(5)
        .with_max_fetch_rows(25);
    let renderer = BlockRenderer::new().hide_column("sender");
    let mut table = ScrollTable::new(source, renderer, config);
    table.add_observer(Box::new(PrintObserver));

    let loaded = table.empty_and_refill().await?;
    println!("Loaded {} of {} rows", loaded, table.total());
    print_layout(&table);

    let loaded = table.scroll_to(8_000).await?;
    println!("Scrolled to row 400, loaded {} more", loaded);
    print_layout(&table);

    println!("Selecting:");
    table.rows_mut().activate_row(&"msg-401".into())?;
    table.rows_mut().select_row(&"msg-402".into())?;
    table.rows_mut().select_row(&"msg-403".into())?;
    mark_read(table.rows_mut())?;

    println!("Deleting msg-402:");
    table.remove_row(&"msg-402".into())?;
    print_layout(&table);

    Ok(())
}
