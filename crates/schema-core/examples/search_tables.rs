//! Search and filter tables example

use schema_library::{Result, SchemaBrowser, ViewKind};

fn main() -> Result<()> {
    // Get path and query from args
    let args: Vec<String> = std::env::args().collect();
    let path = args.get(1).map(|s| s.as_str()).unwrap_or("./tables.xml");
    let query = args.get(2).map(|s| s.as_str()).unwrap_or("order");

    println!("Loading schema from: {}", path);

    let mut browser = SchemaBrowser::open(path)?;
    println!("{}", browser.status_line());

    println!("Searching tables for '{}'...", query);
    browser.set_query(ViewKind::Tables, query);

    println!("Found {} matches:", browser.row_count(ViewKind::Tables));
    for name in browser.visible_names(ViewKind::Tables) {
        let columns = browser.store().columns_of_table(name);
        println!("  - {} ({} columns)", name, columns.len());
    }

    if let Some(name) = browser.selected_name(ViewKind::Tables) {
        println!("\nColumns of {}:", name);
        for column in browser.selected_details(ViewKind::Tables) {
            println!(
                "  {:>3} {} {}",
                column.order, column.column_name, column.column_type
            );
        }
    }

    Ok(())
}
