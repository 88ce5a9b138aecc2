use crate::pipeline::{all_stages, Stage};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

/// Catalogue table: execution order, name, columns read and written.
pub fn catalogue_table(stages: &[Box<dyn Stage>]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Stage", "Description", "Reads", "Writes"]);
    for (i, stage) in stages.iter().enumerate() {
        let outputs = stage.outputs();
        table.add_row(vec![
            (i + 1).to_string(),
            stage.name().to_string(),
            stage.description().to_string(),
            stage.requires().join("\n"),
            if outputs.is_empty() {
                "(override file columns)".to_string()
            } else {
                outputs.join("\n")
            },
        ]);
    }
    table
}

pub fn print_stages() {
    let stages = all_stages(None);
    println!("{}", "Stage catalogue".bold());
    println!("{}", catalogue_table(&stages));
}
