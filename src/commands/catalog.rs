use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use hybrid_savings::{config::Config, store};

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Execute the brands command
pub async fn brands(cfg: &Config) -> Result<()> {
    let store = store::build_store(&cfg.data_source, &cfg.catalog).await?;
    let brands = store.brands().await?;

    let mut table = new_table(&["ID", "BRAND"]);
    for brand in &brands {
        table.add_row(vec![Cell::new(brand.id), Cell::new(&brand.name)]);
    }
    println!("{table}");
    Ok(())
}

/// Execute the models command
pub async fn models(cfg: &Config, brand_id: i64) -> Result<()> {
    let store = store::build_store(&cfg.data_source, &cfg.catalog).await?;
    let models = store.models_by_brand(brand_id).await?;

    if models.is_empty() {
        println!("No models found for brand {}", brand_id);
        return Ok(());
    }

    let mut table = new_table(&["ID", "MODEL"]);
    for model in &models {
        table.add_row(vec![Cell::new(model.id), Cell::new(&model.name)]);
    }
    println!("{table}");
    Ok(())
}
