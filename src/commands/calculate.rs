use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};
use hybrid_savings::{
    config::Config, store, CalculationResult, FormInput, SelectedHybrid, Wizard,
};

/// Execute the calculate command
///
/// Drives the same three-step flow the API exposes: submit the vehicle,
/// print the comparison and, when `select` is given, the annual savings.
pub async fn execute(
    cfg: &Config,
    brand_id: i64,
    model_id: i64,
    monthly_spend: f64,
    select: Option<i64>,
) -> Result<()> {
    let input = FormInput::new(brand_id, model_id, monthly_spend)?;
    let store = store::build_store(&cfg.data_source, &cfg.catalog).await?;

    let mut wizard = Wizard::new().submit(store.as_ref(), input).await;
    if let Some(error) = wizard.error() {
        println!("{} {}", "✗".red(), error);
        anyhow::bail!("calculation failed: {}", error.kind());
    }

    if let Some(result) = wizard.result() {
        print_comparison(result);
    }

    if let Some(hybrid_id) = select {
        wizard = wizard.select(hybrid_id);
        match (wizard.selection(), wizard.error()) {
            (Some(selection), _) => print_selection(selection),
            (None, Some(error)) => {
                println!("{} {}", "✗".red(), error);
                anyhow::bail!("selection failed: {}", error.kind());
            }
            (None, None) => {}
        }
    }

    Ok(())
}

fn money(value: f64) -> String {
    format!("{:.2}", value)
}

fn print_comparison(result: &CalculationResult) {
    println!();
    println!(
        "Monthly distance with your {}: {} km",
        result.current_vehicle_name.bold(),
        money(result.monthly_distance).green().bold()
    );
    println!(
        "  Efficiency {} km/gal, spend {}, fuel {} per liter",
        result.current_efficiency,
        money(result.monthly_spend),
        result.gas_price_per_liter
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("HYBRID").fg(Color::Cyan),
        Cell::new("VERSION").fg(Color::Cyan),
        Cell::new("KM/GAL").fg(Color::Cyan),
        Cell::new("KM SAME SPEND").fg(Color::Cyan),
        Cell::new("SPEND SAME KM").fg(Color::Cyan),
        Cell::new("MONTHLY SAVINGS").fg(Color::Cyan),
    ]);

    for hybrid in &result.hybrid_comparisons {
        table.add_row(vec![
            Cell::new(hybrid.id),
            Cell::new(hybrid.display_name()),
            Cell::new(&hybrid.variant_label),
            Cell::new(hybrid.efficiency).set_alignment(CellAlignment::Right),
            Cell::new(money(hybrid.distance)).set_alignment(CellAlignment::Right),
            Cell::new(money(hybrid.equivalent_spend)).set_alignment(CellAlignment::Right),
            Cell::new(money(hybrid.savings))
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{table}");
}

fn print_selection(selection: &SelectedHybrid) {
    let hybrid = &selection.comparison;
    println!();
    println!(
        "With the {} {} you save {} per year",
        hybrid.display_name().bold(),
        hybrid.variant_label,
        money(selection.annual_savings).green().bold()
    );
    println!(
        "  Current monthly spend {}, hybrid monthly spend {}",
        money(selection.current_monthly_spend),
        money(hybrid.equivalent_spend)
    );
}
