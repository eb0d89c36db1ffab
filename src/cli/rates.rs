use super::ui;
use crate::core::currency::{self, BASE_CURRENCY};
use crate::core::service::ConverterService;
use anyhow::Result;
use comfy_table::{Cell, Table};

fn rates_table<'a>(rates: impl IntoIterator<Item = (&'a str, f64)>) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {BASE_CURRENCY}")),
    ]);
    for (code, rate) in rates {
        let name = currency::lookup(code).map_or("", |c| c.name);
        table.add_row(vec![Cell::new(code), Cell::new(name), ui::rate_cell(rate)]);
    }
    table
}

/// Prints every rate in the active table.
pub async fn run_latest(service: &ConverterService, refresh: bool) -> Result<()> {
    if refresh {
        service.cache().invalidate().await;
    }

    let pb = ui::new_spinner("Fetching exchange rates...");
    let rates = service.latest_rates().await;
    let status = service.cache().status().await;
    pb.finish_and_clear();

    println!(
        "{}",
        ui::style_text(
            &format!("Exchange rates ({} currencies)", rates.len()),
            ui::StyleType::Title
        )
    );
    println!("{}", rates_table(rates.iter()));
    println!("{}", ui::source_note(rates.source()));
    if let Some(fetched_at) = status.fetched_at {
        println!(
            "{}",
            ui::style_text(
                &format!("Fetched at {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

/// Prints the popular currencies against the base currency.
pub async fn run_popular(service: &ConverterService) -> Result<()> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let popular = service.popular_rates().await;
    pb.finish_and_clear();

    println!("{}", ui::style_text("Popular rates", ui::StyleType::Title));
    println!("{}", rates_table(popular.rates));
    println!("{}", ui::source_note(popular.source));
    Ok(())
}

/// Prints the catalog of supported currencies.
pub fn run_currencies() -> Result<()> {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Currency"),
        ui::header_cell("Symbol"),
    ]);
    for info in currency::SUPPORTED_CURRENCIES {
        table.add_row(vec![
            Cell::new(info.code),
            Cell::new(info.name),
            Cell::new(info.symbol),
        ]);
    }
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateTable;

    #[test]
    fn test_rates_table_lists_names() {
        let rates = RateTable::fallback();
        let rendered = rates_table(rates.iter()).to_string();
        assert!(rendered.contains("Nepali Rupee"));
        assert!(rendered.contains("133.25"));
        assert!(rendered.contains("Per 1 USD"));
    }
}
