use super::ui;
use crate::core::conversion::{ConversionRequest, ConversionResponse, ConversionResult};
use crate::core::currency;
use crate::core::service::ConverterService;
use anyhow::Result;

fn display_result(result: &ConversionResult) -> String {
    let symbol = currency::lookup(&result.to).map_or("", |c| c.symbol);
    format!(
        "{} {} = {} {}",
        result.amount,
        result.from,
        ui::style_text(&format!("{symbol}{:.4}", result.result), ui::StyleType::TotalValue),
        result.to,
    )
}

pub async fn run(
    service: &ConverterService,
    request: &ConversionRequest,
    json: bool,
) -> Result<()> {
    let table = if json {
        service.latest_rates().await
    } else {
        let pb = ui::new_spinner("Fetching exchange rates...");
        let table = service.latest_rates().await;
        pb.finish_and_clear();
        table
    };

    let outcome = request.convert(&table);

    if json {
        let response = ConversionResponse::from(outcome.clone());
        println!("{}", serde_json::to_string_pretty(&response)?);
        outcome?;
        return Ok(());
    }

    let result = outcome?;
    println!("{}", display_result(&result));
    println!(
        "{} {}",
        ui::style_text(
            &format!("1 {} = {:.6} {}", result.from, result.rate, result.to),
            ui::StyleType::TotalLabel
        ),
        ui::source_note(table.source())
    );
    Ok(())
}
