//! Line-oriented conversions sharing one rate cache.
//!
//! Each input line is `AMOUNT FROM TO`, e.g. `100 usd npr`, or a JSON request
//! body such as `{"amount": 100, "to": "NPR"}` where `from` defaults to USD and
//! `to` to EUR. Blank lines and lines starting with `#` are skipped. A bad line
//! is reported and the batch carries on.

use super::ui;
use crate::core::conversion::ConversionRequest;
use crate::core::rates::RateSource;
use crate::core::service::ConverterService;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    /// Source of the tables lines were converted with; `Fallback` if any line
    /// used fallback rates, `None` if no line reached the cache.
    pub source: Option<RateSource>,
}

impl BatchSummary {
    fn record_source(&mut self, source: RateSource) {
        self.source = match self.source {
            Some(RateSource::Fallback) => Some(RateSource::Fallback),
            _ => Some(source),
        };
    }
}

pub fn parse_line(line: &str) -> Result<ConversionRequest, String> {
    if line.starts_with('{') {
        return serde_json::from_str(line).map_err(|e| format!("invalid JSON request: {e}"));
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [amount, from, to] = fields.as_slice() else {
        return Err(format!(
            "expected `AMOUNT FROM TO`, got {} field(s)",
            fields.len()
        ));
    };
    let amount: f64 = amount
        .replace(',', "")
        .parse()
        .map_err(|_| format!("invalid amount `{amount}`"))?;
    Ok(ConversionRequest::new(amount, from, to))
}

pub async fn convert_lines<R, W>(
    service: &ConverterService,
    reader: R,
    out: &mut W,
) -> Result<BatchSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut summary = BatchSummary::default();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let outcome = match parse_line(line) {
            Ok(request) => {
                let table = service.latest_rates().await;
                summary.record_source(table.source());
                request.convert(&table).map_err(|e| e.to_string())
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(result) => {
                summary.converted += 1;
                writeln!(
                    out,
                    "{} {} = {:.4} {} (rate {:.6})",
                    result.amount, result.from, result.result, result.to, result.rate
                )?;
            }
            Err(e) => {
                summary.failed += 1;
                debug!(line_no, error = %e, "Skipping batch line");
                writeln!(
                    out,
                    "{}",
                    ui::style_text(&format!("line {line_no}: {e}"), ui::StyleType::Error)
                )?;
            }
        }
    }

    Ok(summary)
}

/// Converts lines from `input`, or stdin when no path is given.
pub async fn run(service: &ConverterService, input: Option<&Path>) -> Result<()> {
    let mut stdout = std::io::stdout();
    let summary = match input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open batch file: {}", path.display()))?;
            convert_lines(service, BufReader::new(file), &mut stdout).await?
        }
        None => convert_lines(service, BufReader::new(tokio::io::stdin()), &mut stdout).await?,
    };

    println!(
        "{}",
        ui::style_text(
            &format!(
                "{} converted, {} failed",
                summary.converted, summary.failed
            ),
            ui::StyleType::Subtle
        )
    );
    if let Some(source) = summary.source {
        println!("{}", ui::source_note(source));
    }
    Ok(())
}
