//! Plain-text billing statement for printing

use std::fmt::{self, Write};

use rust_decimal::Decimal;
use shared::format_inr_decimal;

use super::billing::BillingResponse;

const RULE_WIDTH: usize = 78;

/// Render a calculated bill as a printable text page
pub fn render_statement(response: &BillingResponse) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_statement(&mut out, response)?;
    Ok(out)
}

/// Write the printable bill into any text sink
pub fn write_statement<W: Write>(out: &mut W, response: &BillingResponse) -> fmt::Result {
    let statement = &response.statement;
    let prices = &statement.prices;

    writeln!(out, "BMW Dry Chilly Management")?;
    writeln!(out, "Quality Billing Statement")?;
    writeln!(
        out,
        "Generated: {}",
        response.generated_at.format("%d %b %Y %H:%M UTC")
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    writeln!(out, "{:<16}{}", "Quality:", statement.quality)?;
    writeln!(
        out,
        "{:<16}Rs. {} per 100 kg ({})",
        "Trade Price:",
        format_inr_decimal(statement.trade_price),
        statement.price_basis
    )?;
    writeln!(out, "{:<16}{} kg", "Total Weight:", statement.total_weight)?;
    writeln!(out, "{:<16}{}", "Total Bags:", statement.total_bags)?;
    writeln!(out)?;

    writeln!(out, "Price Breakdown")?;
    let wastage_label = format!("Wastage ({}%)", response.wastage_percent);
    for (label, amount) in [
        ("Base Price", prices.base_price),
        (wastage_label.as_str(), prices.wastage),
        ("Delivery Charge", prices.delivery_charge),
        ("Repacking Charge", prices.repacking_charge),
    ] {
        writeln!(out, "  {:<24}{:>16}", label, amount)?;
    }
    writeln!(out, "  {}", "-".repeat(40))?;
    writeln!(out, "  {:<24}{:>16}", "Final Price", prices.final_price)?;
    writeln!(out)?;

    writeln!(out, "Lot Breakdown")?;
    writeln!(
        out,
        "{:<10} {:<20} {:<16} {:>5} {:>11} {:>11}",
        "Lot Code", "Agent", "Commodity", "Bags", "Weight (kg)", "Trade Price"
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    for lot in &statement.lots {
        writeln!(
            out,
            "{:<10} {:<20} {:<16} {:>5} {:>11} {:>11}",
            lot.lot_code,
            lot.commission_agent,
            lot.commodity,
            lot.no_of_bags,
            lot.total_weight
                .map(|w| w.to_string())
                .unwrap_or_else(|| "-".to_string()),
            format_inr_decimal(lot.trade_price.unwrap_or(Decimal::ZERO)),
        )?;
    }
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}
