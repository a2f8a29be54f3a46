use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ProcessedLead, RiskCategory, INVALID_PHONE_LABEL};

/// Counts for the summary box, bucketed by presentation label: a lead
/// without a usable phone counts only as `Invalid Phone`, so `high`,
/// `medium`, `low` and `invalid` add up to `total`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub invalid: usize,
    pub flagged: usize,
}

impl Summary {
    pub fn of(leads: &[ProcessedLead]) -> Self {
        let mut summary = Summary {
            total: leads.len(),
            ..Summary::default()
        };
        for lead in leads {
            match (lead.phone.is_some(), lead.risk) {
                (false, _) => summary.invalid += 1,
                (true, RiskCategory::High) => summary.high += 1,
                (true, RiskCategory::Medium) => summary.medium += 1,
                (true, RiskCategory::Low) => summary.low += 1,
            }
            if !lead.issues.is_empty() {
                summary.flagged += 1;
            }
        }
        summary
    }

    pub fn count(&self, category: RiskCategory) -> usize {
        match category {
            RiskCategory::High => self.high,
            RiskCategory::Medium => self.medium,
            RiskCategory::Low => self.low,
        }
    }

    /// Share of all leads, one decimal place.
    pub fn percentage(&self, count: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (count as f64 / self.total as f64 * 1000.0).round() / 10.0
    }
}

/// Render a colored terminal report.
pub fn render(leads: &[ProcessedLead], path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let summary = Summary::of(leads);
    let total = summary.total;
    let count = |c: RiskCategory| summary.count(c);
    let percentage = |c: RiskCategory| summary.percentage(summary.count(c));
    let invalid_count = summary.invalid;
    let flagged_count = summary.flagged;

    if quiet {
        println!(
            "Total: {}  High: {}  Medium: {}  Low: {}  Invalid Phone: {}",
            total,
            count(RiskCategory::High).to_string().red(),
            count(RiskCategory::Medium).to_string().yellow(),
            count(RiskCategory::Low).to_string().green(),
            invalid_count.to_string().dimmed(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "lead-triage".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Leads: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total leads        : {}", total));
    for (symbol, category) in [
        ("▲".red(), RiskCategory::High),
        ("●".yellow(), RiskCategory::Medium),
        ("▼".green(), RiskCategory::Low),
    ] {
        println!(
            " │  {:<48} │",
            format!(
                "{}  {:<15} : {:>4}  ({:>5.1}%)",
                symbol,
                category.to_string(),
                count(category),
                percentage(category)
            )
        );
    }
    println!(
        " │  {:<48} │",
        format!(
            "{}  {:<15} : {:>4}  ({:>5.1}%)",
            "✗".dimmed(),
            INVALID_PHONE_LABEL,
            invalid_count,
            summary.percentage(invalid_count)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  {:<15} : {:>4}", "⚠".yellow(), "Data issues", flagged_count)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    let sections = [
        (RiskCategory::High, "[HIGH]".red().bold(), "Leads needing urgent follow-up:"),
        (RiskCategory::Medium, "[MEDIUM]".yellow().bold(), "Leads needing a nudge:"),
        (RiskCategory::Low, "[LOW]".green().bold(), "Engaged leads:"),
    ];

    for (category, tag, title) in sections {
        let rows: Vec<&ProcessedLead> = leads
            .iter()
            .filter(|l| l.phone.is_some() && l.risk == category)
            .collect();
        if rows.is_empty() {
            continue;
        }
        println!(" {} {}\n", tag, title);
        render_table(&rows);
        println!();
    }

    let invalid: Vec<&ProcessedLead> = leads.iter().filter(|l| l.phone.is_none()).collect();
    if !invalid.is_empty() {
        println!(" {} Leads without a usable contact number:\n", "[INVALID]".dimmed().bold());
        render_table(&invalid);
        println!();
    }

    if verbose && flagged_count > 0 {
        println!(" {} Data issues (advisory):\n", "[WARN]".yellow().bold());
        render_issues(leads);
        println!();
    }

    Ok(())
}

fn render_table(leads: &[&ProcessedLead]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Row").add_attribute(Attribute::Bold),
            Cell::new("Lead").add_attribute(Attribute::Bold),
            Cell::new("Channel").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Message").add_attribute(Attribute::Bold),
            Cell::new("Contact").add_attribute(Attribute::Bold),
        ]);

    for lead in leads {
        let risk_color = match (lead.phone.is_some(), lead.risk) {
            (false, _) => Color::DarkGrey,
            (true, RiskCategory::High) => Color::Red,
            (true, RiskCategory::Medium) => Color::Yellow,
            (true, RiskCategory::Low) => Color::Green,
        };

        let message = lead
            .message
            .as_deref()
            .unwrap_or("N/A - Invalid phone number");

        table.add_row(vec![
            Cell::new(lead.row + 1).set_alignment(CellAlignment::Right),
            Cell::new(&lead.name),
            Cell::new(lead.channel.as_deref().unwrap_or("")),
            Cell::new(lead.label()).fg(risk_color),
            Cell::new(message),
            contact_cell(lead),
        ]);
    }

    println!("{}", table);
}

fn contact_cell(lead: &ProcessedLead) -> Cell {
    match (&lead.delivery, &lead.link) {
        (Some(d), _) if d.success => Cell::new(format!(
            "✓ sent {}",
            d.message_id.as_deref().unwrap_or("")
        ))
        .fg(Color::Green),
        (Some(d), _) => Cell::new(format!(
            "✗ {}",
            d.error.as_deref().unwrap_or("not sent")
        ))
        .fg(Color::Red),
        (None, Some(link)) => Cell::new(link),
        (None, None) => Cell::new("N/A").fg(Color::DarkGrey),
    }
}

fn render_issues(leads: &[ProcessedLead]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Row").add_attribute(Attribute::Bold),
            Cell::new("Lead").add_attribute(Attribute::Bold),
            Cell::new("Finding").add_attribute(Attribute::Bold),
        ]);

    for lead in leads.iter().filter(|l| !l.issues.is_empty()) {
        table.add_row(vec![
            Cell::new(lead.row + 1).set_alignment(CellAlignment::Right),
            Cell::new(&lead.name),
            Cell::new(lead.issues.join("\n")).fg(Color::Yellow),
        ]);
    }

    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{fields, RawLead, RawValue};
    use crate::pipeline::process_row;

    fn lead(index: usize, phone: &str, missed: &str) -> ProcessedLead {
        process_row(
            &RawLead::new(index)
                .with(fields::LEAD_NAME, RawValue::Text(format!("Lead {index}")))
                .with(fields::CONTACT_NUMBER, RawValue::Text(phone.to_string()))
                .with(fields::MISSED_DEMOS, RawValue::Text(missed.to_string())),
        )
    }

    #[test]
    fn test_summary_counts_invalid_phone_once() {
        let leads = vec![lead(0, "5551234567", "1"), lead(1, "", "1")];
        assert!(leads.iter().all(|l| l.risk == RiskCategory::High));

        let summary = Summary::of(&leads);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.high, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(
            summary.high + summary.medium + summary.low + summary.invalid,
            summary.total
        );
        assert_eq!(summary.percentage(summary.high), 50.0);
    }

    #[test]
    fn test_summary_matches_labels() {
        let leads = vec![
            lead(0, "5551234567", "1"),
            lead(1, "n/a", "0"),
            lead(2, "5557654321", "0"),
            lead(3, "000", "2"),
        ];
        let summary = Summary::of(&leads);

        for category in RiskCategory::ALL {
            let labelled = leads
                .iter()
                .filter(|l| l.label() == category.to_string())
                .count();
            assert_eq!(summary.count(category), labelled);
        }
        let invalid = leads.iter().filter(|l| l.label() == INVALID_PHONE_LABEL).count();
        assert_eq!(summary.invalid, invalid);
        assert_eq!(summary.invalid, 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::of(&[]);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.percentage(0), 0.0);
    }
}
