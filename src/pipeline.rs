use futures::future::join_all;
use indicatif::ProgressBar;

use crate::input::{fields, RawLead};
use crate::models::ProcessedLead;
use crate::outreach::generator::FallbackGenerator;
use crate::outreach::phone::normalize_phone;
use crate::outreach::whatsapp::{contact_link, Outbound};
use crate::risk::classifier::assess;
use crate::risk::normalizer::normalize;
use crate::risk::validator::validate;

/// Classify one raw row. Infallible, so one malformed row cannot affect
/// any other.
pub fn process_row(raw: &RawLead) -> ProcessedLead {
    let record = normalize(raw);
    let assessment = assess(&record);
    let (_, issues) = validate(raw);

    for issue in &issues {
        tracing::debug!(row = raw.row, issue = %issue, "validation finding");
    }

    ProcessedLead {
        row: raw.row,
        name: raw.text(fields::LEAD_NAME).unwrap_or_default(),
        channel: raw.text(fields::CHANNEL),
        record,
        risk: assessment.category,
        rule: assessment.rule,
        phone: normalize_phone(raw.get(fields::CONTACT_NUMBER)),
        issues,
        message: None,
        link: None,
        delivery: None,
    }
}

/// Generate messages for every lead with a usable phone, `concurrency` at a
/// time. Results are written back by position so row order is kept.
pub async fn generate_messages(
    leads: &mut [ProcessedLead],
    generator: &FallbackGenerator,
    concurrency: usize,
    progress: Option<&ProgressBar>,
) {
    let mut reachable: Vec<&mut ProcessedLead> =
        leads.iter_mut().filter(|l| l.phone.is_some()).collect();

    for batch in reachable.chunks_mut(concurrency.max(1)) {
        let futures: Vec<_> = batch
            .iter()
            .map(|lead| generator.message_for(&lead.name, lead.risk))
            .collect();

        let messages = join_all(futures).await;

        for (lead, message) in batch.iter_mut().zip(messages) {
            lead.message = Some(message);
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
    }
}

/// Build a `wa.me` link for every lead that has a phone and a message.
pub fn attach_links(leads: &mut [ProcessedLead]) {
    for lead in leads.iter_mut() {
        lead.link = match (lead.phone.as_deref(), lead.message.as_deref()) {
            (Some(phone), Some(message)) => contact_link(phone, message),
            _ => None,
        };
    }
}

/// Dispatch queue: one entry per lead with a usable phone.
pub fn outbound(leads: &[ProcessedLead]) -> Vec<(usize, Outbound)> {
    leads
        .iter()
        .enumerate()
        .filter(|(_, l)| l.phone.is_some())
        .map(|(i, l)| {
            (
                i,
                Outbound {
                    lead_name: l.name.clone(),
                    phone: l.phone.clone(),
                    message: l.message.clone(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawValue;
    use crate::models::{RiskCategory, INVALID_PHONE_LABEL};
    use crate::outreach::generator::TemplateGenerator;
    use crate::outreach::templates;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    fn row(index: usize, name: &str, phone: &str, missed: &str, showed: &str) -> RawLead {
        RawLead::new(index)
            .with(fields::LEAD_NAME, text(name))
            .with(fields::CHANNEL, text("Web"))
            .with(fields::CONTACT_NUMBER, text(phone))
            .with(fields::SCHEDULED_BY, text("Self"))
            .with(fields::LINK_CLICKED, text("Yes"))
            .with(fields::CONTACT_SHARED, text("Yes"))
            .with(fields::LAST_INTERACTION_DAYS, text("8"))
            .with(fields::MISSED_DEMOS, text(missed))
            .with(fields::SHOWED_UP_FOR_DEMO, text(showed))
    }

    #[test]
    fn test_process_row() {
        let lead = process_row(&row(0, "Asha", "+1 555 123 4567", "0", "Yes"));
        assert_eq!(lead.name, "Asha");
        assert_eq!(lead.channel.as_deref(), Some("Web"));
        assert_eq!(lead.risk, RiskCategory::Low);
        assert_eq!(lead.rule, Some("attended-demo"));
        assert_eq!(lead.phone.as_deref(), Some("15551234567"));
        assert!(lead.issues.is_empty());
        assert_eq!(lead.label(), "Low");
    }

    #[test]
    fn test_malformed_row_is_isolated() {
        let rows = vec![
            row(0, "Asha", "5551234567", "1", "No"),
            RawLead::new(1)
                .with(fields::MISSED_DEMOS, text("lots"))
                .with(fields::SCHEDULED_BY, RawValue::Number(f64::INFINITY))
                .with(fields::CONTACT_NUMBER, RawValue::Bool(true)),
            row(2, "Cara", "5557654321", "0", "No"),
        ];
        let leads: Vec<ProcessedLead> = rows.iter().map(process_row).collect();

        assert_eq!(leads.len(), 3);
        assert_eq!(leads[0].risk, RiskCategory::High);
        assert_eq!(leads[1].risk, RiskCategory::Medium);
        assert!(!leads[1].issues.is_empty());
        assert_eq!(leads[1].label(), INVALID_PHONE_LABEL);
        assert_eq!(leads[2].risk, RiskCategory::Medium);
        assert_eq!(leads[2].rule, Some("warm-with-contact"));
    }

    #[tokio::test]
    async fn test_generate_messages_keeps_order_and_skips_invalid_phone() {
        let mut leads = vec![
            process_row(&row(0, "Asha", "5551234567", "1", "No")),
            process_row(&row(1, "Ben", "", "0", "No")),
            process_row(&row(2, "Cara", "5557654321", "0", "Yes")),
        ];
        let generator = FallbackGenerator::new(None, TemplateGenerator::default());

        generate_messages(&mut leads, &generator, 1, None).await;
        attach_links(&mut leads);

        assert_eq!(
            leads[0].message.as_deref(),
            Some(templates::render(RiskCategory::High, "Asha").as_str())
        );
        assert_eq!(leads[1].message, None);
        assert_eq!(leads[1].link, None);
        assert_eq!(
            leads[2].message.as_deref(),
            Some(templates::render(RiskCategory::Low, "Cara").as_str())
        );
        assert!(leads[2]
            .link
            .as_deref()
            .is_some_and(|l| l.starts_with("https://wa.me/5557654321?text=")));
    }

    #[test]
    fn test_outbound_only_reachable_leads() {
        let leads = vec![
            process_row(&row(0, "Asha", "", "1", "No")),
            process_row(&row(1, "Ben", "5551234567", "0", "No")),
        ];
        let queue = outbound(&leads);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].0, 1);
        assert_eq!(queue[0].1.lead_name, "Ben");
    }
}
