use std::path::Path;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use lead_triage::cli::{Cli, ReportFormat};
use lead_triage::config::{self, load_config, resolve_secrets};
use lead_triage::input::load_leads;
use lead_triage::models::ProcessedLead;
use lead_triage::outreach::generator::FallbackGenerator;
use lead_triage::outreach::whatsapp::{setup_instructions, WhatsAppSender};
use lead_triage::risk::stats::statistics;
use lead_triage::{logging, pipeline, report};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if cli.whatsapp_setup {
        println!("{}", setup_instructions());
        return Ok(());
    }

    let Some(file) = cli.file.as_deref() else {
        anyhow::bail!("no lead export given");
    };

    // Config lives next to the export, falling back to the user config dir
    let input_dir = file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut config = load_config(input_dir, cli.config.as_deref())?;
    resolve_secrets(&mut config, |var| std::env::var(var).ok());

    let show_progress = !cli.quiet && matches!(cli.report, ReportFormat::Terminal);

    let (format, rows) = match load_leads(file) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if show_progress {
        eprintln!("  {} {} {} leads", "→".cyan(), format, rows.len());
    }

    // Classification never fails per row
    let mut leads: Vec<ProcessedLead> = rows.iter().map(pipeline::process_row).collect();

    let generator = FallbackGenerator::from_config(&config.generator, !cli.no_ai)?;
    let concurrency = cli.concurrency.unwrap_or(config.batch.concurrency);
    let reachable = leads.iter().filter(|l| l.phone.is_some()).count();

    tracing::info!(
        leads = leads.len(),
        reachable,
        remote = generator.uses_remote(),
        concurrency,
        "generating messages"
    );

    let pb = progress_bar(reachable, show_progress)?;
    pipeline::generate_messages(&mut leads, &generator, concurrency, pb.as_ref()).await;
    if let Some(pb) = pb {
        pb.finish_with_message("Messages ready");
    }

    pipeline::attach_links(&mut leads);

    if cli.send || config.whatsapp.auto_send {
        dispatch(&mut leads, config.whatsapp.clone(), show_progress).await?;
    }

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&leads, file, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            // Classifier statistics cover every lead, reachable or not
            let categories: Vec<_> = leads.iter().map(|l| l.risk).collect();
            report::json::render(&leads, &statistics(&categories))?;
        }
    }

    Ok(())
}

async fn dispatch(
    leads: &mut [ProcessedLead],
    whatsapp: config::WhatsAppConfig,
    show_progress: bool,
) -> Result<()> {
    let sender = WhatsAppSender::new(whatsapp)?;
    if !sender.is_configured() {
        eprintln!(
            "  {} WhatsApp API not configured; keeping wa.me links (see --whatsapp-setup)",
            "⚠".yellow()
        );
        return Ok(());
    }

    let queue = pipeline::outbound(leads);
    let items: Vec<_> = queue.iter().map(|(_, item)| item.clone()).collect();

    let pb = progress_bar(items.len(), show_progress)?;
    let reports = sender
        .send_batch(&items, |report| {
            if let Some(pb) = &pb {
                pb.set_message(report.lead_name.clone());
                pb.inc(1);
            }
        })
        .await;
    if let Some(pb) = pb {
        pb.finish_with_message("Sent");
    }

    for ((index, _), report) in queue.into_iter().zip(reports) {
        leads[index].delivery = Some(report);
    }

    Ok(())
}

fn progress_bar(len: usize, show: bool) -> Result<Option<ProgressBar>> {
    if !show || len == 0 {
        return Ok(None);
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}
