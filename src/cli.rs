use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "lead-triage",
    about = "Classify sales leads by risk and prepare personalized WhatsApp outreach",
    version
)]
pub struct Cli {
    /// Lead export to process (Excel, CSV, TSV or JSON)
    #[arg(required_unless_present = "whatsapp_setup")]
    pub file: Option<PathBuf>,

    /// Config file [default: <file dir>/.lead-triage/config.toml, fallback ~/.config/lead-triage/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Send messages through the WhatsApp Cloud API instead of only building links
    #[arg(long)]
    pub send: bool,

    /// Use built-in templates only; never call the text generation API
    #[arg(long)]
    pub no_ai: bool,

    /// Message generations in flight at once [default: from config, 10]
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Show every lead and its validation findings
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Print WhatsApp Cloud API setup instructions and exit
    #[arg(long)]
    pub whatsapp_setup: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["lead-triage", "leads.csv"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("leads.csv")));
        assert!(matches!(cli.report, ReportFormat::Terminal));
        assert!(!cli.send);
        assert_eq!(cli.concurrency, None);
    }

    #[test]
    fn test_file_required_unless_setup() {
        assert!(Cli::try_parse_from(["lead-triage"]).is_err());
        let cli = Cli::try_parse_from(["lead-triage", "--whatsapp-setup"]).unwrap();
        assert!(cli.whatsapp_setup);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "lead-triage",
            "leads.json",
            "--report",
            "json",
            "--send",
            "--no-ai",
            "--concurrency",
            "4",
            "-q",
        ])
        .unwrap();
        assert!(matches!(cli.report, ReportFormat::Json));
        assert!(cli.send && cli.no_ai && cli.quiet);
        assert_eq!(cli.concurrency, Some(4));
    }
}
