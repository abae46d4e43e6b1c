use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "crlite-status",
    version,
    about = "Report on recent CRLite filter runs",
    group(ArgGroup::new("environment").args(["bucket_url", "stage"]))
)]
pub struct Cli {
    /// Number of most recent runs to report
    #[arg(allow_negative_numbers = true)]
    pub count: i64,

    /// Evaluate CRL audits
    #[arg(long, help_heading = "Evaluate CRLs")]
    pub crl: bool,

    /// Path for HTML details
    #[arg(long, value_name = "PATH", help_heading = "Evaluate CRLs")]
    pub crl_details: Option<PathBuf>,

    /// Print details for every CRL, even trivially valid ones
    #[arg(long, help_heading = "Evaluate CRLs")]
    pub crl_details_all: bool,

    /// Path to store CRL audits [default: ~/.crlite_db/audits/]
    #[arg(long, value_name = "PATH", help_heading = "Evaluate CRLs")]
    pub auditdb: Option<String>,

    /// Bucket to read runs from [default: crlite-filters-prod]
    #[arg(long, value_name = "URL")]
    pub bucket_url: Option<String>,

    /// Read from the Stage environment
    #[arg(long)]
    pub stage: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// YAML file with defaults for bucket, cache and timeout settings
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_invocation() {
        let cli = Cli::try_parse_from(["crlite-status", "3"]).unwrap();
        assert_eq!(cli.count, 3);
        assert!(!cli.crl);
        assert!(cli.bucket_url.is_none());
    }

    #[test]
    fn test_negative_count_parses_for_validation() {
        let cli = Cli::try_parse_from(["crlite-status", "-1"]).unwrap();
        assert_eq!(cli.count, -1);
    }

    #[test]
    fn test_stage_and_bucket_url_conflict() {
        let result = Cli::try_parse_from([
            "crlite-status",
            "2",
            "--stage",
            "--bucket-url",
            "https://example.com/b/x/",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_crl_flags() {
        let cli = Cli::try_parse_from([
            "crlite-status",
            "2",
            "--crl-details",
            "/tmp/details.html",
            "--crl-details-all",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.crl_details, Some(PathBuf::from("/tmp/details.html")));
        assert!(cli.crl_details_all);
        assert_eq!(cli.verbose, 2);
    }
}
