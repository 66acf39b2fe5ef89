use std::path::PathBuf;

use clap::ArgAction;
use clap::Parser;

use artic_lib::DEFAULT_BASE_URL;
use artic_lib::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "artic",
    version,
    about = "Browse the Art Institute of Chicago collection and select rows across pages",
    long_about = "Browse the Art Institute of Chicago artworks listing page by page, check rows, and bulk-select the next N rows starting from the page on screen.\n\nExamples:\n  artic\n  artic --page-size 24 --cache-ttl 0\n  ARTIC_API_URL=http://localhost:8080/api/v1 artic -v"
)]
pub struct Args {
    #[arg(
        short = 'u',
        long = "url",
        env = "ARTIC_API_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL,
        help_heading = "Source",
        help = "Base URL of the artworks API."
    )]
    pub url: String,

    #[arg(
        short = 'p',
        long = "page-size",
        value_name = "ROWS",
        default_value_t = DEFAULT_PAGE_SIZE,
        help_heading = "Source",
        help = "Rows per page (1-100)."
    )]
    pub page_size: u32,

    #[arg(
        long = "timeout",
        value_name = "SECS",
        default_value_t = 30,
        help_heading = "Source",
        help = "Request timeout in seconds."
    )]
    pub timeout: u64,

    #[arg(
        long = "cache-ttl",
        value_name = "SECS",
        default_value_t = 300,
        help_heading = "Source",
        help = "How long fetched pages are reused. 0 disables the page cache."
    )]
    pub cache_ttl: u64,

    #[arg(
        long = "no-cache",
        help_heading = "Source",
        help = "Always refetch pages. Same as --cache-ttl 0."
    )]
    pub no_cache: bool,

    #[arg(
        long = "retries",
        value_name = "N",
        default_value_t = 3,
        help_heading = "Source",
        help = "Retries for transient failures (429, 5xx, network)."
    )]
    pub retries: u32,

    #[arg(
        long = "user-agent",
        value_name = "TEXT",
        help_heading = "Source",
        help = "Value for the AIC-User-Agent header, e.g. 'my-app (me@example.com)'."
    )]
    pub user_agent: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "log-file",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the log here instead of the cache directory."
    )]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["artic"]).unwrap();

        assert_eq!(args.page_size, 12);
        assert_eq!(args.cache_ttl, 300);
        assert_eq!(args.retries, 3);
        assert_eq!(args.verbose, 0);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "artic",
            "--url",
            "http://localhost:9000/api/v1",
            "-p",
            "24",
            "--cache-ttl",
            "0",
            "--no-cache",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.url, "http://localhost:9000/api/v1");
        assert_eq!(args.page_size, 24);
        assert_eq!(args.cache_ttl, 0);
        assert_eq!(args.verbose, 2);
        assert!(args.no_cache);
    }
}
