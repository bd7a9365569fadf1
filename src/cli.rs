//! Command-line interface definitions.
//!
//! All options have sensible defaults; a bare `opinion_pulse` run scrapes
//! five Opinión headlines, translates them to English, and prints the
//! repeated-word report.

use clap::Parser;

/// Command-line arguments for opinion_pulse.
///
/// # Examples
///
/// ```sh
/// # Default run against a local chromedriver
/// opinion_pulse
///
/// # Custom image directory and a visible browser window
/// opinion_pulse -i ./images --no-headless
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for downloaded article images
    #[arg(short, long, default_value = "downloaded_images")]
    pub image_output_dir: String,

    /// WebDriver endpoint to drive the browser through
    #[arg(long, env = "WEBDRIVER_URL", default_value = "http://localhost:9515")]
    pub webdriver_url: String,

    /// Maximum number of articles to extract per run
    #[arg(short = 'n', long, default_value_t = 5)]
    pub max_articles: usize,

    /// Words must occur strictly more than this many times to be reported
    #[arg(short = 't', long, default_value_t = 2)]
    pub repeat_threshold: usize,

    /// Source language of the headlines (ISO 639-1)
    #[arg(long, default_value = "es")]
    pub source_lang: String,

    /// Target language for translation (ISO 639-1)
    #[arg(long, default_value = "en")]
    pub target_lang: String,

    /// Run the browser with a visible window instead of headless
    #[arg(long)]
    pub no_headless: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["opinion_pulse"]);

        assert_eq!(cli.image_output_dir, "downloaded_images");
        assert_eq!(cli.webdriver_url, "http://localhost:9515");
        assert_eq!(cli.max_articles, 5);
        assert_eq!(cli.repeat_threshold, 2);
        assert_eq!(cli.source_lang, "es");
        assert_eq!(cli.target_lang, "en");
        assert!(!cli.no_headless);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "opinion_pulse",
            "-i",
            "/tmp/images",
            "-n",
            "3",
            "-t",
            "1",
            "--no-headless",
        ]);

        assert_eq!(cli.image_output_dir, "/tmp/images");
        assert_eq!(cli.max_articles, 3);
        assert_eq!(cli.repeat_threshold, 1);
        assert!(cli.no_headless);
    }
}
