pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::scraper::Extraction;

#[derive(Parser)]
#[command(name = "feedscout")]
#[command(about = "Find feeds, read feed metadata and scrape pages", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/feedscout/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Show the browser window while scraping
    #[arg(long, global = true)]
    pub headful: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the feed URL for a site
    Find {
        /// Site or page URL
        url: String,
    },
    /// Print feed metadata for a feed or site URL
    Meta {
        /// Feed or site URL
        url: String,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print a representative image URL for a site
    Image {
        /// Feed or site URL
        url: String,
    },
    /// Render a page and extract data from elements matching a selector
    Scrape {
        /// Page URL
        url: String,
        /// CSS selector to wait for and extract from
        selector: String,
        #[command(flatten)]
        extraction: ExtractionArgs,
    },
}

#[derive(Args)]
#[group(multiple = false)]
pub struct ExtractionArgs {
    /// JS function run against the matched elements, e.g. 'els => els.map(el => el.id)'
    #[arg(long)]
    pub script: Option<String>,

    /// Attribute to read from each matched element
    #[arg(long)]
    pub attr: Option<String>,

    /// Read the text of each matched element (default)
    #[arg(long)]
    pub text: bool,
}

impl ExtractionArgs {
    pub fn to_extraction(&self) -> Extraction {
        if let Some(ref script) = self.script {
            Extraction::script(script.clone())
        } else if let Some(ref attr) = self.attr {
            Extraction::attribute(attr.clone())
        } else {
            Extraction::text()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_defaults_to_text() {
        let cli = Cli::parse_from(["feedscout", "scrape", "https://example.com", "h1"]);
        let Commands::Scrape { extraction, .. } = cli.command else {
            panic!("expected scrape command");
        };
        assert_eq!(extraction.to_extraction(), Extraction::text());
    }

    #[test]
    fn test_scrape_with_script() {
        let cli = Cli::parse_from([
            "feedscout",
            "scrape",
            "https://news.ycombinator.com",
            ".athing",
            "--script",
            "els => els.map(el => el.id)",
        ]);
        let Commands::Scrape { extraction, .. } = cli.command else {
            panic!("expected scrape command");
        };
        assert_eq!(
            extraction.to_extraction(),
            Extraction::script("els => els.map(el => el.id)")
        );
    }

    #[test]
    fn test_extraction_flags_conflict() {
        let result = Cli::try_parse_from([
            "feedscout",
            "scrape",
            "https://example.com",
            "img",
            "--attr",
            "src",
            "--text",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["feedscout", "find", "https://example.com", "-c", "/tmp/c.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(!cli.headful);
    }
}
