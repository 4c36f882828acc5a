use clap::{Parser, Subcommand};

/// CLI arguments for atlas-cli
#[derive(Debug, Parser)]
#[command(
    name = "atlas",
    version,
    about = "CLI for resolving countries, searching the country corpus and batch IP geolocation"
)]
pub struct CliArgs {
    /// Path to a country corpus (.json or .json.gz); defaults to the bundled list
    #[arg(short = 'i', long = "input", global = true, env = "ATLAS_CORPUS_PATH")]
    pub input: Option<String>,

    /// Optional comma-separated list of ISO2 country codes to filter on (e.g. DE,CH,AT)
    #[arg(short = 'f', long = "filter", global = true)]
    pub filter: Option<String>,

    /// Print the JSON envelope instead of plain text
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the corpus
    Stats,

    /// List all countries
    Countries,

    /// Resolve a country by ISO2 or common ISO3 code
    Country {
        /// ISO2 or ISO3 code (e.g. DE, USA)
        code: String,
    },

    /// Resolve a country by code or by name
    Resolve {
        /// Code or (partial, misspelled) name
        query: String,
    },

    /// Ranked search over codes and names
    Search {
        /// At least two characters
        term: String,

        /// Maximum number of results (1-50)
        #[arg(short = 'n', long = "max", allow_negative_numbers = true)]
        max: Option<i64>,

        /// Ignore accents ("aland" finds "Åland Islands")
        #[arg(long = "fold-accents")]
        fold_accents: bool,
    },

    /// Normalized edit-distance similarity of two strings
    Similarity { a: String, b: String },

    /// Locate IP addresses through Azure Maps
    Locate {
        /// One or more IPv4/IPv6 addresses
        #[arg(required = true)]
        ips: Vec<String>,

        /// Concurrent lookups
        #[arg(short = 'c', long = "concurrency", env = "ATLAS_BATCH_CONCURRENCY")]
        concurrency: Option<usize>,

        /// Azure Maps subscription key
        #[arg(long = "subscription-key", env = "AZURE_MAPS_SUBSCRIPTION_KEY", hide_env_values = true)]
        subscription_key: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_search_with_globals() {
        let args = CliArgs::try_parse_from(["atlas", "--json", "search", "united", "-n", "3"]).unwrap();
        assert!(args.json);
        match args.command {
            Commands::Search { term, max, fold_accents } => {
                assert_eq!(term, "united");
                assert_eq!(max, Some(3));
                assert!(!fold_accents);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn locate_needs_an_address() {
        assert!(CliArgs::try_parse_from(["atlas", "locate"]).is_err());
    }
}
