use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including the git hash for non-release builds.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "formsift", version = get_version())]
#[command(about = "Filter and highlight items from form field values", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding formsift.json (defaults to the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one filter pass over a JSON item file
    #[command(alias = "f")]
    Filter {
        /// Items file: a document, a container or an array of items
        #[arg(short, long)]
        items: PathBuf,

        /// Forms file: one form or an array of forms
        #[arg(long)]
        form: Option<PathBuf>,

        /// Form name to read (defaults to the first form)
        #[arg(long)]
        form_name: Option<String>,

        /// Field values, e.g. -f color:exact=red (repeatable)
        #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Id of the container to filter
        #[arg(short, long)]
        target: Option<String>,

        /// Only items with this tag are candidates
        #[arg(short, long)]
        rows: Option<String>,

        /// Hide every item when no field has a value
        #[arg(long)]
        hideblank: bool,

        /// Print a JSON report instead of the visible items
        #[arg(long)]
        json: bool,
    },

    /// Print the selectors generated for a set of fields
    #[command(alias = "q")]
    Query {
        /// Field values, e.g. -f color:exact=red (repeatable)
        #[arg(short = 'f', long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Item selector used in the generated selectors
        #[arg(short, long)]
        rows: Option<String>,

        /// Container id; when set the highlight style rule is printed too
        #[arg(short, long)]
        scope: Option<String>,
    },
}
