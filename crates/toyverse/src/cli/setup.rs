use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use toyverseapp::catalog::{Category, DateRange, FilterConfig, SortBy};
use toyverseapp::model::{ToyDraft, MONTH_NAMES};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "toyverse",
    bin_name = "toyverse",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Catalog, search and track your toy collection", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the config file (defaults to toyverse.toml in the config directory)
    #[arg(long, global = true, help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Password of the owner account, needed by add, edit and delete
    #[arg(
        long,
        global = true,
        env = "TOYVERSE_PASSWORD",
        hide_env_values = true,
        help_heading = "Options"
    )]
    pub password: Option<String>,

    /// Print JSON instead of formatted text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List toys, filtered and sorted
    #[command(alias = "ls", display_order = 1)]
    List(ListArgs),

    /// Collection totals
    #[command(display_order = 2)]
    Stats,

    /// Values available for each filter
    #[command(display_order = 3)]
    Facets,

    /// Show one toy with its images and labels
    #[command(alias = "v", display_order = 10)]
    View {
        /// Toy id or a unique prefix of it
        id: String,
    },

    /// Add a toy
    #[command(alias = "new", display_order = 11)]
    Add {
        /// Name of the toy
        name: String,

        /// Kind of toy (figure, plush, vehicle, ...)
        #[arg(long = "type")]
        toy_type: String,

        /// Primary image file
        #[arg(long)]
        image: Option<PathBuf>,

        /// Additional image files
        #[arg(long = "extra")]
        extra_images: Vec<PathBuf>,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Edit a toy; only the given fields change
    #[command(display_order = 12)]
    Edit {
        /// Toy id or a unique prefix of it
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        toy_type: Option<String>,

        /// Replace the primary image
        #[arg(long)]
        image: Option<PathBuf>,

        /// Append additional images
        #[arg(long = "add-image")]
        add_images: Vec<PathBuf>,

        /// Remove additional images by URL
        #[arg(long = "remove-image")]
        remove_images: Vec<String>,

        /// Remove all labels (before applying --label)
        #[arg(long)]
        clear_labels: bool,

        #[command(flatten)]
        fields: DraftArgs,
    },

    /// Delete a toy with its images
    #[command(alias = "rm", display_order = 13)]
    Delete {
        /// Toy id or a unique prefix of it
        id: String,
    },

    /// Row counts and image storage size
    #[command(display_order = 20)]
    Usage,

    /// Print a config file template with every setting
    #[command(display_order = 21)]
    Config,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive search in toy names
    #[arg(short, long)]
    pub search: Option<String>,

    /// Sort order: newest, oldest, price-low-high, price-high-low
    #[arg(long)]
    pub sort: Option<SortBy>,

    #[arg(long = "type", help_heading = "Filters")]
    pub toy_type: Option<String>,

    #[arg(long, help_heading = "Filters")]
    pub series: Option<String>,

    #[arg(long, help_heading = "Filters")]
    pub brand: Option<String>,

    #[arg(long, help_heading = "Filters")]
    pub condition: Option<String>,

    #[arg(long, help_heading = "Filters")]
    pub color_variant: Option<String>,

    /// Purchase location
    #[arg(long, help_heading = "Filters")]
    pub location: Option<String>,

    #[arg(long, help_heading = "Filters")]
    pub min_price: Option<f64>,

    #[arg(long, help_heading = "Filters")]
    pub max_price: Option<f64>,

    /// Exact price (sets both bounds)
    #[arg(long, conflicts_with_all = ["min_price", "max_price"], help_heading = "Filters")]
    pub price: Option<f64>,

    /// Only toys with at least one image
    #[arg(long, help_heading = "Filters")]
    pub has_images: bool,

    /// Label to match; repeat for any-of
    #[arg(long = "tag", help_heading = "Filters")]
    pub tags: Vec<String>,

    /// Purchased on or after (YYYY-MM-DD)
    #[arg(long, help_heading = "Filters")]
    pub from: Option<NaiveDate>,

    /// Purchased on or before (YYYY-MM-DD)
    #[arg(long, help_heading = "Filters")]
    pub to: Option<NaiveDate>,

    /// Purchased on this day (YYYY-MM-DD)
    #[arg(long, help_heading = "Filters")]
    pub date: Option<NaiveDate>,

    /// Purchase month name, e.g. March
    #[arg(long, value_parser = parse_month, help_heading = "Filters")]
    pub month: Option<String>,

    /// Purchase year, e.g. 2024
    #[arg(long, value_parser = parse_year, help_heading = "Filters")]
    pub year: Option<String>,
}

impl ListArgs {
    pub fn to_filter(&self, default_sort: SortBy) -> FilterConfig {
        let mut config = FilterConfig::default();
        let categories = [
            (Category::Type, &self.toy_type),
            (Category::Series, &self.series),
            (Category::Brand, &self.brand),
            (Category::Condition, &self.condition),
            (Category::ColorVariant, &self.color_variant),
            (Category::PurchaseLocation, &self.location),
        ];
        for (category, value) in categories {
            if let Some(value) = value {
                config.set_category(category, value.as_str());
            }
        }

        config.min_price = self.min_price;
        config.max_price = self.max_price;
        if let Some(price) = self.price {
            config.set_exact_price(price);
        }
        config.has_images = self.has_images;
        for tag in &self.tags {
            config.toggle_tag(tag, true);
        }
        config.date_range = DateRange {
            start_date: self.from,
            end_date: self.to,
        };
        config.specific_date = self.date;
        config.month = self.month.clone().unwrap_or_default();
        config.year = self.year.clone().unwrap_or_default();
        config.sort_by = self.sort.unwrap_or(default_sort);
        config
    }

    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// Optional toy fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct DraftArgs {
    #[arg(long, help_heading = "Toy fields")]
    pub series: Option<String>,

    #[arg(long, help_heading = "Toy fields")]
    pub brand: Option<String>,

    /// Manufacturer code or number
    #[arg(long, help_heading = "Toy fields")]
    pub code: Option<String>,

    #[arg(long, help_heading = "Toy fields")]
    pub quantity: Option<u32>,

    #[arg(long, help_heading = "Toy fields")]
    pub condition: Option<String>,

    #[arg(long, help_heading = "Toy fields")]
    pub color_variant: Option<String>,

    /// Purchase date (YYYY-MM-DD)
    #[arg(long, help_heading = "Toy fields")]
    pub date: Option<NaiveDate>,

    /// Purchase location
    #[arg(long, help_heading = "Toy fields")]
    pub location: Option<String>,

    #[arg(long, help_heading = "Toy fields")]
    pub price: Option<String>,

    #[arg(long, help_heading = "Toy fields")]
    pub notes: Option<String>,

    /// Custom field as key=value; repeatable
    #[arg(long = "field", value_parser = parse_key_value, help_heading = "Toy fields")]
    pub fields: Vec<(String, String)>,

    /// Label name; repeatable
    #[arg(long = "label", help_heading = "Toy fields")]
    pub labels: Vec<String>,
}

impl DraftArgs {
    /// Overwrites the draft fields that were given on the command line.
    pub fn apply(&self, draft: &mut ToyDraft) {
        let text = [
            (&mut draft.series, &self.series),
            (&mut draft.brand, &self.brand),
            (&mut draft.code_number, &self.code),
            (&mut draft.condition, &self.condition),
            (&mut draft.color_variant, &self.color_variant),
            (&mut draft.purchase_location, &self.location),
            (&mut draft.price, &self.price),
            (&mut draft.notes, &self.notes),
        ];
        for (slot, value) in text {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }
        if let Some(quantity) = self.quantity {
            draft.quantity = quantity;
        }
        if let Some(date) = self.date {
            draft.purchase_date = Some(date);
        }
        for (key, value) in &self.fields {
            draft.custom_fields.retain(|(k, _)| k != key);
            draft.custom_fields.push((key.clone(), value.clone()));
        }
        draft.labels.extend(self.labels.iter().cloned());
    }
}

fn parse_month(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    MONTH_NAMES
        .iter()
        .find(|m| m.eq_ignore_ascii_case(raw))
        .map(|m| m.to_string())
        .ok_or_else(|| format!("'{}' is not a month name", raw))
}

fn parse_year(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    if raw.len() == 4 && raw.chars().all(|c| c.is_ascii_digit()) {
        Ok(raw.to_string())
    } else {
        Err(format!("'{}' is not a four digit year", raw))
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.trim().is_empty() {
        return Err(format!("missing key in '{}'", raw));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("toyverse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_list_flags_build_filter() {
        let cli = parse(&[
            "list", "--type", "figure", "--tag", "anime", "--tag", "rare", "--month", "march",
            "--sort", "price-low-high", "--has-images",
        ]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        let config = args.to_filter(SortBy::Newest);

        assert_eq!(config.toy_type, "figure");
        assert_eq!(config.tags.len(), 2);
        assert_eq!(config.month, "March");
        assert!(config.has_images);
        assert_eq!(config.sort_by, SortBy::PriceLowHigh);
        assert_eq!(toyverseapp::catalog::active_filter_count(&config), 4);
    }

    #[test]
    fn test_list_uses_default_sort() {
        let args = ListArgs::default();
        assert_eq!(args.to_filter(SortBy::Oldest).sort_by, SortBy::Oldest);
        assert_eq!(args.search(), "");
    }

    #[test]
    fn test_exact_price_sets_both_bounds() {
        let cli = parse(&["list", "--price", "19.99"]);
        let Some(Commands::List(args)) = cli.command else {
            panic!("expected list");
        };
        let config = args.to_filter(SortBy::Newest);
        assert_eq!(config.min_price, Some(19.99));
        assert_eq!(config.max_price, Some(19.99));
    }

    #[test]
    fn test_bad_filter_values_are_rejected() {
        let run = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("toyverse").chain(args.iter().copied()))
        };
        assert!(run(&["list", "--month", "Smarch"]).is_err());
        assert!(run(&["list", "--year", "24"]).is_err());
        assert!(run(&["list", "--sort", "alphabetical"]).is_err());
        assert!(run(&["list", "--from", "yesterday"]).is_err());
        assert!(run(&["add", "Goku", "--type", "figure", "--field", "noequals"]).is_err());
    }

    #[test]
    fn test_draft_args_override_only_given_fields() {
        let cli = parse(&[
            "edit", "abcd", "--price", "30", "--field", "scale=1/6", "--label", "rare",
        ]);
        let Some(Commands::Edit { fields, .. }) = cli.command else {
            panic!("expected edit");
        };

        let mut draft = ToyDraft::new("Goku", "figure");
        draft.brand = Some("Bandai".into());
        draft.custom_fields = vec![("scale".into(), "1/12".into())];
        draft.labels = vec!["anime".into()];
        fields.apply(&mut draft);

        assert_eq!(draft.brand.as_deref(), Some("Bandai"));
        assert_eq!(draft.price.as_deref(), Some("30"));
        assert_eq!(draft.custom_fields, vec![("scale".to_string(), "1/6".to_string())]);
        assert_eq!(draft.labels, vec!["anime", "rare"]);
    }

    #[test]
    fn test_global_flags() {
        let cli = parse(&["stats", "--json", "-v", "--config", "/tmp/t.toml"]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
    }
}
