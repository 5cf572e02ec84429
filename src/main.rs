//! Typelytics CLI
//!
//! Command-line interface for running PostHog trends queries:
//! - Run a trends query and print the chart JSON
//! - List the configured event catalog
//! - Generate a default config file

use anyhow::{anyhow, bail, Context};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typelytics::config::{generate_default_config, Config, LoggingConfig};
use typelytics::{
    ChartType, EventCatalog, EventRef, ExecuteOptions, FilterGroup, Interval, PostHogClient,
    PropertyFilter, Sampling, SeriesSpec, TrendQuery,
};

#[derive(Parser)]
#[command(name = "typelytics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Typed PostHog trends queries with chart-ready output")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a trends query
    Trend(TrendArgs),

    /// List configured events and properties
    Events,

    /// Print a default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct TrendArgs {
    /// Series as EVENT[:SAMPLING[:PROPERTY]], e.g. purchase:sum:amount
    #[arg(short, long, required = true)]
    series: Vec<String>,
    /// Labels for the series, in order
    #[arg(short, long)]
    label: Vec<String>,
    /// Filters in PROPERTY=VALUE format, combined with ALL
    #[arg(short, long = "where")]
    filters: Vec<String>,
    /// Chart type (line, bar, area, cumulative-line, bar-total, pie, number, table)
    #[arg(long, default_value = "line")]
    chart: String,
    /// Start of the window: named range ("Last 7 days"), date or relative token
    #[arg(long)]
    date_from: Option<String>,
    /// End of the window
    #[arg(long)]
    date_to: Option<String>,
    /// Interval (hour, day, week, month)
    #[arg(short, long)]
    interval: Option<String>,
    /// Break down by a catalog property
    #[arg(short, long)]
    breakdown: Option<String>,
    /// Compare against the previous period
    #[arg(long)]
    compare: bool,
    /// Exclude internal and test accounts
    #[arg(long)]
    filter_test_accounts: bool,
}

impl TrendArgs {
    /// Series and filters, resolved against the catalog
    fn query(&self, base: TrendQuery) -> anyhow::Result<TrendQuery> {
        let catalog = base.catalog();
        let mut query = base.clone();

        for (index, raw) in self.series.iter().enumerate() {
            let (event, spec) = parse_series(catalog, raw)?;
            let spec = match self.label.get(index) {
                Some(l) => spec.label(l.clone()),
                None => spec,
            };
            query = query.add_series(&event, spec);
        }

        if !self.filters.is_empty() {
            let mut group = FilterGroup::all();
            for raw in &self.filters {
                let (key, value) = raw
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Invalid filter '{}', expected PROPERTY=VALUE", raw))?;
                let property = catalog
                    .property(key)
                    .ok_or_else(|| anyhow!("Unknown property: {}", key))?;
                group = group.filter(PropertyFilter::exact(property, value));
            }
            query = query.add_filter_group(group);
        }

        Ok(query)
    }

    /// Execution options; flags left off leave their parameter unset
    fn options(&self, catalog: &EventCatalog) -> anyhow::Result<ExecuteOptions> {
        let chart_type = ChartType::parse(&self.chart)
            .ok_or_else(|| anyhow!("Unknown chart type: {}", self.chart))?;
        let mut options = ExecuteOptions::new(chart_type).filter_test_accounts(self.filter_test_accounts);

        if self.compare {
            options = options.compare(true);
        }
        if let Some(from) = self.date_from.as_deref() {
            options = options.date_from(from);
        }
        if let Some(to) = self.date_to.as_deref() {
            options = options.date_to(to);
        }
        if let Some(raw) = self.interval.as_deref() {
            let interval =
                Interval::parse(raw).ok_or_else(|| anyhow!("Unknown interval: {}", raw))?;
            options = options.interval(interval);
        }
        if let Some(key) = self.breakdown.as_deref() {
            let property = catalog
                .property(key)
                .ok_or_else(|| anyhow!("Unknown property: {}", key))?;
            options = options.breakdown(property);
        }

        Ok(options)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    // A config file that exists but does not load is fatal; the subscriber
    // depends on it, so logging starts after this.
    let source = cli.config.clone().or_else(Config::find_default);
    let config = match &source {
        Some(path) => Config::load_with_env(path)?,
        None => Config::from_env(),
    };
    init_logging(&config.logging);
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    match cli.command {
        Commands::Events => {
            let catalog = config.catalog();
            if catalog.is_empty() {
                println!("No events configured");
            }
            for event in catalog.events() {
                println!("{}", event.name);
                for property in &event.properties {
                    match property.kind {
                        Some(kind) => println!("  {} ({:?})", property.name, kind),
                        None => println!("  {}", property.name),
                    }
                }
            }
        }

        Commands::Trend(args) => {
            let client = PostHogClient::new(&config.posthog, config.catalog())?;
            let query = args.query(client.query())?;
            let options = args.options(client.catalog())?;

            let data = query.execute(options).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        // handled before config is loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("typelytics={}", logging.level)));

    // Logs go to stderr so stdout stays valid JSON
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Parse EVENT[:SAMPLING[:PROPERTY]]
fn parse_series(
    catalog: &EventCatalog,
    raw: &str,
) -> anyhow::Result<(EventRef, SeriesSpec)> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default();
    let event = catalog
        .event(name)
        .ok_or_else(|| anyhow!("Unknown event: {}", name))?;

    let sampling = match parts.next() {
        Some(s) => Sampling::parse(s).ok_or_else(|| anyhow!("Unknown sampling: {}", s))?,
        None => Sampling::Total,
    };
    let mut spec = SeriesSpec::new(sampling);

    if let Some(property) = parts.next() {
        let Some(math_property) = event.property(property) else {
            bail!("Event {} has no property {}", name, property);
        };
        spec = spec.math_property(math_property);
    }

    Ok((event, spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use typelytics::{EventDescriptor, HttpTransport, PostHogConfig, PropertyType};

    fn catalog() -> EventCatalog {
        EventCatalog::new([
            EventDescriptor::new("$pageview"),
            EventDescriptor::new("purchase").property("amount", Some(PropertyType::Numeric)),
        ])
    }

    #[test]
    fn test_parse_series_defaults_to_total() {
        let (event, spec) = parse_series(&catalog(), "$pageview").unwrap();
        assert_eq!(event.name(), "$pageview");
        assert_eq!(spec, SeriesSpec::new(Sampling::Total));
    }

    #[test]
    fn test_parse_series_with_math_property() {
        let (_, spec) = parse_series(&catalog(), "purchase:sum:amount").unwrap();
        let amount = catalog().event("purchase").unwrap().property("amount").unwrap();
        assert_eq!(spec, SeriesSpec::new(Sampling::Sum).math_property(amount));
    }

    #[test]
    fn test_parse_series_errors() {
        assert!(parse_series(&catalog(), "signup").is_err());
        assert!(parse_series(&catalog(), "purchase:mean").is_err());
        assert!(parse_series(&catalog(), "$pageview:avg:amount").is_err());
    }

    fn trend_args(args: &[&str]) -> TrendArgs {
        let argv = ["typelytics", "trend"].iter().chain(args.iter()).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Trend(args) => args,
            _ => panic!("expected trend command"),
        }
    }

    #[test]
    fn test_cli_parses_trend_command() {
        let args = trend_args(&[
            "--series",
            "purchase:sum:amount",
            "--chart",
            "number",
            "--date-from",
            "Last 30 days",
            "--compare",
        ]);

        assert_eq!(args.series, vec!["purchase:sum:amount"]);
        assert_eq!(args.chart, "number");
        assert_eq!(args.date_from.as_deref(), Some("Last 30 days"));
        assert!(args.compare);
    }

    #[test]
    fn test_trend_query_applies_labels_and_filters() {
        let client = PostHogClient::with_transport(
            PostHogConfig::new("phx_test", "1").resolve_with(|_| None).unwrap(),
            catalog(),
            Arc::new(HttpTransport::new().unwrap()),
        );
        let args = trend_args(&[
            "--series",
            "$pageview",
            "--series",
            "purchase:sum:amount",
            "--label",
            "Views",
            "--where",
            "amount=5",
        ]);

        let query = args.query(client.query()).unwrap();
        assert_eq!(query.series().len(), 2);
        assert_eq!(query.series()[0].label.as_deref(), Some("Views"));
        assert_eq!(query.series()[1].label, None);
        assert_eq!(query.filter_groups().len(), 1);
        assert_eq!(query.filter_groups()[0].filters[0].property.key(), "amount");

        let bad = trend_args(&["--series", "$pageview", "--where", "amount"]);
        assert!(bad.query(client.query()).is_err());
    }

    #[test]
    fn test_compare_unset_without_flag() {
        let options = trend_args(&["--series", "$pageview"]).options(&catalog()).unwrap();
        assert_eq!(options.compare, None);
        assert!(!options.filter_test_accounts);

        let options = trend_args(&["--series", "$pageview", "--compare"])
            .options(&catalog())
            .unwrap();
        assert_eq!(options.compare, Some(true));
    }

    #[test]
    fn test_trend_options_resolve_flags() {
        let options = trend_args(&[
            "--series",
            "$pageview",
            "--chart",
            "table",
            "--interval",
            "week",
            "--breakdown",
            "amount",
        ])
        .options(&catalog())
        .unwrap();

        assert_eq!(options.chart_type, ChartType::Table);
        assert_eq!(options.interval, Some(Interval::Week));
        assert_eq!(options.breakdown.as_ref().map(|p| p.key()), Some("amount"));

        let err = trend_args(&["--series", "$pageview", "--chart", "radar"]).options(&catalog());
        assert!(err.is_err());
    }
}
