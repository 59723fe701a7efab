use std::process;
use std::sync::Arc;

use clap::Parser;

use skyfare::error::SearchError;
use skyfare::filter::{self, FilterCriteria, SortKey};
use skyfare::history::{HistoryStore, JsonFileStore, NullStore};
use skyfare::model::{Currency, Flight};
use skyfare::provider::{FlightProvider, MockProvider};
use skyfare::query::{parse_query_string, CabinClass, SearchParams};
use skyfare::serp::{FetchOptions, SerpProvider};
use skyfare::state::SearchState;
use skyfare::table;

#[derive(Parser)]
#[command(
    name = "skyfare",
    about = "Search and compare flights from the terminal",
    version,
    after_help = "\
Examples:
  skyfare search -f JFK -t LHR -d 2026-04-01
  skyfare search -f HEL -t BCN -d 2026-03-01 --json --pretty
  skyfare search -f LAX -t NRT -d 2026-05-01 --return-date 2026-05-15
  skyfare search -f HEL -t BKK -d 2026-03-01 --cabin business --max-stops 1
  skyfare search -f JFK -t LHR -d 2026-04-01 --sort duration --max-price 800
  skyfare recent"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Search for flights",
        long_about = "Search for flights between airports on specific dates.\n\
            Results come from a built-in offline data source by default; pass --serp \
            with an API key for live Google Flights data.\n\
            Filters narrow the result list; when every flight is filtered out the \
            full list is shown instead.",
        after_help = "\
Examples:
  One-way:      skyfare search -f JFK -t LHR -d 2026-04-01
  Round-trip:   skyfare search -f LAX -t NRT -d 2026-05-01 --return-date 2026-05-15
  Business:     skyfare search -f HEL -t BKK -d 2026-03-01 --cabin business
  Filtered:     skyfare search -f JFK -t LHR -d 2026-04-01 --max-price 600 --max-stops 0
  Sorted:       skyfare search -f JFK -t LHR -d 2026-04-01 --sort departure
  JSON output:  skyfare search -f HEL -t BCN -d 2026-03-01 --json --pretty
  Deep link:    skyfare search -f JFK -t LHR -d 2026-04-01 --url
  Live data:    skyfare search -f JFK -t LHR -d 2026-04-01 --serp --api-key KEY"
    )]
    Search(SearchArgs),
    #[command(about = "Show or clear recent searches")]
    Recent(RecentArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(
        short, long,
        value_name = "IATA",
        help = "Departure airport code",
        long_help = "Departure airport IATA code (3 letters, e.g. JFK, HEL, LAX). \
            Required unless using --from-url."
    )]
    from: Option<String>,

    #[arg(
        short, long,
        value_name = "IATA",
        help = "Arrival airport code",
        long_help = "Arrival airport IATA code (3 letters, e.g. LHR, BCN, NRT). \
            Required unless using --from-url."
    )]
    to: Option<String>,

    #[arg(
        short, long,
        value_name = "YYYY-MM-DD",
        help = "Departure date",
        long_help = "Departure date in YYYY-MM-DD format. Required unless using --from-url."
    )]
    date: Option<String>,

    #[arg(
        long,
        value_name = "YYYY-MM-DD",
        help = "Return date for a round trip"
    )]
    return_date: Option<String>,

    #[arg(
        short,
        long,
        default_value = "1",
        value_name = "N",
        help = "Number of passengers (1-9)"
    )]
    passengers: u32,

    #[arg(
        long,
        default_value = "economy",
        value_name = "CLASS",
        help = "Cabin class [economy, premium-economy, business, first]"
    )]
    cabin: String,

    #[arg(
        long,
        default_value = "USD",
        value_name = "CODE",
        help = "Currency code [USD, EUR, GBP, JPY]"
    )]
    currency: String,

    #[arg(
        long,
        value_name = "URL",
        help = "Run the search encoded in a shared deep link",
        long_help = "Run the search encoded in a skyfare deep link (or a bare query \
            string). Replaces -f/-t/-d when used."
    )]
    from_url: Option<String>,

    #[arg(long, value_name = "N", help = "Hide flights above this price")]
    max_price: Option<i64>,

    #[arg(
        long,
        value_name = "N",
        help = "Hide flights with more stops than this (0 = nonstop only) [default: 2]"
    )]
    max_stops: Option<u32>,

    #[arg(
        long,
        value_name = "NAME,NAME,...",
        help = "Keep only these airlines (comma-separated names)"
    )]
    airlines: Option<String>,

    #[arg(
        long,
        default_value = "price",
        value_name = "KEY",
        help = "Sort results [price, duration, departure]"
    )]
    sort: String,

    #[arg(long, value_name = "N", help = "Show only the first N results after sorting")]
    top: Option<usize>,

    #[arg(long, help = "One-line-per-flight output (recommended for scripts)")]
    compact: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[arg(long, help = "Print a shareable deep link for this search and exit")]
    url: bool,

    #[arg(long, help = "Open the deep link for this search in a browser")]
    open: bool,

    #[arg(long, help = "Use live Google Flights data through the SERP API")]
    serp: bool,

    #[arg(
        long,
        value_name = "KEY",
        help = "SERP API key (defaults to the SERPAPI_KEY environment variable)"
    )]
    api_key: Option<String>,

    #[arg(long, value_name = "URL", help = "HTTP or SOCKS5 proxy for live data")]
    proxy: Option<String>,

    #[arg(long, default_value = "30", value_name = "SECS", help = "Request timeout")]
    timeout: u64,

    #[arg(long, help = "Do not record this search in the recent-search list")]
    no_history: bool,
}

#[derive(clap::Args)]
struct RecentArgs {
    #[arg(long, help = "Clear the recent-search list")]
    clear: bool,

    #[arg(long, help = "Output as JSON")]
    json: bool,

    #[arg(long, help = "Output as pretty-printed JSON")]
    pretty: bool,
}

fn is_json(args: &SearchArgs) -> bool {
    args.json || args.pretty
}

fn error_code(err: &SearchError) -> i32 {
    match err {
        SearchError::InvalidAirport(_)
        | SearchError::InvalidDate(_)
        | SearchError::Validation(_) => 2,
        SearchError::Timeout
        | SearchError::ConnectionFailed(_)
        | SearchError::DnsResolution(_)
        | SearchError::TlsError(_)
        | SearchError::ProxyError(_) => 3,
        SearchError::RateLimited => 4,
        SearchError::HttpStatus(_) | SearchError::Api(_) => 5,
        SearchError::Persistence(_) => 6,
    }
}

fn error_kind(err: &SearchError) -> &'static str {
    match err {
        SearchError::InvalidAirport(_) => "invalid_airport",
        SearchError::InvalidDate(_) => "invalid_date",
        SearchError::Validation(_) => "validation_error",
        SearchError::Timeout => "timeout",
        SearchError::ConnectionFailed(_) => "connection_failed",
        SearchError::DnsResolution(_) => "dns_error",
        SearchError::TlsError(_) => "tls_error",
        SearchError::ProxyError(_) => "proxy_error",
        SearchError::RateLimited => "rate_limited",
        SearchError::HttpStatus(_) => "http_error",
        SearchError::Api(_) => "api_error",
        SearchError::Persistence(_) => "persistence_error",
    }
}

fn die(err: &SearchError, json_mode: bool) -> ! {
    if json_mode {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
            }
        });
        println!("{}", serde_json::to_string(&json).unwrap());
    } else {
        eprintln!("error: {err}");
    }
    process::exit(error_code(err));
}

fn build_params(args: &SearchArgs) -> Result<SearchParams, SearchError> {
    if let Some(ref url) = args.from_url {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or(url);
        return SearchParams::from_url_params(&parse_query_string(query));
    }

    let from = args
        .from
        .as_ref()
        .ok_or_else(|| SearchError::Validation("--from is required (or use --from-url)".into()))?;
    let to = args
        .to
        .as_ref()
        .ok_or_else(|| SearchError::Validation("--to is required (or use --from-url)".into()))?;
    let date = args
        .date
        .as_ref()
        .ok_or_else(|| SearchError::Validation("--date is required (or use --from-url)".into()))?;

    Ok(SearchParams {
        origin: from.to_uppercase(),
        destination: to.to_uppercase(),
        depart_date: date.clone(),
        return_date: args.return_date.clone(),
        passengers: args.passengers,
        cabin_class: CabinClass::from_str_loose(&args.cabin)?,
    })
}

fn build_provider(
    args: &SearchArgs,
    currency: Currency,
) -> Result<Arc<dyn FlightProvider>, SearchError> {
    if !args.serp {
        return Ok(Arc::new(MockProvider {
            currency,
            ..MockProvider::default()
        }));
    }

    let api_key = args
        .api_key
        .clone()
        .or_else(|| std::env::var("SERPAPI_KEY").ok())
        .ok_or_else(|| {
            SearchError::Validation(
                "--serp requires an API key (pass --api-key or set SERPAPI_KEY)".into(),
            )
        })?;

    Ok(Arc::new(SerpProvider {
        api_key,
        currency,
        options: FetchOptions {
            proxy: args.proxy.clone(),
            timeout: args.timeout,
        },
    }))
}

fn build_store(disabled: bool) -> Box<dyn HistoryStore> {
    if disabled {
        return Box::new(NullStore);
    }
    match JsonFileStore::at_default_path() {
        Some(store) => Box::new(store),
        None => Box::new(NullStore),
    }
}

fn build_criteria(args: &SearchArgs, results: &[Flight]) -> FilterCriteria {
    let defaults = filter::default_criteria(results);
    FilterCriteria {
        max_price: args.max_price.unwrap_or(defaults.max_price),
        max_stops: args.max_stops.unwrap_or(defaults.max_stops),
        airlines: args
            .airlines
            .as_ref()
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn print_compact(flights: &[Flight]) {
    for flight in flights {
        let price = table::format_price(flight.price, flight.currency);
        let stops = if flight.stops == 0 {
            "nonstop".to_string()
        } else if flight.stops == 1 {
            "1 stop".to_string()
        } else {
            format!("{} stops", flight.stops)
        };

        println!(
            "{price} | {}>{} | {} | {stops} | {} {} | {}>{}",
            flight.origin,
            flight.destination,
            flight.duration,
            flight.airline,
            flight.flight_number,
            flight.depart_time,
            flight.arrival_time,
        );
    }
}

fn print_result(params: &SearchParams, flights: &[Flight], args: &SearchArgs) {
    if args.compact {
        if flights.is_empty() {
            println!("No flights found.");
            return;
        }
        print_compact(flights);
    } else if is_json(args) {
        let output = serde_json::json!({
            "params": params,
            "flights": flights,
        });
        let rendered = if args.pretty {
            serde_json::to_string_pretty(&output).unwrap()
        } else {
            serde_json::to_string(&output).unwrap()
        };
        println!("{rendered}");
    } else {
        if flights.is_empty() {
            println!("No flights found.");
            return;
        }
        println!("{}", table::render(flights));
    }
}

async fn run_search(args: SearchArgs) {
    let json_mode = is_json(&args);

    let params = match build_params(&args) {
        Ok(p) => p,
        Err(e) => die(&e, json_mode),
    };

    if args.url {
        println!("{}", skyfare::deep_link_url(&params));
        return;
    }

    if args.open {
        let url = skyfare::deep_link_url(&params);
        println!("Opening: {url}");
        if let Err(e) = open::that(&url) {
            die(
                &SearchError::Validation(format!("failed to open browser: {e}")),
                json_mode,
            );
        }
        return;
    }

    if let Err(e) = params.validate() {
        die(&e, json_mode);
    }

    let currency = match Currency::from_str_loose(&args.currency) {
        Ok(c) => c,
        Err(e) => die(&e, json_mode),
    };

    let sort_key = match SortKey::from_str_loose(&args.sort) {
        Ok(k) => k,
        Err(e) => die(&e, json_mode),
    };

    let provider = match build_provider(&args, currency) {
        Ok(p) => p,
        Err(e) => die(&e, json_mode),
    };

    let mut state = SearchState::new(provider, build_store(args.no_history));

    if !json_mode && !args.compact {
        eprintln!("Searching {} to {}...", params.origin, params.destination);
    }

    if let Some(e) = state.perform_search(params.clone()).await {
        die(&e, json_mode);
    }

    let criteria = build_criteria(&args, &state.results);
    let fell_back =
        !state.results.is_empty() && filter::apply_filters(&state.results, &criteria).is_empty();

    let mut shown = filter::displayed(&state.results, &criteria, sort_key);
    if let Some(n) = args.top {
        shown.truncate(n);
    }

    if fell_back && !json_mode {
        eprintln!(
            "No flights match the filters; showing all {} results.",
            state.results.len()
        );
    }

    print_result(&params, &shown, &args);
}

fn run_recent(args: RecentArgs) {
    let store = build_store(false);

    if args.clear {
        if let Err(e) = store.clear() {
            die(&e, args.json || args.pretty);
        }
        println!("Recent searches cleared.");
        return;
    }

    // Unreadable history lists as empty rather than failing the command.
    let recent = store.load().unwrap_or_default();

    if args.json || args.pretty {
        let rendered = if args.pretty {
            serde_json::to_string_pretty(&recent).unwrap()
        } else {
            serde_json::to_string(&recent).unwrap()
        };
        println!("{rendered}");
    } else if recent.is_empty() {
        println!("No recent searches.");
    } else {
        println!("{}", table::render_recent(&recent));
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Recent(args) => run_recent(args),
    }
}
