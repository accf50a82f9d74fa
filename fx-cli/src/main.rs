//! FX CLI
//!
//! Command-line front end for the currency converter. Each invocation starts
//! from the default form, applies its flags, and persists only the session.

mod config;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::country_name;
use fx_client::RateClient;
use fx_hex::ConverterService;
use fx_store::{Store, build_store};
use fx_types::{
    ConvertResponse, CurrencyCode, HistoryResponse, LoginRequest, Plan, StatusResponse,
};

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency converter", long_about = None)]
struct Cli {
    /// Base URL of the rate API (overrides FX_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file, or ":memory:" (overrides FX_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rate table for a base currency
    Rates {
        #[arg(long, default_value = "usd")]
        base: String,
        /// Snapshot date (YYYY-MM-DD); latest when omitted
        #[arg(long, default_value = "")]
        date: String,
    },
    /// Convert an amount (counts against the quota)
    Convert {
        amount: f64,
        #[arg(long, default_value = "usd")]
        from: String,
        #[arg(long, default_value = "inr")]
        to: String,
        #[arg(long, default_value = "")]
        date: String,
        /// Exchange source and target before converting
        #[arg(long)]
        swap: bool,
    },
    /// Show the twelve-month trend (counts against the chart quota)
    Chart {
        #[arg(long, default_value = "usd")]
        from: String,
        #[arg(long, default_value = "inr")]
        to: String,
    },
    /// Find currencies by country name
    Search {
        query: String,
        /// Base whose rate table supplies the candidates
        #[arg(long, default_value = "usd")]
        base: String,
    },
    /// Log in (resets usage counters)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Subscribe for unlimited use
    Subscribe {
        /// monthly or yearly
        #[arg(long, default_value = "monthly")]
        plan: String,
    },
    /// Log out and clear the session
    Logout,
    /// Show session and remaining quota
    Status,
}

type Service = ConverterService<RateClient, Store>;

fn parse_code(s: &str) -> Result<CurrencyCode> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid currency code: {}", s))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,fx_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = config::Config::from_env().override_with(cli.api_url, cli.store);
    tracing::debug!(api_url = %config.api_url, store = %config.store_location, "configured");

    let store = build_store(&config.store_location)?;
    let mut svc: Service = ConverterService::new(RateClient::new(&config.api_url), store)?;

    match cli.command {
        Commands::Rates { base, date } => {
            svc.select_from(parse_code(&base)?);
            svc.select_date(&date)?;
            let table = svc.refresh_rates().await;
            if cli.json {
                print_json(table)?;
            } else {
                println!("{}", render::rates(table));
            }
        }

        Commands::Convert {
            amount,
            from,
            to,
            date,
            swap,
        } => {
            svc.set_amount(amount)?;
            svc.select_from(parse_code(&from)?);
            svc.select_to(parse_code(&to)?);
            if swap {
                svc.swap();
            }
            svc.select_date(&date)?;

            let result = svc.refresh_and_convert().await?;
            let response = ConvertResponse {
                as_of: svc.as_of(),
                result,
                badge: svc.badge(),
            };
            if cli.json {
                print_json(&response)?;
            } else {
                println!(
                    "{} {} = {} {}",
                    response.result.amount,
                    response.result.from.display_code(),
                    response.result,
                    response.result.to.display_code()
                );
                if let Some(badge) = &response.badge {
                    println!("{}", badge);
                }
                println!("{}", svc.usage().banner());
            }
        }

        Commands::Chart { from, to } => {
            svc.select_from(parse_code(&from)?);
            svc.select_to(parse_code(&to)?);
            svc.toggle_chart()?;
            let samples = svc.load_history().await?.to_vec();

            let response = HistoryResponse {
                from: svc.from().clone(),
                to: svc.to().clone(),
                samples,
            };
            if cli.json {
                print_json(&response)?;
            } else {
                println!("{}", render::chart(&response));
                println!("{}", svc.usage().banner());
            }
        }

        Commands::Search { query, base } => {
            svc.select_from(parse_code(&base)?);
            svc.refresh_rates().await;
            let found = svc.search(&query);
            if cli.json {
                let entries: Vec<_> = found
                    .iter()
                    .map(|code| json!({ "code": code, "country": country_name(code) }))
                    .collect();
                print_json(&entries)?;
            } else if found.is_empty() {
                println!("No currencies match \"{}\"", query.trim());
            } else {
                println!("{}", render::currencies(&found));
            }
        }

        Commands::Login { email, password } => {
            svc.login(&LoginRequest { email, password })?;
            println!("✓ Logged in as {}", svc.usage().user_email.as_deref().unwrap_or_default());
            println!("{}", svc.usage().banner());
        }

        Commands::Subscribe { plan } => {
            let plan: Plan = plan.parse()?;
            svc.subscribe(plan)?;
            println!("✓ Subscribed to {} plan ({})", plan.name(), plan.price());
            println!("{}", svc.usage().banner());
        }

        Commands::Logout => {
            svc.logout()?;
            println!("✓ Logged out");
        }

        Commands::Status => {
            let status = StatusResponse::from(svc.usage());
            if cli.json {
                print_json(&status)?;
            } else {
                match &status.email {
                    Some(email) => println!("Logged in as {}", email),
                    None => println!("Not logged in"),
                }
                if let Some(plan) = status.plan {
                    println!("Plan: {} ({})", plan.name(), plan.price());
                } else {
                    for plan in Plan::all() {
                        let badge = plan.badge().map(|b| format!("  [{}]", b)).unwrap_or_default();
                        println!("Available: {} {}{}", plan.name(), plan.price(), badge);
                    }
                }
                println!("{}", status.banner);
            }
        }
    }

    Ok(())
}
