// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! NiyoFit command-line client.
//!
//! Drives the API client and session store against a live service.
//! Credentials persist between runs in a JSON file (`NIYOFIT_STORAGE_PATH`).

use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use niyofit_client::{
    config::Config,
    models::{ApiResponse, GymQuery, PageQuery, PriceRange, RegisterRequest},
    services::{directory, GymFilter, GymSort, TracingNavigator},
    storage::FileStore,
    AppContext,
};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "niyofit", about = "NiyoFit gym pass client")]
struct Cli {
    /// Overrides NIYOFIT_API_URL
    #[arg(long, env = "NIYOFIT_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Service health
    Health,
    /// List gyms, narrowed client-side
    Gyms {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        limit: u32,
        /// name, rating or newest
        #[arg(long, default_value = "name")]
        sort: GymSort,
        #[arg(long)]
        search: Option<String>,
        /// budget, mid-range or premium
        #[arg(long)]
        price: Option<PriceRange>,
        #[arg(long)]
        min_rating: Option<f32>,
    },
    /// Gym detail with its subscription plans
    Gym { id: String },
    /// Reviews for a gym
    Reviews {
        gym_id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    Login {
        email: String,
        #[arg(long, env = "NIYOFIT_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long, env = "NIYOFIT_PASSWORD")]
        password: String,
    },
    Logout,
    /// Show the restored session
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config = config.with_base_url(url);
    }
    tracing::debug!(api = %config.api_base_url, "Starting NiyoFit client");

    let storage = Arc::new(FileStore::new(config.storage_path.clone()));
    let ctx = AppContext::new(config, storage, Arc::new(TracingNavigator))?;

    // Same as the app shell: restore the session before anything else.
    ctx.session.check_auth_status().await;

    run(&ctx, cli.command).await
}

async fn run(ctx: &AppContext, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Health => print_json(&payload(ctx.api.health_check().await?, "Health check")?),
        Command::Gyms {
            page,
            limit,
            sort,
            search,
            price,
            min_rating,
        } => {
            let query = GymQuery {
                page: Some(page),
                limit: Some(limit),
                sort: Some(sort.as_query().to_string()),
            };
            let list = payload(ctx.api.get_gyms(&query).await?, "Failed to fetch gyms")?;
            let filter = GymFilter {
                search,
                price_range: price,
                min_rating,
                facilities: Vec::new(),
            };
            let today = chrono::Local::now().date_naive().weekday();
            for gym in directory::apply(&list, &filter) {
                println!(
                    "{:<26} {:<12} {:>4} {}",
                    gym.id,
                    gym.price_range.map_or("-", PriceRange::label),
                    gym.rating.map_or("-".to_string(), |r| format!("{r:.1}")),
                    gym.name
                );
                println!("    {}", directory::opening_hours_label(&gym, today));
            }
            println!("page {} of {} ({} gyms)", list.page, list.pages, list.total);
            Ok(())
        }
        Command::Gym { id } => {
            let gym = payload(ctx.api.get_gym_by_id(&id).await?, "Gym not found")?;
            let plans = ctx
                .api
                .get_gym_subscription_listings(&id)
                .await?
                .into_data()
                .unwrap_or_default();
            print_json(&serde_json::json!({ "gym": gym, "subscriptions": plans }))
        }
        Command::Reviews {
            gym_id,
            page,
            limit,
        } => {
            let reviews = ctx
                .api
                .get_gym_reviews(&gym_id, &PageQuery::new(page, limit))
                .await?;
            print_json(&payload(reviews, "Failed to fetch reviews")?)
        }
        Command::Login { email, password } => match ctx.session.login(&email, &password).await {
            Ok(user) => print_json(&user),
            Err(e) => bail!(e),
        },
        Command::Register {
            name,
            email,
            phone,
            password,
        } => {
            let request = RegisterRequest::new(name, email, phone, password);
            match ctx.session.register(&request).await {
                Ok(user) => print_json(&user),
                Err(e) => bail!(e),
            }
        }
        Command::Logout => {
            ctx.session.logout().await;
            Ok(())
        }
        Command::Whoami => match ctx.session.current_user() {
            Some(user) => print_json(&user),
            None => bail!("Not logged in"),
        },
    }
}

/// Payload of a successful envelope, or the service's reason as an error.
fn payload<T>(response: ApiResponse<T>, fallback: &str) -> anyhow::Result<T> {
    let reason = response.failure_reason().unwrap_or(fallback).to_string();
    match response.into_data() {
        Some(data) => Ok(data),
        None => bail!(reason),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize structured JSON logging on stderr (stdout carries results).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("niyofit_client=info,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
