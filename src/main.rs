// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! MealMate command line client.
//!
//! Restores the persisted session, runs one command against the API and
//! prints the result as JSON.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mealmate_client::{
    config::Config,
    models::{
        Difficulty, LoginCredentials, MealType, NewMealPlan, NewMealPlanItem, NewPantryItem,
        RecipeQuery, RegisterData, SpiceLevel,
    },
    services::SessionManager,
    ApiClient,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "mealmate", author, version, about)]
struct Args {
    /// Base address of the MealMate API.
    #[arg(long, global = true, env = "MEALMATE_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the logged-in user.
    Whoami,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MEALMATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in).
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, env = "MEALMATE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Defaults to --password.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    Logout,
    /// List recipes with optional filters.
    Recipes {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long, value_parser = parse_wire::<Difficulty>)]
        difficulty: Option<Difficulty>,
        /// Maximum total time in minutes.
        #[arg(long)]
        max_time: Option<u32>,
        #[arg(long, value_parser = parse_wire::<MealType>)]
        meal_type: Option<MealType>,
        #[arg(long, value_parser = parse_wire::<SpiceLevel>)]
        spice_level: Option<SpiceLevel>,
        #[arg(long)]
        vegetarian: Option<bool>,
        #[arg(long)]
        search: Option<String>,
    },
    Recipe {
        id: i64,
    },
    /// Toggle a recipe in the user's favorites.
    Favorite {
        id: i64,
    },
    Rate {
        id: i64,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        review: Option<String>,
    },
    Cuisines,
    #[command(subcommand)]
    Pantry(PantryCommand),
    #[command(subcommand)]
    MealPlans(MealPlanCommand),
    #[command(subcommand)]
    Search(SearchCommand),
}

#[derive(Debug, Subcommand)]
enum PantryCommand {
    List,
    Add {
        ingredient_name: String,
        quantity: f64,
        unit: String,
    },
    Remove {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum MealPlanCommand {
    List,
    Create {
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    Show {
        id: i64,
    },
    AddItem {
        plan_id: i64,
        meal_date: NaiveDate,
        #[arg(value_parser = parse_wire::<MealType>)]
        meal_type: MealType,
        #[arg(long)]
        recipe_id: Option<i64>,
        #[arg(long)]
        meal_name: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SearchCommand {
    Recipes { query: String },
    /// Recipes cookable from the pantry.
    ByPantry,
    Ingredients { query: String },
}

/// Parse a value using its wire spelling (e.g. `very_hot`).
fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| format!("invalid value '{}'", raw))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(api_url) = &args.api_url {
        config = config.with_api_url(api_url)?;
    }

    init_logging(&config.log_filter);
    tracing::debug!(api_url = %config.api_url, "Starting MealMate client");

    let client = Arc::new(ApiClient::from_config(&config));
    let session = SessionManager::with_tracing(client.clone());
    session.initialize().await;

    run(args.command, &session, &client).await
}

async fn run(command: Command, session: &SessionManager, client: &ApiClient) -> anyhow::Result<()> {
    match command {
        Command::Whoami => match session.user() {
            Some(user) => print_json(&user),
            None => {
                println!("Not logged in");
                Ok(())
            }
        },
        Command::Login { email, password } => {
            let user = session
                .login(&LoginCredentials::new(email, password))
                .await?;
            print_json(&user)
        }
        Command::Register {
            email,
            username,
            full_name,
            password,
            confirm_password,
        } => {
            let data = RegisterData {
                email,
                username,
                full_name,
                password_confirmation: confirm_password.unwrap_or_else(|| password.clone()),
                password,
            };
            print_json(&session.register(&data).await?)
        }
        Command::Logout => {
            session.logout().await;
            Ok(())
        }
        Command::Recipes {
            page,
            page_size,
            cuisine,
            difficulty,
            max_time,
            meal_type,
            spice_level,
            vegetarian,
            search,
        } => {
            let query = RecipeQuery {
                page,
                page_size,
                cuisine,
                difficulty,
                max_time,
                meal_type,
                spice_level,
                vegetarian,
                search,
            };
            print_json(&client.get_recipes(&query).await?)
        }
        Command::Recipe { id } => print_json(&client.get_recipe(id).await?),
        Command::Favorite { id } => print_json(&client.toggle_favorite_recipe(id).await?),
        Command::Rate { id, rating, review } => {
            print_json(&client.rate_recipe(id, rating, review.as_deref()).await?)
        }
        Command::Cuisines => print_json(&client.get_cuisines().await?),
        Command::Pantry(cmd) => match cmd {
            PantryCommand::List => print_json(&client.get_pantry_items().await?),
            PantryCommand::Add {
                ingredient_name,
                quantity,
                unit,
            } => {
                let item = NewPantryItem {
                    ingredient_name,
                    quantity,
                    unit,
                };
                print_json(&client.add_pantry_item(&item).await?)
            }
            PantryCommand::Remove { id } => print_json(&client.remove_pantry_item(id).await?),
        },
        Command::MealPlans(cmd) => match cmd {
            MealPlanCommand::List => print_json(&client.get_meal_plans().await?),
            MealPlanCommand::Create {
                name,
                start_date,
                end_date,
            } => {
                let plan = NewMealPlan {
                    name,
                    start_date,
                    end_date,
                };
                print_json(&client.create_meal_plan(&plan).await?)
            }
            MealPlanCommand::Show { id } => print_json(&client.get_meal_plan(id).await?),
            MealPlanCommand::AddItem {
                plan_id,
                meal_date,
                meal_type,
                recipe_id,
                meal_name,
            } => {
                let item = NewMealPlanItem {
                    meal_date,
                    meal_type,
                    recipe_id,
                    meal_name,
                };
                print_json(&client.add_meal_plan_item(plan_id, &item).await?)
            }
        },
        Command::Search(cmd) => match cmd {
            SearchCommand::Recipes { query } => print_json(&client.search_recipes(&query).await?),
            SearchCommand::ByPantry => print_json(&client.search_recipes_by_pantry().await?),
            SearchCommand::Ingredients { query } => {
                print_json(&client.search_ingredients(&query).await?)
            }
        },
    }
}

/// Initialize structured JSON logging on stderr, keeping stdout for results.
fn init_logging(filter: &str) {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true)
        .with_writer(std::io::stderr);

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
