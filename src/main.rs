use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meal_nutrition::food_model::Ingredient;
use meal_nutrition::meal_log::{DailyMeals, MealCategory};
use meal_nutrition::reconciliation::Reconciler;
use meal_nutrition::usda_config::UsdaConfig;

const USAGE: &str = "Usage:
  meal-nutrition enrich [FILE]           Enrich a JSON array of ingredients (stdin if FILE omitted)
  meal-nutrition log <CATEGORY> [FILE]   Enrich and append to the meal log
  meal-nutrition totals                  Print totals of the meal log";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    // Logs go to stderr so stdout stays machine-readable
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_ingredients(path: Option<&str>) -> Result<Vec<Ingredient>> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read ingredients from {}", path))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read ingredients from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&content).context("Ingredients must be a JSON array of {name, assumedPortion}")
}

fn meal_log_path() -> PathBuf {
    env::var("MEAL_LOG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("daily_meals.json"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file before reading RUST_LOG
    dotenv::dotenv().ok();
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = args.first().map(String::as_str);

    match command {
        Some("enrich") => {
            let ingredients = read_ingredients(args.get(1).map(String::as_str))?;
            let reconciler = Reconciler::from_config(UsdaConfig::from_env())?;

            info!(count = ingredients.len(), "Enriching ingredients");
            let enriched = reconciler.enhance_all(&ingredients).await;
            print_json(&enriched)
        }
        Some("log") => {
            let category: MealCategory = args
                .get(1)
                .context("Missing meal category (breakfast, lunch, dinner, snacks)")?
                .parse()?;
            let ingredients = read_ingredients(args.get(2).map(String::as_str))?;
            let reconciler = Reconciler::from_config(UsdaConfig::from_env())?;
            let enriched = reconciler.enhance_all(&ingredients).await;

            let path = meal_log_path();
            let mut meals = DailyMeals::load(&path)?;
            meals.add_to_meal(category, enriched);
            meals.save(&path)?;

            print_json(&meals.totals())
        }
        Some("totals") => {
            let meals = DailyMeals::load(&meal_log_path())?;
            print_json(&meals.totals())
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}
