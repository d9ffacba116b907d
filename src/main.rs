use clap::{Parser, Subcommand};
use log::debug;
use meal_finder::{
    FinderConfig, MealDetail, MealFinder, SearchMode, SearchState, POPULAR_CUISINES,
    SUGGESTED_NAMES,
};

#[derive(Parser)]
#[command(name = "meal-finder", version, about = "Discover delicious meals from around the world")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search meals by cuisine or by name
    Search {
        term: String,
        /// Search axis: cuisine or name
        #[arg(long = "by", default_value = "cuisine")]
        mode: SearchMode,
    },
    /// Show a meal's tags, instructions and ingredients
    Show { id: String },
    /// Add a meal to favorites, or remove it if already there
    Favorite { id: String },
    /// List favorite meals
    Favorites,
    /// List popular cuisines and suggested meal names
    Suggest,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = FinderConfig::load()?;
    debug!("{:#?}", config);
    let finder = MealFinder::builder().config(config).build().await?;

    match cli.command {
        Command::Search { term, mode } => {
            let Some(state) = finder.search(&term, mode).await else {
                return Err("Please provide a search term".into());
            };
            match state {
                SearchState::Succeeded(meals) => {
                    println!("Found {} delicious meals", meals.len());
                    for meal in meals {
                        let heart = if finder.is_favorite(&meal.id) { "♥" } else { " " };
                        let origin: Vec<&str> = [meal.area.as_deref(), meal.category.as_deref()]
                            .into_iter()
                            .flatten()
                            .collect();
                        if origin.is_empty() {
                            println!("{} {:>6}  {}", heart, meal.id, meal.name);
                        } else {
                            println!(
                                "{} {:>6}  {} ({})",
                                heart,
                                meal.id,
                                meal.name,
                                origin.join(" • ")
                            );
                        }
                    }
                }
                SearchState::Empty => {
                    println!("No meals found. Try a different search!");
                }
                SearchState::Failed(e) => {
                    eprintln!("Failed to fetch meals. Please try again. ({})", e);
                }
                SearchState::Idle | SearchState::Searching => {}
            }
        }
        Command::Show { id } => {
            let meal = finder.details(&id).await?;
            print_detail(&meal, finder.is_favorite(&id));
        }
        Command::Favorite { id } => {
            if finder.toggle_favorite(&id).await {
                println!("Added to favorites!");
            } else {
                println!("Removed from favorites");
            }
        }
        Command::Favorites => {
            let meals = finder.favorite_meals().await;
            if meals.is_empty() {
                println!("No favorites yet");
            } else {
                println!("Your Favorite Meals ({})", meals.len());
                for meal in meals {
                    println!("♥ {:>6}  {}", meal.id(), meal.name());
                }
            }
        }
        Command::Suggest => {
            println!("Popular Cuisines: {}", POPULAR_CUISINES.join(", "));
            println!("Try searching for: {}", SUGGESTED_NAMES.join(", "));
        }
    }

    Ok(())
}

fn print_detail(meal: &MealDetail, favorite: bool) {
    let summary = &meal.summary;
    println!("{}{}", meal.name(), if favorite { " ♥" } else { "" });
    println!(
        "{} • {}",
        summary.area.as_deref().unwrap_or("-"),
        summary.category.as_deref().unwrap_or("-")
    );

    if !meal.tags.is_empty() {
        println!("\nTags: {}", meal.tags.join(", "));
    }
    if let Some(instructions) = &meal.instructions {
        println!("\nInstructions\n{}", instructions);
    }
    if !meal.ingredients.is_empty() {
        println!("\nIngredients");
        for ingredient in &meal.ingredients {
            println!("• {}", ingredient);
        }
    }
    if let Some(source) = &meal.source {
        println!("\nSource: {}", source);
    }
    if let Some(youtube) = &meal.youtube {
        println!("Video: {}", youtube);
    }
}
