use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Number of positional ingredient/measure slots in a catalog record
pub const INGREDIENT_SLOTS: usize = 20;

/// A meal as it appears in search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealSummary {
    pub id: String,
    pub name: String,
    pub thumbnail: String,
    /// Cuisine/region; missing from area-filter results
    pub area: Option<String>,
    pub category: Option<String>,
}

/// One rendered ingredient line of a meal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.measure {
            Some(measure) => write!(f, "{} {}", measure, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Full meal record, fetched lazily per identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MealDetail {
    pub summary: MealSummary,
    pub instructions: Option<String>,
    pub tags: Vec<String>,
    /// Present ingredients in their positional order
    pub ingredients: Vec<Ingredient>,
    pub source: Option<String>,
    pub youtube: Option<String>,
}

impl MealDetail {
    pub fn id(&self) -> &str {
        &self.summary.id
    }

    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

/// Result of a catalog search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// One or more meals, in catalog order
    Found(Vec<MealSummary>),
    /// The catalog answered with no meals
    NoResults,
}

impl SearchResult {
    pub(crate) fn from_meals(meals: Vec<MealSummary>) -> Self {
        if meals.is_empty() {
            SearchResult::NoResults
        } else {
            SearchResult::Found(meals)
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SearchResult::Found(meals) => meals.len(),
            SearchResult::NoResults => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    ByCuisine,
    ByName,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cuisine" | "area" => Ok(SearchMode::ByCuisine),
            "name" => Ok(SearchMode::ByName),
            other => Err(format!(
                "Unknown search mode '{}', expected 'cuisine' or 'name'",
                other
            )),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::ByCuisine => write!(f, "cuisine"),
            SearchMode::ByName => write!(f, "name"),
        }
    }
}

/// Envelope shared by every catalog endpoint: `{"meals": [...] | null}`
#[derive(Debug, Deserialize)]
pub(crate) struct MealsEnvelope {
    #[serde(default)]
    pub meals: Option<Vec<MealRecord>>,
}

/// A meal as the catalog sends it
///
/// Area-filter results carry only the first three fields; name search and
/// lookup carry the full record, whose positional ingredient columns land in
/// `extra`.
#[derive(Debug, Deserialize)]
pub(crate) struct MealRecord {
    #[serde(rename = "idMeal")]
    id: String,
    #[serde(rename = "strMeal", default)]
    name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strSource", default)]
    source: Option<String>,
    #[serde(rename = "strYoutube", default)]
    youtube: Option<String>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

impl MealRecord {
    pub(crate) fn into_summary(self) -> MealSummary {
        MealSummary {
            id: self.id,
            name: self.name.unwrap_or_default(),
            thumbnail: self.thumbnail.unwrap_or_default(),
            area: non_blank(self.area),
            category: non_blank(self.category),
        }
    }

    pub(crate) fn into_detail(mut self) -> MealDetail {
        let ingredients = collect_ingredients(&self.extra);
        let tags = self.tags.as_deref().map(split_tags).unwrap_or_default();
        let instructions = non_blank(self.instructions.take());
        let source = non_blank(self.source.take());
        let youtube = non_blank(self.youtube.take());

        MealDetail {
            summary: self.into_summary(),
            instructions,
            tags,
            ingredients,
            source,
            youtube,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn text_field(extra: &HashMap<String, Value>, key: &str) -> Option<String> {
    extra
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Collect the positional `strIngredientN`/`strMeasureN` pairs, skipping
/// slots whose ingredient is empty or whitespace
fn collect_ingredients(extra: &HashMap<String, Value>) -> Vec<Ingredient> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let name = text_field(extra, &format!("strIngredient{}", slot))?;
            let measure = text_field(extra, &format!("strMeasure{}", slot));
            Some(Ingredient { name, measure })
        })
        .collect()
}

/// Split a comma-delimited tag string, trimming each tag
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
