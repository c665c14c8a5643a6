//! Menu rendering
//!
//! Turns catalog rows into the menu message and its inline keyboard.

mod localizer;

pub use localizer::{Localizer, PersianCalendar};

use crate::db::{FoodItem, FoodStatus, MealTime};
use crate::ui::keyboard::{InlineButton, Keyboard};
use crate::ui::text::{self, FoodLine};
use chrono::{NaiveDate, NaiveTime};

/// Prefix of food button callback data
const FOOD_DATA_PREFIX: &str = "food";

/// Food picked from the menu keyboard, as carried in button callback data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodSelection {
    pub food_id: i64,
    /// Serving date as seconds since the Unix epoch (UTC midnight)
    pub date_epoch: i64,
}

impl FoodSelection {
    pub fn for_item(food: &FoodItem) -> Self {
        Self {
            food_id: food.id,
            date_epoch: food.date.and_time(NaiveTime::MIN).and_utc().timestamp(),
        }
    }

    /// `food:<id>:<epoch>`
    pub fn encode(&self) -> String {
        format!("{FOOD_DATA_PREFIX}:{}:{}", self.food_id, self.date_epoch)
    }

    pub fn decode(data: &str) -> Option<Self> {
        let mut parts = data.split(':');
        if parts.next()? != FOOD_DATA_PREFIX {
            return None;
        }
        let food_id = parts.next()?.parse().ok()?;
        let date_epoch = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            food_id,
            date_epoch,
        })
    }
}

/// Menu message plus the keyboard that goes with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    pub text: String,
    pub keyboard: Keyboard,
}

/// Render the menu for foods grouped by date. Returns `None` when there is
/// nothing to show.
pub fn render_menu(
    groups: impl IntoIterator<Item = (NaiveDate, Vec<FoodItem>)>,
    localizer: &dyn Localizer,
) -> Option<RenderedMenu> {
    let foods = sort_foods_by_date(groups);
    if foods.is_empty() {
        return None;
    }
    Some(RenderedMenu {
        text: generate_menu_message(&foods, localizer),
        keyboard: generate_menu_keyboard(&foods, localizer),
    })
}

/// Flatten date groups in ascending date order, keeping each group's order
pub fn sort_foods_by_date(groups: impl IntoIterator<Item = (NaiveDate, Vec<FoodItem>)>) -> Vec<FoodItem> {
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by_key(|(date, _)| *date);
    groups.into_iter().flat_map(|(_, foods)| foods).collect()
}

/// One line per food, template chosen by status
pub fn generate_menu_message(foods: &[FoodItem], localizer: &dyn Localizer) -> String {
    foods
        .iter()
        .map(|food| {
            let day = localizer.format_day_weekday(food.date);
            let line = FoodLine {
                meal_time: meal_time_label(food.meal_time),
                day: &day,
                name: &food.name,
                side_dish: side_dish_label(food),
                price: food.price_tooman,
            };
            match food.status {
                FoodStatus::Unavailable => text::not_selectable_food_item(&line),
                FoodStatus::Reserved => text::selected_food_item(&line),
                FoodStatus::Selectable => text::not_selected_food_item(&line),
            }
        })
        .collect()
}

/// One inline button per food, one button per row
pub fn generate_menu_keyboard(foods: &[FoodItem], localizer: &dyn Localizer) -> Keyboard {
    let rows = foods
        .iter()
        .map(|food| {
            vec![InlineButton {
                caption: text::keyboard_food_item(&localizer.format_weekday(food.date), &food.name),
                data: FoodSelection::for_item(food).encode(),
            }]
        })
        .collect();
    Keyboard::Inline { rows }
}

pub fn meal_time_label(meal_time: MealTime) -> &'static str {
    match meal_time {
        MealTime::Breakfast => "صبحانه",
        MealTime::Lunch => "ناهار",
        MealTime::Dinner => "شام",
    }
}

fn side_dish_label(food: &FoodItem) -> &str {
    match food.side_dish.as_deref() {
        Some(side) if !side.trim().is_empty() => side,
        _ => text::MSG_NO_SIDE_DISH,
    }
}
