//! Static command table
//!
//! Maps inbound events to the handler they trigger while no question is
//! pending.

use super::event::Event;
use crate::menu::FoodSelection;
use crate::ui::text;

/// A recognised trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Menu,
    Reserve,
    Credit,
    Cancel,
    /// Tap on a food button of the rendered menu
    Food(FoodSelection),
}

/// Slash commands, matched on the first word without the leading `/`
const COMMANDS: &[(&str, Trigger)] = &[
    ("start", Trigger::Start),
    ("menu", Trigger::Menu),
    ("reserve", Trigger::Reserve),
    ("cancel", Trigger::Cancel),
];

/// Main keyboard labels, matched on the whole (trimmed) message
const KEYBOARD_LABELS: &[(&str, Trigger)] = &[
    (text::MAIN_KEYBOARD_MENU, Trigger::Menu),
    (text::MAIN_KEYBOARD_CREDIT, Trigger::Credit),
];

/// Match an inbound event against the command table
pub fn match_trigger(event: &Event) -> Option<Trigger> {
    match event {
        Event::Text { text } => match_text(text),
        Event::Button { data } => FoodSelection::decode(data).map(Trigger::Food),
        _ => None,
    }
}

/// True when the event is the `/cancel` command, which is never consumed as
/// an answer to a pending question
pub fn is_cancel(event: &Event) -> bool {
    matches!(event, Event::Text { text } if parse_command(text) == Some("cancel"))
}

fn match_text(input: &str) -> Option<Trigger> {
    if let Some(name) = parse_command(input) {
        return lookup(COMMANDS, name);
    }
    lookup(KEYBOARD_LABELS, input.trim())
}

fn lookup(table: &[(&str, Trigger)], key: &str) -> Option<Trigger> {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, trigger)| *trigger)
}

/// Extract the command name from `/name@bot args`
fn parse_command(input: &str) -> Option<&str> {
    let word = input.split_whitespace().next()?;
    let name = word.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    (!name.is_empty()).then_some(name)
}
