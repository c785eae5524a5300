//! Adaptive card rendering for a day's menu.
//!
//! Everything here is pure: the same location and menu always render to the
//! same JSON, field order included.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{Location, MenuItem, TodayMenu};

pub const CARD_SCHEMA: &str = "https://adaptivecards.io/schemas/adaptive-card.json";
pub const CARD_VERSION: &str = "1.5";
pub const CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// The envelope posted to the webhook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(rename = "contentType")]
    pub content_type: &'static str,
    pub content: AdaptiveCard,
    // Routing hints read by the webhook integration, not part of the card.
    pub channel_id: String,
    pub test: bool,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub version: &'static str,
    pub body: Vec<Container>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub items: Vec<CardElement>,
    #[serde(rename = "selectAction")]
    pub select_action: OpenUrlAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CardElement {
    TextBlock {
        text: String,
        wrap: bool,
        style: &'static str,
        weight: &'static str,
    },
    FactSet {
        facts: Vec<Fact>,
        separator: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenUrlAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub url: String,
}

/// Build the full webhook payload for `location`.
pub fn render_payload(
    location: &Location,
    menu: &TodayMenu,
    site_url: &str,
    testing: bool,
) -> NotificationPayload {
    NotificationPayload {
        kind: "message",
        attachments: vec![Attachment {
            content_type: CARD_CONTENT_TYPE,
            content: render_card(location, menu, site_url),
            channel_id: location.channel_id.clone(),
            test: testing,
            location: location.name.clone(),
        }],
    }
}

pub fn render_card(location: &Location, menu: &TodayMenu, site_url: &str) -> AdaptiveCard {
    let heading = CardElement::TextBlock {
        text: heading_date(menu.date),
        wrap: true,
        style: "heading",
        weight: "Bolder",
    };

    let facts = CardElement::FactSet {
        facts: facts(&menu.menus),
        separator: true,
    };

    AdaptiveCard {
        kind: "AdaptiveCard",
        schema: CARD_SCHEMA,
        version: CARD_VERSION,
        body: vec![Container {
            kind: "Container",
            items: vec![heading, facts],
            select_action: OpenUrlAction {
                kind: "Action.OpenUrl",
                title: "Go to menu",
                url: menu_url(site_url, location),
            },
        }],
    }
}

/// Items with a missing label or description are dropped whole.
pub fn facts(items: &[MenuItem]) -> Vec<Fact> {
    items
        .iter()
        .filter_map(|item| match (&item.kind, &item.menu) {
            (Some(title), Some(value)) => Some(Fact { title: title.clone(), value: value.clone() }),
            _ => None,
        })
        .collect()
}

pub fn menu_url(site_url: &str, location: &Location) -> String {
    format!("{}/{}/weeklymenulist-en", site_url.trim_end_matches('/'), location.other_id)
}

/// `Monday, 19th of October 2026`
pub fn heading_date(date: NaiveDate) -> String {
    format!(
        "{}, {}{} of {}",
        date.format("%A"),
        date.day(),
        ordinal_suffix(date.day()),
        date.format("%B %Y"),
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
