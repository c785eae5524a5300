use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

/// A site with its own menu feed and chat destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Display label, also sent along with the card for routing.
    pub name: String,
    /// Identifier used in the weekly menu API query.
    pub restaurant_id: String,
    /// Identifier used in the public menu URL.
    pub other_id: String,
    /// Destination channel for the webhook payload.
    pub channel_id: String,
}

/// One category line of a day's menu, e.g. `Soup` / `Tomato soup with basil`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub menu: Option<String>,
}

/// A single day sliced out of the weekly response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayMenu {
    #[serde(deserialize_with = "date_prefix")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub menus: Vec<MenuItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMenuResponse {
    pub week_number: u32,
    /// Indexed by weekday, Monday first. Kept raw: only today's entry is
    /// decoded, so a malformed sibling day cannot sink the whole week.
    #[serde(default)]
    pub days: Vec<Value>,
}

impl WeeklyMenuResponse {
    /// Raw entry for `weekday_index`, `None` when missing or `null`.
    pub fn day(&self, weekday_index: u32) -> Option<&Value> {
        self.days.get(weekday_index as usize).filter(|v| !v.is_null())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// The API sends either `2026-10-19` or `2026-10-19T00:00:00`.
fn date_prefix<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let prefix = raw.get(..10).unwrap_or(raw.as_str());

    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .map_err(|e| de::Error::custom(format!("invalid menu date '{raw}': {e}")))
}
