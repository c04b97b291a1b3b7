//! Conversion between CypherLog kind 37004 subscription events and bills.
//!
//! A subscription can carry its fields in NIP-44 encrypted content, in
//! plain tags, or both. Decrypted content wins when present; tags are the
//! fallback. Tags FiatLife does not interpret are kept so an edited
//! subscription can be republished without losing them.

use fiatlife_model::{Bill, BillCategory, BillFrequency, BillSource, BillWithSource};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Tag keys mapped onto bill fields.
pub const MAPPED_TAG_KEYS: &[&str] = &[
    "d",
    "name",
    "cost",
    "currency",
    "billing_frequency",
    "subscription_type",
    "company_name",
    "company_id",
    "notes",
    "alt",
    "due_day",
];

const DEFAULT_NAME: &str = "Subscription";

pub type PreservedTags = BTreeMap<String, Vec<String>>;

/// Groups `[key, value, ...]` tags by key, in event order.
fn tag_map(tags: &[Vec<String>]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for tag in tags.iter().filter(|tag| tag.len() >= 2) {
        map.entry(tag[0].clone()).or_default().push(tag[1].clone());
    }
    map
}

fn first<'a>(map: &'a BTreeMap<String, Vec<String>>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(|values| values.first()).map(String::as_str)
}

fn preserved(map: &BTreeMap<String, Vec<String>>) -> Option<PreservedTags> {
    let kept: PreservedTags = map
        .iter()
        .filter(|(key, _)| !MAPPED_TAG_KEYS.contains(&key.as_str()))
        .map(|(key, values)| (key.clone(), values.clone()))
        .collect();
    (!kept.is_empty()).then_some(kept)
}

/// Name from an `alt` tag such as `Subscription: Netflix`. The generic alt
/// text of encrypted events yields nothing.
fn name_from_alt(map: &BTreeMap<String, Vec<String>>) -> String {
    let Some(alt) = first(map, "alt") else {
        return String::new();
    };
    let lower = alt.to_lowercase();
    if lower.contains("encrypted") && lower.contains("subscription data") {
        return String::new();
    }
    let stripped = alt
        .strip_prefix("Subscription:")
        .or_else(|| alt.strip_prefix("subscription:"))
        .unwrap_or(alt);
    stripped.trim().to_string()
}

fn parse_due_day(value: Option<&str>) -> Option<u8> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(|day| day.clamp(1, 31) as u8)
}

/// CypherLog `billing_frequency` value to a bill frequency.
pub fn frequency_from_cypherlog(value: Option<&str>) -> BillFrequency {
    match value.map(str::to_lowercase).as_deref() {
        Some("weekly") => BillFrequency::Weekly,
        Some("quarterly") => BillFrequency::Quarterly,
        Some("semi-annually") => BillFrequency::Semiannually,
        Some("annually") | Some("one-time") => BillFrequency::Annually,
        _ => BillFrequency::Monthly,
    }
}

/// Bill frequency to the nearest CypherLog `billing_frequency` value.
pub fn frequency_to_cypherlog(frequency: BillFrequency) -> &'static str {
    match frequency {
        BillFrequency::Weekly => "weekly",
        BillFrequency::Biweekly | BillFrequency::Monthly => "monthly",
        BillFrequency::Bimonthly | BillFrequency::Quarterly => "quarterly",
        BillFrequency::Semiannually => "semi-annually",
        BillFrequency::Annually => "annually",
    }
}

struct Fields {
    name: String,
    cost: f64,
    frequency: BillFrequency,
    due_day: u8,
    notes: String,
    company_name: String,
}

fn subscription_bill(d_tag: &str, fields: Fields, preserved_tags: Option<PreservedTags>) -> BillWithSource {
    let name = if fields.name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        fields.name
    };
    BillWithSource {
        bill: Bill {
            id: d_tag.to_string(),
            name,
            amount: fields.cost,
            category: BillCategory::Other,
            frequency: fields.frequency,
            due_day: fields.due_day,
            account_name: fields.company_name,
            notes: fields.notes,
            updated_at: 0,
            ..Bill::default()
        },
        source: BillSource::CypherLog,
        preserved_tags,
    }
}

/// Builds a bill from the event's tags alone.
pub fn bill_from_tags(d_tag: &str, tags: &[Vec<String>]) -> BillWithSource {
    let map = tag_map(tags);
    let mut name = first(&map, "name").unwrap_or_default().to_string();
    if name.trim().is_empty() {
        name = name_from_alt(&map);
    }
    let cost = ["cost", "amount"]
        .iter()
        .find_map(|key| first(&map, key).and_then(|v| v.trim().parse::<f64>().ok()))
        .unwrap_or(0.0);
    let fields = Fields {
        name,
        cost,
        frequency: frequency_from_cypherlog(first(&map, "billing_frequency")),
        due_day: parse_due_day(first(&map, "due_day")).unwrap_or(1),
        notes: first(&map, "notes").unwrap_or_default().to_string(),
        company_name: first(&map, "company_name").unwrap_or_default().to_string(),
    };
    subscription_bill(d_tag, fields, preserved(&map))
}

/// Picks the object holding the subscription fields: the root itself, its
/// `data` object, or the first element of an array root.
fn content_object(root: &Value) -> Option<&Map<String, Value>> {
    match root {
        Value::Object(obj) => {
            let direct = ["name", "cost", "billing_frequency"]
                .iter()
                .any(|key| obj.contains_key(*key));
            if !direct && let Some(Value::Object(data)) = obj.get("data") {
                return Some(data);
            }
            Some(obj)
        }
        Value::Array(items) => items.first().and_then(Value::as_object),
        _ => None,
    }
}

/// Text of a scalar JSON value. Blank strings and non-scalars count as
/// absent.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

fn text_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| obj.get(*key).and_then(scalar_text))
}

fn number_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Builds a bill from decrypted content, falling back to the tags when the
/// content is not a usable JSON object. Unmapped tags are preserved either
/// way.
pub fn bill_from_content(d_tag: &str, content_json: &str, tags: &[Vec<String>]) -> BillWithSource {
    let root = match serde_json::from_str::<Value>(content_json) {
        Ok(root) => root,
        Err(e) => {
            warn!(d_tag, "failed to parse 37004 content: {e}");
            return bill_from_tags(d_tag, tags);
        }
    };
    let Some(obj) = content_object(&root) else {
        warn!(d_tag, "37004 content is neither an object nor an array of objects");
        return bill_from_tags(d_tag, tags);
    };

    let map = tag_map(tags);
    let mut name = text_field(obj, &["name", "subscriptionName", "subscription_name", "title", "description"])
        .unwrap_or_default();
    if name.trim().is_empty() {
        name = name_from_alt(&map);
    }
    let due_day = parse_due_day(text_field(obj, &["due_day"]).as_deref())
        .or_else(|| parse_due_day(first(&map, "due_day")))
        .unwrap_or(1);
    let fields = Fields {
        name,
        cost: number_field(obj, &["cost", "amount", "price", "costAmount", "subscriptionCost"])
            .unwrap_or(0.0),
        frequency: frequency_from_cypherlog(
            text_field(obj, &["billing_frequency", "billingFrequency"]).as_deref(),
        ),
        due_day,
        notes: text_field(obj, &["notes"]).unwrap_or_default(),
        company_name: text_field(obj, &["company_name", "companyName"]).unwrap_or_default(),
    };
    subscription_bill(d_tag, fields, preserved(&map))
}

/// Tags for publishing `bill` as a kind 37004 event under `d_tag`.
/// Preserved tags are appended, except any stray `d`.
pub fn bill_to_tags(bill: &Bill, preserved: Option<&PreservedTags>, d_tag: &str) -> Vec<Vec<String>> {
    let mut tags = vec![
        vec!["d".to_string(), d_tag.to_string()],
        vec!["name".to_string(), bill.name.clone()],
        vec!["cost".to_string(), format!("{:?}", bill.amount)],
        vec![
            "billing_frequency".to_string(),
            frequency_to_cypherlog(bill.frequency).to_string(),
        ],
        vec!["due_day".to_string(), bill.due_day.to_string()],
    ];
    if !bill.notes.trim().is_empty() {
        tags.push(vec!["notes".to_string(), bill.notes.clone()]);
    }
    if !bill.account_name.trim().is_empty() {
        tags.push(vec!["company_name".to_string(), bill.account_name.clone()]);
    }
    for (key, values) in preserved.into_iter().flatten() {
        if key == "d" {
            continue;
        }
        for value in values {
            tags.push(vec![key.clone(), value.clone()]);
        }
    }
    tags
}
