//! RSS 2.0 feed adapter (GDACS-style alert feeds).
//!
//! Parses channel items with [`quick_xml`], tolerating namespaced child
//! elements (`gdacs:eventid`, `georss:point`) by matching on local names.
//! Feeds that expose a per-event detail API (GDACS `geteventdata`) are
//! enriched item-by-item; a failed detail call degrades that one item
//! instead of failing the run.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use relief_map_feed_models::RawDisasterRecord;

use crate::{FeedError, FetchOptions};

/// Configuration for an RSS fetch.
#[derive(Debug)]
pub struct RssConfig<'a> {
    /// Feed URL.
    pub url: &'a str,
    /// Detail API URL template with `{eventtype}` and `{eventid}`
    /// placeholders.
    pub detail_api: Option<&'a str>,
    /// Human-readable feed name for logging.
    pub label: &'a str,
}

/// One `<item>` from an RSS channel.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RssItem {
    /// Item title.
    pub title: Option<String>,
    /// Item description.
    pub description: Option<String>,
    /// Parsed publication timestamp.
    pub pub_date: Option<DateTime<Utc>>,
    /// Provider event ID (e.g. `gdacs:eventid`).
    pub event_id: Option<String>,
    /// Provider event type code (e.g. `gdacs:eventtype`).
    pub event_type: Option<String>,
    /// `georss:point` coordinates as `(latitude, longitude)`.
    pub point: Option<(f64, f64)>,
}

/// Parses a `pubDate` value: RFC 2822 first, ISO 8601 as a fallback.
#[must_use]
pub fn parse_pub_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    crate::feed_def::parse_feed_date(s)
}

/// Parses a `georss:point` value (`"lat lon"`, space-separated).
fn parse_georss_point(s: &str) -> Option<(f64, f64)> {
    let mut parts = s.split_whitespace();
    let lat = parts.next()?.parse::<f64>().ok()?;
    let lon = parts.next()?.parse::<f64>().ok()?;
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Some((lat, lon))
    } else {
        None
    }
}

/// Parses RSS channel items from an XML document.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is not well-formed XML.
pub fn parse_rss(xml: &str) -> Result<Vec<RssItem>, FeedError> {
    let mut reader = Reader::from_str(xml);

    let mut items = Vec::new();
    let mut current: Option<RssItem> = None;
    let mut field: Option<Vec<u8>> = None;
    let mut buffer = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"item" {
                    current = Some(RssItem::default());
                } else if current.is_some() {
                    field = Some(local);
                    buffer.clear();
                }
            }
            Event::Text(e) => {
                if field.is_some() {
                    buffer.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if field.is_some() {
                    buffer.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                let local = e.local_name().as_ref().to_vec();
                if local == b"item" {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                } else if let (Some(item), Some(name)) = (current.as_mut(), field.take()) {
                    if name == local {
                        assign_field(item, &name, buffer.trim());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(items)
}

/// Stores a completed child-element value on the item being built.
fn assign_field(item: &mut RssItem, name: &[u8], value: &str) {
    if value.is_empty() {
        return;
    }
    match name {
        b"title" => item.title = Some(value.to_string()),
        b"description" => item.description = Some(value.to_string()),
        b"pubDate" => item.pub_date = parse_pub_date(value),
        b"eventid" => item.event_id = Some(value.to_string()),
        b"eventtype" => item.event_type = Some(value.to_string()),
        b"point" => item.point = parse_georss_point(value),
        _ => {}
    }
}

/// Per-event detail returned by a GDACS-style `geteventdata` API.
#[derive(Debug, Default)]
struct EventDetail {
    population: Option<u64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    description: Option<String>,
}

/// Fetches the detail API for one event. Any failure is reported as
/// `None` so the item falls back to channel-level data.
async fn fetch_event_detail(
    client: &reqwest::Client,
    template: &str,
    event_type: &str,
    event_id: &str,
) -> Option<EventDetail> {
    let url = template
        .replace("{eventtype}", event_type)
        .replace("{eventid}", event_id);
    let body: serde_json::Value = match client
        .get(&url)
        .timeout(crate::DETAIL_TIMEOUT)
        .send()
        .await
    {
        Ok(resp) => match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Detail response for event {event_id} unparseable: {e}");
                return None;
            }
        },
        Err(e) => {
            log::warn!("Detail request for event {event_id} failed: {e}");
            return None;
        }
    };

    Some(EventDetail {
        population: body
            .get("populationExposure")
            .and_then(serde_json::Value::as_u64),
        latitude: body.get("latitude").and_then(serde_json::Value::as_f64),
        longitude: body.get("longitude").and_then(serde_json::Value::as_f64),
        description: body
            .get("description")
            .and_then(serde_json::Value::as_str)
            .map(String::from),
    })
}

/// Fetches an RSS feed and adapts its items into raw disaster records.
///
/// Items older than `options.since` are dropped; items without a
/// parseable `pubDate` are kept. The location string embeds coordinates
/// as `"{title} ({lat}, {lon})"` when a position is known, so downstream
/// extraction can recover them from text alone.
///
/// # Errors
///
/// Returns [`FeedError`] if the feed cannot be fetched or parsed.
/// Detail-API failures are logged and degrade single items only.
pub async fn fetch_rss(
    config: &RssConfig<'_>,
    options: &FetchOptions,
) -> Result<Vec<RawDisasterRecord>, FeedError> {
    let client = crate::http_client()?;
    let xml = client.get(config.url).send().await?.text().await?;
    let items = parse_rss(&xml)?;
    log::info!("{}: parsed {} channel items", config.label, items.len());

    let mut records = Vec::new();
    for item in items {
        if let (Some(since), Some(pub_date)) = (options.since, item.pub_date) {
            if pub_date < since {
                continue;
            }
        }
        if let Some(limit) = options.limit {
            if records.len() as u64 >= limit {
                break;
            }
        }

        let detail = match (&config.detail_api, &item.event_type, &item.event_id) {
            (Some(template), Some(event_type), Some(event_id)) => {
                fetch_event_detail(&client, template, event_type, event_id)
                    .await
                    .unwrap_or_default()
            }
            _ => EventDetail::default(),
        };

        let coordinates = match (detail.latitude, detail.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => item.point,
        };

        let title = item.title.unwrap_or_default();
        let location = coordinates.map_or_else(
            || title.clone(),
            |(lat, lon)| format!("{title} ({lat}, {lon})"),
        );

        records.push(RawDisasterRecord {
            title: Some(title),
            description: detail.description.or(item.description),
            location: Some(location),
            category: item.event_type,
            population_affected: detail.population,
            disaster_time: item.pub_date,
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lon)| lon),
        });
    }

    Ok(records)
}
