//! TMD Weather3Hours client
//!
//! The Thai Meteorological Department serves 3-hourly surface observations
//! as XML. Only the province name, wind speed, and rainfall of each station
//! element are extracted; everything else in the document is skipped.

use crate::app::adapters::{FetchOutcome, WeatherSource};
use crate::app::models::WeatherObservation;
use crate::constants::endpoints;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TmdWeatherClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl TmdWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_url(endpoints::TMD_WEATHER3H_URL, api_key)
    }

    pub fn with_url(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl WeatherSource for TmdWeatherClient {
    async fn observations(&self) -> FetchOutcome<Vec<WeatherObservation>> {
        let url = format!("{}?uid=api&ukey={}", self.url, self.api_key);
        debug!("GET {}", self.url);
        let body = match self.client.get(&url).send().await {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(e) => return FetchOutcome::Failed(format!("unreadable body: {}", e)),
            },
            Err(e) => return FetchOutcome::Failed(format!("request failed: {}", e)),
        };

        match parse_weather_xml(&body) {
            Ok(observations) if observations.is_empty() => FetchOutcome::Empty,
            Ok(observations) => FetchOutcome::Fetched(observations),
            Err(message) => FetchOutcome::Failed(message),
        }
    }
}

/// Pull per-station `(Province, WindSpeed, Rainfall)` triples out of the
/// observation document, in document order.
///
/// Unparseable or empty measurement text becomes `None` rather than zero:
/// "no wind measurement" and "measured calm" are different facts to the
/// risk correlator.
pub fn parse_weather_xml(xml: &str) -> Result<Vec<WeatherObservation>, String> {
    let mut reader = Reader::from_str(xml);

    let mut observations = Vec::new();
    let mut current: Option<WeatherObservation> = None;
    let mut text_target: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"Station" => {
                    current = Some(WeatherObservation {
                        province: String::new(),
                        wind_speed: None,
                        rainfall: None,
                    });
                }
                b"Province" => text_target = Some(Field::Province),
                b"WindSpeed" => text_target = Some(Field::WindSpeed),
                b"Rainfall" => text_target = Some(Field::Rainfall),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let (Some(obs), Some(field)) = (current.as_mut(), text_target) {
                    let text = t
                        .unescape()
                        .map_err(|e| format!("bad XML text: {}", e))?
                        .trim()
                        .to_string();
                    match field {
                        Field::Province => obs.province = text,
                        Field::WindSpeed => obs.wind_speed = text.parse().ok(),
                        Field::Rainfall => obs.rainfall = text.parse().ok(),
                    }
                }
            }
            Ok(Event::End(e)) => {
                text_target = None;
                if e.name().as_ref() == b"Station" {
                    if let Some(obs) = current.take() {
                        if !obs.province.is_empty() {
                            observations.push(obs);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("malformed XML: {}", e)),
        }
    }

    Ok(observations)
}

#[derive(Clone, Copy)]
enum Field {
    Province,
    WindSpeed,
    Rainfall,
}
