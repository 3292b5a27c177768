//! Mock weather source — fixture data behind a simulated network delay.
//!
//! Stands in for an OpenWeatherMap-style API. Unknown city ids resolve to an
//! error rather than an empty snapshot, so the store can transition to its
//! rejected state instead of storing garbage.

use super::{ForecastDay, WeatherSnapshot};
use crate::error::FetchError;
use crate::shared::CityId;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;

const DEFAULT_LATENCY: Duration = Duration::from_millis(500);

/// Mock weather API with configurable latency.
#[derive(Debug, Clone)]
pub struct MockWeatherApi {
    latency: Duration,
}

impl Default for MockWeatherApi {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

impl MockWeatherApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-latency variant is handy in tests.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// The city ids the fixture data covers: London, New York, Tokyo.
    pub fn default_cities() -> Vec<CityId> {
        vec![
            CityId::from("2643743"),
            CityId::from("5128581"),
            CityId::from("1850147"),
        ]
    }

    /// Fetch the current snapshot for one city.
    pub async fn fetch(&self, city_id: &CityId) -> Result<WeatherSnapshot, FetchError> {
        tokio::time::sleep(self.latency).await;
        fixture(city_id).ok_or_else(|| FetchError::UnknownCity(city_id.to_string()))
    }
}

fn fixture(city_id: &CityId) -> Option<WeatherSnapshot> {
    let now = Utc::now();
    let forecast = |entries: [(f64, &str, &str); 3]| -> Vec<ForecastDay> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (temp, description, icon))| ForecastDay {
                date: now + ChronoDuration::days(i as i64 + 1),
                temp,
                description: description.to_string(),
                icon: icon.to_string(),
            })
            .collect()
    };

    let snap = match city_id.as_str() {
        "2643743" => WeatherSnapshot {
            city_id: city_id.clone(),
            city_name: "London".to_string(),
            country: "GB".to_string(),
            temp: 15.2,
            feels_like: 14.8,
            humidity: 76,
            wind_speed: 4.2,
            description: "Cloudy".to_string(),
            icon: "04d".to_string(),
            timestamp: now,
            forecast: forecast([
                (16.1, "Partly cloudy", "02d"),
                (15.7, "Cloudy", "04d"),
                (17.3, "Sunny", "01d"),
            ]),
        },
        "5128581" => WeatherSnapshot {
            city_id: city_id.clone(),
            city_name: "New York".to_string(),
            country: "US".to_string(),
            temp: 22.8,
            feels_like: 23.4,
            humidity: 65,
            wind_speed: 3.1,
            description: "Sunny".to_string(),
            icon: "01d".to_string(),
            timestamp: now,
            forecast: forecast([
                (24.2, "Sunny", "01d"),
                (23.9, "Partly cloudy", "02d"),
                (21.5, "Rain", "10d"),
            ]),
        },
        "1850147" => WeatherSnapshot {
            city_id: city_id.clone(),
            city_name: "Tokyo".to_string(),
            country: "JP".to_string(),
            temp: 28.6,
            feels_like: 30.2,
            humidity: 74,
            wind_speed: 2.4,
            description: "Clear".to_string(),
            icon: "01d".to_string(),
            timestamp: now,
            forecast: forecast([
                (27.8, "Cloudy", "03d"),
                (29.1, "Clear", "01d"),
                (30.2, "Clear", "01d"),
            ]),
        },
        _ => return None,
    };
    Some(snap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_known_city() {
        let api = MockWeatherApi::with_latency(Duration::ZERO);
        let snap = api.fetch(&CityId::from("2643743")).await.unwrap();
        assert_eq!(snap.city_name, "London");
        assert_eq!(snap.forecast.len(), 3);
    }

    #[tokio::test]
    async fn test_fetch_unknown_city_is_an_error() {
        let api = MockWeatherApi::with_latency(Duration::ZERO);
        let err = api.fetch(&CityId::from("doesnotexist")).await.unwrap_err();
        assert!(matches!(err, FetchError::UnknownCity(_)));
        assert_eq!(err.to_string(), "Unknown city: doesnotexist");
    }

    #[test]
    fn test_default_cities_covered_by_fixtures() {
        for id in MockWeatherApi::default_cities() {
            assert!(fixture(&id).is_some(), "missing fixture for {id}");
        }
    }
}
