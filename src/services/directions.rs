use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::nav::{GeoPoint, Route};

use super::DirectionsProvider;

#[derive(Clone)]
pub struct HttpDirectionsService {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct RouteRequest<'a> {
    origin: GeoPoint,
    destination: GeoPoint,
    waypoints: &'a [GeoPoint],
}

impl HttpDirectionsService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsService {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        waypoints: &[GeoPoint],
    ) -> Result<Route> {
        let request = RouteRequest { origin, destination, waypoints };

        let response = self
            .client
            .post(format!("{}/route", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("directions server error: {}", response.status()));
        }

        Ok(response.json::<Route>().await?)
    }
}
