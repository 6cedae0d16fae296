//! OSRM HTTP adapter for travel estimation.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::CollaboratorError;
use crate::geo::HaversineEstimator;
use crate::traits::{TravelEstimate, TravelEstimator};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, from: (f64, f64), to: (f64, f64)) -> String {
        // OSRM wants lng,lat.
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.1,
            from.0,
            to.1,
            to.0
        )
    }
}

/// The estimator a deployment runs: OSRM when `[osrm]` is configured,
/// straight-line estimates otherwise.
pub fn travel_estimator(config: &PlannerConfig) -> Result<Box<dyn TravelEstimator>, CollaboratorError> {
    match &config.osrm {
        Some(osrm) => Ok(Box::new(OsrmClient::new(osrm.clone())?)),
        None => Ok(Box::new(HaversineEstimator::default())),
    }
}

impl TravelEstimator for OsrmClient {
    /// OSRM has no traffic model, so `traffic_rate` is always 1.0 and `at`
    /// is ignored.
    fn estimate(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        _at: i32,
    ) -> Result<TravelEstimate, CollaboratorError> {
        let body = self
            .client
            .get(self.route_url(from, to))
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .map_err(|err| {
                if err.is_timeout() {
                    CollaboratorError::Timeout(std::time::Duration::from_secs(self.config.timeout_secs))
                } else {
                    CollaboratorError::Http(err)
                }
            })?;

        body.into_estimate()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
}

impl OsrmRouteResponse {
    fn into_estimate(self) -> Result<TravelEstimate, CollaboratorError> {
        if self.code != "Ok" {
            return Err(CollaboratorError::Decode(format!("OSRM returned code {}", self.code)));
        }
        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| CollaboratorError::Decode("OSRM returned no routes".to_string()))?;

        Ok(TravelEstimate {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            traffic_rate: 1.0,
        })
    }
}
