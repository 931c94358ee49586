use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::{
    directions_service::{DirectionsError, DirectionsService, validate_waypoint_count},
    route_options::RouteOptions,
    route_response::{DirectionsCredentials, Route, RouteLeg, RouteResponse},
};

pub const MAPBOX_DIRECTIONS_API_URL: &str = "https://api.mapbox.com";
pub const MAPBOX_DIRECTIONS_API_PATH: &str = "/directions/v5/mapbox/";

const ACCESS_TOKEN_ENV_VAR: &str = "MAPBOX_ACCESS_TOKEN";
const DIRECTIONS_URL_ENV_VAR: &str = "WAYMARK_DIRECTIONS_URL";

#[derive(Deserialize)]
struct MapboxDirectionsResponse {
    code: Option<String>,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<MapboxRoute>,
}

#[derive(Deserialize)]
struct MapboxRoute {
    /// Meters
    distance: f64,

    /// Seconds
    duration: f64,
    geometry: MapboxGeometry,
    legs: Vec<MapboxLeg>,
}

#[derive(Deserialize)]
struct MapboxGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Deserialize)]
struct MapboxLeg {
    distance: f64,
    duration: f64,
    #[serde(default)]
    summary: String,
}

impl From<MapboxRoute> for Route {
    fn from(route: MapboxRoute) -> Self {
        Route {
            legs: route
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    summary: leg.summary,
                    distance: leg.distance,
                    expected_travel_time: leg.duration,
                })
                .collect(),
            shape: route
                .geometry
                .coordinates
                .into_iter()
                .map(|[longitude, latitude]| geo_types::Point::new(longitude, latitude))
                .collect(),
            distance: route.distance,
            expected_travel_time: route.duration,
        }
    }
}

pub struct DirectionsClientParams {
    pub host: String,
    pub access_token: String,
    pub timeout: Option<Duration>,
}

impl DirectionsClientParams {
    /// Reads the access token and an optional host override from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let access_token = std::env::var(ACCESS_TOKEN_ENV_VAR)
            .map_err(|_| anyhow::anyhow!("{} is not set", ACCESS_TOKEN_ENV_VAR))?;
        let host = std::env::var(DIRECTIONS_URL_ENV_VAR)
            .unwrap_or_else(|_| MAPBOX_DIRECTIONS_API_URL.to_string());

        Ok(Self {
            host,
            access_token,
            timeout: None,
        })
    }
}

pub struct MapboxDirectionsClient {
    params: DirectionsClientParams,
    client: reqwest::Client,
}

impl MapboxDirectionsClient {
    pub fn new(params: DirectionsClientParams) -> Result<Self, DirectionsError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            params,
        })
    }

    fn build_url(&self, options: &RouteOptions) -> String {
        let mut url = self.params.host.trim_end_matches('/').to_string();
        url.push_str(MAPBOX_DIRECTIONS_API_PATH);
        url.push_str(&options.profile.to_string());
        url.push('/');

        for (i, waypoint) in options.waypoints.iter().enumerate() {
            url.push_str(&format!("{},{}", waypoint.longitude(), waypoint.latitude()));

            if i < options.waypoints.len() - 1 {
                url.push(';');
            }
        }

        url
    }

    fn build_query(&self, options: &RouteOptions) -> Vec<(&'static str, String)> {
        let separators = options
            .leg_separator_indices()
            .iter()
            .map(|index| index.to_string())
            .collect::<Vec<_>>()
            .join(";");

        vec![
            ("access_token", self.params.access_token.clone()),
            ("geometries", String::from("geojson")),
            ("overview", String::from("full")),
            ("steps", String::from("false")),
            ("language", options.language()),
            ("waypoints", separators),
        ]
    }
}

fn parse_response(
    status: u16,
    body: &str,
    options: &RouteOptions,
    credentials: DirectionsCredentials,
) -> Result<RouteResponse, DirectionsError> {
    let response: MapboxDirectionsResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) if !(200..300).contains(&status) => {
            return Err(DirectionsError::Api {
                code: status.to_string(),
                message: body.to_string(),
            });
        }
        Err(err) => return Err(DirectionsError::Deserialize(err)),
    };

    let code = response.code.unwrap_or_else(|| status.to_string());
    if code != "Ok" {
        return Err(DirectionsError::Api {
            code,
            message: response.message.unwrap_or_default(),
        });
    }

    if response.routes.is_empty() {
        return Err(DirectionsError::NoRoute);
    }

    Ok(RouteResponse {
        routes: response.routes.into_iter().map(Route::from).collect(),
        options: options.clone(),
        credentials,
    })
}

impl DirectionsService for MapboxDirectionsClient {
    async fn calculate(&self, options: &RouteOptions) -> Result<RouteResponse, DirectionsError> {
        validate_waypoint_count(options)?;

        let url = self.build_url(options);
        debug!(
            "MapboxDirections: requesting {} waypoints ({})",
            options.waypoints.len(),
            options.profile
        );

        let response = self
            .client
            .get(url)
            .query(&self.build_query(options))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_response(status, &body, options, self.credentials())
    }

    fn credentials(&self) -> DirectionsCredentials {
        DirectionsCredentials {
            host: self.params.host.clone(),
            access_token: self.params.access_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{route_options::RoutingProfile, waypoint::Waypoint};

    use super::*;

    fn client() -> MapboxDirectionsClient {
        MapboxDirectionsClient::new(DirectionsClientParams {
            host: String::from("https://api.example.com/"),
            access_token: String::from("pk.test"),
            timeout: None,
        })
        .unwrap()
    }

    fn options() -> RouteOptions {
        RouteOptions::new(
            vec![
                Waypoint::from_lon_lat([-105.140629, 39.760194]),
                Waypoint::from_lon_lat([-105.15, 39.761]).with_separates_legs(false),
                Waypoint::from_lon_lat([-105.156544, 39.761801]),
            ],
            RoutingProfile::DrivingTraffic,
            "en_US",
        )
    }

    #[test]
    fn test_build_url() {
        let url = client().build_url(&options());
        assert_eq!(
            url,
            "https://api.example.com/directions/v5/mapbox/driving-traffic/-105.140629,39.760194;-105.15,39.761;-105.156544,39.761801"
        );
    }

    #[test]
    fn test_build_query() {
        let query = client().build_query(&options());

        assert!(query.contains(&("language", String::from("en-US"))));
        assert!(query.contains(&("waypoints", String::from("0;2"))));
        assert!(query.contains(&("geometries", String::from("geojson"))));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "distance": 1523.4,
                "duration": 210.5,
                "geometry": { "type": "LineString", "coordinates": [[-105.14, 39.76], [-105.15, 39.761], [-105.156, 39.7618]] },
                "legs": [{ "distance": 1523.4, "duration": 210.5, "summary": "W 44th Ave" }]
            }],
            "waypoints": []
        }"#;

        let response = parse_response(200, body, &options(), client().credentials()).unwrap();
        let route = response.best_route().unwrap();

        assert_eq!(route.distance, 1523.4);
        assert_eq!(route.expected_travel_time, 210.5);
        assert_eq!(route.shape.len(), 3);
        assert_eq!(route.shape[0], geo_types::Point::new(-105.14, 39.76));
        assert_eq!(route.legs[0].summary, "W 44th Ave");
    }

    #[test]
    fn test_parse_api_error() {
        let body = r#"{ "code": "NoSegment", "message": "No road segment could be matched" }"#;
        let result = parse_response(422, body, &options(), client().credentials());

        match result {
            Err(DirectionsError::Api { code, message }) => {
                assert_eq!(code, "NoSegment");
                assert_eq!(message, "No road segment could be matched");
            }
            _ => panic!("expected an API error"),
        }
    }

    #[test]
    fn test_parse_unauthorized_without_code() {
        let body = r#"{ "message": "Not Authorized - Invalid Token" }"#;
        let result = parse_response(401, body, &options(), client().credentials());

        assert!(matches!(result, Err(DirectionsError::Api { code, .. }) if code == "401"));
    }

    #[test]
    fn test_parse_no_route() {
        let body = r#"{ "code": "Ok", "routes": [] }"#;
        let result = parse_response(200, body, &options(), client().credentials());

        assert!(matches!(result, Err(DirectionsError::NoRoute)));
    }

    #[tokio::test]
    async fn test_rejects_oversized_request_without_network() {
        let waypoints = (0..26)
            .map(|i| Waypoint::from_lon_lat([i as f64 * 0.01, 50.0]))
            .collect();
        let options = RouteOptions::new(waypoints, RoutingProfile::default(), "en_US");

        let result = client().calculate(&options).await;
        assert!(matches!(result, Err(DirectionsError::InvalidWaypointCount(26))));
    }
}
