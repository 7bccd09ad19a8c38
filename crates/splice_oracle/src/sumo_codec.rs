//! Reads and writes the XML files exchanged with SUMO's `duarouter`.
//!
//! Requests are written as a `<routes>` file of `<trip>` elements, one per
//! request and named by its [`RequestId`]. The router answers in its
//! alternatives file, where every routed trip becomes a `<vehicle>` holding a
//! `<routeDistribution>`.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    edge_id::EdgeId,
    route_request::{RequestId, RouteBatch},
    route_response::{RouteAlternative, RouteResponse},
    routing_oracle::OracleError,
};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
const DEPART: &str = "0.00";

#[derive(Serialize)]
#[serde(rename = "routes")]
struct TripsFile<'a> {
    #[serde(rename = "trip")]
    trips: Vec<TripElement<'a>>,
}

#[derive(Serialize)]
struct TripElement<'a> {
    #[serde(rename = "@id")]
    id: RequestId,
    #[serde(rename = "@depart")]
    depart: &'static str,
    #[serde(rename = "@from")]
    from: &'a EdgeId,
    #[serde(rename = "@to")]
    to: &'a EdgeId,
}

#[derive(Deserialize)]
struct AltRoutesFile {
    #[serde(rename = "vehicle", default)]
    vehicles: Vec<AltVehicle>,
}

#[derive(Deserialize)]
struct AltVehicle {
    #[serde(rename = "@id")]
    id: RequestId,
    #[serde(rename = "routeDistribution")]
    distribution: Option<AltRouteDistribution>,
}

#[derive(Deserialize)]
struct AltRouteDistribution {
    #[serde(rename = "@last", default)]
    last: usize,
    #[serde(rename = "route", default)]
    routes: Vec<AltRoute>,
}

#[derive(Deserialize)]
struct AltRoute {
    #[serde(rename = "@cost")]
    cost: f64,
    #[serde(rename = "@probability")]
    probability: Option<f64>,
    #[serde(rename = "@edges")]
    edges: String,
}

impl AltVehicle {
    fn into_response(self) -> RouteResponse {
        let Some(distribution) = self.distribution.filter(|d| !d.routes.is_empty()) else {
            return RouteResponse::NoPath {
                id: self.id,
                reason: Some(String::from("empty route distribution")),
            };
        };

        let alternatives = distribution
            .routes
            .into_iter()
            .map(|route| {
                let mut alternative = RouteAlternative::new(
                    route.edges.split_whitespace().map(EdgeId::from).collect(),
                    route.cost,
                );
                if let Some(probability) = route.probability {
                    alternative.probability = probability;
                }
                alternative
            })
            .collect();

        RouteResponse::Routed {
            id: self.id,
            alternatives,
            chosen: distribution.last,
        }
    }
}

fn codec_error(err: impl std::fmt::Display) -> OracleError {
    OracleError::Codec(err.to_string())
}

/// Serializes the batch as a duarouter trips file.
pub fn write_trips(batch: &RouteBatch) -> Result<String, OracleError> {
    let file = TripsFile {
        trips: batch
            .requests
            .iter()
            .map(|request| TripElement {
                id: request.id,
                depart: DEPART,
                from: &request.from,
                to: &request.to,
            })
            .collect(),
    };

    let mut xml = String::from(XML_DECLARATION);
    let mut serializer = quick_xml::se::Serializer::new(&mut xml);
    serializer.indent(' ', 4);
    file.serialize(serializer).map_err(codec_error)?;
    xml.push('\n');

    Ok(xml)
}

/// Parses a duarouter alternatives file into one response per request.
///
/// Trips the router dropped (duarouter's `--ignore-errors`) have no vehicle
/// and come back as [`RouteResponse::NoPath`]. Vehicles naming no request of
/// the batch are kept, after the batch's responses, so they can be reported.
pub fn read_alt_routes(xml: &str, batch: &RouteBatch) -> Result<Vec<RouteResponse>, OracleError> {
    let file: AltRoutesFile = quick_xml::de::from_str(xml).map_err(codec_error)?;

    let mut routed: FxHashMap<RequestId, RouteResponse> = file
        .vehicles
        .into_iter()
        .map(|vehicle| (vehicle.id, vehicle.into_response()))
        .collect();

    let mut responses: Vec<RouteResponse> = batch
        .requests
        .iter()
        .map(|request| {
            routed
                .remove(&request.id)
                .unwrap_or_else(|| RouteResponse::NoPath {
                    id: request.id,
                    reason: Some(String::from("trip dropped by the router")),
                })
        })
        .collect();

    let mut unexpected: Vec<RouteResponse> = routed.into_values().collect();
    unexpected.sort_by_key(RouteResponse::id);
    responses.extend(unexpected);

    Ok(responses)
}

#[cfg(test)]
mod tests {
    use crate::route_request::RouteRequest;

    use super::*;

    const ALT_ROUTES: &str = include_str!("../tests/fixtures/routes_3.alt.xml");

    fn request(id: (usize, usize, u8), from: &str, to: &str) -> RouteRequest {
        RouteRequest {
            id: RequestId::new(id.0, id.1, id.2),
            from: EdgeId::from(from),
            to: EdgeId::from(to),
        }
    }

    fn batch() -> RouteBatch {
        RouteBatch {
            id: String::from("3"),
            requests: vec![
                request((0, 0, 0), "a", "b"),
                request((0, 1, 0), "b", "x"),
                request((0, 1, 1), "x", "c"),
            ],
        }
    }

    #[test]
    fn test_write_trips() {
        let xml = write_trips(&batch()).unwrap();

        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<routes>"));
        assert!(xml.contains(r#"<trip id="0_0_0" depart="0.00" from="a" to="b"/>"#));
        assert!(xml.contains(r#"<trip id="0_1_1" depart="0.00" from="x" to="c"/>"#));
        assert_eq!(xml.matches("<trip ").count(), 3);
    }

    #[test]
    fn test_read_alt_routes() {
        let responses = read_alt_routes(ALT_ROUTES, &batch()).unwrap();

        assert_eq!(responses.len(), 3);

        match &responses[0] {
            RouteResponse::Routed {
                id,
                alternatives,
                chosen,
            } => {
                assert_eq!(*id, RequestId::new(0, 0, 0));
                assert_eq!(*chosen, 1);
                assert_eq!(alternatives.len(), 2);
                assert_eq!(alternatives[0].cost, 42.17);
                assert_eq!(alternatives[0].probability, 0.4);
                assert_eq!(
                    alternatives[1].edges,
                    ["a", "ac", "c", "cb", "b"].map(EdgeId::from).to_vec()
                );
            }
            other => panic!("unexpected response {other:?}"),
        }

        assert!(matches!(
            &responses[1],
            RouteResponse::Routed { alternatives, chosen: 0, .. } if alternatives.len() == 1
        ));
    }

    #[test]
    fn test_dropped_trip_has_no_path() {
        let responses = read_alt_routes(ALT_ROUTES, &batch()).unwrap();

        assert!(matches!(
            &responses[2],
            RouteResponse::NoPath { id, .. } if *id == RequestId::new(0, 1, 1)
        ));
    }

    #[test]
    fn test_unexpected_vehicle_is_kept() {
        let mut batch = batch();
        batch.requests.remove(1);

        let responses = read_alt_routes(ALT_ROUTES, &batch).unwrap();

        assert_eq!(responses.len(), 3);
        assert_eq!(responses[2].id(), RequestId::new(0, 1, 0));
    }

    #[test]
    fn test_empty_distribution_has_no_path() {
        let xml = r#"<routes><vehicle id="0_0_0" depart="0.00"><routeDistribution last="0"/></vehicle></routes>"#;

        let responses = read_alt_routes(xml, &batch()).unwrap();

        assert!(matches!(&responses[0], RouteResponse::NoPath { .. }));
    }

    #[test]
    fn test_malformed_file_is_recoverable() {
        let error = read_alt_routes("<routes><vehicle id=\"0_0", &batch()).unwrap_err();

        assert!(matches!(error, OracleError::Codec(_)));
        assert!(!error.is_fatal());
    }
}
