use geoaddr_core::{
    entities::*,
    gateways::geocode::{GeocodingError, ReverseGeocodingGateway},
};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.vworld.kr/req/address";

const FIXED_PARAMS: [(&str, &str); 9] = [
    ("service", "address"),
    ("version", "2.0"),
    ("request", "getaddress"),
    ("format", "json"),
    ("errorformat", "json"),
    ("crs", "epsg:4326"),
    ("type", "both"),
    ("zipcode", "true"),
    ("simple", "false"),
];

/// Reverse geocoding with the address API of vworld.kr.
#[derive(Debug, Clone)]
pub struct VWorld {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl VWorld {
    pub fn try_new(base_url: Url, api_key: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn request_url(&self, pos: &Coordinate) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .extend_pairs(FIXED_PARAMS)
            .append_pair("point", &pos.to_lng_lat_string())
            .append_pair("key", &self.api_key);
        url
    }
}

impl ReverseGeocodingGateway for VWorld {
    fn reverse_geocode(&self, pos: &Coordinate) -> Result<GeocodeResponse, GeocodingError> {
        // The request URL contains the API key
        let transport_err =
            |err: reqwest::Error| GeocodingError::Transport(err.without_url().to_string());
        let response = self
            .client
            .get(self.request_url(pos))
            .send()
            .map_err(transport_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Transport(format!(
                "Unexpected HTTP status {status}"
            )));
        }
        let body = response.text().map_err(transport_err)?;
        decode_response(body)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Response,
}

#[derive(Debug, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(rename = "type")]
    kind: String,
    zipcode: Option<String>,
    text: Option<String>,
    #[serde(default)]
    structure: Structure,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Structure {
    level0: Option<String>,
    level1: Option<String>,
    level2: Option<String>,
    level3: Option<String>,
    #[serde(rename = "level4L")]
    level4_l: Option<String>,
    #[serde(rename = "level4A")]
    level4_a: Option<String>,
    level5: Option<String>,
}

impl From<Structure> for AddressStructure {
    fn from(from: Structure) -> Self {
        let Structure {
            level0,
            level1,
            level2,
            level3,
            level4_l,
            level4_a,
            level5,
        } = from;
        Self {
            country: level0,
            county: level1,
            region: level2,
            city: level3,
            street: level4_l,
            postal_town: level4_a,
            street_number: level5,
        }
    }
}

fn decode_response(raw: String) -> Result<GeocodeResponse, GeocodingError> {
    let payload_err = |err: serde_json::Error| GeocodingError::Payload(err.to_string());
    let Envelope { response } = serde_json::from_str(&raw).map_err(payload_err)?;
    let Response { status, result } = response;
    if status != GeocodeResponse::STATUS_OK {
        return Ok(GeocodeResponse {
            status,
            candidates: vec![],
            raw,
        });
    }
    let candidates = if result.is_null() {
        vec![]
    } else {
        serde_json::from_value::<Vec<Candidate>>(result).map_err(payload_err)?
    };
    let candidates = candidates
        .into_iter()
        .filter_map(|candidate| {
            let Candidate {
                kind,
                zipcode,
                text,
                structure,
            } = candidate;
            let Ok(kind) = kind.parse::<CandidateType>() else {
                log::debug!("Ignoring address candidate of type '{kind}'");
                return None;
            };
            Some(AddressCandidate {
                kind,
                zipcode,
                text,
                structure: structure.into(),
            })
        })
        .collect();
    Ok(GeocodeResponse {
        status,
        candidates,
        raw,
    })
}
