use geoaddr_core::{
    entities::*,
    gateways::{
        location::{EntityState, LocationError, LocationSource},
        publish::{PublishError, SensorSink},
    },
};
use reqwest::{blocking::Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use url::Url;

/// Access to the REST API of a Home Assistant instance.
#[derive(Debug, Clone)]
pub struct HomeAssistant {
    client: Client,
    base_url: Url,
    token: String,
}

impl HomeAssistant {
    pub fn try_new(mut base_url: Url, token: String, timeout: Duration) -> reqwest::Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn state_url(&self, entity_id: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("api/states/{entity_id}"))
    }
}

#[derive(Debug, Deserialize)]
struct JsonEntityState {
    state: String,
    #[serde(default)]
    attributes: Map<String, Value>,
}

impl From<JsonEntityState> for EntityState {
    fn from(from: JsonEntityState) -> Self {
        let JsonEntityState { state, attributes } = from;
        let lat = attributes.get("latitude").and_then(Value::as_f64);
        let lng = attributes.get("longitude").and_then(Value::as_f64);
        let coordinate = lat
            .zip(lng)
            .and_then(|(lat, lng)| Coordinate::try_from_lat_lng_deg(lat, lng));
        Self {
            zone: state.into(),
            coordinate,
        }
    }
}

impl LocationSource for HomeAssistant {
    fn resolve(&self, id: &EntityId) -> Result<Option<EntityState>, LocationError> {
        let url = self
            .state_url(id.as_str())
            .map_err(|err| LocationError::Unreachable(err.to_string()))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|err| LocationError::Unreachable(err.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(LocationError::Unreachable(format!(
                    "Unexpected HTTP status {status}"
                )));
            }
            _ => {}
        }
        let state: JsonEntityState = response
            .json()
            .map_err(|err| LocationError::Payload(err.to_string()))?;
        Ok(Some(state.into()))
    }
}

fn state_body(snapshot: &SensorSnapshot) -> Result<Value, serde_json::Error> {
    let mut attributes = match serde_json::to_value(&snapshot.attributes)? {
        Value::Object(attributes) => attributes,
        _ => Map::new(),
    };
    attributes.insert("attribution".into(), snapshot.attribution.into());
    attributes.insert("friendly_name".into(), snapshot.name.clone().into());
    if let Some(picture) = &snapshot.picture {
        attributes.insert("entity_picture".into(), picture.clone().into());
    }
    Ok(json!({
        "state": snapshot.state,
        "attributes": attributes,
    }))
}

impl SensorSink for HomeAssistant {
    fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError> {
        let entity_id = format!("sensor.{}", snapshot.object_id());
        let url = self
            .state_url(&entity_id)
            .map_err(|err| PublishError(err.to_string()))?;
        let body = state_body(snapshot).map_err(|err| PublishError(err.to_string()))?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|err| PublishError(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PublishError(format!(
                "Unexpected HTTP status {} for {entity_id}",
                response.status()
            )));
        }
        log::debug!("Published state of {entity_id}");
        Ok(())
    }
}
