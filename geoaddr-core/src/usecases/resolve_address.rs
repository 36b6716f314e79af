use super::{format_display, lookup_address, prelude::*, ChangeGate};
use crate::{
    avatar::gravatar_url,
    gateways::{
        geocode::{GeocodingError, ReverseGeocodingGateway},
        location::{EntityState, LocationSource},
    },
};
use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub name: String,
    pub origin: Origin,
    pub options: FieldSelection,
    pub display_zone: DisplayZone,
    pub candidate_selection: CandidateSelection,
    /// E-mail address of a Gravatar account.
    pub gravatar: Option<String>,
}

/// What happened during an update cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The position could not be determined.
    Unavailable,
    /// No request was necessary.
    Unchanged,
    /// A new address has been resolved.
    Resolved,
    /// The service answered with an error status.
    Rejected,
    /// The request failed or the response could not be decoded.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LastLookup {
    Resolved,
    Rejected(String),
}

/// A sensor that keeps track of the address of a position.
#[derive(Debug)]
pub struct AddressResolver {
    settings: ResolverSettings,
    picture: Option<String>,
    gate: ChangeGate,
    zone: Option<ZoneState>,
    record: AddressRecord,
    last_lookup: Option<LastLookup>,
    last_updated: Option<OffsetDateTime>,
    state: String,
}

impl AddressResolver {
    pub fn new(settings: ResolverSettings) -> Self {
        let picture = settings.gravatar.as_deref().map(gravatar_url);
        Self {
            settings,
            picture,
            gate: ChangeGate::default(),
            zone: None,
            record: AddressRecord::default(),
            last_lookup: None,
            last_updated: None,
            state: AWAITING_UPDATE.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn record(&self) -> &AddressRecord {
        &self.record
    }

    pub fn picture(&self) -> Option<&str> {
        self.picture.as_deref()
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            name: self.settings.name.clone(),
            state: self.state.clone(),
            attributes: self.record.clone(),
            attribution: ATTRIBUTION,
            picture: self.picture.clone(),
            last_updated: self.last_updated,
        }
    }

    /// Runs a single update cycle.
    ///
    /// Errors are logged and never abort the cycle.
    pub fn update<L, G>(&mut self, locations: &L, geocoder: &G) -> UpdateOutcome
    where
        L: LocationSource + ?Sized,
        G: ReverseGeocodingGateway + ?Sized,
    {
        let coordinate = match &self.settings.origin {
            Origin::Static(pos) => Some(*pos),
            Origin::Entity(id) => {
                let Some(EntityState { zone, coordinate }) = resolve_entity(locations, id) else {
                    return UpdateOutcome::Unavailable;
                };
                if coordinate.is_none() {
                    log::error!("Entity {id} does not report a location");
                }
                self.zone = Some(zone);
                coordinate
            }
        };
        let Some(pos) = coordinate else {
            return UpdateOutcome::Unavailable;
        };
        let outcome = if self.gate.should_query(self.zone.as_ref(), Some(&pos)) {
            self.lookup(geocoder, &pos)
        } else {
            UpdateOutcome::Unchanged
        };
        if outcome != UpdateOutcome::Failed {
            self.refresh_state();
        }
        outcome
    }

    fn lookup<G>(&mut self, geocoder: &G, pos: &Coordinate) -> UpdateOutcome
    where
        G: ReverseGeocodingGateway + ?Sized,
    {
        log::info!("Sending reverse geocoding request for '{}'", self.settings.name);
        // Markers are set regardless of the outcome: a failing service is
        // not asked again until the position or zone changes.
        self.gate.record_query(self.zone.as_ref(), pos);
        match lookup_address(geocoder, pos, self.settings.candidate_selection) {
            Ok(record) => {
                self.record = record;
                self.last_lookup = Some(LastLookup::Resolved);
                self.last_updated = Some(OffsetDateTime::now_utc());
                UpdateOutcome::Resolved
            }
            Err(Error::Rejected { status, body }) => {
                log::error!("{body}");
                self.last_lookup = Some(LastLookup::Rejected(status));
                UpdateOutcome::Rejected
            }
            Err(Error::Geocoding(err @ GeocodingError::Transport(_))) => {
                log::warn!("Could not reach the geocoding service: {err}");
                UpdateOutcome::Failed
            }
            Err(Error::Geocoding(err @ GeocodingError::Payload(_))) => {
                log::warn!("Could not decode the geocoding response: {err}");
                UpdateOutcome::Failed
            }
        }
    }

    fn refresh_state(&mut self) {
        let Some(last_lookup) = &self.last_lookup else {
            return;
        };
        self.state = match last_lookup {
            LastLookup::Rejected(status) => status.clone(),
            LastLookup::Resolved => format_display(
                &self.record,
                &self.settings.options,
                self.settings.display_zone,
                self.zone.as_ref(),
            ),
        };
    }
}

fn resolve_entity<L>(locations: &L, id: &EntityId) -> Option<EntityState>
where
    L: LocationSource + ?Sized,
{
    match locations.resolve(id) {
        Ok(Some(state)) => Some(state),
        Ok(None) => {
            log::error!("Unable to find entity {id}");
            None
        }
        Err(err) => {
            log::error!("Unable to get the state of entity {id}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::*;

    fn settings(origin: &str) -> ResolverSettings {
        ResolverSettings {
            name: "Vworld Geocode".into(),
            origin: origin.parse().unwrap(),
            options: FieldSelection::default(),
            display_zone: DisplayZone::Display,
            candidate_selection: CandidateSelection::LastMatch,
            gravatar: None,
        }
    }

    fn road_response() -> MockGeocoder {
        MockGeocoder::ok(vec![
            candidate(CandidateType::Parcel, "Taepyeongno 1-ga"),
            candidate(CandidateType::Road, "Sejong-daero"),
        ])
    }

    #[test]
    fn awaiting_first_update() {
        let resolver = AddressResolver::new(settings("person.jane"));
        assert_eq!(resolver.state(), AWAITING_UPDATE);
        assert!(resolver.record().is_empty());
        assert!(resolver.picture().is_none());
    }

    #[test]
    fn resolve_once_while_standing_still() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));

        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Resolved);
        for _ in 0..3 {
            assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        }
        assert_eq!(geocoder.requests.borrow().len(), 1);
        assert_eq!(resolver.state(), "Sejong-daero, Seoul");
        assert_eq!(resolver.record().street.as_deref(), Some("Sejong-daero"));
    }

    #[test]
    fn resolve_again_after_moving() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        resolver.update(&locations, &geocoder);

        locations.set("person.jane", "not_home", Some(busan()));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Resolved);
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        let requests = geocoder.requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1], busan());
    }

    #[test]
    fn display_zone_name() {
        let locations = MockLocations::default();
        locations.set("person.jane", "home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        resolver.update(&locations, &geocoder);
        assert_eq!(resolver.state(), "Home");
        assert_eq!(resolver.record().street.as_deref(), Some("Sejong-daero"));
    }

    #[test]
    fn switch_to_address_when_leaving_zone_without_moving() {
        let locations = MockLocations::default();
        locations.set("person.jane", "home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        resolver.update(&locations, &geocoder);

        locations.set("person.jane", "not_home", Some(seoul()));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        assert_eq!(resolver.state(), "Sejong-daero, Seoul");
        assert_eq!(geocoder.requests.borrow().len(), 1);
    }

    #[test]
    fn surface_rejected_status() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        resolver.update(&locations, &geocoder);
        let record = resolver.record().clone();

        locations.set("person.jane", "not_home", Some(busan()));
        geocoder.respond_with_status("ERROR");
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Rejected);
        assert_eq!(resolver.state(), "ERROR");
        assert_eq!(resolver.record(), &record);
    }

    #[test]
    fn keep_state_on_transport_failure() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        resolver.update(&locations, &geocoder);
        let record = resolver.record().clone();

        locations.set("person.jane", "not_home", Some(busan()));
        geocoder.fail_with(GeocodingError::Transport("connection refused".into()));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Failed);
        assert_eq!(resolver.state(), "Sejong-daero, Seoul");
        assert_eq!(resolver.record(), &record);

        // No further request while standing still at the failed position.
        geocoder.respond_with(vec![candidate(CandidateType::Road, "Jungang-daero")]);
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        assert_eq!(geocoder.requests.borrow().len(), 2);

        locations.set("person.jane", "not_home", Some(seoul()));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Resolved);
        assert_eq!(resolver.state(), "Jungang-daero, Seoul");
        assert_eq!(geocoder.requests.borrow().len(), 3);
    }

    #[test]
    fn single_request_while_service_keeps_failing() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = MockGeocoder::default();
        geocoder.fail_with(GeocodingError::Payload("expected value".into()));
        let mut resolver = AddressResolver::new(settings("person.jane"));

        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Failed);
        for _ in 0..4 {
            assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        }
        assert_eq!(geocoder.requests.borrow().len(), 1);
        assert_eq!(resolver.state(), AWAITING_UPDATE);
    }

    #[test]
    fn keep_state_on_malformed_payload() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        let geocoder = MockGeocoder::default();
        geocoder.fail_with(GeocodingError::Payload("expected value".into()));
        let mut resolver = AddressResolver::new(settings("person.jane"));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Failed);
        assert_eq!(resolver.state(), AWAITING_UPDATE);
    }

    #[test]
    fn skip_unknown_entity() {
        let locations = MockLocations::default();
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unavailable);
        assert_eq!(resolver.state(), AWAITING_UPDATE);
        assert!(geocoder.requests.borrow().is_empty());
    }

    #[test]
    fn skip_entity_without_location() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", None);
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("person.jane"));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unavailable);
        assert!(geocoder.requests.borrow().is_empty());
    }

    #[test]
    fn resolve_static_origin() {
        let locations = MockLocations::default();
        let geocoder = road_response();
        let mut resolver = AddressResolver::new(settings("37.5665,126.978"));
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Resolved);
        assert_eq!(resolver.update(&locations, &geocoder), UpdateOutcome::Unchanged);
        assert_eq!(resolver.state(), "Sejong-daero, Seoul");
    }

    #[test]
    fn independent_resolvers() {
        let locations = MockLocations::default();
        locations.set("person.jane", "not_home", Some(seoul()));
        locations.set("person.john", "not_home", Some(seoul()));
        let geocoder = road_response();
        let mut jane = AddressResolver::new(settings("person.jane"));
        let mut john = AddressResolver::new(settings("person.john"));
        assert_eq!(jane.update(&locations, &geocoder), UpdateOutcome::Resolved);
        assert_eq!(john.update(&locations, &geocoder), UpdateOutcome::Resolved);
    }

    #[test]
    fn snapshot_with_gravatar() {
        let mut settings = settings("person.jane");
        settings.gravatar = Some("test@example.com".into());
        let resolver = AddressResolver::new(settings);
        let snapshot = resolver.snapshot();
        assert_eq!(snapshot.attribution, ATTRIBUTION);
        assert_eq!(
            snapshot.picture.as_deref(),
            Some("https://www.gravatar.com/avatar/55502f40dc8b7c769880b10874abc9d0.jpg?s=80&d=wavatar")
        );
        assert!(snapshot.last_updated.is_none());
    }
}
