use geoaddr_core::{
    entities::SensorSnapshot,
    gateways::{geocode::ReverseGeocodingGateway, location::LocationSource, publish::SensorSink},
    usecases::{AddressResolver, UpdateOutcome},
};
use std::{
    thread,
    time::{Duration, Instant},
};

/// An address sensor together with its own geocoder and update interval.
pub struct ScheduledSensor<G> {
    resolver: AddressResolver,
    geocoder: G,
    interval: Duration,
    next_update: Instant,
    last_published: Option<SensorSnapshot>,
}

impl<G> ScheduledSensor<G>
where
    G: ReverseGeocodingGateway,
{
    pub fn new(resolver: AddressResolver, geocoder: G, interval: Duration) -> Self {
        Self {
            resolver,
            geocoder,
            interval,
            next_update: Instant::now(),
            last_published: None,
        }
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    /// Updates the sensor and publishes its state if it has changed
    /// since the last successful publication.
    pub fn update_and_publish<L, S>(&mut self, locations: &L, sink: &S) -> UpdateOutcome
    where
        L: LocationSource + ?Sized,
        S: SensorSink + ?Sized,
    {
        let outcome = self.resolver.update(locations, &self.geocoder);
        log::debug!("Updated {}: {outcome:?}", self.resolver.name());
        let snapshot = self.resolver.snapshot();
        if self.last_published.as_ref() == Some(&snapshot) {
            return outcome;
        }
        match sink.publish(&snapshot) {
            Ok(()) => {
                self.last_published = Some(snapshot);
            }
            Err(err) => {
                log::warn!("State of {} could not be published: {err}", snapshot.name);
            }
        }
        outcome
    }
}

/// Updates all sensors that are due at `now` and
/// returns the point in time of the next pending update.
pub fn update_due_sensors<G, L, S>(
    sensors: &mut [ScheduledSensor<G>],
    now: Instant,
    locations: &L,
    sink: &S,
) -> Option<Instant>
where
    G: ReverseGeocodingGateway,
    L: LocationSource + ?Sized,
    S: SensorSink + ?Sized,
{
    for sensor in sensors.iter_mut().filter(|s| s.next_update <= now) {
        sensor.update_and_publish(locations, sink);
        sensor.next_update = now + sensor.interval;
    }
    sensors.iter().map(|s| s.next_update).min()
}

pub fn run<G, L, S>(mut sensors: Vec<ScheduledSensor<G>>, locations: &L, sink: &S)
where
    G: ReverseGeocodingGateway,
    L: LocationSource + ?Sized,
    S: SensorSink + ?Sized,
{
    log::info!("Start updating {} sensor(s)", sensors.len());
    while let Some(next_update) =
        update_due_sensors(&mut sensors, Instant::now(), locations, sink)
    {
        let now = Instant::now();
        if next_update > now {
            thread::sleep(next_update - now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoaddr_core::{
        entities::*,
        gateways::{
            geocode::GeocodingError,
            location::{EntityState, LocationError},
            publish::PublishError,
        },
        usecases::ResolverSettings,
    };
    use std::cell::{Cell, RefCell};

    struct StubGeocoder {
        street: &'static str,
        requests: Cell<usize>,
    }

    impl StubGeocoder {
        fn new(street: &'static str) -> Self {
            Self {
                street,
                requests: Cell::new(0),
            }
        }
    }

    impl ReverseGeocodingGateway for StubGeocoder {
        fn reverse_geocode(&self, _: &Coordinate) -> Result<GeocodeResponse, GeocodingError> {
            self.requests.set(self.requests.get() + 1);
            Ok(GeocodeResponse {
                status: GeocodeResponse::STATUS_OK.to_owned(),
                candidates: vec![AddressCandidate {
                    kind: CandidateType::Road,
                    zipcode: None,
                    text: None,
                    structure: AddressStructure {
                        street: Some(self.street.to_owned()),
                        region: Some("Jung-gu".to_owned()),
                        ..Default::default()
                    },
                }],
                raw: String::new(),
            })
        }
    }

    struct NoLocations;

    impl LocationSource for NoLocations {
        fn resolve(&self, _: &EntityId) -> Result<Option<EntityState>, LocationError> {
            Ok(None)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        published: RefCell<Vec<SensorSnapshot>>,
        fail: Cell<bool>,
    }

    impl SensorSink for RecordingSink {
        fn publish(&self, snapshot: &SensorSnapshot) -> Result<(), PublishError> {
            if self.fail.get() {
                return Err(PublishError("offline".into()));
            }
            self.published.borrow_mut().push(snapshot.clone());
            Ok(())
        }
    }

    fn sensor(
        name: &str,
        street: &'static str,
        interval: Duration,
    ) -> ScheduledSensor<StubGeocoder> {
        let resolver = AddressResolver::new(ResolverSettings {
            name: name.into(),
            origin: "37.5665,126.978".parse().unwrap(),
            options: FieldSelection::default(),
            display_zone: DisplayZone::default(),
            candidate_selection: CandidateSelection::default(),
            gravatar: None,
        });
        ScheduledSensor::new(resolver, StubGeocoder::new(street), interval)
    }

    #[test]
    fn publish_only_changed_states() {
        let mut sensor = sensor("Office", "Sejong-daero", Duration::from_secs(60));
        let sink = RecordingSink::default();

        assert_eq!(
            sensor.update_and_publish(&NoLocations, &sink),
            UpdateOutcome::Resolved
        );
        assert_eq!(
            sensor.update_and_publish(&NoLocations, &sink),
            UpdateOutcome::Unchanged
        );

        let published = sink.published.borrow();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].state, "Sejong-daero, Jung-gu");
        assert_eq!(sensor.geocoder.requests.get(), 1);
    }

    #[test]
    fn retry_failed_publication() {
        let mut sensor = sensor("Office", "Sejong-daero", Duration::from_secs(60));
        let sink = RecordingSink::default();
        sink.fail.set(true);
        sensor.update_and_publish(&NoLocations, &sink);
        assert!(sink.published.borrow().is_empty());

        sink.fail.set(false);
        sensor.update_and_publish(&NoLocations, &sink);
        assert_eq!(sink.published.borrow().len(), 1);
    }

    #[test]
    fn update_sensors_when_due() {
        let mut sensors = vec![
            sensor("Office", "Sejong-daero", Duration::from_secs(60)),
            sensor("Home", "Jong-ro", Duration::from_secs(300)),
        ];
        let sink = RecordingSink::default();
        let start = Instant::now();

        let next = update_due_sensors(&mut sensors, start, &NoLocations, &sink);
        assert_eq!(next, Some(start + Duration::from_secs(60)));
        assert_eq!(sink.published.borrow().len(), 2);

        let next = update_due_sensors(
            &mut sensors,
            start + Duration::from_secs(60),
            &NoLocations,
            &sink,
        );
        assert_eq!(next, Some(start + Duration::from_secs(120)));
        assert_eq!(sensors[0].geocoder.requests.get(), 1);
        assert_eq!(sensors[1].geocoder.requests.get(), 1);
        assert_eq!(sensors[1].next_update, start + Duration::from_secs(300));
    }

    #[test]
    fn nothing_to_schedule() {
        let mut sensors: Vec<ScheduledSensor<StubGeocoder>> = vec![];
        let sink = RecordingSink::default();
        let next = update_due_sensors(&mut sensors, Instant::now(), &NoLocations, &sink);
        assert!(next.is_none());
    }
}
