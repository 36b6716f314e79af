use super::{prelude::*, select_candidate};
use crate::gateways::geocode::ReverseGeocodingGateway;

/// Resolves a coordinate into an address record.
///
/// The record is empty if the service knows no address at this position.
pub fn lookup_address<G>(
    geocoder: &G,
    pos: &Coordinate,
    selection: CandidateSelection,
) -> Result<AddressRecord>
where
    G: ReverseGeocodingGateway + ?Sized,
{
    let response = geocoder.reverse_geocode(pos)?;
    if !response.is_ok() {
        let GeocodeResponse { status, raw, .. } = response;
        return Err(Error::Rejected { status, body: raw });
    }
    let record = select_candidate(&response.candidates, selection)
        .map(AddressRecord::from)
        .unwrap_or_default();
    Ok(record)
}
