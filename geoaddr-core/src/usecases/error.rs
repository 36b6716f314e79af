use crate::gateways::geocode::GeocodingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
    #[error("The geocoding service rejected the request: {status}")]
    Rejected { status: String, body: String },
}
