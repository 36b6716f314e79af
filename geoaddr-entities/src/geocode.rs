use crate::address::AddressRecord;
use strum::{Display, EnumString};

/// The kind of address a reverse geocoding candidate describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum CandidateType {
    /// Road name address
    Road,
    /// Land lot (parcel) address
    Parcel,
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddressStructure {
    pub country       : Option<String>,
    pub county        : Option<String>,
    pub region        : Option<String>,
    pub city          : Option<String>,
    pub street        : Option<String>,
    pub postal_town   : Option<String>,
    pub street_number : Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressCandidate {
    pub kind: CandidateType,
    pub zipcode: Option<String>,
    pub text: Option<String>,
    pub structure: AddressStructure,
}

impl From<&AddressCandidate> for AddressRecord {
    fn from(from: &AddressCandidate) -> Self {
        let AddressCandidate {
            zipcode,
            text,
            structure,
            ..
        } = from;
        let AddressStructure {
            country,
            county,
            region,
            city,
            street,
            postal_town,
            street_number,
        } = structure.clone();
        Self {
            street_number,
            street,
            city,
            postal_town,
            postal_code: zipcode.clone(),
            region,
            country,
            county,
            formatted_address: text.clone(),
        }
    }
}

/// A decoded reply of a reverse geocoding service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeResponse {
    pub status: String,
    pub candidates: Vec<AddressCandidate>,
    /// The undecoded response body, kept for diagnostics.
    pub raw: String,
}

impl GeocodeResponse {
    pub const STATUS_OK: &'static str = "OK";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}
