use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, str::FromStr};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use thiserror::Error;

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "Street Number")]
    pub street_number     : Option<String>,
    #[serde(rename = "Street")]
    pub street            : Option<String>,
    #[serde(rename = "City")]
    pub city              : Option<String>,
    #[serde(rename = "Postal Town")]
    pub postal_town       : Option<String>,
    #[serde(rename = "Postal Code")]
    pub postal_code       : Option<String>,
    #[serde(rename = "State")]
    pub region            : Option<String>,
    #[serde(rename = "Country")]
    pub country           : Option<String>,
    #[serde(rename = "County")]
    pub county            : Option<String>,
    #[serde(rename = "Formatted Address")]
    pub formatted_address : Option<String>,
}

impl AddressRecord {
    pub fn is_empty(&self) -> bool {
        self.street_number.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.postal_town.is_none()
            && self.postal_code.is_none()
            && self.region.is_none()
            && self.country.is_none()
            && self.county.is_none()
            && self.formatted_address.is_none()
    }

    pub fn field(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::StreetNumber => self.street_number.as_deref(),
            AddressField::Street => self.street.as_deref(),
            AddressField::City => self.city.as_deref(),
            AddressField::County => self.county.as_deref(),
            AddressField::State => self.region.as_deref(),
            AddressField::PostalCode => self.postal_code.as_deref(),
            AddressField::Country => self.country.as_deref(),
            AddressField::FormattedAddress => self.formatted_address.as_deref(),
        }
    }
}

/// Address fields that can be part of the display string.
///
/// The declaration order is the order in which the fields are displayed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AddressField {
    StreetNumber,
    Street,
    City,
    County,
    State,
    PostalCode,
    Country,
    FormattedAddress,
}

/// The set of fields a user wants to see, e.g. `"street, state"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection(BTreeSet<AddressField>);

impl FieldSelection {
    pub const DEFAULT: &'static str = "street, state";

    pub fn contains(&self, field: AddressField) -> bool {
        self.0.contains(&field)
    }

    /// The selected fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = AddressField> + '_ {
        AddressField::iter().filter(|field| self.contains(*field))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self([AddressField::Street, AddressField::State].into())
    }
}

impl FromIterator<AddressField> for FieldSelection {
    fn from_iter<I: IntoIterator<Item = AddressField>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown address field: {0}")]
pub struct FieldSelectionParseError(pub String);

impl FromStr for FieldSelection {
    type Err = FieldSelectionParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(|name| {
                name.parse::<AddressField>()
                    .map_err(|_| FieldSelectionParseError(name.to_owned()))
            })
            .collect()
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.iter().join(", "))
    }
}
