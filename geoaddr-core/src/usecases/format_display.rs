use super::prelude::*;
use itertools::Itertools;

/// Builds the display string of a sensor.
///
/// While the entity is inside a zone and zones are displayed,
/// the zone name replaces the address.
pub fn format_display(
    record: &AddressRecord,
    selection: &FieldSelection,
    display_zone: DisplayZone,
    zone: Option<&ZoneState>,
) -> String {
    match zone {
        Some(zone) if display_zone == DisplayZone::Display && !zone.is_not_present() => {
            zone.capitalized()
        }
        _ => format_address(record, selection),
    }
}

/// Joins the selected, non-empty fields in display order.
pub fn format_address(record: &AddressRecord, selection: &FieldSelection) -> String {
    let address = selection
        .iter()
        .filter_map(|field| record.field(field))
        .filter(|value| !value.is_empty())
        .join(", ");
    if address.is_empty() {
        return record.street.clone().unwrap_or_else(|| AWAY.to_owned());
    }
    address
}
