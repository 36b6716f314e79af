use super::prelude::*;

/// Picks the candidate that describes the address.
///
/// Road name addresses are preferred over parcel addresses.
pub fn select_candidate(
    candidates: &[AddressCandidate],
    selection: CandidateSelection,
) -> Option<&AddressCandidate> {
    let preferred = if candidates.iter().any(|c| c.kind == CandidateType::Road) {
        CandidateType::Road
    } else {
        CandidateType::Parcel
    };
    let mut matching = candidates.iter().filter(|c| c.kind == preferred);
    match selection {
        CandidateSelection::LastMatch => matching.last(),
        CandidateSelection::FirstMatch => matching.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::candidate;

    #[test]
    fn prefer_road_over_parcel() {
        let candidates = vec![
            candidate(CandidateType::Parcel, "Parcel St"),
            candidate(CandidateType::Road, "Road St"),
            candidate(CandidateType::Parcel, "Other Parcel St"),
        ];
        let selected = select_candidate(&candidates, CandidateSelection::LastMatch).unwrap();
        assert_eq!(selected.structure.street.as_deref(), Some("Road St"));
    }

    #[test]
    fn fall_back_to_parcel() {
        let candidates = vec![candidate(CandidateType::Parcel, "Parcel St")];
        let selected = select_candidate(&candidates, CandidateSelection::LastMatch).unwrap();
        assert_eq!(selected.kind, CandidateType::Parcel);
    }

    #[test]
    fn tie_break_by_selection_mode() {
        let candidates = vec![
            candidate(CandidateType::Road, "First St"),
            candidate(CandidateType::Road, "Last St"),
        ];
        let last = select_candidate(&candidates, CandidateSelection::LastMatch).unwrap();
        assert_eq!(last.structure.street.as_deref(), Some("Last St"));
        let first = select_candidate(&candidates, CandidateSelection::FirstMatch).unwrap();
        assert_eq!(first.structure.street.as_deref(), Some("First St"));
    }

    #[test]
    fn no_candidates() {
        assert!(select_candidate(&[], CandidateSelection::LastMatch).is_none());
    }
}
