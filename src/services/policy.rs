use crate::models::{DocumentFormPolicy, DocumentType};

/// Per-jurisdiction document rules. Colombia mandates the transit license,
/// so the type defaults to it and stays locked; everywhere else starts from
/// the insurance policy and may pick freely.
struct CountryPolicy {
    country: &'static str,
    default_type: DocumentType,
    type_locked: bool,
}

const COUNTRY_POLICIES: &[CountryPolicy] = &[CountryPolicy {
    country: "co",
    default_type: DocumentType::TransitLicense,
    type_locked: true,
}];

const DEFAULT_POLICY: CountryPolicy = CountryPolicy {
    country: "",
    default_type: DocumentType::Soat,
    type_locked: false,
};

/// Only the transit license requires an attached file; every other type
/// accepts a metadata-only submission.
pub const FILE_REQUIRED_TYPES: &[DocumentType] = &[DocumentType::TransitLicense];

pub fn requires_file(doc_type: DocumentType) -> bool {
    FILE_REQUIRED_TYPES.contains(&doc_type)
}

pub fn form_policy(country: &str) -> DocumentFormPolicy {
    let normalized = country.trim().to_lowercase();
    let policy = COUNTRY_POLICIES
        .iter()
        .find(|entry| entry.country == normalized)
        .unwrap_or(&DEFAULT_POLICY);
    DocumentFormPolicy {
        default_type: policy.default_type,
        type_locked: policy.type_locked,
        file_required_types: FILE_REQUIRED_TYPES.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colombia_locks_the_transit_license() {
        let policy = form_policy("co");
        assert_eq!(policy.default_type, DocumentType::TransitLicense);
        assert!(policy.type_locked);

        let shouty = form_policy(" CO ");
        assert!(shouty.type_locked);
    }

    #[test]
    fn other_countries_default_to_insurance() {
        for country in ["mx", "ar", "us", ""] {
            let policy = form_policy(country);
            assert_eq!(policy.default_type, DocumentType::Soat);
            assert!(!policy.type_locked);
        }
    }

    #[test]
    fn only_the_transit_license_requires_a_file() {
        assert!(requires_file(DocumentType::TransitLicense));
        assert!(!requires_file(DocumentType::Soat));
        assert!(!requires_file(DocumentType::Insurance));
        assert!(!requires_file(DocumentType::Registration));
        assert!(!requires_file(DocumentType::Technomechanical));
    }
}
