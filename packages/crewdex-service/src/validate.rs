use crewdex_domain::{ProfileId, SearchFilterSet, TermId};

use crate::{ServiceError, ServiceResult, TermStore};

const POSITION_TAXONOMY: &str = "position";
const SKILL_TAXONOMY: &str = "skill";

/// Rejects unknown or malformed term ids before any record query is issued.
/// Term ids that vanish from the store after this point are silent
/// non-matches, not request errors.
pub(crate) fn validate_filter(
	terms: &dyn TermStore,
	filter: &SearchFilterSet,
) -> ServiceResult<()> {
	let mut fields = Vec::new();

	check_against_taxonomy(terms, POSITION_TAXONOMY, "positions", &filter.positions, &mut fields)?;
	check_against_taxonomy(terms, SKILL_TAXONOMY, "skills", &filter.skills, &mut fields)?;

	for (taxonomy, field, selected) in [
		("union", "unions", &filter.unions),
		("location", "locations", &filter.locations),
		("experience_level", "experienceLevels", &filter.experience_levels),
		("gender_identity", "genderIdentities", &filter.gender_identities),
		("racial_identity", "racialIdentities", &filter.racial_identities),
		("personal_identity", "personalIdentities", &filter.personal_identities),
	] {
		check_against_taxonomy(terms, taxonomy, field, selected, &mut fields)?;
	}

	if fields.is_empty() { Ok(()) } else { Err(ServiceError::InvalidFilter { fields }) }
}

pub(crate) fn validate_candidate_ids(candidate_ids: &[ProfileId]) -> ServiceResult<()> {
	let fields: Vec<String> = candidate_ids
		.iter()
		.enumerate()
		.filter(|(_, id)| id.is_blank())
		.map(|(index, _)| format!("$.candidateIds[{index}]"))
		.collect();

	if fields.is_empty() { Ok(()) } else { Err(ServiceError::InvalidFilter { fields }) }
}

fn check_against_taxonomy(
	terms: &dyn TermStore,
	taxonomy: &str,
	field: &str,
	selected: &[TermId],
	fields: &mut Vec<String>,
) -> ServiceResult<()> {
	if selected.is_empty() {
		return Ok(());
	}

	let known = terms.terms_by_taxonomy(taxonomy)?.unwrap_or_default();

	for (index, term) in selected.iter().enumerate() {
		if term.is_blank() || !known.contains(term) {
			fields.push(format!("$.{field}[{index}]"));
		}
	}

	Ok(())
}
