use serde::Serialize;

use crewdex_domain::TermId;

use crate::{SearchService, ServiceResult};

/// Term inventory for one taxonomy, for admin-reporting callers. The search
/// pipeline itself never consumes this.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyReport {
	pub taxonomy: String,
	pub term_count: usize,
	pub term_ids: Vec<TermId>,
}

impl SearchService {
	/// `None` when the taxonomy name is unknown to the term store.
	pub fn taxonomy_report(&self, taxonomy: &str) -> ServiceResult<Option<TaxonomyReport>> {
		let Some(terms) = self.stores().terms.terms_by_taxonomy(taxonomy)? else {
			return Ok(None);
		};

		Ok(Some(TaxonomyReport {
			taxonomy: taxonomy.to_string(),
			term_count: terms.len(),
			term_ids: terms.into_iter().collect(),
		}))
	}
}
