use serde::{Deserialize, Serialize};

use crate::ids::ProfileId;

/// The only role the search surfaces. Other roles (producers, vendors,
/// administrators) exist in the directory but are never candidates.
pub const SEARCHABLE_ROLE: &str = "crew-member";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Profile {
	pub id: ProfileId,
	pub role: String,
	pub visible: bool,
	#[serde(default)]
	pub first_name: String,
	#[serde(default)]
	pub last_name: String,
}
impl Profile {
	/// A profile with neither name filled in is unfinished and stays out of
	/// search results.
	pub fn is_complete(&self) -> bool {
		!(self.first_name.trim().is_empty() && self.last_name.trim().is_empty())
	}

	pub fn is_searchable(&self) -> bool {
		self.visible && self.role == SEARCHABLE_ROLE && self.is_complete()
	}
}
