pub mod credit;
pub mod filter;
pub mod position;
pub mod profile;
pub mod scoring;

mod ids;

pub use credit::Credit;
pub use filter::{ProfileTaxonomy, SearchFilterSet};
pub use ids::{CreditId, ProfileId, TermId};
pub use position::{PartitionedPositions, PositionLevel, expand_positions, partition_by_level};
pub use profile::{Profile, SEARCHABLE_ROLE};
