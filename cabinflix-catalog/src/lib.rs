//! Movie catalog data model types, title normalization, curated overrides,
//! and the file formats that feed the reconciliation engine.
//!
//! This crate defines the catalog data model without any database or network
//! dependencies. Consumers can use these types directly for serialization,
//! display, or passing to `cabinflix-db` for persistence.

pub mod generation;
pub mod normalize;
pub mod overrides;
pub mod titles;
pub mod types;

pub use generation::{GenerationEntry, GenerationError, load_generation, write_generation};
pub use normalize::{Candidates, normalize, strip_leading_article, strip_release_suffix};
pub use overrides::{AliasPair, OverrideEntry, OverrideError, OverrideTable};
pub use titles::{TitleListError, dedupe_titles, load_titles};
pub use types::*;
