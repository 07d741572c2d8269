//! Dashboard filter layer
//!
//! Maps a set of facet toggles plus a price ceiling into one bounded,
//! parameterized SQL predicate over the bus_routes dataset. Every query is
//! anchored on the base region/route/price conjunct; facet conjuncts are
//! strictly additive restrictions. The mutual-exclusion tie-breaks
//! (AC + Non-AC, Government + Private) collapse to "no constraint", never
//! to an empty result.

mod facets;
mod predicate;

pub use facets::{Facet, FacetSelection, UnknownFacet};
pub use predicate::{Predicate, RouteQuery, GOVERNMENT_OPERATORS};
