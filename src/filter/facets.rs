//! Facet vocabulary and user selections

use std::collections::BTreeSet;
use thiserror::Error;

/// One dashboard filter toggle.
///
/// The vehicle-class facets pattern-match the free-text class descriptor;
/// the operator facets split on the fixed authority list; the rest
/// constrain rating and departure window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Ac,
    NonAc,
    Sleeper,
    Seater,
    Luxury,
    Electric,
    Government,
    Private,
    HighlyRated,
    DayTravel,
    NightTravel,
}

impl Facet {
    /// Every facet, in the order conjuncts are emitted.
    pub const ALL: [Facet; 11] = [
        Facet::Ac,
        Facet::NonAc,
        Facet::Sleeper,
        Facet::Seater,
        Facet::Luxury,
        Facet::Electric,
        Facet::Government,
        Facet::Private,
        Facet::HighlyRated,
        Facet::DayTravel,
        Facet::NightTravel,
    ];

    /// Dashboard label for this facet.
    pub fn label(&self) -> &'static str {
        match self {
            Facet::Ac => "AC",
            Facet::NonAc => "Non-AC",
            Facet::Sleeper => "Sleeper",
            Facet::Seater => "Seater",
            Facet::Luxury => "Luxury",
            Facet::Electric => "Electric",
            Facet::Government => "Government",
            Facet::Private => "Private",
            Facet::HighlyRated => "Highly-Rated",
            Facet::DayTravel => "Day-Travel",
            Facet::NightTravel => "Night-Travel",
        }
    }

    /// Parses a dashboard label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Facet> {
        let normalized = label.trim().to_ascii_lowercase();
        Facet::ALL
            .iter()
            .find(|f| f.label().to_ascii_lowercase() == normalized)
            .copied()
    }
}

/// A facet label that is not part of the vocabulary
#[derive(Debug, Error)]
#[error("unknown facet label {0:?}")]
pub struct UnknownFacet(pub String);

/// The user's current filter selections: toggled facets plus a price ceiling.
///
/// Ephemeral query-side state; never persisted.
#[derive(Debug, Clone)]
pub struct FacetSelection {
    facets: BTreeSet<Facet>,
    price_ceiling: f64,
}

impl FacetSelection {
    /// An empty selection with the given price ceiling.
    pub fn new(price_ceiling: f64) -> Self {
        Self {
            facets: BTreeSet::new(),
            price_ceiling,
        }
    }

    /// Builds a selection from dashboard labels.
    pub fn from_labels<S: AsRef<str>>(
        labels: &[S],
        price_ceiling: f64,
    ) -> Result<Self, UnknownFacet> {
        let mut selection = Self::new(price_ceiling);
        for label in labels {
            let facet = Facet::from_label(label.as_ref())
                .ok_or_else(|| UnknownFacet(label.as_ref().to_string()))?;
            selection.facets.insert(facet);
        }
        Ok(selection)
    }

    /// Adds a facet to the selection.
    pub fn with(mut self, facet: Facet) -> Self {
        self.facets.insert(facet);
        self
    }

    pub fn contains(&self, facet: Facet) -> bool {
        self.facets.contains(&facet)
    }

    /// Selected facets in emission order.
    pub fn facets(&self) -> impl Iterator<Item = Facet> + '_ {
        self.facets.iter().copied()
    }

    pub fn price_ceiling(&self) -> f64 {
        self.price_ceiling
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}
