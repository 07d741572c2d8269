//! Typed predicate construction
//!
//! A [`Predicate`] is a list of conjuncts, each a SQL fragment with its
//! bound parameters, composed into one WHERE clause at the end. User input
//! only ever travels through parameters; the fragments themselves are
//! fixed strings.

use crate::filter::facets::{Facet, FacetSelection};
use rusqlite::types::Value;

/// Operator-name markers of the regional transport authorities.
///
/// An operator matching any of these is a government service; one matching
/// none of them is private.
pub const GOVERNMENT_OPERATORS: [&str; 10] = [
    "APSRTC", "KSRTC", "TGSRTC", "KTCL", "RSRTC", "SBSTC", "HRTC", "ASTC", "UPSRTC", "WBTC",
];

/// Day-travel departure window, inclusive on both ends.
const DAY_WINDOW: (&str, &str) = ("06:00:01", "18:00:00");

/// Night-travel departure window. The window wraps midnight, so it is two
/// disjoint ranges OR'd together, not a single ordered range.
const NIGHT_WINDOW: (&str, &str) = ("18:00:01", "06:00:00");

/// One bounded dashboard query: the navigable state plus the selections.
#[derive(Debug, Clone)]
pub struct RouteQuery {
    pub region: String,
    pub route_name: String,
    pub selection: FacetSelection,
}

/// One SQL conjunct with its bound parameters.
#[derive(Debug, Clone)]
struct Conjunct {
    sql: String,
    params: Vec<Value>,
}

impl Conjunct {
    fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// A fully bounded filter predicate over the bus_routes dataset.
///
/// Always anchored on the base region/route/price conjunct; one additional
/// conjunct per active facet, except for the mutually-exclusive pairs
/// which cancel to "no constraint" when both sides are selected.
#[derive(Debug, Clone)]
pub struct Predicate {
    conjuncts: Vec<Conjunct>,
}

impl Predicate {
    /// Builds the predicate for one dashboard query.
    pub fn build(query: &RouteQuery) -> Self {
        let selection = &query.selection;
        let mut conjuncts = vec![
            Conjunct::new("region = ?", vec![Value::from(query.region.clone())]),
            Conjunct::new(
                "route_name = ?",
                vec![Value::from(query.route_name.clone())],
            ),
            Conjunct::new(
                "price <= ?",
                vec![Value::from(selection.price_ceiling())],
            ),
        ];

        // Both sides of a mutually exclusive pair collapse to no constraint
        let class_cancelled = selection.contains(Facet::Ac) && selection.contains(Facet::NonAc);
        let operator_cancelled =
            selection.contains(Facet::Government) && selection.contains(Facet::Private);

        for facet in selection.facets() {
            match facet {
                Facet::Ac | Facet::NonAc if class_cancelled => continue,
                Facet::Government | Facet::Private if operator_cancelled => continue,
                _ => {}
            }
            conjuncts.push(facet_conjunct(facet));
        }

        Self { conjuncts }
    }

    /// The composed WHERE clause, without the `WHERE` keyword.
    pub fn where_clause(&self) -> String {
        self.conjuncts
            .iter()
            .map(|c| c.sql.as_str())
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Bound parameter values, in clause order.
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.conjuncts.iter().flat_map(|c| c.params.iter())
    }
}

fn like_pattern(text: &str) -> Value {
    Value::from(format!("%{}%", text))
}

/// Builds the conjunct for one facet.
fn facet_conjunct(facet: Facet) -> Conjunct {
    match facet {
        Facet::Ac => Conjunct::new(
            "((lower(vehicle_class) LIKE ? OR lower(vehicle_class) LIKE ? \
             OR lower(vehicle_class) LIKE ?) AND lower(vehicle_class) NOT LIKE ?)",
            vec![
                like_pattern("ac"),
                like_pattern("a/c"),
                like_pattern("a.c"),
                like_pattern("non"),
            ],
        ),
        Facet::NonAc => Conjunct::new(
            "lower(vehicle_class) LIKE ?",
            vec![like_pattern("non")],
        ),
        Facet::Sleeper => Conjunct::new(
            "upper(vehicle_class) LIKE ?",
            vec![like_pattern("SLEEP")],
        ),
        Facet::Seater => Conjunct::new(
            "upper(vehicle_class) LIKE ?",
            vec![like_pattern("SEAT")],
        ),
        Facet::Luxury => Conjunct::new(
            "upper(vehicle_class) LIKE ?",
            vec![like_pattern("LUXURY")],
        ),
        Facet::Electric => Conjunct::new(
            "upper(vehicle_class) LIKE ?",
            vec![like_pattern("ELECTRIC")],
        ),
        Facet::Government => {
            let sql = format!(
                "({})",
                GOVERNMENT_OPERATORS
                    .iter()
                    .map(|_| "upper(operator_name) LIKE ?")
                    .collect::<Vec<_>>()
                    .join(" OR ")
            );
            Conjunct::new(sql, GOVERNMENT_OPERATORS.iter().map(|m| like_pattern(m)).collect())
        }
        Facet::Private => {
            let sql = format!(
                "({})",
                GOVERNMENT_OPERATORS
                    .iter()
                    .map(|_| "upper(operator_name) NOT LIKE ?")
                    .collect::<Vec<_>>()
                    .join(" AND ")
            );
            Conjunct::new(sql, GOVERNMENT_OPERATORS.iter().map(|m| like_pattern(m)).collect())
        }
        Facet::HighlyRated => Conjunct::new("star_rating >= ?", vec![Value::from(4.0)]),
        Facet::DayTravel => Conjunct::new(
            "departure_time BETWEEN ? AND ?",
            vec![Value::from(DAY_WINDOW.0.to_string()), Value::from(DAY_WINDOW.1.to_string())],
        ),
        Facet::NightTravel => Conjunct::new(
            "(departure_time >= ? OR departure_time <= ?)",
            vec![
                Value::from(NIGHT_WINDOW.0.to_string()),
                Value::from(NIGHT_WINDOW.1.to_string()),
            ],
        ),
    }
}
