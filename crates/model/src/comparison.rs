//! Shopping-cost comparison across discovered stores: per-place goods
//! totals from a user-edited price table, a per-kilometer travel surcharge,
//! and the cheapest place under a stable first-wins tie-break.

use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::Id;

use crate::{place::Place, ExampleData};

/// A store under comparison, keyed by its place id, with the travel
/// distance the caller has determined for it (straight-line or routed).
/// Without a distance no surcharge is applied.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreCandidate {
    pub id: Id<Place>,
    pub travel_distance_km: Option<f64>,
}

/// One row of the price table: a product and one price slot per store,
/// in store-list order. An empty slot counts as 0 in the totals.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub product_name: String,
    pub prices_by_place: Vec<Option<f64>>,
}

/// The computed totals for one store. Derived on demand, never stored;
/// recompute whenever prices, stores or the cost-per-km rate change.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub place_id: Id<Place>,
    pub goods_total: f64,
    pub travel_surcharge: f64,
    pub grand_total: f64,
}

/// Totals for every store plus the index of the cheapest one.
/// `cheapest` is `None` exactly when `summaries` is empty.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    pub summaries: Vec<CostSummary>,
    pub cheapest: Option<usize>,
}

impl Ranking {
    pub fn cheapest_summary(&self) -> Option<&CostSummary> {
        self.cheapest.and_then(|index| self.summaries.get(index))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// A price row has a different number of slots than there are stores.
    MismatchedPriceRow {
        product_name: String,
        expected: usize,
        found: usize,
    },
    /// The cost-per-km rate was negative or not a finite number.
    InvalidCostPerKm(f64),
}

impl error::Error for ComparisonError {}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ComparisonError::MismatchedPriceRow {
                product_name,
                expected,
                found,
            } => write!(
                f,
                "Price row '{product_name}' has {found} slots but there are {expected} stores."
            ),
            ComparisonError::InvalidCostPerKm(rate) => {
                write!(f, "Cost per kilometer must be zero or positive, got {rate}.")
            }
        }
    }
}

/// Total up every store and find the cheapest one.
///
/// Per store: the goods total over all price rows (blank slot ⇒ 0), plus
/// `travel_distance_km * cost_per_km` when a distance is known. The
/// cheapest index is the *first* index attaining the minimum grand total,
/// so equal totals resolve deterministically in input order. Inputs are
/// never mutated; identical inputs give identical output.
pub fn rank_places(
    places: &[StoreCandidate],
    prices: &[PriceEntry],
    cost_per_km: f64,
) -> Result<Ranking, ComparisonError> {
    if !cost_per_km.is_finite() || cost_per_km < 0.0 {
        return Err(ComparisonError::InvalidCostPerKm(cost_per_km));
    }
    for entry in prices {
        if entry.prices_by_place.len() != places.len() {
            return Err(ComparisonError::MismatchedPriceRow {
                product_name: entry.product_name.clone(),
                expected: places.len(),
                found: entry.prices_by_place.len(),
            });
        }
    }

    let summaries = places
        .iter()
        .enumerate()
        .map(|(index, place)| {
            let goods_total: f64 = prices
                .iter()
                .map(|entry| entry.prices_by_place[index].unwrap_or(0.0))
                .sum();
            let travel_surcharge = place
                .travel_distance_km
                .map(|distance| distance * cost_per_km)
                .unwrap_or(0.0);
            CostSummary {
                place_id: place.id.clone(),
                goods_total,
                travel_surcharge,
                grand_total: goods_total + travel_surcharge,
            }
        })
        .collect::<Vec<_>>();

    let mut cheapest: Option<usize> = None;
    for (index, summary) in summaries.iter().enumerate() {
        let better = match cheapest {
            None => true,
            Some(best) => summary.grand_total < summaries[best].grand_total,
        };
        if better {
            cheapest = Some(index);
        }
    }

    Ok(Ranking { summaries, cheapest })
}

impl ExampleData for Ranking {
    fn example_data() -> Self {
        Ranking {
            summaries: vec![CostSummary {
                place_id: Id::new("example-store".to_owned()),
                goods_total: 1114.0,
                travel_surcharge: 8.41,
                grand_total: 1122.41,
            }],
            cheapest: Some(0),
        }
    }
}
