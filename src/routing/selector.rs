// src/routing/selector.rs
//! Reduces scored candidates to a single winner.

use super::scorer::{Objective, RouteQuote};

/// Picks the best quote under the requested objective.
///
/// Strict comparisons keep the first-encountered quote on ties, so the
/// enumeration order (same-chain, direct, hub) doubles as the tie-break.
/// An empty input yields `None`, which callers surface as "no viable route".
pub fn select_best(quotes: Vec<RouteQuote>, objective: Objective) -> Option<RouteQuote> {
    quotes.into_iter().reduce(|best, candidate| match objective {
        Objective::MaxNetValue => {
            if candidate.net_value_usd > best.net_value_usd {
                candidate
            } else {
                best
            }
        }
        Objective::FastestTime => {
            if candidate.estimated_time_secs < best.estimated_time_secs {
                candidate
            } else {
                best
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChainRegistry;
    use crate::routing::enumerator::enumerate_paths;
    use crate::routing::scorer::score_path;
    use pretty_assertions::assert_eq;

    fn scored(objective: Objective) -> Vec<RouteQuote> {
        let registry = ChainRegistry::default_testnets();
        let weth = registry.resolve_token_address(421614, "WETH").unwrap();
        let wmatic = registry.resolve_token_address(80002, "WMATIC").unwrap();
        enumerate_paths(&registry, 421614, 80002, weth, wmatic)
            .iter()
            .map(|p| score_path(&registry, p, 1_000.0, objective))
            .collect()
    }

    #[test]
    fn empty_input_yields_none() {
        assert_eq!(select_best(Vec::new(), Objective::MaxNetValue), None);
        assert_eq!(select_best(Vec::new(), Objective::FastestTime), None);
    }

    #[test]
    fn max_net_value_picks_strictly_greatest() {
        let quotes = scored(Objective::MaxNetValue);
        let best_net = quotes
            .iter()
            .map(|q| q.net_value_usd)
            .fold(f64::MIN, f64::max);
        let winner = select_best(quotes, Objective::MaxNetValue).unwrap();
        assert_eq!(winner.net_value_usd, best_net);
    }

    #[test]
    fn fastest_time_picks_strictly_least() {
        let quotes = scored(Objective::FastestTime);
        let best_time = quotes
            .iter()
            .map(|q| q.estimated_time_secs)
            .min()
            .unwrap();
        let winner = select_best(quotes, Objective::FastestTime).unwrap();
        assert_eq!(winner.estimated_time_secs, best_time);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let quotes = scored(Objective::MaxNetValue);
        let mut tied = quotes.clone();
        for quote in &mut tied {
            quote.net_value_usd = 1.0;
        }
        let winner = select_best(tied.clone(), Objective::MaxNetValue).unwrap();
        assert_eq!(winner.path, tied[0].path);
    }
}
