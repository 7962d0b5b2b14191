// =============================================================================
// Order Book Snapshot — depth imbalance
// =============================================================================
//
// A point-in-time view of the top of the book. The only derived quantity the
// engine consumes is the bid/ask imbalance ratio:
//
//   imbalance = (sum_bid_qty - sum_ask_qty) / (sum_bid_qty + sum_ask_qty + 1e-9)
//
// which lands in (-1, 1): positive means bid-heavy, negative ask-heavy.
// =============================================================================

use serde::Serialize;

/// Top-of-book levels as (price, quantity) pairs, best price first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderBookSnapshot {
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

impl OrderBookSnapshot {
    /// Quantity imbalance over the top `depth` levels of each side.
    ///
    /// The 1e-9 term keeps the division defined for an empty or one-sided
    /// book, so an empty snapshot reads as a neutral 0.0.
    pub fn imbalance(&self, depth: usize) -> f64 {
        let bid_qty: f64 = self.bids.iter().take(depth).map(|(_, q)| q).sum();
        let ask_qty: f64 = self.asks.iter().take(depth).map(|(_, q)| q).sum();
        (bid_qty - ask_qty) / (bid_qty + ask_qty + 1e-9)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn book(bids: &[f64], asks: &[f64]) -> OrderBookSnapshot {
        OrderBookSnapshot {
            bids: bids.iter().map(|&q| (100.0, q)).collect(),
            asks: asks.iter().map(|&q| (101.0, q)).collect(),
        }
    }

    #[test]
    fn imbalance_bid_heavy_is_positive() {
        let ob = book(&[10.0, 10.0, 10.0], &[5.0, 5.0]);
        let imb = ob.imbalance(20);
        // (30 - 10) / (40 + eps) ~= 0.5
        assert!((imb - 0.5).abs() < 1e-6, "expected ~0.5, got {imb}");
    }

    #[test]
    fn imbalance_ask_heavy_is_negative() {
        let ob = book(&[5.0], &[20.0]);
        assert!(ob.imbalance(20) < -0.5);
    }

    #[test]
    fn imbalance_balanced_book_is_zero() {
        let ob = book(&[7.0, 3.0], &[4.0, 6.0]);
        let imb = ob.imbalance(20);
        assert!(imb.abs() < 1e-6, "expected ~0.0, got {imb}");
    }

    #[test]
    fn imbalance_empty_book_is_zero() {
        let ob = OrderBookSnapshot::default();
        assert_eq!(ob.imbalance(20), 0.0);
    }

    #[test]
    fn imbalance_truncates_to_depth() {
        // Only the first level per side counts at depth 1; the huge deeper
        // ask level must not drag the ratio negative.
        let ob = book(&[10.0], &[2.0, 1_000.0]);
        let imb = ob.imbalance(1);
        assert!(imb > 0.6, "expected bid-heavy at depth 1, got {imb}");
    }

    #[test]
    fn imbalance_stays_inside_unit_interval() {
        let one_sided = book(&[50.0, 50.0], &[]);
        let imb = one_sided.imbalance(20);
        assert!(imb > 0.99 && imb < 1.0, "got {imb}");

        let other_side = book(&[], &[50.0]);
        let imb = other_side.imbalance(20);
        assert!(imb < -0.99 && imb > -1.0, "got {imb}");
    }
}
