use std::collections::HashMap;
use std::error::Error;

use crate::types::{rank_from_symbol, Rank};

static PAIR_SPLITS_CSV: &'static [u8] = include_bytes!("charts/pair_splits.csv");

/// Basic-strategy pairs chart used by the simulator to gate splits. The EV
/// core never consults it: split EVs there come from exact enumeration.
#[derive(Clone)]
pub struct SplitChart {
    chart: HashMap<(Rank, Rank), bool>,
}

impl SplitChart {
    /// Load the pairs chart included with the executable in `src/charts`.
    pub fn builtin() -> Result<SplitChart, Box<dyn Error>> {
        Self::from_bytes(PAIR_SPLITS_CSV)
    }

    fn from_bytes(bytes: &[u8]) -> Result<SplitChart, Box<dyn Error>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes);

        let mut chart = HashMap::new();
        let mut upcards: Vec<Rank> = vec![];
        for line in reader.records() {
            let record = line?;
            let left_header = record.get(0).unwrap();

            if left_header == "Pair" {
                upcards.clear();
                for field in record.iter().skip(1) {
                    upcards.push(rank_from_symbol(field)?);
                }
                continue;
            }

            let pair = rank_from_symbol(left_header)?;
            for (idx, cell) in record.iter().skip(1).enumerate() {
                let split = match cell {
                    "P" | "p" => true,
                    "N" | "n" => false,
                    unknown => panic!(
                        "Unknown cell in pairs chart: '{}' (row '{}')",
                        unknown, left_header
                    ),
                };
                chart.insert((pair, upcards[idx]), split);
            }
        }

        Ok(SplitChart { chart })
    }

    /// Whether basic strategy splits this pair against the upcard, given the
    /// player already holds `num_hands` hands. Total hands from splitting are
    /// capped at `max_splits + 1`.
    pub fn should_split(&self, pair: Rank, upcard: Rank, num_hands: u32, max_splits: u32) -> bool {
        if num_hands > max_splits {
            return false;
        }
        *self.chart.get(&(pair, upcard)).unwrap_or(&false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{A, T};

    #[test]
    fn test_chart_loads() {
        let chart = SplitChart::builtin().expect("builtin pairs chart must parse");
        // Ten upcards per pair row.
        assert_eq!(chart.chart.len(), 100);
    }

    #[test]
    fn test_always_and_never_rows() {
        let chart = SplitChart::builtin().unwrap();
        for upcard in crate::types::RANKS {
            assert!(chart.should_split(A, upcard, 1, 3));
            assert!(chart.should_split(7, upcard, 1, 3)); // eights
            assert!(!chart.should_split(T, upcard, 1, 3));
            assert!(!chart.should_split(4, upcard, 1, 3)); // fives
        }
    }

    #[test]
    fn test_situational_rows() {
        let chart = SplitChart::builtin().unwrap();
        // Nines split against everything but 7, T, A.
        assert!(chart.should_split(8, 5, 1, 3));
        assert!(chart.should_split(8, 7, 1, 3));
        assert!(!chart.should_split(8, 6, 1, 3));
        assert!(!chart.should_split(8, T, 1, 3));
        assert!(!chart.should_split(8, A, 1, 3));
        // Sixes split through a dealer six.
        assert!(chart.should_split(5, 5, 1, 3));
        assert!(!chart.should_split(5, 6, 1, 3));
        // Low pairs and sixes/sevens also split against a dealer ace.
        assert!(chart.should_split(1, A, 1, 3)); // twos
        assert!(chart.should_split(2, A, 1, 3)); // threes
        assert!(chart.should_split(5, A, 1, 3)); // sixes
        assert!(chart.should_split(6, A, 1, 3)); // sevens
    }

    #[test]
    fn test_max_splits_gate() {
        let chart = SplitChart::builtin().unwrap();
        assert!(chart.should_split(7, 5, 3, 3));
        assert!(!chart.should_split(7, 5, 4, 3));
        assert!(!chart.should_split(7, 5, 1, 0));
    }
}
