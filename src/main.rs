use std::sync::{Arc, Mutex};
use std::{thread, time};

use exact_deck::basic_strategy::SplitChart;
use exact_deck::rules::{Rules, Tuning};
use exact_deck::shoe::Shoe;
use exact_deck::simulation::{play_hand, SimulationResult};

const THREADS: u32 = 8;
const DECKS: u32 = 8;
const SHUFFLE_AT_CARDS: u32 = DECKS * 52 / 2; // 50% penetration
const SHOES_PER_REPORT: u64 = 1; // shoes to play on each thread before reporting results to mutex

fn main() {
    env_logger::init();

    let chart = SplitChart::builtin().unwrap();
    let rules = Rules::default();
    let tuning = Tuning::default();

    let status = Arc::new(Mutex::new(SimulationResult::default()));
    let mut thread_handles = vec![];

    for _ in 0..THREADS {
        let chart_this_thread = chart.clone();
        let status_clone = status.clone();
        thread_handles.push(thread::spawn(move || loop {
            play_shoes_and_report(&chart_this_thread, &rules, &tuning, &status_clone)
        }));
    }

    let start_time = time::Instant::now();
    loop {
        thread::sleep(time::Duration::from_secs(1));
        let s = status.lock().unwrap();
        if s.hands_played == 0 || s.tracked_rounds == 0 {
            continue;
        }
        let edge = s.roi / s.hands_played as f64 * 100f64;
        let predicted = s.predicted_ev / s.tracked_rounds as f64 * 100f64;
        let realized = s.tracked_roi / s.tracked_rounds as f64 * 100f64;
        println!(
            "Played {} hands for {:+.1} units. Edge = {:.3}%, {} hands/sec. Tracked rounds: predicted {:+.3}% vs realized {:+.3}%",
            s.hands_played,
            s.roi,
            edge,
            (s.hands_played as f64 / start_time.elapsed().as_secs_f64()).round(),
            predicted,
            realized,
        );
    }
}

/// Play one shoe of rounds to the penetration card, then report the results
/// to the shared accumulator.
fn play_shoes_and_report(
    chart: &SplitChart,
    rules: &Rules,
    tuning: &Tuning,
    status: &Arc<Mutex<SimulationResult>>,
) {
    let mut result_accum = SimulationResult::default();

    for _ in 0..SHOES_PER_REPORT {
        let mut shoe = Shoe::fresh(DECKS);
        while shoe.len() > SHUFFLE_AT_CARDS {
            result_accum += play_hand(&mut shoe, chart, rules, tuning);
        }
    }

    let mut s = status.lock().unwrap();
    *s += result_accum;
}
