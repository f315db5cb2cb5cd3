//! Simulated annealing (spec.md §4.4 step 3): accepts worsening moves with
//! probability `exp(-delta/T)`, cools geometrically, and reheats after a
//! stretch with no improvement.

use rand::Rng;

use crate::detector::Inventory;
use crate::types::{Room, SchedulerConfiguration};

use super::cancellation::{CancellationToken, Deadline};
use super::local_search::{self as ls};
use super::scoring::{self, Score};
use crate::types::ScheduleSlot;

const INITIAL_TEMPERATURE: f64 = 100.0;
const COOLING_RATE: f64 = 0.97;
const REHEAT_TEMPERATURE: f64 = 40.0;
const STAGNATION_ITERATIONS: u32 = 200;

fn score(slots: &[ScheduleSlot], inventory: &Inventory, config: &SchedulerConfiguration) -> Score {
    Score {
        hard_violations: scoring::hard_violations(slots, inventory),
        soft_penalty: scoring::soft_penalty(slots, inventory, config),
    }
}

pub fn simulated_annealing(
    initial: Vec<ScheduleSlot>,
    rooms: &[Room],
    config: &SchedulerConfiguration,
    inventory: &Inventory,
    cancel: &CancellationToken,
    deadline: &mut Deadline,
) -> Vec<ScheduleSlot> {
    let candidate_times = config.candidate_time_slots();
    let mut rng = rand::rng();

    let mut current = initial;
    let mut current_score = score(&current, inventory, config);
    let mut best = current.clone();
    let mut best_score = current_score;
    if best_score.is_feasible() {
        deadline.note_feasible();
    }

    let mut temperature = INITIAL_TEMPERATURE;
    let mut stagnant_iterations = 0u32;

    while !deadline.expired() && !cancel.is_cancelled() {
        let moves = ls::neighborhood_for_annealing(&current, rooms, &candidate_times);
        if moves.is_empty() {
            break;
        }
        let mv = &moves[rng.random_range(0..moves.len())];

        let mut trial = current.clone();
        ls::apply_move(&mut trial, mv);
        let trial_score = score(&trial, inventory, config);

        let delta = trial_score.total() - current_score.total();
        let accept = delta < 0.0 || rng.random::<f64>() < (-delta / temperature).exp();

        if accept {
            current = trial;
            current_score = trial_score;
        }

        if current_score.total() < best_score.total() {
            best = current.clone();
            best_score = current_score;
            deadline.note_improvement();
            if best_score.is_feasible() {
                deadline.note_feasible();
            }
            stagnant_iterations = 0;
        } else {
            stagnant_iterations += 1;
        }

        temperature *= COOLING_RATE;
        if stagnant_iterations >= STAGNATION_ITERATIONS {
            temperature = REHEAT_TEMPERATURE;
            stagnant_iterations = 0;
        }
    }

    best
}
