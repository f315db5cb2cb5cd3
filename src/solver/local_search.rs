//! Local search / tabu hill-climbing (spec.md §4.4 step 2). Neighborhood:
//! change a section's time, change its room, swap times between two
//! sections of the same teacher, or swap rooms. A short tabu list (length
//! ~7) of recently-undone moves prevents cycling.

use std::collections::VecDeque;

use crate::detector::Inventory;
use crate::types::{Room, SchedulerConfiguration, TimeSlot};

use super::cancellation::{CancellationToken, Deadline};
use super::scoring::{self, Score};
use crate::types::ScheduleSlot;

const TABU_LENGTH: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Move {
    ChangeTime(usize, TimeSlot),
    ChangeRoom(usize, crate::types::RoomId),
    SwapTimes(usize, usize),
    SwapRooms(usize, usize),
}

fn score(slots: &[ScheduleSlot], inventory: &Inventory, config: &SchedulerConfiguration) -> Score {
    Score {
        hard_violations: scoring::hard_violations(slots, inventory),
        soft_penalty: scoring::soft_penalty(slots, inventory, config),
    }
}

pub(crate) fn apply_move(slots: &mut [ScheduleSlot], mv: &Move) {
    match mv {
        Move::ChangeTime(i, time) => {
            slots[*i].day_of_week = time.day;
            slots[*i].start_time = time.start;
            slots[*i].end_time = time.end;
        }
        Move::ChangeRoom(i, room_id) => {
            slots[*i].room_id = Some(room_id.clone());
        }
        Move::SwapTimes(i, j) => {
            let (day_i, start_i, end_i) = (slots[*i].day_of_week, slots[*i].start_time, slots[*i].end_time);
            slots[*i].day_of_week = slots[*j].day_of_week;
            slots[*i].start_time = slots[*j].start_time;
            slots[*i].end_time = slots[*j].end_time;
            slots[*j].day_of_week = day_i;
            slots[*j].start_time = start_i;
            slots[*j].end_time = end_i;
        }
        Move::SwapRooms(i, j) => {
            let room_i = slots[*i].room_id.clone();
            slots[*i].room_id = slots[*j].room_id.clone();
            slots[*j].room_id = room_i;
        }
    }
}

pub(crate) fn neighborhood_for_annealing(slots: &[ScheduleSlot], rooms: &[Room], candidate_times: &[TimeSlot]) -> Vec<Move> {
    neighborhood(slots, rooms, candidate_times)
}

fn neighborhood(slots: &[ScheduleSlot], rooms: &[Room], candidate_times: &[TimeSlot]) -> Vec<Move> {
    let mut moves = Vec::new();

    for i in 0..slots.len() {
        for time in candidate_times {
            if *time != slots[i].time_slot() {
                moves.push(Move::ChangeTime(i, *time));
            }
        }
        for room in rooms {
            if Some(&room.id) != slots[i].room_id.as_ref() {
                moves.push(Move::ChangeRoom(i, room.id.clone()));
            }
        }
    }

    for i in 0..slots.len() {
        for j in (i + 1)..slots.len() {
            if slots[i].same_teacher(&slots[j]) {
                moves.push(Move::SwapTimes(i, j));
            }
            moves.push(Move::SwapRooms(i, j));
        }
    }

    moves
}

/// Hill-climb from `initial`, returning the best feasible (or least-infeasible)
/// state found before the deadline or cancellation.
pub fn local_search(
    initial: Vec<ScheduleSlot>,
    rooms: &[Room],
    config: &SchedulerConfiguration,
    inventory: &Inventory,
    cancel: &CancellationToken,
    deadline: &mut Deadline,
) -> Vec<ScheduleSlot> {
    let candidate_times = config.candidate_time_slots();
    let mut current = initial;
    let mut current_score = score(&current, inventory, config);
    let mut best = current.clone();
    let mut best_score = current_score;
    if best_score.is_feasible() {
        deadline.note_feasible();
    }

    let mut tabu: VecDeque<Move> = VecDeque::with_capacity(TABU_LENGTH);

    while !deadline.expired() && !cancel.is_cancelled() {
        let moves = neighborhood(&current, rooms, &candidate_times);
        let mut best_move: Option<(Move, Score)> = None;

        for mv in &moves {
            if tabu.contains(mv) {
                continue;
            }
            let mut trial = current.clone();
            apply_move(&mut trial, mv);
            let trial_score = score(&trial, inventory, config);

            let improves = trial_score.total() < best_move.as_ref().map(|(_, s)| s.total()).unwrap_or(f64::INFINITY);
            if improves {
                best_move = Some((mv.clone(), trial_score));
            }
        }

        let Some((chosen, chosen_score)) = best_move else { break };
        if chosen_score.total() >= current_score.total() {
            break; // no improving move left in the neighborhood
        }

        apply_move(&mut current, &chosen);
        current_score = chosen_score;

        tabu.push_back(chosen);
        if tabu.len() > TABU_LENGTH {
            tabu.pop_front();
        }

        if current_score.total() < best_score.total() {
            best = current.clone();
            best_score = current_score;
            deadline.note_improvement();
            if best_score.is_feasible() {
                deadline.note_feasible();
            }
        }
    }

    best
}
