//! Local seat selection for a single show time

use crate::error::{ClientError, Result};
use crate::types::{CreateReservation, Seat};

/// Seats picked on a seat map, in the order they were picked
///
/// Selection is purely local; seat availability is decided by the server
/// when the reservation is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSelection {
    seat_ids: Vec<i64>,
}

impl SeatSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the seat, or deselect it if already selected
    ///
    /// Seats that are not selectable are ignored. Returns whether the seat is
    /// selected afterwards.
    pub fn toggle(&mut self, seat: &Seat) -> bool {
        if let Some(pos) = self.seat_ids.iter().position(|id| *id == seat.id) {
            self.seat_ids.remove(pos);
            return false;
        }
        if !seat.status.is_selectable() {
            return false;
        }
        self.seat_ids.push(seat.id);
        true
    }

    pub fn contains(&self, seat_id: i64) -> bool {
        self.seat_ids.contains(&seat_id)
    }

    pub fn len(&self) -> usize {
        self.seat_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seat_ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.seat_ids.clear();
    }

    pub fn seat_ids(&self) -> &[i64] {
        &self.seat_ids
    }

    pub fn total_price(&self, price_per_seat: f64) -> f64 {
        price_per_seat * self.seat_ids.len() as f64
    }

    /// Build the reservation body for the selected seats
    pub fn into_request(self, show_time_id: i64, user_id: i64) -> Result<CreateReservation> {
        if self.seat_ids.is_empty() {
            return Err(ClientError::Configuration(
                "No seats selected for reservation".to_string(),
            ));
        }
        Ok(CreateReservation {
            show_time_id,
            user_id,
            seat_ids: self.seat_ids,
        })
    }
}
