//! Typed calls for the catalog, showtime, seat and reservation endpoints
//!
//! Every call goes through [`ApiClient::fetch_json`], so each one gets bearer
//! auth, 401 recovery and error bus publication.

use crate::api_client::ApiClient;
use crate::error::Result;
use crate::types::{CreateReservation, Movie, Reservation, Seat, ShowTime};
use serde_json::Value;

pub const MOVIES_PATH: &str = "/api/movies";
pub const SHOW_TIMES_PATH: &str = "/api/show-times";
pub const RESERVATIONS_PATH: &str = "/api/reservations";
pub const MY_RESERVATIONS_PATH: &str = "/api/reservations/my-reservations";
pub const HEALTH_PATH: &str = "/api/health";

impl ApiClient {
    pub async fn movies(&self) -> Result<Vec<Movie>> {
        self.get_json(MOVIES_PATH).await
    }

    pub async fn movie(&self, id: i64) -> Result<Movie> {
        self.get_json(&format!("{MOVIES_PATH}/{id}")).await
    }

    pub async fn show_times(&self) -> Result<Vec<ShowTime>> {
        self.get_json(SHOW_TIMES_PATH).await
    }

    pub async fn show_times_for_movie(&self, movie_id: i64) -> Result<Vec<ShowTime>> {
        self.get_json(&format!("{SHOW_TIMES_PATH}/movie/{movie_id}"))
            .await
    }

    pub async fn show_time(&self, id: i64) -> Result<ShowTime> {
        self.get_json(&format!("{SHOW_TIMES_PATH}/{id}")).await
    }

    /// Seat map for a show time
    pub async fn seats(&self, show_time_id: i64) -> Result<Vec<Seat>> {
        self.get_json(&format!("/api/showtimes/{show_time_id}/seats"))
            .await
    }

    pub async fn create_reservation(&self, request: &CreateReservation) -> Result<Reservation> {
        self.post_json(RESERVATIONS_PATH, request).await
    }

    /// Reservations of the signed-in user
    pub async fn my_reservations(&self) -> Result<Vec<Reservation>> {
        self.get_json(MY_RESERVATIONS_PATH).await
    }

    /// Liveness probe; the body shape is backend-defined
    pub async fn health(&self) -> Result<Value> {
        self.get_json(HEALTH_PATH).await
    }
}
