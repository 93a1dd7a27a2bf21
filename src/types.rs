//! Wire types for the cinema booking API

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
}

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/signup`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

/// Login and signup response
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    pub user: User,
}

/// Refresh response; the profile is only sent by some deployments
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub description: String,
    /// ISO-8601 duration ("PT2H15M") or minutes, as the backend sends it
    #[serde(default)]
    pub duration: Option<serde_json::Value>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub poster_image: Option<String>,
    #[serde(default, rename = "trailerURL")]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub show_times: Vec<ShowTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShowStatus {
    Scheduled,
    Cancelled,
    Finished,
    Filling,
    Full,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hall {
    pub id: i64,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowTime {
    pub id: i64,
    #[serde(default)]
    pub slot_id: Option<i64>,
    #[serde(default)]
    pub movie_id: Option<i64>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endTime")]
    pub end_time: Option<String>,
    #[serde(default, rename = "showDate")]
    pub show_date: Option<String>,
    #[serde(default)]
    pub day: Option<String>,
    pub price: f64,
    pub status: ShowStatus,
    #[serde(default)]
    pub movie: Option<Box<Movie>>,
    #[serde(default)]
    pub hall: Option<Hall>,
}

/// Seat state as reported in a seat map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeatStatus {
    Active,
    Inactive,
    Damaged,
    Reserved,
}

impl SeatStatus {
    /// Whether a customer may pick this seat
    pub fn is_selectable(self) -> bool {
        matches!(self, SeatStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    /// Row letter plus number, e.g. "A1"
    pub seat: String,
    #[serde(default, rename = "showId")]
    pub show_id: Option<i64>,
    #[serde(default, rename = "hallId")]
    pub hall_id: Option<i64>,
    pub status: SeatStatus,
}

/// Body of `POST /api/reservations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReservation {
    pub show_time_id: i64,
    pub user_id: i64,
    pub seat_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationSeat {
    pub id: i64,
    pub seat: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub reservation_seats: Vec<ReservationSeat>,
    pub show_time: ShowTime,
}

impl Reservation {
    /// Show time price times the number of reserved seats
    pub fn total_price(&self) -> f64 {
        self.show_time.price * self.reservation_seats.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_uses_camel_case_token() {
        let parsed: AuthResponse = serde_json::from_value(json!({
            "accessToken": "tok1",
            "user": { "id": 1, "email": "a@b.c", "role": "USER" }
        }))
        .unwrap();

        assert_eq!(parsed.access_token, "tok1");
        assert_eq!(parsed.user.role, Role::User);
        assert!(parsed.user.name.is_none());
    }

    #[test]
    fn test_refresh_response_user_is_optional() {
        let parsed: RefreshResponse = serde_json::from_value(json!({ "token": "t2" })).unwrap();
        assert_eq!(parsed.token, "t2");
        assert!(parsed.user.is_none());
    }

    #[test]
    fn test_reservation_request_field_names() {
        let body = serde_json::to_value(CreateReservation {
            show_time_id: 7,
            user_id: 3,
            seat_ids: vec![101, 102],
        })
        .unwrap();

        assert_eq!(
            body,
            json!({ "show_time_id": 7, "user_id": 3, "seat_ids": [101, 102] })
        );
    }

    #[test]
    fn test_seat_status_is_upper_case_only() {
        let seat: Seat =
            serde_json::from_value(json!({ "id": 1, "seat": "A1", "status": "RESERVED" })).unwrap();
        assert_eq!(seat.status, SeatStatus::Reserved);
        assert!(!seat.status.is_selectable());

        let mixed = serde_json::from_value::<Seat>(json!({ "id": 1, "seat": "A1", "status": "Active" }));
        assert!(mixed.is_err());
    }

    #[test]
    fn test_reservation_total_price() {
        let reservation: Reservation = serde_json::from_value(json!({
            "reservation_seats": [{ "id": 1, "seat": "O1" }, { "id": 2, "seat": "O2" }],
            "show_time": { "id": 9, "price": 12.5, "status": "SCHEDULED" }
        }))
        .unwrap();

        assert_eq!(reservation.total_price(), 25.0);
    }
}
