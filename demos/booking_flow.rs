//! End-to-end booking flow against a running backend
//!
//! Usage:
//!   CINEMA_EMAIL=... CINEMA_PASSWORD=... cargo run --example booking_flow

use cinema_rs_client::{spawn_keep_alive, ApiClient, AuthSession, ClientConfig, SeatSelection};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::from_env()?;
    let email = std::env::var("CINEMA_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password = std::env::var("CINEMA_PASSWORD").unwrap_or_else(|_| "demo".to_string());

    println!("=== Cinema Rust Client Example ===");
    println!("Base URL: {}", config.base_url);
    println!("Backend:  {}", config.backend_origin);
    println!();

    let client = ApiClient::new(config)?;

    // Stand-in for a UI error modal
    client.error_bus().subscribe(|event| {
        eprintln!("[{}] {}", event.title, event.message);
    });

    let keep_alive = spawn_keep_alive(client.clone(), client.config().keep_alive_interval);

    let session = AuthSession::new(client.clone());
    let user = session.login(&email, &password).await?;
    println!("✓ Signed in as {}", user.email);

    let movies = client.movies().await?;
    println!("✓ {} movies in the catalog", movies.len());

    let Some(movie) = movies.first() else {
        println!("Nothing to book");
        keep_alive.abort();
        return Ok(());
    };

    let show_times = client.show_times_for_movie(movie.id).await?;
    let Some(show_time) = show_times.first() else {
        println!("No show times for {}", movie.title);
        keep_alive.abort();
        return Ok(());
    };

    let seats = client.seats(show_time.id).await?;
    let mut selection = SeatSelection::new();
    for seat in seats.iter().filter(|s| s.status.is_selectable()).take(2) {
        selection.toggle(seat);
    }
    println!(
        "Booking {} seat(s) for {} at {:.2}",
        selection.len(),
        movie.title,
        selection.total_price(show_time.price)
    );

    let reservation = client
        .create_reservation(&selection.into_request(show_time.id, user.id)?)
        .await?;
    println!("✓ Reserved {} seat(s)", reservation.reservation_seats.len());

    for booked in client.my_reservations().await? {
        println!("  - show time {} ({:.2})", booked.show_time.id, booked.total_price());
    }

    session.logout().await;
    keep_alive.abort();
    println!("Done!");

    Ok(())
}
