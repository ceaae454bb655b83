//! Application views and the route table that exposes them.

pub mod current_song;

use crate::routing::Route;

/// Path of the WebSocket playback feed the overlay subscribes to.
pub const FEED_PATH: &str = "/api/ws/spotify-current-playing";

/// The application's route table, in match order.
pub fn app_routes() -> Vec<Route> {
    vec![Route::new(
        current_song::ROUTE_PATH,
        current_song::ROUTE_NAME,
        || async { current_song::render(FEED_PATH) },
    )]
}
