//! The "current song" overlay view.
//!
//! A single self-contained document that subscribes to the playback feed
//! and renders the track name, artists and album.

use crate::routing::{LoadError, View};

pub const ROUTE_NAME: &str = "current_song";
pub const ROUTE_PATH: &str = "/";

const TITLE: &str = "Current Song";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{title}}</title>
<style>
  body { margin: 0; background: transparent; font-family: sans-serif; color: #fff; }
  #overlay { display: none; padding: 12px 18px; background: rgba(0, 0, 0, 0.6); border-radius: 8px; }
  #overlay.visible { display: inline-block; }
  #track { font-size: 22px; font-weight: bold; }
  #artists, #album { font-size: 16px; opacity: 0.85; }
</style>
</head>
<body>
<div id="overlay">
  <div id="track"></div>
  <div id="artists"></div>
  <div id="album"></div>
</div>
<script>
(function () {
  var overlay = document.getElementById("overlay");
  function render(update) {
    if (!update || !update.track) {
      overlay.classList.remove("visible");
      return;
    }
    document.getElementById("track").textContent = update.track;
    document.getElementById("artists").textContent = (update.artists || []).join(", ");
    document.getElementById("album").textContent = update.album || "";
    overlay.classList.add("visible");
  }
  function connect() {
    var scheme = location.protocol === "https:" ? "wss://" : "ws://";
    var socket = new WebSocket(scheme + location.host + "{{feed_path}}");
    socket.onmessage = function (event) { render(JSON.parse(event.data)); };
    socket.onclose = function () { setTimeout(connect, 3000); };
  }
  connect();
})();
</script>
</body>
</html>
"#;

/// Render the overlay document for a feed endpoint.
pub fn render(feed_path: &str) -> Result<View, LoadError> {
    if !feed_path.starts_with('/') {
        return Err(LoadError(format!(
            "feed path '{}' must be absolute",
            feed_path
        )));
    }

    let body = TEMPLATE
        .replace("{{title}}", TITLE)
        .replace("{{feed_path}}", feed_path);

    Ok(View {
        route_name: ROUTE_NAME.to_string(),
        title: TITLE.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_embeds_feed_path() {
        let view = render("/api/ws/spotify-current-playing").unwrap();
        assert_eq!(view.route_name, "current_song");
        assert!(view.body.contains("\"/api/ws/spotify-current-playing\""));
        assert!(!view.body.contains("{{"));
    }

    #[test]
    fn test_relative_feed_path_rejected() {
        assert!(render("api/ws").is_err());
    }
}
