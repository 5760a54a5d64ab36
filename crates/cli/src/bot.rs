//! The host loop: react to the session-start signal and log traffic.

use perch_core::{Driver, Event, RequestCommand, ResponseCode};
use tracing::{debug, info};

/// Join every configured room in a single comma-separated `join`.
pub fn autojoin_list(channels: &[String]) -> Option<String> {
    let rooms: Vec<&str> = channels
        .iter()
        .map(|room| room.trim())
        .filter(|room| !room.is_empty())
        .collect();
    (!rooms.is_empty()).then(|| rooms.join(","))
}

pub fn handle_event<D: Driver>(
    driver: &mut D,
    event: &Event,
    channels: &[String],
) -> Result<(), D::Error> {
    match event {
        Event::Response(response) if response.code == ResponseCode::ERR_NOMOTD => {
            info!("session started");
            if let Some(rooms) = autojoin_list(channels) {
                info!(%rooms, "joining configured rooms");
                driver.join(&rooms, None)?;
            }
        }
        Event::Response(response) => {
            debug!(code = %response.code, "ignoring response");
        }
        Event::Request(request) => match request.command {
            RequestCommand::Privmsg => info!(
                from = %request.hostmask,
                source = request.source().unwrap_or_default(),
                text = request.text().unwrap_or_default(),
                "privmsg"
            ),
            RequestCommand::Pong => info!(from = %request.hostmask, "pong"),
        },
    }
    Ok(())
}

/// Poll while the connection lasts, handing every event to [`handle_event`].
///
/// Returns `Ok` once the connection is gone; a failing command ends the loop
/// early with its error.
pub fn run<D: Driver>(driver: &mut D, channels: &[String]) -> Result<(), D::Error> {
    while driver.is_connected() {
        if let Some(event) = driver.next_event() {
            handle_event(driver, &event, channels)?;
        }
    }
    info!("connection closed");
    Ok(())
}
