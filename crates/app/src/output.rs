//! Terminal output helpers.

use assured_application::ClientError;
use assured_domain::SessionEvent;
use serde_json::Value;
use tokio::sync::broadcast;

/// Prints a JSON value, pretty-printed.
pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

/// Prints session events raised while the command ran.
pub fn report_session_events(events: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        if let SessionEvent::LoginRequired { reason } = event {
            eprintln!("{}. Run `assured login` to continue.", reason.message());
        }
    }
}

/// Message for a failed command.
///
/// API failures show the server's message; everything else shows the
/// error chain.
pub fn describe_error(error: &anyhow::Error) -> String {
    match error.downcast_ref::<ClientError>() {
        Some(client_error) => {
            let message = client_error.user_message();
            match client_error.status() {
                Some(status) => format!("{message} (HTTP {status})"),
                None => message,
            }
        }
        None => format!("{error:#}"),
    }
}
