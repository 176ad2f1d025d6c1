//! Terminal front-end for the timesheet client: views, the navigation shell
//! and download persistence. `main.rs` wires these to `clap`.

pub mod downloads;
pub mod shell;
pub mod views;

use timesheet_core::{NotificationEvent, NotificationKind};
use tokio::sync::broadcast;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Terminal line for a newly shown notification. Dismiss and remove events
/// have nothing to print.
pub fn render_notification(event: &NotificationEvent) -> Option<String> {
    match event {
        NotificationEvent::Shown(n) => Some(match n.kind {
            NotificationKind::Success => format!("[ok] {}", n.message),
            NotificationKind::Error => format!("[error] {}", n.message),
        }),
        NotificationEvent::Dismissing(_) | NotificationEvent::Removed(_) => None,
    }
}

/// Print every notification already queued on `events` without waiting.
pub fn drain_notifications(events: &mut broadcast::Receiver<NotificationEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(line) = render_notification(&event) {
                    println!("{}", line);
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Missed notifications");
            }
            Err(_) => break,
        }
    }
}

/// Initialize tracing for the CLI. Logs go to stderr so they never mix with
/// shell replies on stdout.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("march-hours.xlsx", 8), "march...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn render_notification_only_for_shown() {
        use timesheet_core::{Notification, NotificationPhase};

        let shown = NotificationEvent::Shown(Notification {
            id: 1,
            kind: NotificationKind::Error,
            message: "Please upload a file first".to_string(),
            phase: NotificationPhase::Visible,
        });
        assert_eq!(
            render_notification(&shown).as_deref(),
            Some("[error] Please upload a file first")
        );
        assert_eq!(render_notification(&NotificationEvent::Removed(1)), None);
    }

    #[test]
    fn truncate_string_multibyte() {
        assert_eq!(truncate_string("résumé-final.pdf", 9), "résumé...");
    }
}
