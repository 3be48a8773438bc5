// Solve Notifications
// Sends a short email through the Resend REST API whenever a solve is
// recorded, so the puzzle-master hears about progress without watching
// the admin panel. Entirely best-effort: misconfiguration disables it
// and delivery failures are logged and dropped.

use reqwest::Client;

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

/// Notification settings, present only when fully configured.
#[derive(Debug, Clone)]
pub struct Notifier {
    api_key: String,
    to: String,
    from: String,
}

impl Notifier {
    /// Build a notifier if both the API key and recipient are set.
    pub fn from_settings(api_key: Option<&str>, to: Option<&str>) -> Option<Self> {
        let api_key = api_key?.trim().to_string();
        let to = to?.trim().to_string();
        if api_key.is_empty() || to.is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            to,
            from: "Daygate <notifications@daygate.app>".to_string(),
        })
    }

    /// Announce a recorded solve. Logs and swallows every failure.
    pub async fn notify_solved(&self, player_id: &str, puzzle_id: &str, answer: &str) {
        let client = match Client::builder()
            .user_agent("daygate/0.1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                log::warn!("notify client unavailable: {e}");
                return;
            }
        };

        let when = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let body = serde_json::json!({
            "from": self.from,
            "to": [self.to],
            "subject": format!("✅ {player_id} solved puzzle {puzzle_id}"),
            "text": format!(
                "Puzzle {puzzle_id} solved with answer: \"{answer}\" at {when}"
            ),
        });

        match client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                log::debug!("solve notification sent for {puzzle_id}");
            }
            Ok(resp) => {
                log::warn!("solve notification rejected: HTTP {}", resp.status());
            }
            Err(e) => {
                log::warn!("solve notification failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifier_requires_both_settings() {
        assert!(Notifier::from_settings(Some("key"), Some("a@b.c")).is_some());
        assert!(Notifier::from_settings(Some("key"), None).is_none());
        assert!(Notifier::from_settings(None, Some("a@b.c")).is_none());
        assert!(Notifier::from_settings(Some("  "), Some("a@b.c")).is_none());
    }
}
