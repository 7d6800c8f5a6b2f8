//! Leaderboard submission client
//!
//! The shared leaderboard is an external collaborator: one HTTP POST per
//! finished run, fire-and-forget. The simulation never awaits it; failures
//! are logged and dropped. Plausibility checks live server-side.

use serde::{Deserialize, Serialize};

use crate::run::RunReport;

/// Backend endpoint receiving finished runs
pub const LEADERBOARD_ENDPOINT: &str = "/api/leaderboard";

/// Avatar sent when the player never picked one
pub const DEFAULT_AVATAR: &str = "\u{1F60E}";

/// POST body for one finished run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub nickname: String,
    pub score: u64,
    pub player_id: String,
    pub car_id: u32,
    pub avatar: String,
    pub duration_ms: u64,
}

impl ScoreSubmission {
    /// Build the payload from an end-of-run report
    pub fn from_report(report: &RunReport, player_id: String) -> Self {
        Self {
            nickname: report.nickname.trim().to_string(),
            score: report.final_score,
            player_id,
            car_id: report.vehicle_id,
            avatar: report
                .avatar
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            duration_ms: report.duration_ms,
        }
    }
}

/// LocalStorage key for the anonymous player id
#[allow(dead_code)]
const GUEST_ID_KEY: &'static str = "tunnel_racer_guest_id";

/// Fetch or mint the device's anonymous player id (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn get_or_create_guest_id() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok()??;
    if let Ok(Some(id)) = storage.get_item(GUEST_ID_KEY) {
        if !id.is_empty() {
            return Some(id);
        }
    }
    let id = format!(
        "guest_{:x}{:x}",
        js_sys::Date::now() as u64,
        (js_sys::Math::random() * 1e9) as u64
    );
    let _ = storage.set_item(GUEST_ID_KEY, &id);
    Some(id)
}

/// Submit a finished run, fire-and-forget (WASM only).
///
/// Skipped entirely for blank nicknames or when no guest id can be
/// minted; the per-run idempotency guard lives in the run controller.
#[cfg(target_arch = "wasm32")]
pub fn submit(report: &RunReport) {
    if report.nickname.trim().is_empty() {
        log::warn!("skipping leaderboard submit: blank nickname");
        return;
    }
    let Some(player_id) = get_or_create_guest_id() else {
        log::warn!("skipping leaderboard submit: no storage for guest id");
        return;
    };
    let submission = ScoreSubmission::from_report(report, player_id);
    let Ok(body) = serde_json::to_string(&submission) else {
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = post_json(LEADERBOARD_ENDPOINT, &body).await {
            log::warn!("leaderboard submit failed: {err:?}");
        }
    });
}

#[cfg(target_arch = "wasm32")]
async fn post_json(url: &str, body: &str) -> Result<(), wasm_bindgen::JsValue> {
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;

    let opts = web_sys::RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(body));

    let request = web_sys::Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    JsFuture::from(window.fetch_with_request(&request)).await?;
    Ok(())
}

/// Native stub: nothing to submit outside the browser
#[cfg(not(target_arch = "wasm32"))]
pub fn submit(report: &RunReport) {
    log::debug!(
        "leaderboard submit (native no-op): {} -> {}",
        report.nickname,
        report.final_score
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            final_score: 1234,
            vehicle_id: 3,
            nickname: "  racer  ".to_string(),
            avatar: None,
            duration_ms: 45_000,
        }
    }

    #[test]
    fn payload_uses_the_backend_field_names() {
        let submission = ScoreSubmission::from_report(&report(), "guest_abc".to_string());
        let json = serde_json::to_string(&submission).unwrap();
        for field in ["nickname", "score", "playerId", "carId", "avatar", "durationMs"] {
            assert!(json.contains(field), "missing field {field} in {json}");
        }
    }

    #[test]
    fn report_maps_into_the_payload() {
        let submission = ScoreSubmission::from_report(&report(), "guest_abc".to_string());
        assert_eq!(submission.nickname, "racer");
        assert_eq!(submission.score, 1234);
        assert_eq!(submission.car_id, 3);
        assert_eq!(submission.avatar, DEFAULT_AVATAR);
        assert_eq!(submission.duration_ms, 45_000);

        let mut with_avatar = report();
        with_avatar.avatar = Some("\u{1F3CE}".to_string());
        let submission = ScoreSubmission::from_report(&with_avatar, "g".to_string());
        assert_eq!(submission.avatar, "\u{1F3CE}");
    }
}
