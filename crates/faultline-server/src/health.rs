use axum::Json;
use axum::routing::{MethodRouter, get};
use faultline_core::Mode;
use serde_json::{Value, json};

/// Health route reporting the responder mode and whether alerts are wired
pub fn route(mode: Mode, notifications: bool) -> MethodRouter {
    get(move || async move { Json(status_body(mode, notifications)) })
}

fn status_body(mode: Mode, notifications: bool) -> Value {
    json!({
        "status": "ok",
        "mode": mode.to_string(),
        "notifications": notifications,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_mode_and_notifier() {
        assert_eq!(
            status_body(Mode::Production, true),
            json!({ "status": "ok", "mode": "production", "notifications": true })
        );
        assert_eq!(status_body(Mode::Development, false)["mode"], "development");
    }
}
