//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

use crate::build_info;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LivenessBody {
    pub msg: &'static str,
    pub version: &'static str,
}

pub async fn liveness() -> Json<LivenessBody> {
    Json(LivenessBody {
        msg: "ok",
        version: build_info::version(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_body() {
        let Json(body) = liveness().await;
        assert_eq!(body.msg, "ok");
        assert_eq!(body.version, build_info::version());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"msg": "ok", "version": build_info::version()}));
    }
}
