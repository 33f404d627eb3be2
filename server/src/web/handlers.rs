use std::{convert::Infallible, sync::Arc};
use warp::http::StatusCode;
use warp::Reply;

use crate::template::progression::ProgressionTemplate;
use super::State;

pub async fn progression_handler(state: Arc<State>) -> std::result::Result<warp::reply::Response, Infallible> {
    Ok(match state.aggregator.build_view().await {
        Ok(view) => warp::reply::with_header(
            ProgressionTemplate::ready(view),
            "cache-control",
            state.cache_control(),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to build progression view: {:?}", e);
            ProgressionTemplate::failed(e.user_message()).into_response()
        }
    })
}

pub async fn api_progression_handler(state: Arc<State>) -> std::result::Result<warp::reply::Response, Infallible> {
    Ok(match state.aggregator.build_view().await {
        Ok(view) => warp::reply::with_header(
            warp::reply::json(&view),
            "cache-control",
            state.cache_control(),
        )
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to build progression view: {:?}", e);
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": e.user_message() })),
                StatusCode::BAD_GATEWAY,
            )
            .into_response()
        }
    })
}
