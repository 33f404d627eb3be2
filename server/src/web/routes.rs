use std::sync::Arc;
use warp::{filters::BoxedFilter, http::Uri, Filter, Reply};

use super::handlers;
use super::State;

pub fn router(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    index()
        .or(progression(Arc::clone(&state)))
        .or(api_progression(Arc::clone(&state)))
        .or(assets())
        .boxed()
}

fn index() -> BoxedFilter<(impl Reply,)> {
    let route = warp::path::end().map(|| warp::redirect(Uri::from_static("/progression")));
    warp::get().and(route).boxed()
}

fn progression(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("progression")
        .and(warp::path::end())
        .and_then(move || handlers::progression_handler(Arc::clone(&state)));

    warp::get().and(route).boxed()
}

fn api_progression(state: Arc<State>) -> BoxedFilter<(impl Reply,)> {
    let route = warp::path("api")
        .and(warp::path("progression"))
        .and(warp::path::end())
        .and_then(move || handlers::api_progression_handler(Arc::clone(&state)));

    warp::get().and(route).boxed()
}

fn assets() -> BoxedFilter<(impl Reply,)> {
    warp::get()
        .and(warp::path("assets"))
        .and(progression_css())
        .boxed()
}

fn progression_css() -> BoxedFilter<(impl Reply,)> {
    warp::path("progression.css")
        .and(warp::path::end())
        .and(warp::fs::file("./assets/progression.css"))
        .boxed()
}
