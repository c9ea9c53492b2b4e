use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::info;

use crate::analysis::{AnalyzeOutcome, TabId};
use crate::api::dtos::*;
use crate::app_state::AppState;
use crate::extractor;

/// Delay hints for shim-side scheduling, carried over from the original
/// extension: a ready signal analyzes sooner than a full navigation, which
/// waits for the page to settle.
const READY_ANALYZE_DELAY_MS: u64 = 500;
const NAVIGATED_ANALYZE_DELAY_MS: u64 = 1000;

const SETUP_REQUIRED_MESSAGE: &str = "Please complete the setup wizard first";

fn auto_analyze_hint(state: &AppState, url: &str, delay_ms: u64) -> TabEventResponse {
    let schedule = state.settings.setup_complete()
        && state.settings.settings().options.auto_analyze
        && url.starts_with("http");
    TabEventResponse {
        schedule_analysis: schedule,
        delay_ms,
    }
}

/// Content script loaded in a tab.
pub async fn tab_ready(
    State(state): State<AppState>,
    Path(tab_id): Path<TabId>,
    Json(event): Json<TabEvent>,
) -> Json<TabEventResponse> {
    info!(tab_id, url = %event.url, "tab ready");
    Json(auto_analyze_hint(&state, &event.url, READY_ANALYZE_DELAY_MS))
}

/// A tab finished loading a new page. Always invalidates that tab's cached
/// verdict and badge, whether or not anything was ever analyzed.
pub async fn tab_navigated(
    State(state): State<AppState>,
    Path(tab_id): Path<TabId>,
    Json(event): Json<TabEvent>,
) -> Json<TabEventResponse> {
    state.coordinator.navigation_complete(tab_id);
    Json(auto_analyze_hint(
        &state,
        &event.url,
        NAVIGATED_ANALYZE_DELAY_MS,
    ))
}

pub async fn analyze_page(
    State(state): State<AppState>,
    Path(tab_id): Path<TabId>,
    Json(page): Json<PagePayload>,
) -> Json<AnalyzeResponse> {
    if !state.settings.setup_complete() {
        return Json(AnalyzeResponse::failed(SETUP_REQUIRED_MESSAGE));
    }

    let connector = state.connector();
    match state
        .coordinator
        .analyze(tab_id, &page.url, &page.html, &connector)
        .await
    {
        Ok(AnalyzeOutcome::Fresh(result)) => Json(AnalyzeResponse::fresh(result)),
        Ok(AnalyzeOutcome::Cached(result)) => Json(AnalyzeResponse::cached(result)),
        Ok(AnalyzeOutcome::InProgress) => Json(AnalyzeResponse::in_progress()),
        Err(err) => Json(AnalyzeResponse::failed(err.to_string())),
    }
}

pub async fn get_result(
    State(state): State<AppState>,
    Path(tab_id): Path<TabId>,
) -> Json<ResultResponse> {
    Json(ResultResponse {
        result: state.coordinator.cached_result(tab_id),
        is_analyzing: state.coordinator.is_analyzing(tab_id),
    })
}

pub async fn get_badge(
    State(state): State<AppState>,
    Path(tab_id): Path<TabId>,
) -> Json<BadgeResponse> {
    Json(state.coordinator.badge(tab_id).into())
}

pub async fn provider_availability(State(state): State<AppState>) -> Json<AvailabilityResponse> {
    Json(AvailabilityResponse {
        available: state.connector().check_availability().await,
    })
}

pub async fn provider_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.connector().list_models().await,
    })
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        settings: state.settings.settings(),
    })
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<crate::settings::SettingsUpdate>,
) -> Json<UpdateSettingsResponse> {
    match state.update_settings(update) {
        Ok(settings) => Json(UpdateSettingsResponse {
            success: true,
            settings: Some(settings),
            error: None,
        }),
        Err(err) => Json(UpdateSettingsResponse {
            success: false,
            settings: None,
            error: Some(err.to_string()),
        }),
    }
}

pub async fn setup_status(State(state): State<AppState>) -> Json<SetupResponse> {
    Json(SetupResponse {
        setup_complete: state.settings.setup_complete(),
    })
}

pub async fn complete_setup(State(state): State<AppState>) -> Json<SetupResponse> {
    if let Err(err) = state.settings.mark_setup_complete() {
        tracing::error!(error = %err, "failed to persist setup flag");
        return Json(SetupResponse {
            setup_complete: false,
        });
    }
    info!("setup marked complete");
    Json(SetupResponse {
        setup_complete: true,
    })
}

/// Bare extraction, for shims that want the page data without a verdict.
pub async fn extract_content(Json(page): Json<PagePayload>) -> Json<ExtractResponse> {
    match extractor::extract(&page.html, &page.url) {
        Ok(data) => Json(ExtractResponse {
            success: true,
            data: Some(data),
            error: None,
        }),
        Err(err) => Json(ExtractResponse {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    }
}

pub async fn analyze_link(
    State(state): State<AppState>,
    Json(request): Json<LinkAnalyzeRequest>,
) -> Json<LinkAnalyzeResponse> {
    match state
        .link_analyzer
        .analyze(&request.url, request.tab_id, &state.coordinator)
        .await
    {
        Ok(report) => Json(LinkAnalyzeResponse {
            success: true,
            report: Some(report),
            error: None,
        }),
        Err(err) => Json(LinkAnalyzeResponse {
            success: false,
            report: None,
            error: Some(err.to_string()),
        }),
    }
}

pub async fn link_result(
    State(state): State<AppState>,
    Query(query): Query<LinkResultQuery>,
) -> Json<LinkResultResponse> {
    Json(LinkResultResponse {
        result: state.link_analyzer.cache().get(&query.url),
    })
}
