use crate::catalog::{self, Food, Recipe};
use crate::errors::AppError;
use crate::models::{
    AppData, CreatePlanRequest, FoodQuery, Plan, Rhythm, SummaryResponse, WaterRequest,
    WaterResponse, WeightRequest,
};
use crate::plan;
use crate::state::AppState;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.snapshot().await;
    Html(render_index(&data))
}

/// The full persisted snapshot, exactly as it sits on disk.
pub async fn get_state(State(state): State<AppState>) -> Json<AppData> {
    Json(state.snapshot().await)
}

pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<SummaryResponse>, AppError> {
    let data = state.snapshot().await;
    let summary = to_summary(&data).ok_or_else(no_plan)?;
    Ok(Json(summary))
}

pub async fn get_plan(State(state): State<AppState>) -> Result<Json<Plan>, AppError> {
    let data = state.snapshot().await;
    let plan = data.plan.ok_or_else(no_plan)?;
    Ok(Json(plan))
}

pub async fn create_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<Json<Plan>, AppError> {
    let (start, target, rhythm) = parse_plan_request(&payload)?;

    let mut data = state.data.lock().await;
    let plan = plan::create_plan(&mut data, start, target, rhythm)
        .ok_or_else(|| AppError::bad_request("start weight must be above the target weight"))?;
    persist_data(&state.data_path, &data).await?;

    Ok(Json(plan))
}

/// No-script fallback for the setup form. Invalid input keeps the prior
/// state and lands back on the page, same as the inline validation.
pub async fn create_plan_form(
    State(state): State<AppState>,
    Form(payload): Form<CreatePlanRequest>,
) -> Result<Redirect, AppError> {
    if let Ok((start, target, rhythm)) = parse_plan_request(&payload) {
        let mut data = state.data.lock().await;
        if plan::create_plan(&mut data, start, target, rhythm).is_some() {
            persist_data(&state.data_path, &data).await?;
        }
    }

    Ok(Redirect::to("/"))
}

pub async fn record_weight(
    State(state): State<AppState>,
    Json(payload): Json<WeightRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let mut data = state.data.lock().await;
    if data.plan.is_none() {
        return Err(no_plan());
    }
    if !plan::record_weight(&mut data, &payload.weight) {
        return Err(AppError::bad_request("weight must be a number"));
    }
    persist_data(&state.data_path, &data).await?;

    let summary = to_summary(&data).ok_or_else(no_plan)?;
    Ok(Json(summary))
}

pub async fn record_water(
    State(state): State<AppState>,
    Json(payload): Json<WaterRequest>,
) -> Result<Json<WaterResponse>, AppError> {
    if payload.slot >= plan::WATER_SLOTS {
        return Err(AppError::bad_request("slot must be between 0 and 4"));
    }

    let mut data = state.data.lock().await;
    if data.plan.is_none() {
        return Err(no_plan());
    }
    let count = plan::record_water(&mut data, payload.slot);
    persist_data(&state.data_path, &data).await?;

    Ok(Json(WaterResponse {
        date: plan::today_key(),
        count,
    }))
}

pub async fn reset(State(state): State<AppState>) -> Result<Json<AppData>, AppError> {
    let mut data = state.data.lock().await;
    plan::reset(&mut data);
    persist_data(&state.data_path, &data).await?;

    Ok(Json(data.clone()))
}

pub async fn get_foods(Query(query): Query<FoodQuery>) -> Json<Vec<&'static Food>> {
    Json(catalog::search_foods(&query.q))
}

pub async fn get_recipes() -> Json<&'static [Recipe]> {
    Json(catalog::RECIPES)
}

fn parse_plan_request(payload: &CreatePlanRequest) -> Result<(f64, f64, Rhythm), AppError> {
    let start = plan::parse_weight(&payload.start_weight)
        .ok_or_else(|| AppError::bad_request("start weight must be a number"))?;
    let target = plan::parse_weight(&payload.target_weight)
        .ok_or_else(|| AppError::bad_request("target weight must be a number"))?;
    let rhythm = payload
        .rhythm
        .parse::<Rhythm>()
        .map_err(AppError::bad_request)?;
    Ok((start, target, rhythm))
}

fn to_summary(data: &AppData) -> Option<SummaryResponse> {
    Some(SummaryResponse {
        date: plan::today_key(),
        day: plan::current_day(data)?,
        phase: plan::current_phase().to_string(),
        current_weight: plan::current_weight(data)?,
        weight_lost: plan::weight_lost(data)?,
        water_today: plan::water_today(data),
        logs: data.logs.clone(),
    })
}

fn no_plan() -> AppError {
    AppError::not_found("no active plan")
}
