use axum::{Json, extract::State};

use crate::AppState;
use crate::error::AppResult;
use crate::routes::extract::AppJson;
use crate::services::auth::{IssuedToken, LoginInput};

pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginInput>,
) -> AppResult<Json<IssuedToken>> {
    let issued = state.auth.login(&input)?;
    Ok(Json(issued))
}
