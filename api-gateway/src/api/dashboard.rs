//! Dashboard and loan application handlers

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::api::session::current_session;
use crate::api::views;
use crate::error::ApiError;
use crate::AppState;

/// Loan application form fields
#[derive(Debug, Deserialize)]
pub struct ApplyForm {
    /// Kept as text so a malformed amount becomes a 400 rather than a
    /// generic form rejection
    pub amount: String,
}

/// Render the dashboard, or send anonymous visitors to the login page
pub async fn dashboard(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Response, ApiError> {
    let session = match current_session(&state, &jar).await? {
        Some(session) => session,
        None => return Ok(Redirect::to("/").into_response()),
    };

    let user = match state.account_service.get_user(session.user_id).await? {
        Some(user) => user,
        None => {
            warn!("Session refers to missing user {}", session.user_id);
            return Ok(Redirect::to("/").into_response());
        }
    };

    let loans = state.loan_ledger.list_loans(Some(&session)).await?;
    Ok(Html(views::dashboard_page(&user, &loans)).into_response())
}

/// Record a loan application for the logged-in client
pub async fn apply(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<ApplyForm>,
) -> Result<Response, ApiError> {
    let session = match current_session(&state, &jar).await? {
        Some(session) => session,
        None => return Ok(Redirect::to("/").into_response()),
    };

    let amount = parse_amount(&form.amount)?;
    state.loan_ledger.apply_loan(Some(&session), amount).await?;

    Ok(Redirect::to("/dashboard").into_response())
}

/// Parse a whole-number amount
fn parse_amount(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid amount: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500").unwrap(), 500);
        assert_eq!(parse_amount(" 42 ").unwrap(), 42);
        assert_eq!(parse_amount("-3").unwrap(), -3);
        assert!(parse_amount("12.5").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("").is_err());
    }
}
