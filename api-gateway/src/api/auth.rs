//! Login, signup and logout handlers

use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use common::error::Error;
use common::model::user::Role;
use serde::Deserialize;
use tracing::info;

use crate::api::session::{removal_cookie, session_cookie, session_token};
use crate::api::views;
use crate::error::ApiError;
use crate::AppState;

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

/// Signup form fields
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub phone: String,
    pub password: String,
    /// Defaults to client when the form omits it
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    Role::Client.as_str().to_string()
}

/// Render the login form
pub async fn login_page() -> Html<String> {
    Html(views::login_page())
}

/// Check credentials, open a session and set the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let (_, session) = state.account_service.authenticate(&form.phone, &form.password).await?;

    let jar = jar.add(session_cookie(session.token, state.cookie_secure));
    Ok((jar, Redirect::to("/dashboard")))
}

/// Render the signup form
pub async fn signup_page(State(state): State<AppState>) -> Html<String> {
    Html(views::signup_page(state.allow_privileged_signup))
}

/// Register a new account
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, ApiError> {
    let role = form.role.parse::<Role>()?;

    if role.is_privileged() && !state.allow_privileged_signup {
        return Err(Error::Forbidden(format!("Public signup cannot create {} accounts", role)).into());
    }

    state
        .account_service
        .register_with_role(&form.name, &form.phone, &form.password, role)
        .await?;

    Ok(Redirect::to("/"))
}

/// End the session and clear the cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    if let Some(token) = session_token(&jar) {
        state.account_service.logout(&token).await?;
        info!("Logged out");
    }

    Ok((jar.remove(removal_cookie()), Redirect::to("/")))
}
