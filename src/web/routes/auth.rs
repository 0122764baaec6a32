use askama::Template;
use axum::{
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use cookie::Cookie;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct AuthTokens {
    access_token: String,
    refresh_token: String,
}

#[derive(Deserialize)]
struct AuthServiceResponse {
    #[serde(rename = "success")]
    _success: bool,
    data: AuthTokens,
}

fn auth_service_url() -> String {
    std::env::var("AUTH_SERVICE_URL").unwrap_or_else(|_| "http://auth.localhost:8080".to_string())
}

pub async fn login_page() -> Html<String> {
    let template = LoginTemplate;
    Html(template.render().unwrap())
}

pub async fn login_handler(Form(form): Form<LoginForm>) -> Result<Response, Html<String>> {
    let url = format!(
        "{}/api/v1/auth/login",
        auth_service_url().trim_end_matches('/')
    );
    println!("🔐 Login attempt for {} via {}", form.email, url);

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&json!({
            "email": form.email,
            "password": form.password,
        }))
        .send()
        .await;

    let resp = match response {
        Ok(r) => r,
        Err(e) => {
            error!("Auth service unreachable: {}", e);
            return Err(render_error(format!("Connection error: {}", e)));
        }
    };

    let status = resp.status();
    if !status.is_success() {
        error!("Auth service rejected login: {}", status);
        return Err(render_error(format!("Login failed: {}", status)));
    }

    let tokens = match resp.json::<AuthServiceResponse>().await {
        Ok(wrapper) => wrapper.data,
        Err(e) => {
            error!("Auth response parse error: {}", e);
            return Err(render_error(format!("Parse error: {}", e)));
        }
    };

    let mut response = Redirect::to("/scanner").into_response();
    for (name, value) in [
        ("access_token", tokens.access_token),
        ("refresh_token", tokens.refresh_token),
    ] {
        let mut c = Cookie::new(name, value);
        c.set_path("/");
        c.set_http_only(true);
        c.set_same_site(cookie::SameSite::Lax);
        response
            .headers_mut()
            .append(header::SET_COOKIE, c.to_string().parse().unwrap());
    }

    println!("✅ Login ok, redirecting to /scanner");
    Ok(response)
}

pub async fn logout_handler() -> Response {
    let mut response = Redirect::to("/login").into_response();
    for name in ["access_token", "refresh_token"] {
        let mut c = Cookie::new(name, "");
        c.set_path("/");
        c.set_http_only(true);
        c.set_same_site(cookie::SameSite::Lax);
        c.set_max_age(None);
        response
            .headers_mut()
            .append(header::SET_COOKIE, c.to_string().parse().unwrap());
    }
    response
}

fn render_error(message: String) -> Html<String> {
    let template = ErrorTemplate { message };
    Html(template.render().unwrap())
}
