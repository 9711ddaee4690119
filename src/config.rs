use std::env;

/// What happens when `pay`/`deliver` is called on an order that is already
/// in that state. The storefront clients never issue a repeat call, so the
/// behavior is a deployment decision rather than a hard-coded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatTransition {
    /// Stamp the timestamp again and answer success.
    Restamp,
    /// Answer 400 with an "already paid/delivered" message.
    Reject,
}

impl RepeatTransition {
    fn from_env() -> Self {
        match env::var("ORDER_REPEAT_TRANSITION").as_deref() {
            Ok("reject") => RepeatTransition::Reject,
            _ => RepeatTransition::Restamp,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub page_size: i64,
    pub repeat_transition: RepeatTransition,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_secret = env::var("JWT_SECRET")?;
        let access_token_minutes = env::var("ACCESS_TOKEN_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(30);
        let refresh_token_days = env::var("REFRESH_TOKEN_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);
        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(8);
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            access_token_minutes,
            refresh_token_days,
            page_size,
            repeat_transition: RepeatTransition::from_env(),
        })
    }
}
