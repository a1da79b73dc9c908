use dotenvy::dotenv;
use std::env;

use crate::attendance::classifier::PunctualityRules;
use crate::clock::parse_clock_time;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    /// Business start as minutes of day, parsed once from `BUSINESS_START`.
    pub business_start_minutes: u32,
    pub grace_minutes: u32,
    pub max_page_size: u32,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .expect("ACCESS_TOKEN_TTL must be an integer number of seconds"),

            business_start_minutes: parse_clock_time(
                &env::var("BUSINESS_START").unwrap_or_else(|_| "09:00".to_string()),
            )
            .expect("BUSINESS_START must be HH:MM"),
            grace_minutes: env::var("GRACE_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("GRACE_MINUTES must be an integer number of minutes"),
            max_page_size: env::var("MAX_PAGE_SIZE")
                .unwrap_or_else(|_| "200".to_string())
                .parse()
                .expect("MAX_PAGE_SIZE must be an integer"),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn punctuality_rules(&self) -> PunctualityRules {
        PunctualityRules {
            business_start_minutes: self.business_start_minutes,
            grace_minutes: self.grace_minutes,
        }
    }
}
