// src/config.rs

use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use url::Url;

pub const DEFAULT_NEWS_FEED_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Public origin of the site; used by server-side clients.
    pub base_url: Url,
    pub port: u16,
    pub rust_log: String,
    /// RSS search endpoint; the exam query is appended as `?q=`.
    pub news_feed_url: Url,
    pub news_queries: Vec<String>,
    pub seed_demo_data: bool,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Reads configuration from the environment (and `.env`, if present).
    ///
    /// Missing or unparsable values fall back to defaults with a warning,
    /// except `BASE_URL` and `NEWS_FEED_URL`, which must be valid URLs when set.
    pub fn from_env() -> Result<Self, url::ParseError> {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/exam-preparation".to_string());

        let base_url = Url::parse(
            &env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        )?;

        let news_feed_url = Url::parse(
            &env::var("NEWS_FEED_URL").unwrap_or_else(|_| DEFAULT_NEWS_FEED_URL.to_string()),
        )?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let news_queries = split_list(
            &env::var("NEWS_QUERIES").unwrap_or_else(|_| "JEE MAIN,NEET,UPSC".to_string()),
        );

        let cors_origins = split_list(&env::var("CORS_ORIGINS").unwrap_or_else(|_| {
            "http://localhost:3000,http://127.0.0.1:3000".to_string()
        }));

        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            base_url,
            port: parse_or("PORT", 3000),
            rust_log,
            news_feed_url,
            news_queries,
            seed_demo_data,
            cors_origins,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/exam-preparation".to_string(),
            base_url: Url::parse("http://localhost:3000").expect("static URL"),
            port: 3000,
            rust_log: "info".to_string(),
            news_feed_url: Url::parse(DEFAULT_NEWS_FEED_URL).expect("static URL"),
            news_queries: vec!["JEE MAIN".into(), "NEET".into(), "UPSC".into()],
            seed_demo_data: false,
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
