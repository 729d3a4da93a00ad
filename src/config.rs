use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
pub struct Config {
    #[validate(url)]
    database_url: String,
    api_host: Option<String>,
    api_port: Option<usize>,
    #[validate(url)]
    redis_url: Option<String>,
    #[validate(url)]
    sentry_dsn: Option<String>,
}

lazy_static! {
    static ref CONFIG: Config = match envy::from_env::<Config>() {
        Ok(config) => {
            match config.validate() {
                Ok(()) => config,
                Err(e) => panic!("invalid environment variable: {}", e),
            }
        }
        Err(error) => panic!("Missing or incorrect environment variable: {}", error),
    };
}

impl Config {
    pub fn database_url() -> &'static str {
        CONFIG.database_url.as_ref()
    }

    pub fn api_host() -> &'static str {
        match &CONFIG.api_host {
            Some(host) => host.as_ref(),
            None => "localhost",
        }
    }

    pub fn api_port() -> usize {
        CONFIG.api_port.unwrap_or(8080)
    }

    pub fn redis_url() -> Option<&'static str> {
        CONFIG.redis_url.as_ref().map(|url| url.as_ref())
    }

    pub fn sentry_dsn() -> Option<&'static str> {
        CONFIG.sentry_dsn.as_ref().map(|dsn| dsn.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn parses_a_minimal_environment() {
        let config: Config =
            envy::from_iter(env(&[("DATABASE_URL", "postgres://localhost/turfbook")])).unwrap();

        assert!(config.validate().is_ok());
        assert!(config.api_host.is_none());
        assert!(config.redis_url.is_none());
    }

    #[test]
    fn rejects_a_database_url_that_is_not_a_url() {
        let config: Config = envy::from_iter(env(&[("DATABASE_URL", "definitely not")])).unwrap();

        assert!(config.validate().is_err());
    }
}
