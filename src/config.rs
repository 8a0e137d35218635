use std::env;

/// Runtime configuration, assembled once at startup and handed to the app
/// builder. Nothing else in the crate reads the process environment.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Secret key for signing and verifying auth tokens.
    pub jwt_secret: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// `SERVER_HOST` and `SERVER_PORT` fall back to `127.0.0.1:8080`.
    /// `DATABASE_URL` and `JWT_SECRET` have no sensible default; their
    /// absence is a fatal configuration error.
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "config-test-secret");
        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.jwt_secret, "config-test-secret");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");

        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("SERVER_PORT", "3000");

        let config = Config::from_env();

        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3000);

        env::remove_var("SERVER_HOST");
        env::remove_var("SERVER_PORT");
    }
}
