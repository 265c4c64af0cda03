use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_port: u16,
    pub users_file: String,
    pub frontend_url: Option<String>,
    pub bootstrap_admin_username: Option<String>,
    pub bootstrap_admin_password: Option<String>,
    pub bootstrap_admin_email: Option<String>,
    pub is_production: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);
        let users_file = env::var("USERS_FILE").unwrap_or_else(|_| "users.json".into());
        let frontend_url = env::var("FRONTEND_URL").ok();
        let bootstrap_admin_username = env::var("BOOTSTRAP_ADMIN_USERNAME").ok();
        let bootstrap_admin_password = env::var("BOOTSTRAP_ADMIN_PASSWORD").ok();
        let bootstrap_admin_email = env::var("BOOTSTRAP_ADMIN_EMAIL").ok();
        let is_production = matches!(
            env::var("RUST_ENV").ok().as_deref(),
            Some("production") | Some("prod")
        );

        if is_production {
            if let Some(password) = bootstrap_admin_password.as_deref() {
                if password.len() < 8 {
                    anyhow::bail!(
                        "BOOTSTRAP_ADMIN_PASSWORD must be at least 8 characters in production"
                    );
                }
            }
        }

        Ok(Self {
            api_port,
            users_file,
            frontend_url,
            bootstrap_admin_username,
            bootstrap_admin_password,
            bootstrap_admin_email,
            is_production,
        })
    }
}
