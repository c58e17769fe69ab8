use std::{env, path::PathBuf};

use anyhow::{Context, bail};

use crate::share::ContactNumber;

/// Which store checkouts are written to.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// Process-local sheet, lost on restart.
    Memory,
    Sheet {
        spreadsheet_id: String,
        worksheet: String,
        credentials_path: PathBuf,
    },
    Sqlite {
        database_url: String,
        csv_mirror: Option<PathBuf>,
    },
}

impl BackendConfig {
    pub fn database_url(&self) -> Option<&str> {
        match self {
            BackendConfig::Sqlite { database_url, .. } => Some(database_url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub username: String,
    pub role: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_name: String,
    pub currency: String,
    pub whatsapp_number: ContactNumber,
    pub delivery_fee: i64,
    pub jwt_secret: String,
    pub staff: Vec<StaffAccount>,
    pub backend: BackendConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "BUBULIZER Herbal Café".to_string());
        let currency = env::var("CURRENCY").unwrap_or_else(|_| "NGN".to_string());
        let whatsapp_number = ContactNumber::parse(
            &env::var("WHATSAPP_NUMBER").unwrap_or_else(|_| "2348023808592".to_string()),
        )?;
        let delivery_fee = match env::var("DELIVERY_FEE") {
            Ok(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|fee| *fee >= 0)
                .with_context(|| format!("DELIVERY_FEE must be a non-negative integer, got {raw:?}"))?,
            Err(_) => 800,
        };
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let staff = parse_staff_accounts(&env::var("STAFF_ACCOUNTS").unwrap_or_default())?;
        let backend = backend_from_env()?;

        Ok(Self {
            host,
            port,
            app_name,
            currency,
            whatsapp_number,
            delivery_fee,
            jwt_secret,
            staff,
            backend,
        })
    }
}

fn backend_from_env() -> anyhow::Result<BackendConfig> {
    let kind = env::var("ORDER_BACKEND").unwrap_or_else(|_| "sqlite".to_string());
    match kind.as_str() {
        "memory" => Ok(BackendConfig::Memory),
        "sheet" => Ok(BackendConfig::Sheet {
            spreadsheet_id: env::var("SHEET_ID").context("SHEET_ID is not set")?,
            worksheet: env::var("SHEET_WORKSHEET").unwrap_or_else(|_| "Orders".to_string()),
            credentials_path: env::var("GOOGLE_SERVICE_ACCOUNT_FILE")
                .context("GOOGLE_SERVICE_ACCOUNT_FILE is not set")?
                .into(),
        }),
        "sqlite" => {
            let database_url =
                env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://bubulizer.db".to_string());
            let csv_mirror = env::var("CSV_MIRROR_PATH")
                .unwrap_or_else(|_| "orders.csv".to_string());
            let csv_mirror = (!csv_mirror.trim().is_empty()).then(|| PathBuf::from(csv_mirror));
            Ok(BackendConfig::Sqlite {
                database_url,
                csv_mirror,
            })
        }
        other => bail!("ORDER_BACKEND must be one of memory, sheet, sqlite; got {other:?}"),
    }
}

/// `username:role:phc;username:role:phc`. PHC strings contain no `:` or `;`.
pub fn parse_staff_accounts(raw: &str) -> anyhow::Result<Vec<StaffAccount>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(role), Some(hash))
                    if !username.is_empty() && !role.is_empty() && hash.starts_with('$') =>
                {
                    Ok(StaffAccount {
                        username: username.to_string(),
                        role: role.to_string(),
                        password_hash: hash.to_string(),
                    })
                }
                _ => bail!("STAFF_ACCOUNTS entry must be username:role:phc-hash, got {entry:?}"),
            }
        })
        .collect()
}
