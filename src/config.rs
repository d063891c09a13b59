//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_JWT_SECRET: &str = "payslip-server-jwt-secret-change-in-production";
const DEFAULT_BREVO_BASE_URL: &str = "https://api.brevo.com";
const DEFAULT_FROM_EMAIL: &str = "office@ticketothemoon.com";
const DEFAULT_FROM_NAME: &str = "Ticket To The Moon";
const DEFAULT_ADDRESS: &str = "Jl. Muding Batu Sangian IV no 10, Kerobokan";
const DEFAULT_CONTACT: &str = "Telp: 0361-419288 | www.ticketothemoon.com";
const DEFAULT_SEND_DELAY_MS: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to hash office password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// The single office account allowed to use the service.
#[derive(Debug, Clone)]
pub struct OfficeAccount {
    pub email: String,
    pub password_hash: String,
}

impl OfficeAccount {
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Font and image files used by the slip renderer.
#[derive(Debug, Clone)]
pub struct SlipAssets {
    pub fonts_dir: PathBuf,
    pub font_family: String,
    pub logo_path: Option<PathBuf>,
    pub stamp_path: Option<PathBuf>,
}

/// Company lines printed at the top right of every slip.
#[derive(Debug, Clone)]
pub struct Letterhead {
    pub address: String,
    pub contact: String,
}

impl Default for Letterhead {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            contact: DEFAULT_CONTACT.to_string(),
        }
    }
}

/// Everything needed to render and email slips, without the HTTP and login settings.
#[derive(Debug, Clone)]
pub struct DeliverySettings {
    pub brevo: BrevoConfig,
    pub sender: Contact,
    pub send_delay: Duration,
    pub assets: SlipAssets,
    pub letterhead: Letterhead,
}

impl DeliverySettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = optional("BREVO_API_KEY");
        if api_key.is_none() {
            log::warn!("BREVO_API_KEY not set, sending payslips will fail");
        }

        Ok(Self {
            brevo: BrevoConfig {
                api_key,
                base_url: optional("BREVO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BREVO_BASE_URL.to_string()),
            },
            sender: Contact {
                name: optional("FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
                email: optional("FROM_EMAIL").unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            },
            send_delay: Duration::from_millis(parsed("SEND_DELAY_MS", DEFAULT_SEND_DELAY_MS)?),
            assets: SlipAssets {
                fonts_dir: path_or("FONTS_DIR", "./fonts"),
                font_family: optional("FONT_FAMILY")
                    .unwrap_or_else(|| "LiberationSans".to_string()),
                logo_path: Some(path_or("LOGO_PATH", "./assets/logo-06.jpg")),
                stamp_path: Some(path_or("STAMP_PATH", "./assets/tttm_hrd_stamp.jpg")),
            },
            letterhead: Letterhead {
                address: optional("COMPANY_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
                contact: optional("COMPANY_CONTACT").unwrap_or_else(|| DEFAULT_CONTACT.to_string()),
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub office: OfficeAccount,
    pub jwt_secret: String,
    pub brevo: BrevoConfig,
    pub sender: Contact,
    pub send_delay: Duration,
    pub assets: SlipAssets,
    pub letterhead: Letterhead,
    pub static_dir: PathBuf,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let office_email = required("OFFICE_EMAIL")?;
        let password_hash = match optional("OFFICE_PASSWORD_HASH") {
            Some(hash) => hash,
            None => {
                let password = required("OFFICE_PASSWORD")?;
                bcrypt::hash(password, bcrypt::DEFAULT_COST)?
            }
        };

        let jwt_secret = optional("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("JWT_SECRET not set, using default secret. SET THIS IN PRODUCTION!");
            DEFAULT_JWT_SECRET.to_string()
        });

        let DeliverySettings {
            brevo,
            sender,
            send_delay,
            assets,
            letterhead,
        } = DeliverySettings::from_env()?;

        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed("PORT", 5000)?,
            office: OfficeAccount {
                email: office_email,
                password_hash,
            },
            jwt_secret,
            brevo,
            sender,
            send_delay,
            assets,
            letterhead,
            static_dir: path_or("STATIC_DIR", "./static"),
            cors_origins: optional("CORS_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or_else(|| {
                    vec![
                        "http://localhost:5173".to_string(),
                        "http://localhost:3000".to_string(),
                        "http://localhost:5000".to_string(),
                        "http://127.0.0.1:5000".to_string(),
                    ]
                }),
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn parsed<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match optional(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

fn path_or(key: &str, default: &str) -> PathBuf {
    PathBuf::from(optional(key).unwrap_or_else(|| default.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_value::<u16>("PORT", "eighty"),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://a.test, ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_office_email_match_is_case_insensitive() {
        let account = OfficeAccount {
            email: "office@example.com".to_string(),
            password_hash: String::new(),
        };
        assert!(account.matches_email(" Office@Example.com "));
        assert!(!account.matches_email("other@example.com"));
    }
}
