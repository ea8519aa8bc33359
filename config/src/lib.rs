pub mod settings;

pub use settings::Settings;

/// Load environment variables from .env files, ~/.env first and then the
/// project directory's .env, so project values win. Call before parsing CLI
/// args so env-backed flags see them.
pub fn load_env_file() {
    if let Some(home) = dirs::home_dir() {
        dotenv::from_path(home.join(".env")).ok();
    }
    dotenv::dotenv().ok();
}
