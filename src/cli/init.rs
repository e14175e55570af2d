//! Init command implementation
//!
//! Scaffolds a new Folio site: `folio.toml`, `.env.example`, `.gitignore` and
//! the data and upload directories.

use super::output::{Mark, Output};
use std::fs;
use std::path::Path;

/// Result of the init operation
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (folio.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: std::path::PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.section("Initializing Folio site");

    let base_path = &config.path;

    let config_path = base_path.join("folio.toml");
    if config_path.exists() && !config.force {
        output.status(Mark::Warn, "folio.toml already exists, pass --force to overwrite it");
        return InitResult::AlreadyExists;
    }

    for dir in ["data", "uploads"] {
        let dir_path = base_path.join(dir);
        if !dir_path.exists() {
            if let Err(e) = fs::create_dir_all(&dir_path) {
                output.status(Mark::Fail, &format!("Failed to create {}: {}", dir, e));
                return InitResult::Error(e.to_string());
            }
            output.path(Mark::Done, "directory", dir);
        } else {
            output.path(Mark::Skip, "directory", &format!("{} (already exists)", dir));
        }
    }

    let toml_content = generate_folio_toml(&config);
    if let Err(e) = write_file(&config_path, &toml_content, config.force) {
        output.status(Mark::Fail, &format!("Failed to create folio.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.path(Mark::Done, "config", "folio.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.status(Mark::Fail, &format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.path(Mark::Done, "env", ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if !gitignore_path.exists() {
        if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
            output.status(Mark::Warn, &format!("Failed to create .gitignore: {}", e));
        } else {
            output.path(Mark::Done, "file", ".gitignore");
        }
    }

    output.section("Next steps");
    output.step(
        1,
        "Set JWT_SECRET (min 32 chars) and ADMIN_PASSWORD:",
        &["cp .env.example .env"],
    );
    output.step(2, "Start the server:", &["folio-server"]);
    println!();
    output.status(
        Mark::Note,
        &format!(
            "API at http://{}:{}/api, admin login at /api/admin/login",
            config.host, config.port
        ),
    );

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(());
    }
    fs::write(path, content)
}

fn generate_folio_toml(config: &InitConfig) -> String {
    format!(
        r#"# Folio configuration
# Secrets are read from the environment variables named here, never from this file.

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" or "json"
log_format = "pretty"

[auth]
jwt_secret_env = "JWT_SECRET"
# Token lifetime in seconds
jwt_expiry = 86400
# Owner account created on first start
admin_username = "admin"
admin_password_env = "ADMIN_PASSWORD"

[database]
# Local file, or ":memory:"
url = "./data/folio.db"
# Write the sample portfolio when the database is empty
seed_on_start = true

[uploads]
dir = "./uploads"
max_bytes = 10485760

[client]
base_url = "http://{host}:{port}"
# Dashboard summary refresh interval
poll_interval_ms = 3000
timeout_secs = 10
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    r#"# Folio Environment Variables
# ===========================
# Copy this file to .env and fill in the values.

# REQUIRED: JWT secret for admin tokens (minimum 32 characters)
# Generate with: openssl rand -base64 32
JWT_SECRET=change-me-in-production-use-at-least-32-characters

# Initial password of the owner account (only used when it does not exist yet)
ADMIN_PASSWORD=change-me-too

# Optional: Logging level (trace, debug, info, warn, error)
RUST_LOG=info,folio=debug
"#
    .to_string()
}

fn generate_gitignore() -> String {
    r#"# Folio Generated Files
/data/
/uploads/
*.db
*.db-journal

# Environment
.env
.env.local
.env.*.local

# Rust
/target/

# OS
.DS_Store
Thumbs.db
"#
    .to_string()
}
