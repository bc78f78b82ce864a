use colored::Colorize;
use epicdash_core::atlassian::error::JiraError;
use epicdash_core::atlassian::jira::{transform_myself, ConnectionOutput, JiraUser};

use super::{create_jira_client, get_json, ConnectionOptions, Credentials, JiraConfig};
use crate::prelude::{eprintln, println, *};

/// Options for testing the connection to Jira
#[derive(Debug, clap::Args, Clone)]
pub struct WhoamiOptions {
    #[clap(flatten)]
    pub connection: ConnectionOptions,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public data function: validate the token against `/rest/api/2/myself`
pub async fn test_connection_data(
    config: &JiraConfig,
    credentials: &Credentials,
) -> std::result::Result<ConnectionOutput, JiraError> {
    let client = create_jira_client(credentials).map_err(|e| JiraError::Network(e.to_string()))?;
    let user: JiraUser = get_json(&client, &config.rest_url("api/2/myself"), &[]).await?;

    Ok(transform_myself(user))
}

/// Handle the whoami command
pub async fn handler(options: WhoamiOptions, global: crate::Global) -> Result<()> {
    let (config, credentials) = options.connection.resolve();

    if !credentials.has_token() {
        return Err(Error::MissingToken.into());
    }

    if global.verbose {
        eprintln!("Testing connection to {}", config.base_url);
    }

    let spinner = new_spinner("Testing connection...")?;
    let result = test_connection_data(&config, &credentials).await;
    spinner.finish_and_clear();

    let user = result.map_err(Error::from)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", "Connection successful!".bold().green());
    println!();
    println!("{} {}", "Logged in as:".bold().cyan(), user.display_name);
    println!("{} {}", "Email:".bold().cyan(), user.email_address);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::{routing::get, Json, Router};

    async fn myself(headers: HeaderMap) -> Response {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer good") => Json(serde_json::json!({
                "name": "jsmith",
                "displayName": "Jane Smith",
                "emailAddress": "jane@example.com"
            }))
            .into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    async fn stub_config() -> JiraConfig {
        let base = spawn_stub(Router::new().route("/rest/api/2/myself", get(myself))).await;
        JiraConfig { base_url: base }
    }

    #[tokio::test]
    async fn test_connection_with_valid_token() {
        let config = stub_config().await;

        let user = test_connection_data(&config, &Credentials::from_token(Some("good".to_string())))
            .await
            .unwrap();

        assert_eq!(user.display_name, "Jane Smith");
        assert_eq!(user.email_address, "jane@example.com");
    }

    #[tokio::test]
    async fn test_connection_with_invalid_token() {
        let config = stub_config().await;

        let err = test_connection_data(&config, &Credentials::from_token(Some("bad".to_string())))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_handler_requires_token() {
        let options = WhoamiOptions {
            connection: ConnectionOptions {
                base_url: Some("http://127.0.0.1:9".to_string()),
                token: Some("  ".to_string()),
            },
            json: true,
        };

        let err = handler(options, crate::Global { verbose: false })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Please enter a Personal Access Token first");
    }
}
