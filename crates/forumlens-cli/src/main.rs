//! Demo driver for the forumlens tool client
//!
//! Connects to the browser-automation tool server (optional first argument
//! is the server script path, otherwise the configured default), lists the
//! available tools, then walks one thread URL through navigate, snapshot
//! and comment extraction. A failed tool call is reported and the session
//! continues; only a failed connect aborts.

use std::env;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use forumlens_core::{ClientConfig, ConsoleLogger, ForumSite, Logger, McpClient};

#[tokio::main]
async fn main() -> ExitCode {
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new());

    let config = match ClientConfig::load_user() {
        Ok(config) => config,
        Err(e) => {
            logger.error(&format!("failed to load config: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let server_script = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.server_script.clone());

    let mut client = McpClient::new(logger.clone());
    if let Some(deadline) = config.call_timeout() {
        client = client.with_call_timeout(deadline);
    }

    if let Err(e) = client
        .connect_with(&server_script, &config.launch_registry())
        .await
    {
        logger.error(&format!(
            "connect to {} failed: {e}",
            server_script.display()
        ));
        return ExitCode::FAILURE;
    }

    let code = run_session(&client, &config, logger.as_ref()).await;

    if let Err(e) = client.close().await {
        logger.warn(&format!("shutdown: {e}"));
    }
    code
}

async fn run_session(client: &McpClient, config: &ClientConfig, logger: &dyn Logger) -> ExitCode {
    match client.list_tools().await {
        Ok(tools) => {
            println!("tools exposed by the server:");
            for tool in &tools {
                println!("  {}: {}", tool.name, tool.description);
            }
        }
        Err(e) => logger.error(&format!("tool discovery failed: {e}")),
    }

    let url = match prompt("forum thread URL to extract: ") {
        Ok(url) if !url.is_empty() => url,
        Ok(_) => {
            logger.warn("no URL entered, nothing to do");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            logger.error(&format!("failed to read URL: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match client.navigate_to(&url).await {
        // give the page time to finish loading before snapshotting
        Ok(_) => tokio::time::sleep(config.navigate_settle()).await,
        Err(e) => logger.error(&format!("navigate_page failed: {e}")),
    }

    match client.capture_snapshot(&config.snapshot_path).await {
        Ok(_) => println!("snapshot written to {}", config.snapshot_path.display()),
        Err(e) => logger.error(&format!("take_snapshot failed: {e}")),
    }

    let site = if url.contains("autohome.com") {
        ForumSite::Autohome
    } else {
        ForumSite::Dongchedi
    };
    match client.extract_comments(site, url.as_str()).await {
        Ok(text) => println!("{text}"),
        Err(e) => logger.error(&format!("{} failed: {e}", site.tool_name())),
    }

    ExitCode::SUCCESS
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
