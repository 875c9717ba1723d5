use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::config::Config;

/// Console stand-in for the chat platform: one stdin line is one inbound
/// message from `user`, replies are printed in order.
pub async fn run(
    config_path: Option<String>,
    user: String,
    dry_run: bool,
    no_cache: bool,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let bot = super::build_bot(&config, dry_run, no_cache)?;

    info!("Chatting as {} (dry run: {})", user, dry_run);
    println!("Type a message and press enter (Ctrl-D to quit). Try \"onboard me\".\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        for reply in bot.handle_message(&user, &line).await {
            println!("{}\n", reply);
        }
    }
    Ok(())
}
