use anyhow::Result;
use tracing::info;

use crate::watch::{self, WatchOptions};

pub async fn handle_watch(
    command: String,
    args: Vec<String>,
    max_cycles: Option<u32>,
) -> Result<()> {
    info!("Supervising watch command: {} {}", command, args.join(" "));

    let options = WatchOptions {
        command,
        args,
        max_cycles,
    };
    let cycles = watch::supervise(&options).await?;
    println!("Watcher completed {} passes", cycles);
    Ok(())
}
