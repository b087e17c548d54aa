//! Response cache commands

use super::{builder, client, ClientOptions};
use crate::app::{CacheAction, CacheArgs};
use anyhow::Result;

pub async fn run(args: CacheArgs, opts: &ClientOptions) -> Result<()> {
    match args.action {
        CacheAction::Path(entity) => {
            let builder = builder(&entity.entity, opts).await?;
            println!("{}", builder.default_cache_path().display());
        }
        CacheAction::Clear(entity) => {
            let path = builder(&entity.entity, opts).await?.default_cache_path();
            if !path.exists() {
                println!("No cache at {}", path.display());
                return Ok(());
            }
            let opts = ClientOptions {
                cache: true,
                ..opts.clone()
            };
            let client = client(&entity.entity, &opts).await?;
            client.clear_cache()?;
            println!("Cleared {}", path.display());
        }
    }
    Ok(())
}
