use url::Url;

use crate::app::{AppContext, Result};
use crate::domain::{ControllerState, EntryContent, FeedEntry};

pub async fn fetch(ctx: &AppContext) -> Result<()> {
    let controller = ctx.make_controller();
    controller.on_appear().await;

    match controller.state() {
        ControllerState::Loaded(snapshot) => {
            if let Some(notice) = &snapshot.notice {
                eprintln!("Warning: {notice} (showing cached entries)");
            }
            print_entries(&snapshot.items);
        }
        ControllerState::Failed(message) => {
            eprintln!("Refresh failed: {message}");
        }
        ControllerState::Loading => {
            // on_appear completes its refresh before returning
            eprintln!("Refresh did not complete");
        }
    }
    Ok(())
}

pub async fn cached(ctx: &AppContext) -> Result<()> {
    match ctx.repository.load_cached().await {
        Some(entries) => print_entries(&entries),
        None => println!("No cached feed"),
    }
    Ok(())
}

pub async fn image(ctx: &AppContext, url: &str, output: Option<&std::path::Path>) -> Result<()> {
    let url = Url::parse(url)?;
    let image = ctx.image_loader.load_image(&url).await?;
    println!("{} ({}x{})", url, image.width(), image.height());

    if let Some(path) = output {
        image.save(path)?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

pub async fn clear_cache(ctx: &AppContext) -> Result<()> {
    ctx.text_cache.clear().await;
    ctx.image_disk_cache.clear().await;
    println!("Cache cleared");
    Ok(())
}

fn print_entries(entries: &[FeedEntry]) {
    if entries.is_empty() {
        println!("Feed is empty");
        return;
    }

    for entry in entries {
        match &entry.content {
            EntryContent::Image {
                thumbnail,
                original,
                caption,
            } => {
                if thumbnail == original {
                    print!("image    {original}");
                } else {
                    print!("image    {thumbnail} -> {original}");
                }
                match caption {
                    Some(caption) => println!("  \"{caption}\""),
                    None => println!(),
                }
            }
            EntryContent::Text(text) => println!("text     {text}"),
            EntryContent::InvalidLink(link) => println!("invalid  {link}"),
        }
    }
    println!("{} entries", entries.len());
}
