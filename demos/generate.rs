use chargen::{GeminiClient, GeminiConfig, OutfitMode, Studio};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    chargen::logger::init()?;

    let photo = env::args()
        .nth(1)
        .ok_or("usage: cargo run --example generate -- <photo.jpg>")?;

    let client = GeminiClient::new(GeminiConfig::from_env())?;
    let studio = Studio::new(client.image_generator());

    studio.load_image(&photo).await?;
    studio.set_environment("a tranquil Japanese garden");
    studio.set_style("watercolor");
    studio.set_outfit_mode(OutfitMode::Custom);
    studio.set_outfit_value("a flowing silk kimono");
    studio.set_pose("holding a paper lantern");

    let image = studio.generate().await?;
    let path = format!("character.{}", image.extension());
    std::fs::write(&path, image.decode()?)?;
    println!("Saved {}", path);

    Ok(())
}
