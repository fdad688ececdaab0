use chargen::{
    build_prompt,
    logger::{self, LogLevel, LoggerConfig},
    models::{is_known_environment, is_known_outfit, OptionCatalog, OptionEntry},
    Config, GeminiClient, GenerationError, ImageClient, InputState, OutfitMode, Studio,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chargen", version, about = "Place the person from a photo into any scene")]
struct Args {
    /// Photo of the character (PNG, JPEG or WebP)
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Setting of the scene, e.g. "a medieval castle"
    #[arg(short, long, default_value = chargen::state::DEFAULT_ENVIRONMENT)]
    environment: String,

    /// Artistic style: photorealistic, fantasy-art, cyberpunk, watercolor, anime or cartoon
    #[arg(short, long, default_value = chargen::state::DEFAULT_STYLE)]
    style: String,

    /// Predefined outfit, e.g. "pirate costume"
    #[arg(long, default_value = chargen::state::DEFAULT_OUTFIT, conflicts_with = "custom_outfit")]
    outfit: String,

    /// Free-form outfit description
    #[arg(long)]
    custom_outfit: Option<String>,

    /// What the character is doing
    #[arg(short, long, default_value = chargen::state::DEFAULT_POSE)]
    pose: String,

    /// Where to write the generated image (extension follows the returned type when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    print_prompt: bool,

    /// Print the generated image as a data URI
    #[arg(long)]
    data_uri: bool,

    /// List the environments, styles and outfits offered
    #[arg(long)]
    list_options: bool,

    /// Serve the HTTP front-end instead of generating once
    #[cfg(feature = "server")]
    #[arg(long)]
    serve: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn print_options(title: &str, options: &[OptionEntry]) {
    println!("{}:", title);
    for option in options {
        println!("  {:<28} {}", option.value, option.label);
    }
}

fn inputs_from(args: &Args) -> InputState {
    if !is_known_environment(&args.environment) {
        log::warn!("Environment '{}' is not one of the listed options", args.environment);
    }

    let mut inputs = InputState::new();
    inputs.set_environment(args.environment.clone());
    inputs.set_style(args.style.clone());
    inputs.set_pose(args.pose.clone());
    inputs.set_outfit_value(args.outfit.clone());
    match &args.custom_outfit {
        Some(custom) => {
            inputs.set_outfit_mode(OutfitMode::Custom);
            inputs.set_outfit_value(custom.clone());
        }
        None if !is_known_outfit(&args.outfit) => {
            log::warn!("Outfit '{}' is not one of the listed options", args.outfit);
        }
        None => {}
    }
    inputs
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };
    logger::init_with_config(LoggerConfig::new().with_level(level))?;

    match dotenv::dotenv() {
        Ok(_) => log::debug!("✅ .env file loaded"),
        Err(_) => log::debug!("No .env file found, using system environment variables"),
    }

    if args.list_options {
        let catalog = OptionCatalog::load();
        print_options("Environments", &catalog.environments);
        print_options("Styles", &catalog.styles);
        print_options("Outfits", &catalog.outfits);
        println!("Models:");
        for (id, name, provider) in ImageClient::supported_models() {
            println!("  {:<44} {} ({})", id, name, provider);
        }
        return Ok(());
    }

    if args.print_prompt {
        println!("{}", build_prompt(inputs_from(&args).parameters()));
        return Ok(());
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    let config = Config::from_env();
    logger::log_config_info(&config);

    let client = GeminiClient::new(config.gemini.clone().unwrap_or_default())?;
    let studio = Studio::new(client.image_generator());

    #[cfg(feature = "server")]
    {
        if args.serve {
            chargen::server::run(studio, config.port()).await?;
            return Ok(());
        }
    }

    let loaded = match args.image.as_ref() {
        Some(path) => studio.load_image(path).await,
        None => Err(GenerationError::ImageRequired),
    };
    if let Err(e) = loaded {
        log::error!("❌ {}", e.user_message());
        std::process::exit(1);
    }
    studio.set_parameters(inputs_from(&args).parameters().clone());

    let generated = match studio.generate().await {
        Ok(image) => image,
        Err(e) => {
            log::error!("❌ {}", e.user_message());
            std::process::exit(1);
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("character.{}", generated.extension())));
    tokio::fs::write(&output, generated.decode()?).await?;
    log::info!("💾 Image saved to: {}", output.display());

    if args.data_uri {
        println!("{}", generated.data_uri());
    }

    Ok(())
}
