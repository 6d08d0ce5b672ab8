//! CLI tool for generating slide decks.

use anyhow::{Context, Result};
use clap::Parser;
use deck_core::prompt::output_file_name;
use deck_core::types::DEFAULT_TARGET_SLIDES;
use deck_core::{generate_deck, DeckRequest, FixedOutline, Outline, OutlineGenerator, SlideAllocator, Theme};
use deck_mistral::config::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use deck_mistral::{ClientConfig, MistralClient};
use deck_pptx::{preview, read_reference, PptxWriter};
use std::fs;
use std::path::{Path, PathBuf};

/// Generate a PowerPoint deck from a topic.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Presentation topic or description (may include instructions such as
    /// "leave slide 3 blank")
    #[arg(required_unless_present = "outline")]
    topic: Option<String>,

    /// Text file with additional spoken details
    #[arg(short, long)]
    transcript: Option<PathBuf>,

    /// Reference document (.txt, .md, .pdf, .docx, .pptx, .csv, .xlsx or .xls)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Target number of slides [default: 15, or `target_slides` from --outline]
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u16).range(10..=25))]
    slides: Option<u16>,

    /// Color theme: modern_blue, elegant_dark, vibrant or minimal
    #[arg(long, default_value = "modern_blue")]
    theme: String,

    /// Ask for concise rather than detailed content
    #[arg(long)]
    concise: bool,

    /// Use an outline JSON file instead of calling the generator
    #[arg(long)]
    outline: Option<PathBuf>,

    /// Output file (default: derived from the topic)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the outline as JSON to stdout
    #[arg(long)]
    dump_outline: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Mistral API key
    #[arg(long, env = "MISTRAL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Mistral API base URL
    #[arg(long, env = "MISTRAL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Model name
    #[arg(long, env = "MISTRAL_MODEL", default_value = DEFAULT_MODEL)]
    model: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let fixed = args.outline.as_deref().map(load_outline).transpose()?;
    let topic = args
        .topic
        .clone()
        .or_else(|| fixed.as_ref().map(|outline| outline.title.clone()))
        .unwrap_or_default();

    let target_slides = args.target_slides(fixed.as_ref());
    let mut request = DeckRequest::new(topic, target_slides).with_detailed(!args.concise);

    if let Some(path) = &args.transcript {
        let transcript = fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript {}", path.display()))?;
        request = request.with_transcript(transcript);
    }

    if let Some(path) = &args.reference {
        match read_reference(path) {
            Ok(text) => {
                if args.verbose {
                    eprintln!("Reference material:\n{}", preview(&text));
                }
                request = request.with_reference(text);
            }
            Err(e) => {
                log::warn!("Ignoring reference {}: {}", path.display(), e);
            }
        }
    }

    let generator: Box<dyn OutlineGenerator> = match fixed {
        Some(outline) => Box::new(FixedOutline(outline)),
        None => Box::new(build_client(&args)?),
    };

    let (outline, deck) = generate_deck(generator.as_ref(), &SlideAllocator::new(), &request)
        .context("Failed to generate presentation")?;

    if args.dump_outline {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(output_file_name(&request.topic)));
    let theme = Theme::from_name(&args.theme);
    let path = PptxWriter::new(theme)
        .save(&deck, &output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    println!("Saved presentation to {}", path.display());
    let report = deck.report();
    if report.is_exact() {
        println!("Created {}", report);
    } else {
        eprintln!("Warning: {}", report);
    }

    Ok(())
}

impl Args {
    /// An explicit `--slides` wins over the outline file's `target_slides`.
    fn target_slides(&self, fixed: Option<&Outline>) -> usize {
        match (self.slides, fixed) {
            (Some(slides), Some(outline)) => {
                let slides = usize::from(slides);
                if slides != outline.target_slides {
                    log::warn!(
                        "--slides {} overrides target_slides {} from the outline file",
                        slides,
                        outline.target_slides
                    );
                }
                slides
            }
            (Some(slides), None) => usize::from(slides),
            (None, Some(outline)) => outline.target_slides,
            (None, None) => DEFAULT_TARGET_SLIDES,
        }
    }
}

/// Load an outline JSON file; a missing `target_slides` defaults to 15.
fn load_outline(path: &Path) -> Result<Outline> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read outline {}", path.display()))?;
    Outline::from_json(&json, DEFAULT_TARGET_SLIDES)
        .with_context(|| format!("Invalid outline {}", path.display()))
}

fn build_client(args: &Args) -> Result<MistralClient> {
    let config = ClientConfig::new()
        .with_base_url(&args.base_url)
        .with_model(&args.model);

    let client = match &args.api_key {
        Some(key) => MistralClient::new(key.as_str(), config),
        None => MistralClient::from_env(config),
    };
    client.context("Cannot create the Mistral client (set MISTRAL_API_KEY or pass --api-key)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_slide_range() {
        assert!(Args::try_parse_from(["deckgen", "Bees", "--slides", "9"]).is_err());
        assert!(Args::try_parse_from(["deckgen", "Bees", "--slides", "26"]).is_err());

        let args = Args::try_parse_from(["deckgen", "Bees", "-n", "25"]).unwrap();
        assert_eq!(args.slides, Some(25));
        let args = Args::try_parse_from(["deckgen", "Bees"]).unwrap();
        assert_eq!(args.slides, None);
        assert_eq!(args.target_slides(None), 15);
    }

    #[test]
    fn test_outline_file_target_kept_unless_slides_given() {
        let fixed = Outline::new("Bees").with_target_slides(12);

        let args = Args::try_parse_from(["deckgen", "--outline", "deck.json"]).unwrap();
        assert_eq!(args.target_slides(Some(&fixed)), 12);

        let args = Args::try_parse_from(["deckgen", "--outline", "deck.json", "-n", "20"]).unwrap();
        assert_eq!(args.target_slides(Some(&fixed)), 20);
    }

    #[test]
    fn test_topic_optional_with_outline() {
        assert!(Args::try_parse_from(["deckgen"]).is_err());
        let args = Args::try_parse_from(["deckgen", "--outline", "deck.json"]).unwrap();
        assert!(args.topic.is_none());
        assert_eq!(args.outline, Some(PathBuf::from("deck.json")));
    }
}
