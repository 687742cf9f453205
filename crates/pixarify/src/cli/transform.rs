//! The `pixarify transform` command: one interaction from a local file.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pixarify_core::{Config, GenerationModel, Interaction, Phase, Pipeline};
use serde::Serialize;

/// Arguments for the `transform` command.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Portrait to transform (jpg, jpeg or png)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Generation model preset (overrides generation.model)
    #[arg(short, long)]
    pub model: Option<GenerationModel>,

    /// Which generated output to report (overrides generation.output_index)
    #[arg(long)]
    pub output_index: Option<usize>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct TransformOutput<'a> {
    input: &'a str,
    model: GenerationModel,
    description: &'a str,
    image_url: &'a str,
}

/// Execute the transform command.
pub async fn execute(args: TransformArgs, mut config: Config) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    if let Some(model) = args.model {
        config.generation.model = model;
        // A preset switch without an explicit index falls back to the first output.
        if args.output_index.is_none() {
            config.generation.output_index = 0;
        }
    }
    if let Some(index) = args.output_index {
        config.generation.output_index = index;
    }

    let pipeline = Pipeline::from_config(&config)?;
    let image = pipeline.intake().accept_file(&args.input)?;

    let mut interaction = Interaction::new();
    interaction.upload(image)?;

    let spinner = create_spinner();
    let result = interaction
        .run(&pipeline, |phase| match phase {
            Phase::Describing => spinner.set_message("Describing your portrait..."),
            Phase::Generating => {
                spinner.set_message("🪄 Pixarifying your image, please wait...")
            }
            _ => {}
        })
        .await;
    spinner.finish_and_clear();

    let url = result?;
    let description = interaction
        .description()
        .map(|d| d.as_str())
        .unwrap_or_default();

    if args.json {
        let input = args.input.to_string_lossy();
        let output = TransformOutput {
            input: &input,
            model: config.generation.model,
            description,
            image_url: url.url(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Description: {description}");
        println!("Pixarified image: {url}");
    }

    Ok(())
}

fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: PathBuf) -> TransformArgs {
        TransformArgs {
            input,
            model: None,
            output_index: None,
            json: false,
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.description.api_key = "sk-test".to_string();
        config.generation.api_token = "r8-test".to_string();
        // Unroutable, so any remote call would fail loudly.
        config.description.endpoint = "http://127.0.0.1:9/v1/chat/completions".to_string();
        config.generation.endpoint = "http://127.0.0.1:9/v1".to_string();
        config
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = execute(args(dir.path().join("nope.jpg")), config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Input path does not exist"));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("portrait.gif");
        std::fs::write(&input, b"GIF89a").unwrap();

        let err = execute(args(input), config()).await.unwrap_err();
        assert!(err.to_string().contains("Unsupported image type 'gif'"));
    }

    #[tokio::test]
    async fn test_output_index_out_of_range_for_model() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("portrait.jpg");
        std::fs::write(&input, [0xFF, 0xD8, 0xFF]).unwrap();

        let mut transform = args(input);
        transform.model = Some(GenerationModel::PhotomakerStyle);
        transform.output_index = Some(1);

        assert!(execute(transform, config()).await.is_err());
    }
}
