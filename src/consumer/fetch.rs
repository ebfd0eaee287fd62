use std::io::Write;

use futures_util::StreamExt;

use crate::config::CookConfig;
use crate::consumer::decode::Utf8StreamDecoder;
use crate::consumer::view::Transcript;
use crate::handlers::RecipeRequest;
use crate::prompt::Ingredients;

/// Submits the ingredient list and streams the recipe to stdout as it
/// arrives. The read loop yields at every chunk boundary, so fragments render
/// incrementally instead of after the full response.
pub async fn run(config: CookConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Same submission rule the relay enforces; an invalid list never leaves
    // the client.
    let ingredients =
        Ingredients::parse(config.ingredients.clone()).map_err(|err| err.message)?;
    log::info!("submitting {} ingredients", ingredients.len());

    let mut transcript = Transcript::new();
    let generation = transcript.begin_submission();

    let client = reqwest::Client::new();
    let url = format!("{}/api/recipe", config.server.trim_end_matches('/'));
    let response = client
        .post(&url)
        .json(&RecipeRequest {
            items: config.ingredients,
        })
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        transcript.fail(generation);
        return Err(format!("recipe request failed ({}): {}", status, detail).into());
    }

    let mut decoder = Utf8StreamDecoder::new();
    let mut stdout = std::io::stdout();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                let fragment = decoder.feed(&bytes);
                if transcript.append(generation, &fragment) {
                    write!(stdout, "{}", fragment)?;
                    stdout.flush()?;
                }
            }
            Err(err) => {
                transcript.fail(generation);
                writeln!(stdout)?;
                return Err(format!(
                    "stream ended before completion, partial recipe is unreliable: {}",
                    err
                )
                .into());
            }
        }
    }

    let tail = decoder.finish();
    if transcript.append(generation, &tail) {
        write!(stdout, "{}", tail)?;
    }
    transcript.complete(generation);
    writeln!(stdout)?;

    Ok(())
}
