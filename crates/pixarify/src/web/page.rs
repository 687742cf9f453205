//! HTML rendering for the single-page form.

use pixarify_core::{Interaction, InteractionState, PipelineError, UploadedImage};

const TITLE: &str = "📸Pixarify";
const SUBTITLE: &str = "✨Transform Yourself into a Pixar Character";
const UPLOAD_LABEL: &str =
    "Upload a close-up headshot or portrait of yourself, and become a Pixar-style character!";
const SUBMIT_LABEL: &str = "Generate Pixarified Image";
const SPINNER_TEXT: &str = "🪄 Pixarifying your image, please wait...";
const RETRY_LABEL: &str = "Try Again with New Image";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
h1 { margin-bottom: 0; }
h2 { font-weight: 400; margin-top: .25rem; }
form { display: flex; flex-direction: column; gap: 1rem; }
button, .retry { align-self: flex-start; padding: .5rem 1rem; border: 1px solid #ccc; border-radius: .5rem; background: #fff; cursor: pointer; color: inherit; text-decoration: none; }
figure { margin: 1rem 0; }
figure img { width: 100%; border-radius: .5rem; }
figcaption { color: #808495; font-size: .9rem; text-align: center; }
.error { background: #ffe9e9; color: #7d353b; padding: 1rem; border-radius: .5rem; white-space: pre-wrap; word-break: break-word; }
#spinner { display: none; align-items: center; gap: .75rem; }
#spinner.active { display: flex; }
#spinner .wheel { width: 1.25rem; height: 1.25rem; border: 3px solid #eee; border-top-color: #ff4b4b; border-radius: 50%; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Pixarify</title>
<style>{STYLE}</style>
</head>
<body>
<h1>{TITLE}</h1>
<h2>{SUBTITLE}</h2>
{body}
</body>
</html>
"#
    )
}

/// The initial (`Idle`) page: file picker and trigger.
pub fn upload_form() -> String {
    layout(&format!(
        r#"<form action="/pixarify" method="post" enctype="multipart/form-data"
      onsubmit="document.getElementById('spinner').classList.add('active'); this.querySelector('button').disabled = true;">
<label for="image">{UPLOAD_LABEL}</label>
<input id="image" name="image" type="file" accept=".jpg,.jpeg,.png,image/jpeg,image/png" required>
<button type="submit">{SUBMIT_LABEL}</button>
<div id="spinner" role="status"><div class="wheel"></div><span>{SPINNER_TEXT}</span></div>
</form>"#
    ))
}

fn figure(src: &str, caption: &str) -> String {
    format!(
        r#"<figure><img src="{}" alt="{caption}"><figcaption>{caption}</figcaption></figure>"#,
        escape(src)
    )
}

fn error_box(error: &PipelineError) -> String {
    format!(
        r#"<div class="error" role="alert">{}</div>"#,
        escape(&error.to_string())
    )
}

fn retry_link() -> String {
    format!(r#"<a class="retry" href="/">{RETRY_LABEL}</a>"#)
}

/// A rejected upload that never entered the pipeline.
pub fn rejected(error: &PipelineError) -> String {
    layout(&format!("{}\n{}", error_box(error), retry_link()))
}

/// Render whatever a finished interaction holds.
pub fn interaction(interaction: &Interaction) -> String {
    let mut body = String::new();
    if let Some(image) = interaction.uploaded_image() {
        body.push_str(&uploaded(image));
        body.push('\n');
    }

    match interaction.state() {
        InteractionState::Displayed {
            description,
            result,
            ..
        } => {
            body.push_str(&figure(result.url(), "Pixarified Image"));
            body.push_str(&format!(
                "\n<details><summary>Description</summary><p>{}</p></details>",
                escape(description.as_str())
            ));
        }
        InteractionState::Error { error, .. } => body.push_str(&error_box(error)),
        _ => {}
    }

    body.push('\n');
    body.push_str(&retry_link());
    layout(&body)
}

fn uploaded(image: &UploadedImage) -> String {
    figure(&image.data_url(), "Uploaded Image")
}
