//! Server-rendered pages
//!
//! Nothing user-supplied is interpolated except artifact tokens, which are
//! validated hex before they get here.

use crate::operation::Operation;
use axum::response::Html;
use pdf_artifacts::ArtifactToken;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 44rem; margin: 2rem auto; padding: 0 1rem; color: #222; }
a { color: #b3261e; }
label { display: block; margin: 0.75rem 0 0.25rem; font-weight: 600; }
input, select, button { font: inherit; }
button, .button { margin-top: 1.25rem; padding: 0.5rem 1.25rem; background: #b3261e; color: #fff; border: 0; border-radius: 4px; text-decoration: none; cursor: pointer; }
.tools { list-style: none; padding: 0; }
.tools li { margin: 0 0 1rem; }
.error { color: #b3261e; margin-top: 1rem; }
"#;

// Collects the form into the multipart layout the POST handlers expect
const SCRIPT: &str = r#"
document.querySelector('form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = event.target;
  const error = form.querySelector('.error');
  error.textContent = '';

  const data = new FormData();
  const settings = {};
  for (const el of form.querySelectorAll('[data-setting]')) settings[el.dataset.setting] = el.value;
  data.append('settings', JSON.stringify(settings));

  const pdf = form.querySelector('input[name=pdf]');
  if (pdf && pdf.files[0]) data.append('pdf', pdf.files[0]);

  const pdfs = form.querySelector('input[name=pdfs]');
  if (pdfs) [...pdfs.files].forEach((file, i) => data.append(`pdfs[${i}]`, file));

  const images = form.querySelector('input[name=images]');
  const rotation = form.querySelector('input[name=rotation]');
  const positions = form.querySelector('input[name=positions]');
  const indexes = positions ? positions.value.split(',').map((p) => p.trim()) : [];
  if (images) [...images.files].forEach((file, i) => {
    data.append(`images[${i}][file]`, file);
    data.append(`images[${i}][rotation]`, rotation ? rotation.value : '0');
    if (indexes[i]) data.append(`images[${i}][index]`, indexes[i]);
  });

  const response = await fetch(form.action, { method: 'POST', body: data });
  if (response.redirected) {
    window.location = response.url;
    return;
  }
  const body = await response.json().catch(() => ({ error: response.statusText }));
  error.textContent = body.error;
});
"#;

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | PDF Tools</title>
<style>{STYLE}</style>
</head>
<body>
<header><a href="/">PDF Tools</a></header>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#
    ))
}

pub fn index() -> Html<String> {
    let items: String = Operation::ALL
        .iter()
        .map(|op| {
            format!(
                r#"<li><a href="{}">{}</a><br>{}</li>"#,
                op.form_path(),
                op.title(),
                op.description()
            )
        })
        .collect();
    layout("All tools", &format!(r#"<ul class="tools">{}</ul>"#, items))
}

fn select(setting: &str, label: &str, options: &[(&str, &str)]) -> String {
    let options: String = options
        .iter()
        .map(|(value, text)| format!(r#"<option value="{}">{}</option>"#, value, text))
        .collect();
    format!(
        r#"<label for="{setting}">{label}</label><select id="{setting}" data-setting="{setting}">{options}</select>"#
    )
}

fn page_setup_fields() -> String {
    [
        select(
            "pageSize",
            "Page size",
            &[("A4", "A4"), ("LETTER", "US Letter"), ("FIT", "Fit to content")],
        ),
        select(
            "orientation",
            "Orientation",
            &[("portrait", "Portrait"), ("landscape", "Landscape")],
        ),
        margin_field(),
    ]
    .concat()
}

fn margin_field() -> String {
    select(
        "margin",
        "Margin",
        &[("none", "None"), ("small", "Small (10 mm)"), ("big", "Big (20 mm)")],
    )
}

const DPI_FIELD: &str = r#"<label for="dpi">Image resolution (DPI)</label><input id="dpi" type="number" min="1" value="300" data-setting="dpi">"#;
const ROTATION_FIELD: &str = r#"<label for="rotation">Rotate images (degrees)</label><input id="rotation" name="rotation" type="number" value="0">"#;

fn fields(op: Operation) -> String {
    match op {
        Operation::ImageToPdf => format!(
            r#"<label for="images">Images</label><input id="images" name="images" type="file" accept="image/*" multiple required>{}{}{}"#,
            ROTATION_FIELD,
            page_setup_fields(),
            DPI_FIELD
        ),
        Operation::AddPages => format!(
            r#"<label for="pdf">PDF</label><input id="pdf" name="pdf" type="file" accept="application/pdf" required>
<label for="images">Images</label><input id="images" name="images" type="file" accept="image/*" multiple required>
<label for="positions">Page positions, one per image (e.g. 1, 4, 4)</label><input id="positions" name="positions" type="text" required>{}{}{}"#,
            ROTATION_FIELD,
            page_setup_fields(),
            DPI_FIELD
        ),
        Operation::Merge => format!(
            r#"<label for="pdfs">PDFs, in order</label><input id="pdfs" name="pdfs" type="file" accept="application/pdf" multiple required>{}"#,
            margin_field()
        ),
        Operation::PageNumbers => format!(
            r#"<label for="pdf">PDF</label><input id="pdf" name="pdf" type="file" accept="application/pdf" required>{}{}{}<label for="pageNumberStart">First number</label><input id="pageNumberStart" type="number" min="1" value="1" data-setting="pageNumberStart">"#,
            select(
                "pageNumberFormat",
                "Format",
                &[
                    ("arabic", "1, 2, 3"),
                    ("roman", "I, II, III"),
                    ("page-n", "Page 1"),
                    ("page-n-of-m", "Page 1 of 10"),
                    ("n-slash-m", "1 / 10"),
                ],
            ),
            select(
                "position",
                "Position",
                &[
                    ("bottom-center", "Bottom center"),
                    ("bottom-left", "Bottom left"),
                    ("bottom-right", "Bottom right"),
                    ("top-center", "Top center"),
                    ("top-left", "Top left"),
                    ("top-right", "Top right"),
                ],
            ),
            page_setup_fields()
        ),
    }
}

pub fn form(op: Operation) -> Html<String> {
    let body = format!(
        r#"<p>{}</p>
<form action="{}" method="post" enctype="multipart/form-data">
{}
<div><button type="submit">Create PDF</button></div>
<p class="error" role="alert"></p>
</form>
<script>{}</script>"#,
        op.description(),
        op.post_path(),
        fields(op),
        SCRIPT
    );
    layout(op.title(), &body)
}

/// Confirmation page for a stored artifact
pub fn download(op: Operation, token: &ArtifactToken) -> Html<String> {
    let body = format!(
        r#"<p>Your PDF is ready. The link works once.</p>
<p><a class="button" href="{}" download="output.pdf">Download PDF</a></p>
<p><a href="{}">Start again</a></p>"#,
        op.file_path(token),
        op.form_path()
    );
    layout(op.title(), &body)
}

pub fn not_found() -> Html<String> {
    layout(
        "Page not found",
        r#"<p>There is nothing here. <a href="/">Back to all tools</a>.</p>"#,
    )
}
