//! HTML rendering for the upload page and its result cards.

use base64::{engine::general_purpose::STANDARD, Engine};

use stockaudit_core::{AuditReport, InventoryRecord};
use stockaudit_media::ImageUpload;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; background: #0d1117; color: #e6edf3; }
.glass { background: rgba(255, 255, 255, 0.08); border-radius: 24px; padding: 30px; box-shadow: 0 8px 32px rgba(0,0,0,0.35); }
.card { background: rgba(0,0,0,0.35); border-radius: 18px; padding: 18px; margin-top: 1.5rem; }
.error { border-left: 4px solid #ff4b4b; }
.badge { padding: 8px 20px; border-radius: 20px; font-weight: bold; color: black; display: inline-block; margin-top: 10px; }
pre { white-space: pre-wrap; background: #161b22; padding: 0.75rem; border-radius: 8px; }
h1, .subtitle { text-align: center; }
figure { margin: 0 0 1rem; text-align: center; }
figure img { max-width: 100%; border-radius: 12px; }
"#;

/// Wrap `body` in the full page, with the upload form on top.
pub fn page(body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Smart Inventory Auditor</title>
<style>{STYLE}</style>
</head>
<body>
<div class="glass">
<h1>📦 Smart Inventory Auditor</h1>
<p class="subtitle">Upload an image → vision model identifies → inventory checked</p>
<form method="post" action="/audit" enctype="multipart/form-data">
<label>📷 Upload Item Image <input type="file" name="image" accept=".jpg,.jpeg,.png" required></label>
<button type="submit">Audit</button>
</form>
{body}
</div>
</body>
</html>"#
    )
}

/// Result card for an identified item, headed by the uploaded image.
pub fn report_card(report: &AuditReport, upload: &ImageUpload) -> String {
    format!(
        r#"<div class="card">
{preview}
<p>✅ Item Identified</p>
<p><strong>🧾 Item:</strong> <code>{item}</code><br>
<strong>🧠 Reasoning:</strong> {reasoning}<br>
<strong>📊 Stock Count:</strong> {count}</p>
{badge}
</div>"#,
        item = html_escape(&report.item),
        reasoning = html_escape(&report.reasoning),
        count = report.inventory.count,
        preview = image_preview(upload),
        badge = stock_badge(&report.inventory),
    )
}

/// The upload inlined as a data URL.
pub fn image_preview(upload: &ImageUpload) -> String {
    format!(
        r#"<figure><img src="data:{mime};base64,{data}" alt="Uploaded Item"><figcaption>Uploaded Item</figcaption></figure>"#,
        mime = upload.mime_type,
        data = STANDARD.encode(&upload.data),
    )
}

pub fn stock_badge(record: &InventoryRecord) -> String {
    format!(
        r#"<span class="badge" style="background:{color};">{label}</span>"#,
        color = record.stock_level.badge_color(),
        label = record.stock_level.label(),
    )
}

/// Error card, with the offending text shown verbatim when there is any.
pub fn error_card(title: &str, message: &str, raw: Option<&str>) -> String {
    let raw_block = raw
        .map(|r| format!("<pre>{}</pre>", html_escape(r)))
        .unwrap_or_default();
    format!(
        r#"<div class="card error">
<p><strong>{title}</strong></p>
<p>{message}</p>
{raw_block}
</div>"#,
        title = html_escape(title),
        message = html_escape(message),
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
