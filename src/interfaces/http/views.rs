use super::handler::{PredictionView, RequestError, RequestState};
use crate::interfaces::chart::currency_symbol;

const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 0; background: #f5f6f8; color: #202124; }
main { max-width: 880px; margin: 40px auto; padding: 24px 32px; background: white; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,.12); }
form { display: flex; gap: 12px; align-items: center; margin-bottom: 24px; }
input[type=date] { padding: 6px 8px; font-size: 15px; }
button { padding: 7px 16px; font-size: 15px; cursor: pointer; }
.error { padding: 12px 16px; border-left: 4px solid #D93025; background: #fce8e6; }
.action { font-weight: bold; }
.price-chart { width: 100%; min-height: 420px; }
.price-chart--empty { min-height: 0; color: #5f6368; }
"#;

/// Renders the page for any request state. Non-terminal states show the form.
pub fn render(state: &RequestState) -> String {
    let body = match state {
        RequestState::Responding(view) => {
            format!("{}{}", render_form(Some(view.as_ref())), render_prediction(view))
        }
        RequestState::Error(err) => format!("{}{}", render_form(None), render_error(err)),
        RequestState::AwaitingInput
        | RequestState::Validating { .. }
        | RequestState::Predicting { .. } => render_form(None),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Crypto Price Prediction</title>
<style>{}</style>
</head>
<body>
<main>
<h1>Crypto Price Prediction</h1>
{}
</main>
</body>
</html>
"#,
        STYLE, body
    )
}

fn render_form(view: Option<&PredictionView>) -> String {
    let value = view
        .map(|v| format!(r#" value="{}""#, v.selected_date.format("%Y-%m-%d")))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="/">
<label for="date">Start date</label>
<input type="date" id="date" name="date" required{}>
<button type="submit">Predict</button>
</form>
"#,
        value
    )
}

fn render_prediction(view: &PredictionView) -> String {
    let rec = &view.recommendation;
    format!(
        r#"<section class="prediction">
<p>Predicted price on {last_date}: <strong>{symbol}{price}</strong></p>
<p>Recommended action: <span class="action" style="color: {color}">{action}</span></p>
<p class="recommendation">{rationale}</p>
{chart}
</section>
"#,
        last_date = view
            .series
            .last()
            .map(|p| p.date)
            .unwrap_or(view.selected_date)
            .format("%Y-%m-%d"),
        symbol = escape_html(&currency_symbol(&view.currency)),
        price = format_price(view.predicted_price),
        color = rec.action.color_hex(),
        action = rec.action,
        rationale = escape_html(&rec.rationale),
        chart = view.chart_html,
    )
}

fn render_error(err: &RequestError) -> String {
    format!(
        "<p class=\"error\" role=\"alert\">{}</p>\n",
        escape_html(&err.message)
    )
}

/// Two decimals with thousands separators, e.g. `3,512,004.25`.
pub fn format_price(price: f64) -> String {
    let formatted = format!("{:.2}", price.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if price < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
