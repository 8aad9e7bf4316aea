//! Interactive chart rendering for a prediction series.
//!
//! Produces an embeddable HTML fragment driving Plotly.js. The figure is
//! assembled as JSON so the page needs no server-side chart library.

use crate::domain::types::PredictionSeries;
use serde_json::{Value, json};
use std::str::FromStr;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const CHART_ELEMENT_ID: &str = "price-chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTheme {
    #[default]
    Light,
    Dark,
}

impl FromStr for ChartTheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ChartTheme::Light),
            "dark" => Ok(ChartTheme::Dark),
            _ => anyhow::bail!("Invalid CHART_THEME: {}. Must be 'light' or 'dark'", s),
        }
    }
}

impl ChartTheme {
    fn template(&self) -> &'static str {
        match self {
            Self::Light => "plotly_white",
            Self::Dark => "plotly_dark",
        }
    }

    fn background(&self) -> &'static str {
        match self {
            Self::Light => "white",
            Self::Dark => "#111111",
        }
    }

    fn font_color(&self) -> &'static str {
        match self {
            Self::Light => "black",
            Self::Dark => "#EEEEEE",
        }
    }
}

/// Display symbol for a CoinGecko `vs_currency` code.
pub fn currency_symbol(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "inr" => "₹".to_string(),
        "usd" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "jpy" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    }
}

#[derive(Debug, Clone)]
pub struct ChartRenderer {
    theme: ChartTheme,
    currency: String,
    title: String,
}

impl ChartRenderer {
    pub fn new(theme: ChartTheme, currency: impl Into<String>, coin_name: &str) -> Self {
        Self {
            theme,
            currency: currency.into(),
            title: format!("{} Price Prediction (Next 7 Days)", capitalize(coin_name)),
        }
    }

    pub fn theme(&self) -> ChartTheme {
        self.theme
    }

    pub fn figure(&self, series: &PredictionSeries) -> Value {
        let dates: Vec<String> = series
            .dates()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        let symbol = currency_symbol(&self.currency);

        json!({
            "data": [{
                "type": "scatter",
                "mode": "lines+markers",
                "name": "Predicted Price",
                "x": dates,
                "y": series.prices(),
                "hovertemplate": format!(
                    "<b>Date</b>: %{{x}}<br><b>Price</b>: {}%{{y:,.2f}}<extra></extra>",
                    symbol
                ),
            }],
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": "Date" }, "type": "date" },
                "yaxis": { "title": { "text": format!("Price ({})", self.currency.to_uppercase()) } },
                "hovermode": "x unified",
                "template": self.theme.template(),
                "plot_bgcolor": self.theme.background(),
                "paper_bgcolor": self.theme.background(),
                "font": { "color": self.theme.font_color() },
            },
        })
    }

    /// Renders a self-contained fragment. An empty series yields a placeholder.
    pub fn render(&self, series: &PredictionSeries) -> String {
        if series.is_empty() {
            return format!(
                r#"<div id="{}" class="price-chart price-chart--empty">No prediction data to chart.</div>"#,
                CHART_ELEMENT_ID
            );
        }

        let figure = self.figure(series);
        // Keep "</script>" from terminating the inline script early
        let data = figure["data"].to_string().replace("</", "<\\/");
        let layout = figure["layout"].to_string().replace("</", "<\\/");

        format!(
            r#"<div id="{id}" class="price-chart"></div>
<script src="{cdn}" charset="utf-8"></script>
<script>Plotly.newPlot("{id}", {data}, {layout}, {{"responsive": true}});</script>"#,
            id = CHART_ELEMENT_ID,
            cdn = PLOTLY_CDN,
            data = data,
            layout = layout,
        )
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
