//! Declarative chart specifications, serialized in the shape Plotly.js consumes.
//!
//! ```json
//! {
//!     "data": [
//!         { "type": "scatter", "x": ["2020-03-02"], "y": [100.0], "mode": "lines", ... },
//!         { "type": "bar", "x": ["2020-03-02"], "y": [12.5], "yaxis": "y2", ... }
//!     ],
//!     "layout": { "hovermode": "x unified", ... }
//! }
//! ```

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter(Scatter),
    Bar(Bar),
    Heatmap(Heatmap),
}

impl Trace {
    pub fn name(&self) -> Option<&str> {
        match self {
            Trace::Scatter(scatter) => Some(&scatter.name),
            Trace::Bar(bar) => Some(&bar.name),
            Trace::Heatmap(_) => None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Traces
//
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Scatter {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customdata: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Bar {
    pub x: Vec<NaiveDate>,
    /// `null` entries render as gaps.
    pub y: Vec<Option<f64>>,
    pub name: String,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Heatmap {
    /// Row-major matrix; `null` cells are left out of the color range.
    pub z: Vec<Vec<Option<f64>>>,
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub colorscale: Vec<(f64, String)>,
    pub zmin: f64,
    pub zmax: f64,
    pub colorbar: ColorBar,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Line {
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    pub opacity: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ColorBar {
    pub title: Title,
    pub tickvals: Vec<f64>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//
// Layout
//
////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis2: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovermode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverlabel: Option<HoverLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(NaiveDate, NaiveDate)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlaying: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showticklabels: Option<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HoverLabel {
    pub bordercolor: String,
    pub font: Font,
    pub align: String,
    pub namelength: i32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Font {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    pub size: u32,
    pub color: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    pub orientation: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Margin {
    pub l: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: usize,
    pub y: usize,
    pub text: String,
    pub showarrow: bool,
    pub font: Font,
}
