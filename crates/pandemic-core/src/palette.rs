/// Plotly's default qualitative palette.
pub const PLOTLY: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Paul Tol's colorblind-safe qualitative palette.
pub const SAFE: [&str; 11] = [
    "rgb(136, 204, 238)",
    "rgb(204, 102, 119)",
    "rgb(221, 204, 119)",
    "rgb(17, 119, 51)",
    "rgb(51, 34, 136)",
    "rgb(170, 68, 153)",
    "rgb(68, 170, 153)",
    "rgb(153, 153, 51)",
    "rgb(136, 34, 85)",
    "rgb(102, 17, 0)",
    "rgb(136, 136, 136)",
];

const INFECTIONS: &str = "red";
const LOSS: &str = "red";
const NEUTRAL: &str = "white";
const GAIN: &str = "green";
const GAIN_COLORBLIND: &str = "#546494";

/// Color scheme of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Standard,
    Colorblind,
}

impl ColorMode {
    pub fn from_flag(colorblind: bool) -> Self {
        if colorblind {
            ColorMode::Colorblind
        } else {
            ColorMode::Standard
        }
    }

    pub fn palette(self) -> &'static [&'static str] {
        match self {
            ColorMode::Standard => &PLOTLY,
            ColorMode::Colorblind => &SAFE,
        }
    }

    /// Color of the `position`-th selected ticker; wraps around the palette.
    pub fn line_color(self, position: usize) -> &'static str {
        let palette = self.palette();
        palette[position % palette.len()]
    }

    pub fn bar_color(self) -> &'static str {
        match self {
            ColorMode::Standard => INFECTIONS,
            ColorMode::Colorblind => SAFE[SAFE.len() - 1],
        }
    }

    /// Diverging scale: loss at 0.0, neutral at 0.5, gain at 1.0.
    pub fn diverging_scale(self) -> [(f64, &'static str); 3] {
        let gain = match self {
            ColorMode::Standard => GAIN,
            ColorMode::Colorblind => GAIN_COLORBLIND,
        };
        [(0.0, LOSS), (0.5, NEUTRAL), (1.0, gain)]
    }
}
