use serde::Deserialize;

pub use colorous::Color;

pub trait Gradient {
    type Input;

    fn color(&self, input: Self::Input, dark_mode: bool) -> Color;
}

#[derive(Deserialize, Debug, Default, Clone, Copy, strum::EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NodeColoringGradient {
    #[default]
    Blues,
    Greens,
    Oranges,
    Purples,
    Reds,
    BuPu,
    OrRd,
    PuRd,
    RdPu,
    Viridis,
    Cividis,
    Plasma,
}

impl From<NodeColoringGradient> for colorous::Gradient {
    fn from(value: NodeColoringGradient) -> Self {
        use colorous::*;
        match value {
            NodeColoringGradient::Blues => BLUES,
            NodeColoringGradient::Greens => GREENS,
            NodeColoringGradient::Oranges => ORANGES,
            NodeColoringGradient::Purples => PURPLES,
            NodeColoringGradient::Reds => REDS,
            NodeColoringGradient::BuPu => BLUE_PURPLE,
            NodeColoringGradient::OrRd => ORANGE_RED,
            NodeColoringGradient::PuRd => PURPLE_RED,
            NodeColoringGradient::RdPu => RED_PURPLE,
            NodeColoringGradient::Viridis => VIRIDIS,
            NodeColoringGradient::Cividis => CIVIDIS,
            NodeColoringGradient::Plasma => PLASMA,
        }
    }
}

/// `None` yields the background colour; filtered packages are drawn uncoloured.
impl Gradient for NodeColoringGradient {
    type Input = Option<f64>;

    fn color(&self, input: Self::Input, dark_mode: bool) -> Color {
        let Some(input) = input else {
            return if dark_mode {
                Color {
                    r: 0x00,
                    g: 0x00,
                    b: 0x00,
                }
            } else {
                Color {
                    r: 0xff,
                    g: 0xff,
                    b: 0xff,
                }
            };
        };

        let mut color = colorous::Gradient::from(*self).eval_continuous(input.clamp(0.0, 1.0));
        if dark_mode {
            let mut hsl: colorsys::Hsl = colorsys::Rgb::from(&(color.r, color.g, color.b)).into();
            hsl.set_lightness(100.0 - hsl.lightness());
            let (r, g, b) = colorsys::Rgb::from(hsl).into();
            color = Color { r, g, b };
        }
        color
    }
}

/// Position of a package at `depth` on the gradient, shallow packages being light.
pub fn depth_ratio(depth: usize, max_depth: usize, inverse: bool) -> f64 {
    let ratio = if max_depth == 0 {
        0.0
    } else {
        depth as f64 / max_depth as f64
    };
    if inverse { 1.0 - ratio } else { ratio }
}
