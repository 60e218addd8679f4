use tabbycat::attributes::Color;

pub const FONT: &str = "DejaVu Sans";
pub const FONTSIZE: f64 = 10.0; // pt
pub const SQUARE_HEIGHT: f64 = 0.15; // in
pub const CIRCLE_HEIGHT: f64 = 0.20; // in
pub const NODE_MARGIN: f64 = 0.025; // in

pub const GREEN_COLOR: Color = Color::Rgb(115, 205, 125); // green
pub const RED_COLOR  : Color = Color::Rgb(230, 115, 125); // red
pub const H_COLOR    : Color = Color::Rgb(250, 205, 115); // yellow
