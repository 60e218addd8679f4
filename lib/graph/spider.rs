use std::fmt;

/// The color tag carried by a spider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// A green (Z-type) spider.
    Green,
    /// A red (X-type) spider.
    Red,
    /// A binary Hadamard node, equivalent to a color change across it.
    Hadamard,
    /// Anything else. Never matched by any rewrite rule.
    Other,
}

impl Color {
    /// Return `true` if `self` is `Green`.
    pub fn is_green(&self) -> bool { matches!(self, Self::Green) }

    /// Return `true` if `self` is `Red`.
    pub fn is_red(&self) -> bool { matches!(self, Self::Red) }

    /// Return `true` if `self` is `Hadamard`.
    pub fn is_hadamard(&self) -> bool { matches!(self, Self::Hadamard) }

    /// Return `true` if `self` is `Green` or `Red`.
    pub fn is_spider(&self) -> bool { matches!(self, Self::Green | Self::Red) }

    /// Return the opposite spider color, swapping `Green` and `Red`.
    ///
    /// `Hadamard` and `Other` are returned unchanged.
    pub fn toggled(self) -> Self {
        match self {
            Self::Green => Self::Red,
            Self::Red => Self::Green,
            other => other,
        }
    }

    /// Return `true` if `self` and `other` are both `Green` or both `Red`.
    pub fn is_same_color(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Green, Self::Green) | (Self::Red, Self::Red)
        )
    }

    /// Return `true` if one of `self` and `other` is `Green` and the other is
    /// `Red`.
    pub fn is_diff_color(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Green, Self::Red) | (Self::Red, Self::Green)
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Green => write!(f, "green"),
            Self::Red => write!(f, "red"),
            Self::Hadamard => write!(f, "hadamard"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A single node in a diagram: a color tag, a real phase, and opaque data
/// that is carried along untouched by every rewrite.
///
/// Phases are plain `f64`s and are never reduced modulo 2π; fusing spiders
/// simply adds them.
#[derive(Clone, Debug, PartialEq)]
pub struct Spider<M = ()> {
    pub color: Color,
    pub phase: f64,
    pub metadata: M,
}

impl Spider<()> {
    /// Create a new green spider with no metadata.
    pub fn green(phase: f64) -> Self { Self::new(Color::Green, phase, ()) }

    /// Create a new red spider with no metadata.
    pub fn red(phase: f64) -> Self { Self::new(Color::Red, phase, ()) }

    /// Create a new Hadamard node with no metadata.
    pub fn hadamard() -> Self { Self::new(Color::Hadamard, 0.0, ()) }

    /// Create a new node of any other kind with no metadata.
    pub fn other(phase: f64) -> Self { Self::new(Color::Other, phase, ()) }
}

impl<M> Spider<M> {
    /// Create a new spider.
    pub fn new(color: Color, phase: f64, metadata: M) -> Self {
        Self { color, phase, metadata }
    }

    /// Replace the metadata attached to `self`.
    pub fn with_metadata<N>(self, metadata: N) -> Spider<N> {
        Spider { color: self.color, phase: self.phase, metadata }
    }

    /// Return `true` if `self` is green or red.
    pub fn is_spider(&self) -> bool { self.color.is_spider() }

    /// Return `true` if `self` is a Hadamard node.
    pub fn is_hadamard(&self) -> bool { self.color.is_hadamard() }

    /// Return `true` if the phase is exactly zero.
    pub fn has_defarg(&self) -> bool { self.phase == 0.0 }

    /// Return `true` if `self` and `other` are both green or both red.
    pub fn is_same_color<N>(&self, other: &Spider<N>) -> bool {
        self.color.is_same_color(&other.color)
    }

    /// Return `true` if one of `self` and `other` is green and the other is
    /// red.
    pub fn is_diff_color<N>(&self, other: &Spider<N>) -> bool {
        self.color.is_diff_color(&other.color)
    }

    pub(crate) fn toggle_color(&mut self) {
        self.color = self.color.toggled();
    }

    pub(crate) fn map_phase<F>(&mut self, f: F)
    where F: FnOnce(f64) -> f64
    {
        self.phase = f(self.phase);
    }

    pub(crate) fn phase_label(&self) -> String {
        if self.has_defarg() {
            "".to_string()
        } else {
            let r = (1e4 * self.phase).round() / 1e4;
            format!("{}", r)
        }
    }

    pub(crate) fn graph_attrs(&self) -> tabbycat::AttrList {
        use tabbycat::*;
        use tabbycat::attributes::*;
        use crate::vizdefs::*;
        match self.color {
            self::Color::Green => {
                AttrList::new()
                    .add_pair(label(self.phase_label()))
                    .add_pair(shape(Shape::Circle))
                    .add_pair(height(CIRCLE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(GREEN_COLOR))
            },
            self::Color::Red => {
                AttrList::new()
                    .add_pair(label(self.phase_label()))
                    .add_pair(shape(Shape::Circle))
                    .add_pair(height(CIRCLE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(RED_COLOR))
            },
            self::Color::Hadamard => {
                AttrList::new()
                    .add_pair(label(""))
                    .add_pair(shape(Shape::Square))
                    .add_pair(height(SQUARE_HEIGHT))
                    .add_pair(style(Style::Filled))
                    .add_pair(fillcolor(H_COLOR))
            },
            self::Color::Other => {
                AttrList::new()
                    .add_pair(label(self.phase_label()))
                    .add_pair(shape(Shape::Plaintext))
            },
        }
    }
}
