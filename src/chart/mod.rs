//! Statistical chart layer: figures and axes in data coordinates, projected
//! onto backend-agnostic [`RenderFrame`](crate::render::RenderFrame)s.

pub mod axes;
pub mod categorical;
pub mod distribution;
pub mod facet;
pub mod figure;
pub mod legend;
pub mod matrix;
pub mod palette;
pub mod regression;
pub mod relational;
pub mod theme;

pub use axes::{Artist, AxisId, AxisSpec, Axes, GridLines, GridStyle, TickSpec};
pub use categorical::{
    Bar, BarContainer, Estimator, bar_label, barplot, boxplot, countplot, violinplot,
};
pub use distribution::{HistOptions, KdeOptions, histplot, kdeplot};
pub use facet::{FacetCell, FacetGrid};
pub use figure::{Figure, SubplotLayout};
pub use legend::{Legend, LegendEntry, LegendPlacement, LegendSection, Swatch};
pub use matrix::{HeatmapOptions, heatmap};
pub use palette::{Colormap, Palette, named};
pub use regression::{RegressionOptions, lmplot, regplot};
pub use relational::{ScatterMapping, SemanticMaps, relplot, scatterplot};
pub use theme::{TextStyle, Theme, estimate_text_width};
