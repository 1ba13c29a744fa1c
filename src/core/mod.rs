pub mod primitives;
pub mod scale;
pub mod stats;
pub mod types;

pub use scale::{LinearScale, nice_step, nice_ticks, tick_decimals};
pub use stats::{
    BandPoint, BoxStats, CorrelationMatrix, GaussianKde, HistogramBin, LinearFit, histogram,
    pearson,
};
pub use types::{DataPoint, POINTS_PER_INCH, PlotRect, Viewport};
