// Layout: page format, glyph metrics, block typesetting, measurement and pagination.
// Pure and platform-independent; nothing here touches the filesystem or a renderer.

pub mod font_metrics;
pub mod measure;
pub mod page;
pub mod paginate;
pub mod typeset;

pub use measure::{build_measurer, LayoutMeasurer, MeasureContext, MeasurerKind};
pub use page::PageFormat;
pub use paginate::{paginate, Page, Pagination, Strategy};
