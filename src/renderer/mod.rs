//! The four fraction views.
//!
//! Every renderer follows the same cycle. A setter or [`select`] records the
//! new selection, resolves asset paths synchronously and returns a
//! [`PendingLoad`] (or `None` when nothing matched and the state already
//! reads `NotFound`). The caller awaits the load anywhere it likes and hands
//! the [`Fetched`] result back to `apply`, which commits it only if no newer
//! selection has been made in the meantime.
//!
//! | Renderer | Loads | Produces |
//! |----------|-------|----------|
//! | [`ShapeIconRenderer`] | one SVG | recolored markup |
//! | [`ObjectSplitRenderer`] | one image | image + split-line overlay |
//! | [`ObjectPartsRenderer`] | one image | sliced, clipped SVG |
//! | [`ShapePartsRenderer`] | every part SVG | one restyled tile per part |
//!
//! [`select`]: ShapeIconRenderer::select

mod object_parts;
mod object_split;
mod shape_icon;
mod shape_parts;
mod slot;

pub use object_parts::{
    ObjectPartsRenderer, ObjectPartsSelection, ObjectPartsView, object_parts_svg,
};
pub use object_split::{ObjectSelection, ObjectSplitRenderer, ObjectSplitView};
pub use shape_icon::{ShapeIconRenderer, ShapeSelection};
pub use shape_parts::{PartsSelection, ShapePartsRenderer, Tile};
pub use slot::{Fetched, LoadState, PendingLoad, RenderSlot, RequestId};
