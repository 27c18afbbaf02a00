use crate::layout::LayoutCursor;

use super::{BuildContext, ContentBuilder, FormValues};

/// Travel (mileage) claim. The front-end accepts it, but it has no printed
/// layout yet, so nothing is drawn below the letterhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocation;

impl ContentBuilder for Relocation {
    fn build(&self, _cursor: &mut LayoutCursor, _values: &FormValues, _ctx: &BuildContext) {
        log::debug!("relocation claims have no content layout; leaving page below header empty");
    }
}
