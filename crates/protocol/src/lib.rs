pub mod placement;
pub mod section_key;
pub mod theme;
pub mod types;

pub use placement::{CardPlacement, Reveal, Stagger};
pub use section_key::{SectionAnchor, SectionKey};
pub use theme::{Theme, ThemeToken};
pub use types::{Point, Rect, ScrollRequest};
