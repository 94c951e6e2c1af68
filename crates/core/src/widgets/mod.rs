pub mod active_section;
pub mod carousel;
pub mod contact;
pub mod navigation;

pub use active_section::ActiveSectionTracker;
pub use carousel::{Carousel, CarouselError};
pub use contact::{ContactError, ContactFields, ContactForm, Field};
pub use navigation::{NavLink, NavigationBar, ScrollToTop};
