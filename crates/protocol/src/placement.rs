use serde::{Deserialize, Serialize};

/// Layout of one carousel card, derived from its circular offset to the
/// current index.
///
/// Renderers consume these directly; each placement carries everything
/// needed to position one card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPlacement {
    pub index: usize,
    /// Signed circular distance from the current card.
    pub offset: isize,
    pub is_active: bool,
    /// Horizontal shift in percent of the card width.
    pub translate_pct: f64,
    pub scale: f64,
    pub rotate_y_deg: f64,
    pub opacity: f64,
    pub z_index: i32,
    /// Only the active card accepts pointer input.
    pub interactive: bool,
}

const CARD_SHIFT_PCT: f64 = 120.0;
const CARD_TILT_DEG: f64 = -15.0;
const INACTIVE_SCALE: f64 = 0.85;
const INACTIVE_OPACITY: f64 = 0.5;
const ACTIVE_Z: i32 = 10;
const BASE_Z: i32 = 5;

impl CardPlacement {
    pub fn from_offset(index: usize, offset: isize) -> Self {
        let is_active = offset == 0;
        let distance = offset.unsigned_abs();
        let opacity = if distance > 1 {
            0.0
        } else if is_active {
            1.0
        } else {
            INACTIVE_OPACITY
        };
        let z_index = if is_active {
            ACTIVE_Z
        } else {
            BASE_Z - i32::try_from(distance).unwrap_or(BASE_Z)
        };
        Self {
            index,
            offset,
            is_active,
            translate_pct: offset as f64 * CARD_SHIFT_PCT,
            scale: if is_active { 1.0 } else { INACTIVE_SCALE },
            rotate_y_deg: offset as f64 * CARD_TILT_DEG,
            opacity,
            z_index,
            interactive: is_active,
        }
    }

    /// Whether the card is drawn at all.
    pub fn is_shown(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Enter-animation state of a revealed element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reveal {
    #[default]
    Hidden,
    Shown,
}

impl Reveal {
    pub fn from_visible(visible: bool) -> Self {
        if visible { Reveal::Shown } else { Reveal::Hidden }
    }

    pub fn opacity(self) -> f64 {
        match self {
            Reveal::Hidden => 0.0,
            Reveal::Shown => 1.0,
        }
    }

    /// Vertical offset in px; hidden elements sit `enter_px` below their
    /// resting place and slide up when shown.
    pub fn translate_y(self, enter_px: f64) -> f64 {
        match self {
            Reveal::Hidden => enter_px,
            Reveal::Shown => 0.0,
        }
    }
}

/// Transition delay for the `index`th item of a staggered group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stagger {
    pub base_ms: u32,
    pub step_ms: u32,
}

impl Stagger {
    pub const fn new(base_ms: u32, step_ms: u32) -> Self {
        Self { base_ms, step_ms }
    }

    pub fn delay_ms(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_ms
            .saturating_add(self.step_ms.saturating_mul(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_card_is_centered_and_interactive() {
        let p = CardPlacement::from_offset(2, 0);
        assert!(p.is_active);
        assert!(p.interactive);
        assert_eq!(p.translate_pct, 0.0);
        assert_eq!(p.scale, 1.0);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.z_index, 10);
    }

    #[test]
    fn neighbours_are_dimmed_and_tilted() {
        let left = CardPlacement::from_offset(0, -1);
        assert_eq!(left.translate_pct, -120.0);
        assert_eq!(left.rotate_y_deg, 15.0);
        assert_eq!(left.opacity, 0.5);
        assert_eq!(left.scale, 0.85);
        assert_eq!(left.z_index, 4);
        assert!(!left.interactive);
    }

    #[test]
    fn far_cards_fade_out() {
        let far = CardPlacement::from_offset(3, 2);
        assert!(!far.is_shown());
        assert_eq!(far.z_index, 3);
    }

    #[test]
    fn reveal_slides_up_when_shown() {
        assert_eq!(Reveal::Hidden.translate_y(32.0), 32.0);
        assert_eq!(Reveal::Shown.translate_y(32.0), 0.0);
        assert_eq!(Reveal::from_visible(true).opacity(), 1.0);
    }

    #[test]
    fn stagger_adds_step_per_item() {
        let contact_cards = Stagger::new(300, 100);
        assert_eq!(contact_cards.delay_ms(0), 300);
        assert_eq!(contact_cards.delay_ms(2), 500);
    }
}
