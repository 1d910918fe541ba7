/// One hint per game, unlocked by showing the target color to the detector.
///
/// Valid transitions:
/// - Locked -> Unlocking
/// - Unlocking -> Locked (cancel)
/// - Unlocking -> Used (apply, once the color was seen)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HintGate {
    #[default]
    Locked,
    Unlocking {
        color_seen: bool,
    },
    Used,
}

impl HintGate {
    pub const fn is_unlocking(self) -> bool {
        matches!(self, Self::Unlocking { .. })
    }

    pub const fn is_used(self) -> bool {
        matches!(self, Self::Used)
    }

    pub const fn can_apply(self) -> bool {
        matches!(self, Self::Unlocking { color_seen: true })
    }

    /// Returns whether the gate moved into `Unlocking`.
    pub fn begin(&mut self) -> bool {
        match self {
            Self::Locked => {
                *self = Self::Unlocking { color_seen: false };
                true
            }
            Self::Unlocking { .. } | Self::Used => false,
        }
    }

    /// Latches a presence result; returns whether the color was seen for the first time.
    pub fn observe(&mut self, present: bool) -> bool {
        match self {
            Self::Unlocking { color_seen } if present && !*color_seen => {
                *color_seen = true;
                true
            }
            _ => false,
        }
    }

    pub fn apply(&mut self) -> bool {
        if self.can_apply() {
            *self = Self::Used;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) -> bool {
        if self.is_unlocking() {
            *self = Self::Locked;
            true
        } else {
            false
        }
    }
}
