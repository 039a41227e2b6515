/// Milliseconds from a free-running clock that may wrap.
pub type Millis = u32;

pub const fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Quiet,
    Compression,
    Recoil,
}

impl Phase {
    /// Presentation label; quiet renders as "pause" on every external surface.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quiet => "pause",
            Self::Compression => "compression",
            Self::Recoil => "recoil",
        }
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Compression | Self::Recoil)
    }
}
