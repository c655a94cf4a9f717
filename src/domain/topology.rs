//! Display topology identifiers

/// System-wide arrangement of the attached displays
///
/// The discriminants match the display-config topology ids used by the OS,
/// so they can be passed to it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Topology {
    /// Only the built-in display is active
    Internal = 0x0000_0001,
    /// All displays show the same picture
    Clone = 0x0000_0002,
    /// Displays form one extended desktop
    Extend = 0x0000_0004,
    /// Only the external display is active
    External = 0x0000_0008,
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::Internal,
        Topology::Clone,
        Topology::Extend,
        Topology::External,
    ];

    /// Raw id understood by the display subsystem
    pub fn raw(self) -> u32 {
        self as u32
    }

    /// Maps a raw id back to a topology; zero and unknown bits give `None`
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.raw() == raw)
    }

    pub fn name(self) -> &'static str {
        match self {
            Topology::Internal => "internal",
            Topology::Clone => "clone",
            Topology::Extend => "extend",
            Topology::External => "external",
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
