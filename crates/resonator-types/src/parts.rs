use serde::{Deserialize, Serialize};

/// The five parts of the resonator assembly, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    /// Hollow resonator tube.
    Resonator,
    /// Cap on its own.
    Cap,
    /// Profiled inner insert on its own.
    InnerObject,
    /// Cap fused with the inner insert.
    CapWithInnerObject,
    /// Plain annulus with the same net material area.
    EquivalentCylinder,
}

impl PartKind {
    pub const ALL: [PartKind; 5] = [
        PartKind::Resonator,
        PartKind::Cap,
        PartKind::InnerObject,
        PartKind::CapWithInnerObject,
        PartKind::EquivalentCylinder,
    ];

    /// File-name suffix appended to the export base name.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            PartKind::Resonator => "_resonador_hueco",
            PartKind::Cap => "_tapa_sola",
            PartKind::InnerObject => "_objeto_interno_solo",
            PartKind::CapWithInnerObject => "_tapa_con_objeto_interno",
            PartKind::EquivalentCylinder => "_cilindro_equivalente",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartKind::Resonator => "hollow resonator",
            PartKind::Cap => "cap",
            PartKind::InnerObject => "inner object",
            PartKind::CapWithInnerObject => "cap with inner object",
            PartKind::EquivalentCylinder => "equivalent cylinder",
        }
    }
}

impl std::fmt::Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
