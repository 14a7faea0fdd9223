use serde::{Deserialize, Serialize};

/// Parse failure for a wire tag coming from the backend.
#[derive(Debug, thiserror::Error)]
#[error("Unrecognized {field} tag: {value}")]
pub struct InvalidTag {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + FromStr + serde through the wire tag.
///
/// The backend speaks Portuguese upper-snake tags (`EVOLUCAO_VISITA`), so
/// (de)serialization goes through `as_str`/`FromStr` instead of variant names.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidTag;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidTag {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum!(EntryKind {
    Anamnesis => "ANAMNESE",
    EvolutionVisit => "EVOLUCAO_VISITA",
    Diagnosis => "DIAGNOSTICO",
    TreatmentPlan => "PLANO_TRATAMENTO",
    GeneralObservation => "OBSERVACAO_GERAL",
});

wire_enum!(DocumentKind {
    Photo => "FOTO",
    Radiograph => "RADIOGRAFIA",
    Certificate => "ATESTADO",
    Other => "OUTRO",
});

impl DocumentKind {
    /// Photos and radiographs render in the image lane; everything else is a document.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Photo | Self::Radiograph)
    }
}
