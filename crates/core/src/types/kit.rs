//! Kit options a customer picks on the product page.
//!
//! Line items store the human-readable labels (`"XL"`, `"Fan Edition"`), so
//! these enums are the gate that validates a selection before it reaches the
//! cart. Each option round-trips through its label.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors from validating a kit selection.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A required choice was not made.
    #[error("please select a {0}")]
    Missing(&'static str),
    /// The value is not one of the offered options.
    #[error("unknown {kind}: {value}")]
    Unknown {
        /// Which option kind was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}

macro_rules! kit_option {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The label shown to customers and stored on line items.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parse an optional selection, treating blank input as "none".
            ///
            /// # Errors
            ///
            /// Returns [`SelectionError::Unknown`] for a non-blank value that
            /// is not one of the options.
            pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, SelectionError> {
                match value.map(str::trim) {
                    None | Some("") => Ok(None),
                    Some(v) => v.parse().map(Some),
                }
            }

            /// Parse a required selection.
            ///
            /// # Errors
            ///
            /// Returns [`SelectionError::Missing`] for blank input and
            /// [`SelectionError::Unknown`] for an unrecognized value.
            pub fn parse_required(value: Option<&str>) -> Result<Self, SelectionError> {
                Self::parse_optional(value)?.ok_or(SelectionError::Missing($kind))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = SelectionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|option| option.label().eq_ignore_ascii_case(s))
                    .ok_or_else(|| SelectionError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

kit_option! {
    /// Adult jersey sizes.
    KitSize, "size" {
        Small => "S",
        Medium => "M",
        Large => "L",
        ExtraLarge => "XL",
        DoubleExtraLarge => "2XL",
        TripleExtraLarge => "3XL",
    }
}

kit_option! {
    /// Kit edition: the stadium replica or the shirt cut as worn on the pitch.
    KitEdition, "kit edition" {
        Fan => "Fan Edition",
        Player => "Player Edition",
    }
}

kit_option! {
    /// Competition sleeve badges.
    Badge, "badge" {
        Europa => "Europa",
        Champions => "Champions",
        PremierLeague => "Premier League",
        LaLiga => "La Liga",
        SerieA => "Serie A",
        Mls => "MLS",
    }
}

kit_option! {
    /// Lettering style for printed names and numbers.
    FontType, "font type" {
        League => "League Font",
        Team => "Team Font",
    }
}
