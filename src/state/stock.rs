/// Stock value definitions for catalogue rows
///
/// A row's stock is either not meaningful (category rows), not yet
/// determined (products that have not been refreshed), or a concrete
/// quantity read from the product page.
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Cell text of an unresolved product stock
pub const UNRESOLVED_CELL: &str = "-1";

/// Represents the stock column of a catalogue row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stock {
    /// Row is a category, not a product
    #[default]
    NotApplicable,

    /// Product whose quantity has not been read yet
    Unresolved,

    /// Quantity read from the live product page
    Known(u32),
}

impl Stock {
    /// Returns true if this row still waits for a quantity
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns true if a concrete quantity is known
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// Returns the quantity, if known
    pub fn quantity(&self) -> Option<u32> {
        match self {
            Self::Known(q) => Some(*q),
            _ => None,
        }
    }

    /// Converts the stock to its table cell representation
    ///
    /// `Unresolved` keeps the `-1` sentinel so tables written by older
    /// versions of the tool stay readable.
    pub fn to_cell(&self) -> String {
        match self {
            Self::NotApplicable => String::new(),
            Self::Unresolved => UNRESOLVED_CELL.to_string(),
            Self::Known(q) => q.to_string(),
        }
    }

    /// Parses a stock value from its table cell representation
    ///
    /// Returns None if the cell doesn't hold any known encoding.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell.trim() {
            "" | "-" => Some(Self::NotApplicable),
            UNRESOLVED_CELL => Some(Self::Unresolved),
            other => other.parse::<u32>().ok().map(Self::Known),
        }
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplicable => write!(f, "n/a"),
            Self::Unresolved => write!(f, "unresolved"),
            Self::Known(q) => write!(f, "{}", q),
        }
    }
}

impl Serialize for Stock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_cell())
    }
}

impl<'de> Deserialize<'de> for Stock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cell = String::deserialize(deserializer)?;
        Stock::from_cell(&cell)
            .ok_or_else(|| de::Error::custom(format!("invalid stock cell: {:?}", cell)))
    }
}
