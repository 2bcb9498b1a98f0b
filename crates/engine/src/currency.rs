use serde::{Deserialize, Serialize};

/// The single currency every bill is kept in (Sri Lankan rupee).
///
/// Amounts are stored as minor units (see `Money`); the currency supplies
/// the code shown next to them and the number of fraction digits used when
/// parsing or formatting, e.g. `LKR 10.50` is `1050`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Lkr,
}

impl Currency {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Lkr => "LKR",
        }
    }

    /// Fraction digits of the major unit.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Lkr => 2,
        }
    }

    /// Minor units in one major unit.
    #[must_use]
    pub const fn minor_per_major(self) -> i64 {
        10_i64.pow(self.minor_units() as u32)
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rupees_have_cents() {
        assert_eq!(Currency::Lkr.minor_units(), 2);
        assert_eq!(Currency::Lkr.minor_per_major(), 100);
        assert_eq!(Currency::Lkr.to_string(), "LKR");
    }
}
