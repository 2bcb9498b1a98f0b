//! Command structs for item operations.
//!
//! These types group parameters for adding and editing items, keeping call
//! sites readable. The `parse` constructors turn raw form input into typed
//! values: an unparseable price is rejected, an unusable quantity becomes 1.

use crate::{Currency, EngineError, MAX_BILL_TOTAL, Money, ResultEngine};

/// Parameters for a new bill item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl ItemInput {
    #[must_use]
    pub fn new(name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity: 1,
        }
    }

    #[must_use]
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Builds an item from raw text input.
    ///
    /// - `price` must be a non-negative decimal with at most two decimals.
    /// - `quantity` falls back to 1 when absent, unparseable or below 1.
    pub fn parse(name: &str, price: &str, quantity: Option<&str>) -> ResultEngine<Self> {
        Ok(Self {
            name: name.to_string(),
            unit_price: parse_unit_price(price)?,
            quantity: parse_quantity(quantity),
        })
    }
}

/// Changes to an existing item. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemEdit {
    pub name: Option<String>,
    pub unit_price: Option<Money>,
    pub quantity: Option<u32>,
}

impl ItemEdit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    #[must_use]
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Builds an edit from optional raw text fields.
    ///
    /// A supplied price that does not parse is rejected; a supplied quantity
    /// that does not parse becomes 1.
    pub fn parse(
        name: Option<&str>,
        price: Option<&str>,
        quantity: Option<&str>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            name: name.map(ToString::to_string),
            unit_price: price.map(parse_unit_price).transpose()?,
            quantity: quantity.map(|raw| parse_quantity(Some(raw))),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit_price.is_none() && self.quantity.is_none()
    }
}

/// Parses a unit price, rejecting negative values and prices above
/// [`MAX_BILL_TOTAL`].
pub fn parse_unit_price(price: &str) -> ResultEngine<Money> {
    let amount = Money::parse_major(price, Currency::Lkr)?;
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(
            "unit price must be >= 0".to_string(),
        ));
    }
    if amount > MAX_BILL_TOTAL {
        return Err(EngineError::InvalidAmount(format!(
            "unit price must be <= {}",
            MAX_BILL_TOTAL.format(Currency::Lkr)
        )));
    }
    Ok(amount)
}

/// Reads the leading decimal digits of `quantity`, defaulting to 1.
///
/// `"3"` and `"3 plates"` give 3; `""`, `"abc"`, `"0"` and `"-2"` give 1.
#[must_use]
pub fn parse_quantity(quantity: Option<&str>) -> u32 {
    let Some(raw) = quantity else {
        return 1;
    };
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(quantity) if quantity >= 1 => quantity,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_item_input() {
        let input = ItemInput::parse("Hoppers", "120.50", Some("4")).unwrap();
        assert_eq!(input.name, "Hoppers");
        assert_eq!(input.unit_price, Money::new(12_050));
        assert_eq!(input.quantity, 4);
    }

    #[test]
    fn parse_rejects_bad_or_negative_price() {
        assert!(ItemInput::parse("Tea", "abc", None).is_err());
        assert!(ItemInput::parse("Tea", "", None).is_err());
        assert_eq!(
            ItemInput::parse("Tea", "-5", None),
            Err(EngineError::InvalidAmount(
                "unit price must be >= 0".to_string()
            ))
        );
    }

    #[test]
    fn quantity_defaults_to_one() {
        assert_eq!(parse_quantity(None), 1);
        assert_eq!(parse_quantity(Some("")), 1);
        assert_eq!(parse_quantity(Some("abc")), 1);
        assert_eq!(parse_quantity(Some("0")), 1);
        assert_eq!(parse_quantity(Some("-2")), 1);
        assert_eq!(parse_quantity(Some(" 3 plates")), 3);
        assert_eq!(parse_quantity(Some("2.5")), 2);
        assert_eq!(parse_quantity(Some("99999999999")), 1);
    }

    #[test]
    fn edit_parse_keeps_missing_fields_untouched() {
        let edit = ItemEdit::parse(None, Some("10"), None).unwrap();
        assert_eq!(edit, ItemEdit::new().unit_price(Money::new(1_000)));
        assert!(ItemEdit::parse(None, None, None).unwrap().is_empty());
        assert!(ItemEdit::parse(None, Some("ten"), None).is_err());
    }
}
