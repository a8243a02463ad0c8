use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::domain::product::errors::DescriptionError;
use crate::domain::product::errors::PriceError;
use crate::domain::product::errors::ProductIdError;
use crate::domain::product::errors::ProductNameError;
use crate::domain::store::Entity;

/// Catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Replace every mutable field. `created_at` is left untouched.
    pub fn apply(&mut self, command: UpdateProductCommand) {
        self.name = command.name;
        self.description = command.description;
        self.price = command.price;
    }
}

/// Catalog item that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Build a draft, stamping the creation time now.
    pub fn from_command(command: CreateProductCommand) -> Self {
        Self {
            name: command.name,
            description: command.description,
            price: command.price,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Draft = NewProduct;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Store-assigned product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Parse a product ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not an integer
    pub fn from_string(s: &str) -> Result<Self, ProductIdError> {
        s.parse::<i64>()
            .map(ProductId)
            .map_err(|e| ProductIdError::InvalidFormat(format!("{}: {}", s, e)))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product name: required, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductName(String);

impl ProductName {
    const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, ProductNameError> {
        if name.trim().is_empty() {
            return Err(ProductNameError::Blank);
        }
        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ProductNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Product description: required, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDescription(String);

impl ProductDescription {
    const MAX_LENGTH: usize = 255;

    pub fn new(description: String) -> Result<Self, DescriptionError> {
        if description.trim().is_empty() {
            return Err(DescriptionError::Blank);
        }
        let length = description.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(DescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(description))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-negative price with exactly four fractional digits.
///
/// Held as a count of ten-thousandths, so `1.5` is `15000` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

impl Price {
    pub const SCALE: i64 = 10_000;

    /// Largest value that fits NUMERIC(18, 4).
    pub const MAX_UNITS: i64 = 999_999_999_999_999_999;

    pub const ZERO: Price = Price(0);

    /// Create a price from ten-thousandth units.
    ///
    /// # Errors
    /// * `Negative` - Units below zero
    /// * `OutOfRange` - Units above `MAX_UNITS`
    pub fn from_units(units: i64) -> Result<Self, PriceError> {
        if units < 0 {
            return Err(PriceError::Negative);
        }
        if units > Self::MAX_UNITS {
            return Err(PriceError::OutOfRange);
        }
        Ok(Self(units))
    }

    /// Parse a decimal literal, rounding half away from zero to four fractional digits.
    ///
    /// Accepts plain (`12.5`) and exponent (`1.25e1`) notation. The digits are never
    /// routed through binary floating point.
    ///
    /// # Errors
    /// * `Malformed` - Not a decimal number
    /// * `Negative` - Value below zero
    /// * `OutOfRange` - Value above 99 999 999 999 999.9999 after rounding
    pub fn parse(text: &str) -> Result<Self, PriceError> {
        let text = text.trim();
        let parsed = if text.contains(|c: char| c == 'e' || c == 'E') {
            Decimal::from_scientific(text)
        } else {
            Decimal::from_str_exact(text)
        };

        let value = parsed.map_err(|e| PriceError::Malformed(format!("{}: {}", text, e)))?;
        Self::from_decimal(value)
    }

    /// Create a price from an exact decimal, rounding half away from zero to four digits.
    ///
    /// # Errors
    /// * `Negative` - Value below zero
    /// * `OutOfRange` - Value above 99 999 999 999 999.9999 after rounding
    pub fn from_decimal(value: Decimal) -> Result<Self, PriceError> {
        if value < Decimal::ZERO {
            return Err(PriceError::Negative);
        }

        let mut rounded = value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Decimal::new(Self::MAX_UNITS, 4) {
            return Err(PriceError::OutOfRange);
        }
        rounded.rescale(4);

        let units = i64::try_from(rounded.mantissa()).map_err(|_| PriceError::OutOfRange)?;
        Self::from_units(units)
    }

    pub fn units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:04}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

/// Command to create a product with validated fields
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
}

/// Command to replace the mutable fields of a product.
///
/// Every field is required: updates are full replacements.
#[derive(Debug, Clone)]
pub struct UpdateProductCommand {
    pub name: ProductName,
    pub description: ProductDescription,
    pub price: Price,
}

/// Listing filter. Every present criterion must hold; absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Substring the name must contain
    pub name: Option<String>,
    /// Inclusive lower bound
    pub min_price: Option<Price>,
    /// Inclusive upper bound
    pub max_price: Option<Price>,
}

impl ProductFilter {
    /// Build a filter, treating an empty name as no name constraint.
    pub fn new(name: Option<String>, min_price: Option<Price>, max_price: Option<Price>) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()),
            min_price,
            max_price,
        }
    }

    /// Whether `product` satisfies every present criterion (case-sensitive substring match).
    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .map_or(true, |name| product.name.as_str().contains(name))
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
    }
}
