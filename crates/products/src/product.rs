use serde::{Deserialize, Serialize};

use shopdesk_core::{DomainError, DomainResult, Entity, ValueObject};

/// Product identifier, assigned by the catalog store and never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Non-negative price held in minor currency units (two decimal places).
///
/// Serialized as a decimal number (`1500.0`, `4.5`); deserialization goes
/// through [`Price::from_major`] so negative or non-finite values are rejected.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(u64);

impl ValueObject for Price {}

impl Price {
    pub const ZERO: Price = Price(0);

    pub fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    /// Build a price from a major-unit amount, rounding to the nearest cent.
    pub fn from_major(amount: f64) -> DomainResult<Self> {
        if !amount.is_finite() {
            return Err(DomainError::validation("price", "must be a finite number"));
        }
        if amount < 0.0 {
            return Err(DomainError::validation("price", "must be non-negative"));
        }
        let units = (amount * 100.0).round();
        if units > u64::MAX as f64 {
            return Err(DomainError::validation("price", "is too large"));
        }
        Ok(Self(units as u64))
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }

    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `price * (1 - percentage / 100)`, rounded to the nearest cent.
    pub fn discounted(self, percentage: Percentage) -> Price {
        let factor = 1.0 - percentage.value() / 100.0;
        Price(((self.0 as f64) * factor).round() as u64)
    }

    /// Arithmetic mean rounded half-up to the nearest cent. `None` for no prices.
    pub fn mean<I>(prices: I) -> Option<Price>
    where
        I: IntoIterator<Item = Price>,
    {
        let (sum, count) = prices
            .into_iter()
            .fold((0u128, 0u128), |(sum, count), p| (sum + p.0 as u128, count + 1));
        if count == 0 {
            return None;
        }
        Some(Price(((sum * 2 + count) / (count * 2)) as u64))
    }
}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_major(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.as_major()
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Discount percentage in `[0, 100]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl ValueObject for Percentage {}

impl Percentage {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(DomainError::validation("percentage", "must be within [0, 100]"));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Percentage {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(value: Percentage) -> Self {
        value.0
    }
}

impl core::fmt::Display for Percentage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Category comparison key: trimmed and lowercased.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Product record as held by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Price,
    category: String,
    in_stock: bool,
}

impl Product {
    pub(crate) fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name.trim().to_string(),
            price: new.price,
            category: new.category.trim().to_string(),
            in_stock: new.in_stock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }

    /// Case-normalized exact category match.
    pub fn in_category(&self, category: &str) -> bool {
        normalize_category(&self.category) == normalize_category(category)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// A product that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Price,
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: Price, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            in_stock: true,
        }
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Price is non-negative by construction; the name must carry text.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        Ok(())
    }
}
