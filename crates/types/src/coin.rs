//! Denominated amounts.
//!
//! `Coins` mirrors the canonical multi-denomination amount used by fees and
//! transfers: a valid set is sorted by denom, holds no duplicates and carries
//! strictly positive amounts only.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static DENOM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9/:._-]{2,127}$").expect("static denom regex"));

static COIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)([a-zA-Z][a-zA-Z0-9/:._-]{2,127})$").expect("static coin regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("invalid denom: {0}")]
    InvalidDenom(String),
    #[error("coin {0} amount is not positive")]
    NonPositiveAmount(String),
    #[error("coins are not sorted by denom: {0}")]
    Unsorted(String),
    #[error("duplicate denomination {0}")]
    DuplicateDenom(String),
    #[error("invalid coin expression: {0}")]
    Parse(String),
}

/// Validate a denomination string.
pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
    if DENOM_RE.is_match(denom) {
        Ok(())
    } else {
        Err(CoinError::InvalidDenom(denom.to_string()))
    }
}

/// A single denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COIN_RE
            .captures(s.trim())
            .ok_or_else(|| CoinError::Parse(s.to_string()))?;
        let amount = caps[1]
            .parse::<u128>()
            .map_err(|_| CoinError::Parse(s.to_string()))?;
        Ok(Coin::new(&caps[2], amount))
    }
}

/// An ordered collection of coins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Wrap coins exactly as given. The result may be invalid; see [`Coins::validate`].
    pub fn new(coins: Vec<Coin>) -> Self {
        Self(coins)
    }

    /// Build a canonical set: zero amounts dropped, duplicates merged, sorted by denom.
    pub fn normalized(coins: impl IntoIterator<Item = Coin>) -> Self {
        let mut merged: Vec<Coin> = Vec::new();
        for coin in coins.into_iter().filter(|c| !c.is_zero()) {
            match merged.iter_mut().find(|c| c.denom == coin.denom) {
                Some(existing) => existing.amount = existing.amount.saturating_add(coin.amount),
                None => merged.push(coin),
            }
        }
        merged.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self(merged)
    }

    pub fn single(denom: impl Into<String>, amount: u128) -> Self {
        Self::normalized([Coin::new(denom, amount)])
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the set is empty or every amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .iter()
            .filter(|c| c.denom == denom)
            .map(|c| c.amount)
            .fold(0u128, u128::saturating_add)
    }

    /// Check that the set is sorted, duplicate-free, and strictly positive with valid denoms.
    pub fn validate(&self) -> Result<(), CoinError> {
        for (i, coin) in self.0.iter().enumerate() {
            validate_denom(&coin.denom)?;
            if coin.is_zero() {
                return Err(CoinError::NonPositiveAmount(coin.to_string()));
            }
            if let Some(prev) = i.checked_sub(1).map(|p| &self.0[p]) {
                if prev.denom == coin.denom {
                    return Err(CoinError::DuplicateDenom(coin.denom.clone()));
                }
                if prev.denom > coin.denom {
                    return Err(CoinError::Unsorted(self.to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Coins::normalized([coin])
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for Coins {
    type Err = CoinError;

    /// Parse a comma separated list such as `"10uatom,250ufury"`, preserving order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Coins::empty());
        }
        s.split(',')
            .map(Coin::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(Coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn denom_validation() {
        assert!(validate_denom("ufury").is_ok());
        assert!(validate_denom("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2").is_ok());
        assert!(validate_denom("u").is_err());
        assert!(validate_denom("1fury").is_err());
        assert!(validate_denom("").is_err());
    }

    #[test]
    fn parse_and_display() {
        let coins: Coins = "10uatom,250ufury".parse().unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins.amount_of("ufury"), 250);
        assert_eq!(coins.to_string(), "10uatom,250ufury");
        assert!("ten ufury".parse::<Coins>().is_err());
        assert!("".parse::<Coins>().unwrap().is_zero());
    }

    #[test]
    fn validity_rules() {
        assert!(Coins::single("ufury", 5).is_valid());
        assert!(Coins::empty().is_valid());

        let zero = Coins::new(vec![Coin::new("ufury", 0)]);
        assert!(matches!(zero.validate(), Err(CoinError::NonPositiveAmount(_))));
        assert!(zero.is_zero());

        let unsorted = Coins::new(vec![Coin::new("ufury", 1), Coin::new("uatom", 1)]);
        assert!(matches!(unsorted.validate(), Err(CoinError::Unsorted(_))));

        let dup = Coins::new(vec![Coin::new("ufury", 1), Coin::new("ufury", 2)]);
        assert!(matches!(dup.validate(), Err(CoinError::DuplicateDenom(_))));

        let bad_denom = Coins::new(vec![Coin::new("$$", 1)]);
        assert!(matches!(bad_denom.validate(), Err(CoinError::InvalidDenom(_))));
    }

    #[test]
    fn normalized_merges_and_sorts() {
        let coins = Coins::normalized(vec![
            Coin::new("ufury", 3),
            Coin::new("uatom", 0),
            Coin::new("uatom", 2),
            Coin::new("ufury", 4),
        ]);
        assert_eq!(coins.to_string(), "2uatom,7ufury");
        assert!(coins.is_valid());
    }

    proptest! {
        #[test]
        fn canonical_coins_survive_their_display_form(
            raw in proptest::collection::vec(("[a-z][a-z0-9]{2,8}", 0u128..=u64::MAX as u128), 0..6)
        ) {
            let coins = Coins::normalized(raw.into_iter().map(|(denom, amount)| Coin::new(denom, amount)));
            prop_assert!(coins.is_valid());

            let parsed: Coins = coins.to_string().parse().unwrap();
            prop_assert!(parsed.is_valid());
            prop_assert_eq!(parsed, coins);
        }
    }
}
