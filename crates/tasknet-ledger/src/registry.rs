//! Token registry: which tokens the ledger accepts and at what price.
//!
//! The native currency is an implicit entry created at construction; it
//! is always enabled and listed first. External tokens are added by the
//! registrar and carry a fixed per-recipient computing price set once at
//! registration.

use crate::error::{LedgerError, Result};
use std::fmt;
use tasknet_token::{Amount, NATIVE_SYMBOL, SharedContract, SharedNative};

/// Transfer backend for a registered token, fixed at registration.
#[derive(Clone)]
pub enum TransferHandle {
    /// The chain's native currency; value arrives attached to calls.
    Native(SharedNative),
    /// An external token contract; value arrives via approvals.
    External(SharedContract),
}

impl TransferHandle {
    /// Whether this is the native-currency handle.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }
}

impl fmt::Debug for TransferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(_) => write!(f, "TransferHandle::Native"),
            Self::External(_) => write!(f, "TransferHandle::External"),
        }
    }
}

/// A fee token accepted by the ledger.
#[derive(Debug, Clone)]
pub struct FeeToken {
    /// Unique token symbol.
    pub symbol: String,
    /// Transfer backend, selected once at registration.
    pub handle: TransferHandle,
    /// Price charged per worker recipient, immutable after registration.
    pub computing_price: Amount,
    /// Whether the token accepts new deposits and locks.
    pub enabled: bool,
}

/// Registry of fee tokens, in registration order with native first.
#[derive(Debug)]
pub struct TokenRegistry {
    tokens: Vec<FeeToken>,
}

impl TokenRegistry {
    /// Create a registry holding the implicit native entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidPrice`] if `computing_price` is zero.
    pub fn new(native: SharedNative, computing_price: Amount) -> Result<Self> {
        if computing_price.is_zero() {
            return Err(LedgerError::InvalidPrice);
        }
        Ok(Self {
            tokens: vec![FeeToken {
                symbol: NATIVE_SYMBOL.to_string(),
                handle: TransferHandle::Native(native),
                computing_price,
                enabled: true,
            }],
        })
    }

    /// Register an external token.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateSymbol`] if the symbol is taken
    /// (the native symbol included) and [`LedgerError::InvalidPrice`] if
    /// the price is zero.
    pub fn register(
        &mut self,
        symbol: impl Into<String>,
        contract: SharedContract,
        computing_price: Amount,
    ) -> Result<()> {
        let symbol = symbol.into();
        if self.find(&symbol).is_some() {
            return Err(LedgerError::DuplicateSymbol { symbol });
        }
        if computing_price.is_zero() {
            return Err(LedgerError::InvalidPrice);
        }
        self.tokens.push(FeeToken {
            symbol,
            handle: TransferHandle::External(contract),
            computing_price,
            enabled: true,
        });
        Ok(())
    }

    /// Enable or disable a registered external token.
    ///
    /// The native entry is implicit rather than registered, so the native
    /// symbol is rejected like any unknown one. Disabling only gates new
    /// deposits and locks; settlement keeps working (see
    /// [`TokenRegistry::get_any`]).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] for the native symbol or an
    /// unregistered one.
    pub fn set_enabled(&mut self, symbol: &str, enabled: bool) -> Result<()> {
        if symbol == NATIVE_SYMBOL {
            return Err(LedgerError::unknown_token(symbol));
        }
        let token = self
            .tokens
            .iter_mut()
            .find(|t| t.symbol == symbol)
            .ok_or_else(|| LedgerError::unknown_token(symbol))?;
        token.enabled = enabled;
        Ok(())
    }

    /// Whether `symbol` can accept new deposits and locks.
    #[must_use]
    pub fn is_supported(&self, symbol: &str) -> bool {
        self.find(symbol).is_some_and(|t| t.enabled)
    }

    /// All tokens, registration order, native first.
    #[must_use]
    pub fn list(&self) -> &[FeeToken] {
        &self.tokens
    }

    /// Look up an enabled token.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] if absent or disabled.
    pub fn lookup(&self, symbol: &str) -> Result<&FeeToken> {
        self.find(symbol)
            .filter(|t| t.enabled)
            .ok_or_else(|| LedgerError::unknown_token(symbol))
    }

    /// Look up a token regardless of the enabled flag.
    ///
    /// Settlement resolves handles through this so that disabling a token
    /// can never strand value already locked against it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownToken`] if absent.
    pub(crate) fn get_any(&self, symbol: &str) -> Result<&FeeToken> {
        self.find(symbol)
            .ok_or_else(|| LedgerError::unknown_token(symbol))
    }

    fn find(&self, symbol: &str) -> Option<&FeeToken> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasknet_token::{InMemoryToken, NativeCoin};

    fn registry() -> TokenRegistry {
        TokenRegistry::new(NativeCoin::new().into_shared(), Amount::from_units(1))
            .expect("registry")
    }

    #[test]
    fn test_native_entry_is_first_and_enabled() {
        let registry = registry();
        let tokens = registry.list();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, NATIVE_SYMBOL);
        assert!(tokens[0].enabled);
        assert!(tokens[0].handle.is_native());
        assert!(registry.is_supported(NATIVE_SYMBOL));
    }

    #[test]
    fn test_zero_native_price_rejected() {
        let result = TokenRegistry::new(NativeCoin::new().into_shared(), Amount::ZERO);
        assert!(matches!(result, Err(LedgerError::InvalidPrice)));
    }

    #[test]
    fn test_register_external() {
        let mut registry = registry();
        registry
            .register(
                "WRK",
                InMemoryToken::new("WRK").into_shared(),
                Amount::from_units(2),
            )
            .expect("register");

        assert!(registry.is_supported("WRK"));
        let token = registry.lookup("WRK").expect("lookup");
        assert_eq!(token.computing_price, Amount::from_units(2));
        assert!(!token.handle.is_native());
        // Registration order, native first
        let symbols: Vec<&str> = registry.list().iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec![NATIVE_SYMBOL, "WRK"]);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let mut registry = registry();
        registry
            .register(
                "WRK",
                InMemoryToken::new("WRK").into_shared(),
                Amount::from_units(1),
            )
            .expect("register");

        let result = registry.register(
            "WRK",
            InMemoryToken::new("WRK").into_shared(),
            Amount::from_units(1),
        );
        assert!(matches!(result, Err(LedgerError::DuplicateSymbol { .. })));
    }

    #[test]
    fn test_native_symbol_cannot_be_reregistered() {
        let mut registry = registry();
        let result = registry.register(
            NATIVE_SYMBOL,
            InMemoryToken::new(NATIVE_SYMBOL).into_shared(),
            Amount::from_units(1),
        );
        assert!(matches!(result, Err(LedgerError::DuplicateSymbol { .. })));
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut registry = registry();
        let result = registry.register("WRK", InMemoryToken::new("WRK").into_shared(), Amount::ZERO);
        assert!(matches!(result, Err(LedgerError::InvalidPrice)));
    }

    #[test]
    fn test_unknown_symbol() {
        let registry = registry();
        assert!(!registry.is_supported("NOPE"));
        assert!(matches!(
            registry.lookup("NOPE"),
            Err(LedgerError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_disable_gates_lookup_but_not_get_any() {
        let mut registry = registry();
        registry
            .register(
                "WRK",
                InMemoryToken::new("WRK").into_shared(),
                Amount::from_units(1),
            )
            .expect("register");

        registry.set_enabled("WRK", false).expect("disable");

        assert!(!registry.is_supported("WRK"));
        assert!(matches!(
            registry.lookup("WRK"),
            Err(LedgerError::UnknownToken { .. })
        ));
        assert!(registry.get_any("WRK").is_ok());

        registry.set_enabled("WRK", true).expect("re-enable");
        assert!(registry.is_supported("WRK"));
    }

    #[test]
    fn test_native_cannot_be_disabled() {
        let mut registry = registry();
        let result = registry.set_enabled(NATIVE_SYMBOL, false);
        assert!(matches!(result, Err(LedgerError::UnknownToken { .. })));
        assert!(registry.is_supported(NATIVE_SYMBOL));
    }
}
