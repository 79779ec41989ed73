//! Language enrichment for chain words

use std::collections::HashMap;
use crate::{Error, Result};
use crate::language::LanguageInfo;
use crate::storage::CognateStore;

/// Resolves language codes through the store, memoizing within one
/// chain-build pass.
///
/// A code with no record resolves to `Ok(None)` (and is remembered as
/// such); any other store failure is returned as-is.
pub struct LanguageEnricher<'a, S: CognateStore + ?Sized> {
    store: &'a S,
    memo: HashMap<String, Option<LanguageInfo>>,
    lookups: usize,
}

impl<'a, S: CognateStore + ?Sized> LanguageEnricher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            memo: HashMap::new(),
            lookups: 0,
        }
    }

    /// Resolve a language code
    pub fn resolve(&mut self, code: &str) -> Result<Option<LanguageInfo>> {
        if let Some(cached) = self.memo.get(code) {
            return Ok(cached.clone());
        }

        self.lookups += 1;
        let resolved = match self.store.language_info(code) {
            Ok(info) => Some(info),
            Err(Error::NotFound(_)) => {
                tracing::warn!("No language record for {:?}; its words will be omitted", code);
                None
            }
            Err(e) => return Err(e),
        };

        self.memo.insert(code.to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Number of store round trips issued so far
    pub fn lookups(&self) -> usize {
        self.lookups
    }
}
